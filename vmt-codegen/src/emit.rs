//! Instruction emission
//!
//! Code generation hands finished instructions to an [`AsmSink`]. The text
//! sink writes one line per instruction, in order, exactly once; nothing that
//! has been written is ever revisited.

use crate::asm::AsmInst;
use std::io::Write;
use vmt_common::TranslateError;

/// Destination for emitted instructions
pub trait AsmSink {
    fn emit(&mut self, inst: &AsmInst) -> Result<(), TranslateError>;

    fn emit_all(&mut self, insts: &[AsmInst]) -> Result<(), TranslateError> {
        for inst in insts {
            self.emit(inst)?;
        }
        Ok(())
    }
}

/// Collects instructions in memory, mostly for tests
impl AsmSink for Vec<AsmInst> {
    fn emit(&mut self, inst: &AsmInst) -> Result<(), TranslateError> {
        self.push(inst.clone());
        Ok(())
    }
}

/// Streams instructions as text lines to a writer
pub struct TextEmitter<W: Write> {
    out: W,
    lines: usize,
}

impl<W: Write> TextEmitter<W> {
    pub fn new(out: W) -> Self {
        Self { out, lines: 0 }
    }

    /// Number of lines written so far
    pub fn lines(&self) -> usize {
        self.lines
    }

    /// Flush and hand back the writer
    pub fn finish(mut self) -> Result<W, TranslateError> {
        self.out.flush()?;
        Ok(self.out)
    }
}

impl<W: Write> AsmSink for TextEmitter<W> {
    fn emit(&mut self, inst: &AsmInst) -> Result<(), TranslateError> {
        writeln!(self.out, "{}", inst)?;
        self.lines += 1;
        Ok(())
    }
}

/// Render a complete instruction list as assembly text
pub fn emit_program(insts: &[AsmInst]) -> String {
    let mut out = String::new();
    for inst in insts {
        out.push_str(&inst.to_string());
        out.push('\n');
    }
    out
}
