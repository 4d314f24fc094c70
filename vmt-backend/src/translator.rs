//! Command dispatcher
//!
//! The [`Translator`] owns the translation context and the output sink for one
//! run. It takes one command at a time, lowers it, and emits the result before
//! the next command is looked at. An error aborts the run; the output written
//! so far must be discarded by the caller.

use crate::command::{command_lines, Command};
use crate::context::TranslationContext;
use crate::function::{lower_bootstrap, lower_call, lower_function, lower_return};
use crate::instr::{lower_arithmetic, lower_goto, lower_if_goto, lower_label, lower_pop, lower_push};
use log::{debug, info, trace};
use serde::Serialize;
use vmt_codegen::abi::{DEFAULT_ENTRY, STACK_BASE};
use vmt_codegen::{AsmInst, AsmSink};
use vmt_common::{SourceLocation, TranslateError};

/// Options for one translation run
#[derive(Debug, Clone)]
pub struct TranslatorOptions {
    /// Emit the bootstrap sequence before the first file
    pub bootstrap: bool,
    /// Function the bootstrap sequence calls
    pub entry_function: String,
    /// Initial stack pointer set by the bootstrap sequence
    pub stack_base: u16,
    /// Emit each VM command as a comment ahead of its code
    pub annotate: bool,
}

impl Default for TranslatorOptions {
    fn default() -> Self {
        Self {
            bootstrap: false,
            entry_function: DEFAULT_ENTRY.to_string(),
            stack_base: STACK_BASE,
            annotate: false,
        }
    }
}

/// Counters collected over one run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TranslationStats {
    pub files: usize,
    pub commands: usize,
    /// Address and compute instructions, not labels or comments
    pub instructions: usize,
    pub functions: usize,
    pub calls: usize,
    pub comparisons: usize,
}

pub struct Translator<S: AsmSink> {
    sink: S,
    ctx: TranslationContext,
    options: TranslatorOptions,
    stats: TranslationStats,
    location: SourceLocation,
}

impl<S: AsmSink> Translator<S> {
    /// Create a translator, emitting the bootstrap sequence if requested
    pub fn new(sink: S, options: TranslatorOptions) -> Result<Self, TranslateError> {
        let mut translator = Self {
            sink,
            ctx: TranslationContext::new(),
            options,
            stats: TranslationStats::default(),
            location: SourceLocation::unknown(),
        };
        if translator.options.bootstrap {
            translator.emit_bootstrap()?;
        }
        Ok(translator)
    }

    fn emit_bootstrap(&mut self) -> Result<(), TranslateError> {
        let insts = lower_bootstrap(
            &mut self.ctx,
            self.options.stack_base,
            &self.options.entry_function,
        )?;
        if self.options.annotate {
            self.sink.emit(&AsmInst::comment("bootstrap"))?;
        }
        self.emit_all(&insts)?;
        self.stats.calls += 1;
        Ok(())
    }

    /// Start a new input file
    pub fn begin_file(&mut self, filename: &str, namespace: &str) {
        info!("Translating {filename}");
        self.ctx.begin_file(namespace);
        self.location = SourceLocation::new(filename, 0);
        self.stats.files += 1;
    }

    /// Translate every command line of one file
    pub fn translate_source(
        &mut self,
        filename: &str,
        namespace: &str,
        source: &str,
    ) -> Result<(), TranslateError> {
        self.begin_file(filename, namespace);
        for (line_number, line) in command_lines(source) {
            self.translate_line(line_number, line)?;
        }
        Ok(())
    }

    /// Parse and translate one comment-free command line
    pub fn translate_line(&mut self, line_number: u32, line: &str) -> Result<(), TranslateError> {
        self.location = self.location.with_line(line_number);
        let command = Command::parse(line).map_err(|e| e.at(&self.location))?;
        self.translate_command(&command)
    }

    /// Translate one parsed command
    pub fn translate_command(&mut self, command: &Command) -> Result<(), TranslateError> {
        let location = self.location.clone();
        self.dispatch(command).map_err(|e| e.at(&location))
    }

    fn dispatch(&mut self, command: &Command) -> Result<(), TranslateError> {
        debug!("{}: {command}", self.location);

        let insts = match command {
            Command::Push { segment, index } => lower_push(&self.ctx, *segment, *index)?,
            Command::Pop { segment, index } => lower_pop(&self.ctx, *segment, *index)?,
            Command::Arithmetic { op } => {
                if op.is_comparison() {
                    self.stats.comparisons += 1;
                }
                lower_arithmetic(&mut self.ctx, *op)?
            }
            Command::Label { name } => lower_label(&mut self.ctx, name)?,
            Command::Goto { label } => lower_goto(&self.ctx, label),
            Command::IfGoto { label } => lower_if_goto(&self.ctx, label),
            Command::Function { name, locals } => {
                self.stats.functions += 1;
                lower_function(&mut self.ctx, name, *locals)?
            }
            Command::Call { name, args } => {
                self.stats.calls += 1;
                lower_call(&mut self.ctx, name, *args)?
            }
            Command::Return => lower_return(&self.ctx)?,
        };

        if self.options.annotate {
            self.sink.emit(&AsmInst::comment(command.to_string()))?;
        }
        self.emit_all(&insts)?;
        self.stats.commands += 1;
        trace!("  emitted {} instructions", insts.len());
        Ok(())
    }

    fn emit_all(&mut self, insts: &[AsmInst]) -> Result<(), TranslateError> {
        self.sink.emit_all(insts)?;
        self.stats.instructions += insts.iter().filter(|i| i.is_executable()).count();
        Ok(())
    }

    pub fn stats(&self) -> &TranslationStats {
        &self.stats
    }

    pub fn context(&self) -> &TranslationContext {
        &self.ctx
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }
}
