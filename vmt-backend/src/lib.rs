//! Hack VM Translator - Backend
//!
//! This crate translates stack-machine VM commands into symbolic Hack
//! assembly in a single forward pass:
//!
//! - `command` - VM command model and line parser
//! - `naming` / `context` - label namespacing and per-run translation state
//! - `instr` - stack primitives, segment addressing, arithmetic, program flow
//! - `function` - function entry, call/return protocol, bootstrap
//! - `translator` - the command dispatcher

pub mod command;
pub mod naming;
pub mod context;
pub mod instr;
pub mod function;
pub mod translator;

pub use command::{command_lines, ArithOp, Command, Segment};
pub use context::TranslationContext;
pub use naming::{Label, NameGenerator, Scope};
pub use translator::{TranslationStats, Translator, TranslatorOptions};
pub use vmt_codegen::{AsmInst, AsmSink, TextEmitter};

use vmt_common::TranslateError;

/// One VM input file
#[derive(Debug, Clone, Copy)]
pub struct VmSource<'a> {
    /// Name used in error locations
    pub filename: &'a str,
    /// Static namespace, normally the file stem
    pub namespace: &'a str,
    pub text: &'a str,
}

/// Translate a set of VM files into one assembly text
pub fn translate_program(
    sources: &[VmSource<'_>],
    options: TranslatorOptions,
) -> Result<(String, TranslationStats), TranslateError> {
    let mut translator = Translator::new(TextEmitter::new(Vec::new()), options)?;
    for source in sources {
        translator.translate_source(source.filename, source.namespace, source.text)?;
    }
    let stats = translator.stats().clone();
    let bytes = translator.into_sink().finish()?;
    let text = String::from_utf8(bytes).map_err(|e| TranslateError::Io {
        message: e.to_string(),
    })?;
    Ok((text, stats))
}

#[cfg(test)]
mod tests;
