//! Program flow lowering: `label`, `goto`, `if-goto`
//!
//! User labels are qualified with the current scope, so the same label text
//! in two functions never collides and jumps never leave their function.

use crate::context::TranslationContext;
use crate::instr::stack;
use log::debug;
use vmt_codegen::{AsmInst, Comp, Jump};
use vmt_common::TranslateError;

/// Lower `label name`
pub fn lower_label(ctx: &mut TranslationContext, name: &str) -> Result<Vec<AsmInst>, TranslateError> {
    let label = ctx.user_label(name);
    let label = ctx.declare(&label)?;
    debug!("lower_label: {label}");
    Ok(vec![AsmInst::label(label)])
}

/// Lower `goto name`
pub fn lower_goto(ctx: &TranslationContext, name: &str) -> Vec<AsmInst> {
    let target = ctx.user_label(name).to_string();
    debug!("lower_goto: {target}");
    vec![
        AsmInst::at(target),
        AsmInst::jump(Comp::Zero, Jump::JMP),
    ]
}

/// Lower `if-goto name`: pop, jump when the popped value is non-zero
pub fn lower_if_goto(ctx: &TranslationContext, name: &str) -> Vec<AsmInst> {
    let target = ctx.user_label(name).to_string();
    debug!("lower_if_goto: {target}");
    let mut insts = stack::pop_d();
    insts.push(AsmInst::at(target));
    insts.push(AsmInst::jump(Comp::D, Jump::JNE));
    insts
}
