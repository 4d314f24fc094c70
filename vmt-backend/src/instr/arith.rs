//! Arithmetic, logical and comparison lowering
//!
//! Unary operators rewrite the top of stack in place. Binary operators pop the
//! right operand into D and combine it into the left operand's slot.
//! Comparisons branch on the signed difference and write -1 (true) or 0
//! (false) into that slot.

use crate::command::ArithOp;
use crate::context::TranslationContext;
use crate::instr::stack;
use log::{debug, trace};
use vmt_codegen::{AsmInst, Comp, Dest, Jump};
use vmt_common::TranslateError;

/// Lower any arithmetic command
pub fn lower_arithmetic(
    ctx: &mut TranslationContext,
    op: ArithOp,
) -> Result<Vec<AsmInst>, TranslateError> {
    debug!("lower_arithmetic: {op}");
    let insts = match op {
        ArithOp::Neg => lower_unary(Comp::NegM),
        ArithOp::Not => lower_unary(Comp::NotM),
        ArithOp::Add => lower_binary(Comp::DPlusM),
        ArithOp::Sub => lower_binary(Comp::MMinusD),
        ArithOp::And => lower_binary(Comp::DAndM),
        ArithOp::Or => lower_binary(Comp::DOrM),
        ArithOp::Eq => lower_comparison(ctx, Jump::JEQ)?,
        ArithOp::Gt => lower_comparison(ctx, Jump::JGT)?,
        ArithOp::Lt => lower_comparison(ctx, Jump::JLT)?,
    };
    trace!("  {op} generated {} instructions", insts.len());
    Ok(insts)
}

fn lower_unary(comp: Comp) -> Vec<AsmInst> {
    let mut insts = stack::top();
    insts.push(AsmInst::assign(Dest::M, comp));
    insts
}

/// `comp` combines D (right operand) with M (left operand)
fn lower_binary(comp: Comp) -> Vec<AsmInst> {
    let mut insts = stack::pop_then_top();
    insts.push(AsmInst::assign(Dest::M, comp));
    insts
}

/// Branch-and-merge pattern for eq/gt/lt
///
/// ```text
///     D = left - right
///     D;<cond> -> TRUE
///     top = 0
///     goto END
/// (TRUE)
///     top = -1
/// (END)
/// ```
///
/// The difference is taken in 16 bits, so operands more than 32767 apart can
/// compare the wrong way; the result is still -1 or 0.
fn lower_comparison(ctx: &mut TranslationContext, condition: Jump) -> Result<Vec<AsmInst>, TranslateError> {
    let (true_label, end_label) = ctx.next_compare_labels();
    let true_name = ctx.declare(&true_label)?;
    let end_name = ctx.declare(&end_label)?;
    trace!("  comparison labels {true_name} / {end_name}");

    let mut insts = stack::pop_then_top();
    insts.push(AsmInst::assign(Dest::D, Comp::MMinusD));
    insts.push(AsmInst::at(true_name.clone()));
    insts.push(AsmInst::jump(Comp::D, condition));

    insts.extend(stack::top());
    insts.push(AsmInst::assign(Dest::M, Comp::Zero));
    insts.push(AsmInst::at(end_name.clone()));
    insts.push(AsmInst::jump(Comp::Zero, Jump::JMP));

    insts.push(AsmInst::label(true_name));
    insts.extend(stack::top());
    insts.push(AsmInst::assign(Dest::M, Comp::MinusOne));
    insts.push(AsmInst::label(end_name));
    Ok(insts)
}
