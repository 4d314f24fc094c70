//! VM calling convention
//!
//! Frame layout during one activation, stack growing upward:
//!
//! ```text
//! ARG ->  argument 0
//!         ...
//!         argument n-1
//!         return address        frame - 5
//!         saved LCL             frame - 4
//!         saved ARG             frame - 3
//!         saved THIS            frame - 2
//!         saved THAT            frame - 1
//! LCL ->  local 0               frame
//!         ...
//!         local k-1
//! SP  ->  working stack
//! ```
//!
//! `call` builds the five saved words, `return` tears them down in reverse
//! order and leaves the single return value where argument 0 was.

use crate::context::TranslationContext;
use crate::instr::stack;
use log::{debug, info, trace};
use vmt_codegen::abi::{SegmentPointer, FRAME_BASE, FRAME_SIZE, RETURN_ADDRESS, SP};
use vmt_codegen::{AsmInst, Comp, Dest, Jump, MAX_ADDRESS};
use vmt_common::TranslateError;

/// Lower `function name locals`
///
/// Declares the global entry label, switches the context into the function's
/// scope and reserves `locals` zero-initialised slots.
pub fn lower_function(
    ctx: &mut TranslationContext,
    name: &str,
    locals: u16,
) -> Result<Vec<AsmInst>, TranslateError> {
    info!("Lowering function {name} with {locals} locals");
    let label = ctx.enter_function(name)?;

    let mut insts = vec![AsmInst::label(label)];
    if locals > 0 {
        insts.push(AsmInst::assign(Dest::D, Comp::Zero));
        for _ in 0..locals {
            insts.extend(stack::push_d());
        }
    }

    trace!("  function entry generated {} instructions", insts.len());
    Ok(insts)
}

/// Lower `call name args`
///
/// Saves the return address and the caller's four pointers, repositions ARG
/// and LCL for the callee, jumps, and declares the return label right after
/// the jump.
pub fn lower_call(
    ctx: &mut TranslationContext,
    name: &str,
    args: u16,
) -> Result<Vec<AsmInst>, TranslateError> {
    let arg_offset = u32::from(args) + u32::from(FRAME_SIZE);
    if arg_offset > u32::from(MAX_ADDRESS) {
        return Err(TranslateError::malformed(format!(
            "call {name} passes too many arguments ({args})"
        )));
    }
    let arg_offset = arg_offset as u16;

    let return_label = ctx.next_return_label();
    let return_name = ctx.declare(&return_label)?;
    debug!("lower_call: {name} with {args} args, returns to {return_name}");

    let mut insts = Vec::new();

    // Return address
    insts.push(AsmInst::at(return_name.clone()));
    insts.push(AsmInst::assign(Dest::D, Comp::A));
    insts.extend(stack::push_d());

    // Caller's segment pointers
    for ptr in SegmentPointer::SAVE_ORDER {
        insts.push(AsmInst::at(ptr.symbol()));
        insts.push(AsmInst::assign(Dest::D, Comp::M));
        insts.extend(stack::push_d());
    }

    // ARG = SP - args - 5
    insts.push(AsmInst::at(SP));
    insts.push(AsmInst::assign(Dest::D, Comp::M));
    insts.push(AsmInst::at(arg_offset));
    insts.push(AsmInst::assign(Dest::D, Comp::DMinusA));
    insts.push(AsmInst::at(SegmentPointer::Argument.symbol()));
    insts.push(AsmInst::assign(Dest::M, Comp::D));

    // LCL = SP
    insts.push(AsmInst::at(SP));
    insts.push(AsmInst::assign(Dest::D, Comp::M));
    insts.push(AsmInst::at(SegmentPointer::Local.symbol()));
    insts.push(AsmInst::assign(Dest::M, Comp::D));

    insts.push(AsmInst::at(name));
    insts.push(AsmInst::jump(Comp::Zero, Jump::JMP));
    insts.push(AsmInst::label(return_name));

    trace!("  call generated {} instructions", insts.len());
    Ok(insts)
}

/// Lower `return`
///
/// The return address is captured before the return value is written, since
/// with zero arguments argument 0 and the return address share a slot.
pub fn lower_return(ctx: &TranslationContext) -> Result<Vec<AsmInst>, TranslateError> {
    let function = ctx.current_function().ok_or_else(|| {
        TranslateError::protocol_misuse("return outside of any function")
    })?;
    debug!("lower_return: from {function}");

    let mut insts = Vec::new();

    // frame = LCL
    insts.push(AsmInst::at(SegmentPointer::Local.symbol()));
    insts.push(AsmInst::assign(Dest::D, Comp::M));
    insts.push(AsmInst::at(FRAME_BASE));
    insts.push(AsmInst::assign(Dest::M, Comp::D));

    // ret = *(frame - 5)
    insts.push(AsmInst::at(FRAME_SIZE));
    insts.push(AsmInst::assign(Dest::A, Comp::DMinusA));
    insts.push(AsmInst::assign(Dest::D, Comp::M));
    insts.push(AsmInst::at(RETURN_ADDRESS));
    insts.push(AsmInst::assign(Dest::M, Comp::D));

    // *ARG = pop()
    insts.extend(stack::pop_d());
    insts.push(AsmInst::at(SegmentPointer::Argument.symbol()));
    insts.push(AsmInst::assign(Dest::A, Comp::M));
    insts.push(AsmInst::assign(Dest::M, Comp::D));

    // SP = ARG + 1
    insts.push(AsmInst::assign(Dest::D, Comp::APlusOne));
    insts.push(AsmInst::at(SP));
    insts.push(AsmInst::assign(Dest::M, Comp::D));

    // THAT, THIS, ARG, LCL = *(--frame)
    for ptr in SegmentPointer::RESTORE_ORDER {
        insts.push(AsmInst::at(FRAME_BASE));
        insts.push(AsmInst::assign(Dest::AM, Comp::MMinusOne));
        insts.push(AsmInst::assign(Dest::D, Comp::M));
        insts.push(AsmInst::at(ptr.symbol()));
        insts.push(AsmInst::assign(Dest::M, Comp::D));
    }

    // goto ret
    insts.push(AsmInst::at(RETURN_ADDRESS));
    insts.push(AsmInst::assign(Dest::A, Comp::M));
    insts.push(AsmInst::jump(Comp::Zero, Jump::JMP));

    trace!("  return generated {} instructions", insts.len());
    Ok(insts)
}
