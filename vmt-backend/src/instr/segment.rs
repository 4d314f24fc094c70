//! Segment addressing for `push` and `pop`
//!
//! Resolves the eight segments to immediates, fixed cells, pointer-relative
//! cells, or file-scoped static symbols, and moves values between them and the
//! stack.

use crate::command::Segment;
use crate::context::TranslationContext;
use crate::instr::stack;
use log::{debug, trace};
use vmt_codegen::abi::{SegmentPointer, POP_TARGET, TEMP_BASE, TEMP_SIZE};
use vmt_codegen::{AsmInst, Comp, Dest, MAX_ADDRESS};
use vmt_common::TranslateError;

/// Where a segment's values live
enum Location {
    /// Immediate value (constant segment)
    Immediate(u16),
    /// Fixed memory cell or symbol, accessed directly
    Direct(AsmInst),
    /// Cell at pointer + offset
    Indirect(SegmentPointer, u16),
}

/// Largest index each segment accepts
fn max_index(segment: Segment) -> u16 {
    match segment {
        Segment::Temp => TEMP_SIZE - 1,
        Segment::Pointer => 1,
        _ => MAX_ADDRESS,
    }
}

fn resolve(
    ctx: &TranslationContext,
    segment: Segment,
    index: u16,
) -> Result<Location, TranslateError> {
    let max = max_index(segment);
    if index > max {
        return Err(TranslateError::index_out_of_range(
            segment.name(),
            u32::from(index),
            u32::from(max),
        ));
    }

    Ok(match segment {
        Segment::Constant => Location::Immediate(index),
        Segment::Local => Location::Indirect(SegmentPointer::Local, index),
        Segment::Argument => Location::Indirect(SegmentPointer::Argument, index),
        Segment::This => Location::Indirect(SegmentPointer::This, index),
        Segment::That => Location::Indirect(SegmentPointer::That, index),
        Segment::Temp => Location::Direct(AsmInst::at(TEMP_BASE + index)),
        Segment::Pointer => {
            let ptr = if index == 0 { SegmentPointer::This } else { SegmentPointer::That };
            Location::Direct(AsmInst::at(ptr.symbol()))
        }
        Segment::Static => Location::Direct(AsmInst::at(ctx.static_symbol(index)?)),
    })
}

/// Lower `push segment index`
///
/// # Returns
/// Instructions that load the value into D and push it
pub fn lower_push(
    ctx: &TranslationContext,
    segment: Segment,
    index: u16,
) -> Result<Vec<AsmInst>, TranslateError> {
    debug!("lower_push: {segment} {index}");
    let mut insts = Vec::new();

    match resolve(ctx, segment, index)? {
        Location::Immediate(value) => {
            insts.push(AsmInst::at(value));
            insts.push(AsmInst::assign(Dest::D, Comp::A));
        }
        Location::Direct(address) => {
            insts.push(address);
            insts.push(AsmInst::assign(Dest::D, Comp::M));
        }
        Location::Indirect(ptr, offset) => {
            insts.push(AsmInst::at(ptr.symbol()));
            insts.push(AsmInst::assign(Dest::D, Comp::M));
            insts.push(AsmInst::at(offset));
            insts.push(AsmInst::assign(Dest::A, Comp::DPlusA));
            insts.push(AsmInst::assign(Dest::D, Comp::M));
        }
    }
    insts.extend(stack::push_d());

    trace!("  push generated {} instructions", insts.len());
    Ok(insts)
}

/// Lower `pop segment index`
///
/// Pointer-relative targets are computed into a scratch cell first, because
/// popping the value overwrites A.
pub fn lower_pop(
    ctx: &TranslationContext,
    segment: Segment,
    index: u16,
) -> Result<Vec<AsmInst>, TranslateError> {
    debug!("lower_pop: {segment} {index}");
    let mut insts = Vec::new();

    match resolve(ctx, segment, index)? {
        Location::Immediate(_) => {
            return Err(TranslateError::malformed("cannot pop into the constant segment"));
        }
        Location::Direct(address) => {
            insts.extend(stack::pop_d());
            insts.push(address);
            insts.push(AsmInst::assign(Dest::M, Comp::D));
        }
        Location::Indirect(ptr, offset) => {
            insts.push(AsmInst::at(ptr.symbol()));
            insts.push(AsmInst::assign(Dest::D, Comp::M));
            insts.push(AsmInst::at(offset));
            insts.push(AsmInst::assign(Dest::D, Comp::DPlusA));
            insts.push(AsmInst::at(POP_TARGET));
            insts.push(AsmInst::assign(Dest::M, Comp::D));
            insts.extend(stack::pop_d());
            insts.push(AsmInst::at(POP_TARGET));
            insts.push(AsmInst::assign(Dest::A, Comp::M));
            insts.push(AsmInst::assign(Dest::M, Comp::D));
        }
    }

    trace!("  pop generated {} instructions", insts.len());
    Ok(insts)
}
