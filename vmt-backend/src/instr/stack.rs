//! Stack primitives
//!
//! Fixed instruction sequences against the stack pointer. SP always designates
//! the first free slot above the live stack.

use vmt_codegen::abi::SP;
use vmt_codegen::{AsmInst, Comp, Dest};

/// Point A at the current top-of-stack slot without moving SP
pub fn top() -> Vec<AsmInst> {
    vec![
        AsmInst::at(SP),
        AsmInst::assign(Dest::A, Comp::MMinusOne),
    ]
}

/// Push D onto the stack
pub fn push_d() -> Vec<AsmInst> {
    vec![
        AsmInst::at(SP),
        AsmInst::assign(Dest::A, Comp::M),
        AsmInst::assign(Dest::M, Comp::D),
        AsmInst::at(SP),
        AsmInst::assign(Dest::M, Comp::MPlusOne),
    ]
}

/// Pop the stack into D; A is left on the slot just vacated
pub fn pop_d() -> Vec<AsmInst> {
    vec![
        AsmInst::at(SP),
        AsmInst::assign(Dest::AM, Comp::MMinusOne),
        AsmInst::assign(Dest::D, Comp::M),
    ]
}

/// Pop into D, then point A at the slot below it (the new top)
///
/// Binary operators use this to address their first operand in place.
pub fn pop_then_top() -> Vec<AsmInst> {
    let mut insts = pop_d();
    insts.push(AsmInst::assign(Dest::A, Comp::AMinusOne));
    insts
}
