//! Hack VM Translator - Instruction Emitter
//! 
//! This crate holds the lowest layer of the translator:
//! 
//! - The symbolic Hack instruction model (address, compute, label forms)
//! - The fixed memory map and calling convention constants
//! - Sinks that receive emitted instructions, in order, exactly once

pub mod asm;
pub mod abi;
pub mod emit;

pub use asm::{Address, AsmInst, Comp, Dest, Jump, MAX_ADDRESS};
pub use abi::SegmentPointer;
pub use emit::{emit_program, AsmSink, TextEmitter};
