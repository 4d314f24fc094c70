//! Tests for per-command lowering
//!
//! Shape tests look at the generated instructions directly; execution tests
//! assemble them and run them on the simulator.

mod segment_tests;

use vmt_codegen::{emit_program, AsmInst};
use vmt_sim::{assemble, Cpu};

/// LCL, ARG, THIS, THAT used by every execution test
pub(super) const LOCAL: i16 = 300;
pub(super) const ARGUMENT: i16 = 400;
pub(super) const THIS: i16 = 3000;
pub(super) const THAT: i16 = 3010;

/// Run straight-line code to completion on a fresh machine
pub(super) fn execute(insts: &[AsmInst]) -> Cpu {
    let program = assemble(&emit_program(insts)).unwrap();
    let mut cpu = Cpu::with_segments(LOCAL, ARGUMENT, THIS, THAT);
    cpu.run(&program, 10_000).unwrap();
    cpu
}
