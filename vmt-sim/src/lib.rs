//! Hack assembler and CPU simulator
//!
//! Executes the translator's output so tests can check what a program
//! computes rather than the exact instructions it was lowered to.

pub mod assembler;
pub mod cpu;
pub mod error;

pub use assembler::{assemble, MachineInst, Program};
pub use cpu::{Cpu, RAM_SIZE};
pub use error::SimError;
