//! Per-command instruction lowering
//! 
//! - `stack` - stack primitives every other module builds on
//! - `segment` - push/pop segment addressing
//! - `arith` - arithmetic, logical and comparison commands
//! - `branch` - label, goto, if-goto
//! 
//! Call, return and function entry live in `crate::function`.

pub mod stack;
pub mod segment;
pub mod arith;
pub mod branch;

pub use segment::{lower_push, lower_pop};
pub use arith::lower_arithmetic;
pub use branch::{lower_label, lower_goto, lower_if_goto};

#[cfg(test)]
mod tests;
