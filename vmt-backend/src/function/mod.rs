//! Function call/return protocol
//! 
//! - `calling_convention.rs` - function entry, call, return (the frame layout)
//! - `bootstrap.rs` - stack initialisation plus the implicit entry call

mod calling_convention;
mod bootstrap;

pub use calling_convention::{lower_function, lower_call, lower_return};
pub use bootstrap::lower_bootstrap;

#[cfg(test)]
mod tests;
