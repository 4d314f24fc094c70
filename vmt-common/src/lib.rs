//! Hack VM Translator - Common Types and Utilities
//! 
//! This crate contains the error type and source location tracking shared
//! by every stage of the VM translator.

pub mod error;
pub mod source_loc;

pub use error::TranslateError;
pub use source_loc::SourceLocation;
