use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error("Line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Label '{0}' declared twice")]
    DuplicateLabel(String),

    #[error("Program needs {0} instruction slots, more than ROM holds")]
    ProgramTooLarge(usize),

    #[error("Memory access at {address} is outside RAM (pc={pc})")]
    AddressOutOfRange { address: i16, pc: u16 },

    #[error("Stopped after {0} steps without reaching the target")]
    StepLimit(u64),
}
