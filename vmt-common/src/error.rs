//! Error handling for the Hack VM translator
//!
//! Every error is fatal: the translator has no skip-and-continue mode, and a
//! run that returns an error must have its output discarded.

use crate::source_loc::SourceLocation;
use thiserror::Error;

/// Main translator error type that encompasses every failure of a run
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TranslateError {
    #[error("Malformed command at {location}: {message}")]
    MalformedCommand {
        location: SourceLocation,
        message: String,
    },

    #[error("Unknown segment '{segment}' at {location}")]
    UnknownSegment {
        location: SourceLocation,
        segment: String,
    },

    #[error("Index {index} out of range for segment '{segment}' at {location} (maximum: {max})")]
    IndexOutOfRange {
        location: SourceLocation,
        segment: String,
        index: u32,
        max: u32,
    },

    #[error("Call/return protocol misuse at {location}: {message}")]
    ProtocolMisuse {
        location: SourceLocation,
        message: String,
    },

    #[error("Duplicate label '{label}' at {location}")]
    DuplicateLabel {
        location: SourceLocation,
        label: String,
    },

    #[error("IO error: {message}")]
    Io { message: String },
}

impl TranslateError {
    /// Create a malformed command error with no location yet
    pub fn malformed(message: impl Into<String>) -> Self {
        TranslateError::MalformedCommand {
            location: SourceLocation::unknown(),
            message: message.into(),
        }
    }

    /// Create an unknown segment error with no location yet
    pub fn unknown_segment(segment: impl Into<String>) -> Self {
        TranslateError::UnknownSegment {
            location: SourceLocation::unknown(),
            segment: segment.into(),
        }
    }

    /// Create an index range error with no location yet
    pub fn index_out_of_range(segment: impl Into<String>, index: u32, max: u32) -> Self {
        TranslateError::IndexOutOfRange {
            location: SourceLocation::unknown(),
            segment: segment.into(),
            index,
            max,
        }
    }

    /// Create a protocol misuse error with no location yet
    pub fn protocol_misuse(message: impl Into<String>) -> Self {
        TranslateError::ProtocolMisuse {
            location: SourceLocation::unknown(),
            message: message.into(),
        }
    }

    /// Create a duplicate label error with no location yet
    pub fn duplicate_label(label: impl Into<String>) -> Self {
        TranslateError::DuplicateLabel {
            location: SourceLocation::unknown(),
            label: label.into(),
        }
    }

    /// Attach a location, keeping one that was already set
    pub fn at(mut self, at: &SourceLocation) -> Self {
        if let Some(location) = self.location_mut() {
            if location.is_unknown() {
                *location = at.clone();
            }
        }
        self
    }

    /// The location of the offending command, if this error has one
    pub fn location(&self) -> Option<&SourceLocation> {
        match self {
            TranslateError::MalformedCommand { location, .. }
            | TranslateError::UnknownSegment { location, .. }
            | TranslateError::IndexOutOfRange { location, .. }
            | TranslateError::ProtocolMisuse { location, .. }
            | TranslateError::DuplicateLabel { location, .. } => Some(location),
            TranslateError::Io { .. } => None,
        }
    }

    fn location_mut(&mut self) -> Option<&mut SourceLocation> {
        match self {
            TranslateError::MalformedCommand { location, .. }
            | TranslateError::UnknownSegment { location, .. }
            | TranslateError::IndexOutOfRange { location, .. }
            | TranslateError::ProtocolMisuse { location, .. }
            | TranslateError::DuplicateLabel { location, .. } => Some(location),
            TranslateError::Io { .. } => None,
        }
    }
}

/// Convert from std::io::Error
impl From<std::io::Error> for TranslateError {
    fn from(err: std::io::Error) -> Self {
        TranslateError::Io {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_at_fills_unknown_location() {
        let err = TranslateError::malformed("unknown command 'jump'")
            .at(&SourceLocation::new("Main.vm", 7));
        assert_eq!(err.location(), Some(&SourceLocation::new("Main.vm", 7)));
        assert_eq!(
            err.to_string(),
            "Malformed command at Main.vm:7: unknown command 'jump'"
        );
    }

    #[test]
    fn test_at_keeps_existing_location() {
        let err = TranslateError::unknown_segment("heap")
            .at(&SourceLocation::new("A.vm", 1))
            .at(&SourceLocation::new("B.vm", 2));
        assert_eq!(err.location(), Some(&SourceLocation::new("A.vm", 1)));
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
        let err: TranslateError = io.into();
        assert!(matches!(err, TranslateError::Io { .. }));
        assert!(err.location().is_none());
        assert_eq!(err.at(&SourceLocation::new("A.vm", 1)).location(), None);
    }

    #[test]
    fn test_index_error_message() {
        let err = TranslateError::index_out_of_range("temp", 9, 7);
        assert_eq!(
            err.to_string(),
            "Index 9 out of range for segment 'temp' at <unknown> (maximum: 7)"
        );
    }
}
