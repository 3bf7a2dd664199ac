use std::{io::Error as IoError, sync::Arc};
use thiserror::Error;

/// Coarse classification of [Error]s.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing, unterminated or oversized header
    Structural,
    /// Content does not match the expected column layout
    Grammar,
    /// Numeric field could not be interpreted
    Value,
    /// Underlying stream failure
    Io,
}

/// Errors that may rise when decoding Observation RINEX.
/// Every one of them is terminal for the stream it was raised on.
#[derive(Error, Debug, Clone)]
pub enum Error {
    #[error("stream does not start with a valid header")]
    NoHeader,
    #[error("header terminator not found within {0} lines")]
    HeaderTooLong(usize),
    #[error("line {line}: unknown satellite system \"{code}\"")]
    UnknownSystem { line: usize, code: String },
    #[error("line {line}: satellite number out of range \"{sv}\"")]
    PrnOutOfRange { line: usize, sv: String },
    #[error("line {line}: invalid epoch description \"{content}\"")]
    BadEpochLine { line: usize, content: String },
    #[error("failed to parse \"{label}\" from \"{content}\"")]
    BadHeaderField { label: String, content: String },
    #[error("line {line}: epoch ended after {found} out of {expected} satellites")]
    MissingSatellites {
        line: usize,
        expected: u16,
        found: u16,
    },
    #[error("line {line}: {code} observation out of range")]
    ObservationOutOfRange { line: usize, code: String },
    #[error("line {line}: invalid timestamp \"{content}\"")]
    DateTime { line: usize, content: String },
    #[error("line {line}: invalid epoch flag \"{content}\"")]
    EpochFlag { line: usize, content: String },
    #[error("line {line}: failed to parse {field} from \"{content}\"")]
    ParseFloat {
        line: usize,
        field: String,
        content: String,
    },
    #[error("line {line}: failed to parse {field} from \"{content}\"")]
    ParseInt {
        line: usize,
        field: String,
        content: String,
    },
    #[error("i/o error: {0}")]
    Io(Arc<IoError>),
    #[error("secondary stream: {0}")]
    Secondary(Box<Error>),
}

impl From<IoError> for Error {
    fn from(e: IoError) -> Self {
        Self::Io(Arc::new(e))
    }
}

impl Error {
    /// Returns the [ErrorKind] of this error.
    /// Errors forwarded from a secondary stream keep their original kind.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NoHeader | Self::HeaderTooLong(_) => ErrorKind::Structural,
            Self::UnknownSystem { .. }
            | Self::PrnOutOfRange { .. }
            | Self::BadEpochLine { .. }
            | Self::MissingSatellites { .. }
            | Self::ObservationOutOfRange { .. }
            | Self::EpochFlag { .. } => ErrorKind::Grammar,
            Self::BadHeaderField { .. }
            | Self::DateTime { .. }
            | Self::ParseFloat { .. }
            | Self::ParseInt { .. } => ErrorKind::Value,
            Self::Io(_) => ErrorKind::Io,
            Self::Secondary(e) => e.kind(),
        }
    }
}
