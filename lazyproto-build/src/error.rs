//! Errors the generator surfaces: descriptor rejection and I/O failure.

use std::fmt;
use std::io;

/// Why the descriptor adapter rejected an input schema.
///
/// These correspond to §4.A's invariants and the wire types this core
/// supports; anything else is rejected here rather than silently emitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    UnsupportedWireType {
        message: String,
        field: String,
        wire_type: String,
    },
    UnsupportedCardinality {
        message: String,
        field: String,
        cardinality: String,
    },
    DuplicateTag {
        message: String,
        field: String,
        tag: u32,
    },
    InvalidTag {
        message: String,
        field: String,
        tag: i64,
    },
    InvalidFieldName {
        message: String,
        field: String,
    },
    UnresolvedMessageReference {
        message: String,
        field: String,
        referent: String,
    },
    TooManyMessageFields {
        message: String,
        count: usize,
    },
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::UnsupportedWireType {
                message,
                field,
                wire_type,
            } => write!(
                f,
                "{message}.{field}: unsupported wire type `{wire_type}` (supported: uint32, fixed64, string, message)"
            ),
            Rejection::UnsupportedCardinality {
                message,
                field,
                cardinality,
            } => write!(
                f,
                "{message}.{field}: unsupported cardinality `{cardinality}` (supported: singular, repeated)"
            ),
            Rejection::DuplicateTag { message, field, tag } => {
                write!(f, "{message}.{field}: tag {tag} is already used by another field")
            }
            Rejection::InvalidTag { message, field, tag } => {
                write!(f, "{message}.{field}: tag {tag} must be a positive integer")
            }
            Rejection::InvalidFieldName { message, field } => write!(
                f,
                "{message}.{field}: field names must be non-empty and start with an ASCII letter"
            ),
            Rejection::UnresolvedMessageReference {
                message,
                field,
                referent,
            } => write!(
                f,
                "{message}.{field}: message type `{referent}` is not declared in this file"
            ),
            Rejection::TooManyMessageFields { message, count } => write!(
                f,
                "{message}: {count} MESSAGE-typed fields declared, exceeding the 63-field limit"
            ),
        }
    }
}

impl std::error::Error for Rejection {}

/// Top-level generator error.
#[derive(Debug)]
pub enum Error {
    /// Failure to read a schema file or write generated output.
    Io(io::Error),
    /// The descriptor adapter rejected the schema.
    Descriptor(Rejection),
    /// The input schema descriptor itself was malformed (e.g. invalid JSON).
    InvalidDescriptor(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "{e}"),
            Error::Descriptor(r) => write!(f, "{r}"),
            Error::InvalidDescriptor(msg) => write!(f, "invalid schema descriptor: {msg}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::Descriptor(r) => Some(r),
            Error::InvalidDescriptor(_) => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<Rejection> for Error {
    fn from(r: Rejection) -> Self {
        Error::Descriptor(r)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
