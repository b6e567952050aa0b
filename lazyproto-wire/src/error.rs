use std::fmt;

/// A wire-format decoding error.
///
/// Kept deliberately flat: the caller only ever gets a human-readable reason,
/// never a typed taxonomy. Protobuf-style decode errors are "best effort" by
/// nature, so a single message is enough for callers to log and bail out.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodeError {
    reason: String,
}

impl DecodeError {
    pub fn new(reason: impl Into<String>) -> Self {
        DecodeError {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to decode lazyproto message: {}", self.reason)
    }
}

impl std::error::Error for DecodeError {}
