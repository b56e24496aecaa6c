//! Error types for POD operations.

use thiserror::Error;

/// Errors that can occur while building, encoding, signing or verifying a POD.
///
/// Every variant is locally recoverable. A signature that is well-formed but
/// does not match is *not* an error: [`Pod::verify`](crate::Pod::verify)
/// reports it as `Ok(false)`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PodError {
    /// A private key, public key or signature string does not decode to the
    /// required number of bytes under any accepted encoding.
    #[error("key format error: {0}")]
    KeyFormat(String),

    /// An entry name does not match `^[A-Za-z_]\w*$`.
    #[error("invalid POD name {0:?}: only alphanumeric characters and underscores are allowed")]
    EntryName(String),

    /// A value's payload is outside the legal range or length for its kind.
    #[error("value out of range: {0}")]
    ValueRange(String),

    /// A JSON payload does not match any accepted encoding for its kind.
    #[error("invalid value format: {0}")]
    ValueFormat(String),

    /// Bytes decoded, but are not a valid compressed point or signature.
    #[error("decoding error: {0}")]
    Decode(String),

    /// Content ID requested over an empty entry set.
    #[error("at least one entry is required to compute a content ID")]
    EmptyEntries,

    /// The Poseidon primitive rejected its input.
    #[error("hash computation failed: {0}")]
    Hash(String),

    /// The signing primitive failed.
    #[error("signature generation failed: {0}")]
    Signing(String),
}

impl PodError {
    /// Whether the error was caused by malformed caller input rather than an
    /// internal failure of a primitive.
    ///
    /// Transport layers map `true` to a 4xx-class response.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, PodError::Hash(_) | PodError::Signing(_))
    }

    /// Prefix the message with the name of the entry it concerns.
    pub(crate) fn in_entry(self, name: &str) -> Self {
        match self {
            PodError::ValueRange(msg) => PodError::ValueRange(format!("{name}: {msg}")),
            PodError::ValueFormat(msg) => PodError::ValueFormat(format!("{name}: {msg}")),
            PodError::KeyFormat(msg) => PodError::KeyFormat(format!("{name}: {msg}")),
            PodError::Decode(msg) => PodError::Decode(format!("{name}: {msg}")),
            other => other,
        }
    }
}

/// Result type for POD operations.
pub type Result<T> = std::result::Result<T, PodError>;
