use thiserror::Error;

/// The bit stream ran out, or held a value that is not valid for the type
/// being read. Always the result of untrusted input, never a bug.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Failed to deserialize value from bit stream (stream underrun or invalid encoding)")]
pub struct SerdeErr;
