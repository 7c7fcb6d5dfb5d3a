use thiserror::Error;

// -----------------------------------------------------------------------------
// Error

/// Why a handle could not hand out a reference.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum AccessError {
    #[error("handle denotes no resource, it was drained or never set")]
    Null,

    #[error("handle denotes an empty array")]
    Empty,

    #[error("index {index} is out of bounds for an array of length {len}")]
    OutOfBounds { index: usize, len: usize },

    #[error("resource is shared by {owners} handles, exclusive access refused")]
    Shared { owners: usize },
}
