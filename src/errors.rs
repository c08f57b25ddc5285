//! Error Types
//!
//! This module defines the error types used throughout the runtime.
//!
//! # Overview
//!
//! The main error type [`VexelError`] covers the failure modes of
//! [`File::import`](crate::file::File::import):
//! - Malformed input (bad header, truncated stream, unresolvable references)
//! - Unsupported major file version
//!
//! Playback entry points never fail: out-of-range lookups return `Option`
//! and bounded loops degrade gracefully (see the artboard update loop).

use thiserror::Error;

/// The main error type for the Vexel runtime.
#[derive(Error, Debug)]
pub enum VexelError {
    /// The file could not be understood: bad magic, truncated stream,
    /// an unknown property with no type-table entry, a dependency cycle,
    /// or a reference that failed to resolve.
    #[error("malformed file: {0}")]
    Malformed(String),

    /// The file was written by a runtime with an incompatible major version.
    #[error("unsupported file version {major}.{minor}")]
    UnsupportedVersion {
        /// Major version found in the file header.
        major: u64,
        /// Minor version found in the file header.
        minor: u64,
    },
}

impl VexelError {
    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        VexelError::Malformed(message.into())
    }
}

/// Alias for `Result<T, VexelError>`.
pub type Result<T> = std::result::Result<T, VexelError>;

/// Outcome of the per-object resolution passes that run after decoding.
///
/// `MissingObject` is tolerated for forward compatibility (a reference to an
/// object this runtime did not understand); `InvalidObject` rejects the
/// whole file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Status {
    Ok,
    MissingObject,
    InvalidObject,
}

impl Status {
    /// Loading only ceases on invalid objects.
    pub(crate) fn can_continue(self) -> bool {
        self != Status::InvalidObject
    }
}
