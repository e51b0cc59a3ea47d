// Copyright 2025 Lars Brubaker
// License: MIT
//
// Error type shared by the subdivision engine, the contour generator and the
// tessellator front end.

use std::collections::TryReserveError;

/// Failure kinds reported by every fallible operation in the crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TessError {
    /// A required input was missing or empty.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// A point fell outside the open domain rectangle of the subdivision,
    /// or a numeric parameter was out of its accepted range.
    #[error("point ({x}, {y}) lies outside the valid range")]
    InvalidRange {
        /// Offending x coordinate (or parameter value).
        x: f64,
        /// Offending y coordinate (0.0 for scalar parameters).
        y: f64,
    },

    /// The subdivision was used before `initialize`.
    #[error("subdivision is not initialized")]
    NotInitialized,

    /// `initialize` was called a second time.
    #[error("subdivision is already initialized")]
    AlreadyInitialized,

    /// Growing an arena, list or work stack failed.
    #[error("out of memory")]
    OutOfMemory,

    /// A bounded walk overflowed or the topology was found inconsistent.
    #[error("aborted: {0}")]
    Aborted(&'static str),

    /// The entry point is intentionally not implemented.
    #[error("operation is not supported")]
    Unsupported,

    /// A drawing command was issued while no contour path was open.
    #[error("no open contour path")]
    NoOpenPath,
}

impl From<TryReserveError> for TessError {
    fn from(_: TryReserveError) -> Self {
        TessError::OutOfMemory
    }
}

pub type Result<T> = std::result::Result<T, TessError>;

/// Push onto a vector, reporting allocation failure instead of aborting.
#[inline]
pub(crate) fn try_push<T>(v: &mut Vec<T>, value: T) -> Result<()> {
    v.try_reserve(1)?;
    v.push(value);
    Ok(())
}
