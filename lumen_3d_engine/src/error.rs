//! Error types for the Lumen3D engine
//!
//! This module defines the error type used throughout the engine,
//! including buffer uploads, configuration and resource validation.

use std::fmt;

/// Result type for Lumen3D engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Lumen3D engine errors
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Backend-specific error (buffer upload, draw submission, etc.)
    BackendError(String),

    /// Out of GPU memory
    OutOfMemory,

    /// Invalid resource (geometry, array config, render queue, etc.)
    InvalidResource(String),

    /// Initialization failed (engine, configuration, subsystems)
    InitializationFailed(String),

    /// Feature not available with the current renderer capabilities
    Unsupported(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
            Error::OutOfMemory => write!(f, "Out of GPU memory"),
            Error::InvalidResource(msg) => write!(f, "Invalid resource: {}", msg),
            Error::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
            Error::Unsupported(msg) => write!(f, "Unsupported: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

// ===== ERROR MACROS =====

/// Log an ERROR message and build an `Error::InvalidResource` from it
///
/// # Example
///
/// ```no_run
/// # use lumen_3d_engine::engine_err;
/// let err = engine_err!("lumen3d::Geometry", "Index {} out of range", 12);
/// ```
#[macro_export]
macro_rules! engine_err {
    ($source:expr, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::engine_error!($source, "{}", message);
        $crate::lumen3d::Error::InvalidResource(message)
    }};
}

/// Log an ERROR message and return `Err(Error::InvalidResource)` from the
/// enclosing function
///
/// # Example
///
/// ```no_run
/// # use lumen_3d_engine::engine_bail;
/// fn check(count: usize) -> lumen_3d_engine::lumen3d::Result<()> {
///     if count == 0 {
///         engine_bail!("lumen3d::Geometry", "Empty vertex array");
///     }
///     Ok(())
/// }
/// ```
#[macro_export]
macro_rules! engine_bail {
    ($source:expr, $($arg:tt)*) => {
        return Err($crate::engine_err!($source, $($arg)*))
    };
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
