//! Error types for the texture render core
//!
//! This module defines the error type returned by every fallible operation,
//! mostly GPU resource creation (textures and views).

use std::fmt;

/// Result type for texture render operations
pub type Result<T> = std::result::Result<T, Error>;

/// Texture render errors
#[derive(Debug, Clone)]
pub enum Error {
    /// The device refused to create a texture or a view
    AllocationFailed(String),

    /// Out of GPU memory
    OutOfMemory,

    /// Invalid resource description (dimensions, usage, format, mip range)
    InvalidResource(String),

    /// Backend-specific error
    BackendError(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::AllocationFailed(msg) => write!(f, "Allocation failed: {}", msg),
            Error::OutOfMemory => write!(f, "Out of GPU memory"),
            Error::InvalidResource(msg) => write!(f, "Invalid resource: {}", msg),
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

/// Log an error and build an `Error::BackendError` from the same message
///
/// # Example
///
/// ```no_run
/// # use texture_render::rtt_err;
/// let err = rtt_err!("rtt::cpu", "Unsupported format {:?}", "R32_SFLOAT");
/// ```
#[macro_export]
macro_rules! rtt_err {
    ($source:expr, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::log::log_detailed(
            $crate::rtt::log::LogSeverity::Error,
            $source,
            message.clone(),
            file!(),
            line!()
        );
        $crate::rtt::Error::BackendError(message)
    }};
}

/// Log an error and return it from the current function
#[macro_export]
macro_rules! rtt_bail {
    ($source:expr, $($arg:tt)*) => {
        return Err($crate::rtt_err!($source, $($arg)*))
    };
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
