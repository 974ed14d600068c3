//! Unit tests for error.rs
//!
//! Tests all Error variants and their implementations (Display, Debug, Clone, std::error::Error),
//! plus the rtt_err!/rtt_bail! helper macros.

use crate::error::{Error, Result};

// ============================================================================
// ERROR DISPLAY TESTS
// ============================================================================

#[test]
fn test_allocation_failed_display() {
    let err = Error::AllocationFailed("color texture 512x512".to_string());
    let display = format!("{}", err);
    assert!(display.contains("Allocation failed"));
    assert!(display.contains("color texture 512x512"));
}

#[test]
fn test_out_of_memory_display() {
    let err = Error::OutOfMemory;
    assert_eq!(format!("{}", err), "Out of GPU memory");
}

#[test]
fn test_invalid_resource_display() {
    let err = Error::InvalidResource("width must be positive".to_string());
    let display = format!("{}", err);
    assert!(display.contains("Invalid resource"));
    assert!(display.contains("width must be positive"));
}

#[test]
fn test_backend_error_display() {
    let err = Error::BackendError("device removed".to_string());
    let display = format!("{}", err);
    assert!(display.contains("Backend error"));
    assert!(display.contains("device removed"));
}

// ============================================================================
// ERROR TRAIT IMPLEMENTATIONS
// ============================================================================

#[test]
fn test_error_is_std_error() {
    let err = Error::OutOfMemory;
    let _: &dyn std::error::Error = &err;
}

#[test]
fn test_error_debug() {
    let debug = format!("{:?}", Error::AllocationFailed("x".to_string()));
    assert!(debug.contains("AllocationFailed"));

    let debug = format!("{:?}", Error::InvalidResource("x".to_string()));
    assert!(debug.contains("InvalidResource"));
}

#[test]
fn test_error_clone() {
    let err1 = Error::AllocationFailed("depth/stencil view".to_string());
    let err2 = err1.clone();
    assert_eq!(format!("{}", err1), format!("{}", err2));
}

// ============================================================================
// MACROS
// ============================================================================

fn bail_if_zero(width: u32) -> Result<u32> {
    if width == 0 {
        crate::rtt_bail!("rtt::test", "width is {}", width);
    }
    Ok(width)
}

#[test]
fn test_rtt_err_builds_backend_error() {
    let err = crate::rtt_err!("rtt::test", "format {} unsupported", "R32");
    match err {
        Error::BackendError(msg) => assert_eq!(msg, "format R32 unsupported"),
        other => panic!("Expected BackendError, got {:?}", other),
    }
}

#[test]
fn test_rtt_bail_returns_early() {
    assert_eq!(bail_if_zero(4).unwrap(), 4);

    match bail_if_zero(0) {
        Err(Error::BackendError(msg)) => assert!(msg.contains("width is 0")),
        other => panic!("Expected BackendError, got {:?}", other),
    }
}
