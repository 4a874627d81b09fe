//! Standard exit codes for CLI operations
//!
//! These exit codes follow Unix conventions and sysexits.h where applicable.

/// General error - unspecified failure
pub const ERROR: i32 = 1;

/// Validation error - invalid warehouse or input
pub const VALIDATION_ERROR: i32 = 2;

/// Credentials error - credential store unreadable or malformed
pub const CREDENTIALS_ERROR: i32 = 3;

/// Discovery error - no suitable image could be selected
pub const DISCOVERY_ERROR: i32 = 4;

/// IO error - file not found, permission denied, etc.
pub const IO_ERROR: i32 = 5;

/// Service unavailable - registry unreachable or timed out (sysexits.h EX_UNAVAILABLE)
pub const UNAVAILABLE: i32 = 69;
