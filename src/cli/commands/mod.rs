//! CLI command implementations
//!
//! Each command returns the process exit code.

pub mod export;
pub mod init;
pub mod validate;
