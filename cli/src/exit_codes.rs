//! # Exit Codes
//!
//! Standard exit codes for the docq CLI.
//!
//! These codes follow common Unix conventions and give scripts something
//! meaningful to branch on. The no-match branch is a successful run: the
//! pipeline did its job and found nothing relevant.

/// Successful execution, including the "no matching results" branch
pub const EXIT_SUCCESS: i32 = 0;

/// General error (provider or index failure)
pub const EXIT_ERROR: i32 = 1;

/// Configuration error (missing API key, unreadable config file)
pub const EXIT_CONFIG_ERROR: i32 = 2;

/// Network error (connection failed, timeout)
pub const EXIT_NETWORK_ERROR: i32 = 4;
