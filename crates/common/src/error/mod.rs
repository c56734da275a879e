//! Error classification shared by every VitalScope layer
//!
//! Module-specific error enums stay local to their crate (storage errors here,
//! the domain error in `vitalscope-domain`). What they share is the
//! [`ErrorClassification`] trait, which gives logging and callers a uniform
//! way to ask whether an error is transient and how loudly to report it.
//!
//! | Level | Use Case | Examples |
//! |-------|----------|----------|
//! | **Info** | Expected conditions | Missing key, empty results |
//! | **Warning** | Degraded but operational | Busy database, pool exhausted |
//! | **Error** | Failure requiring attention | Query failure, invalid config |
//! | **Critical** | Data integrity at risk | Failed migration, corrupt schema |
//!
//! ```rust,ignore
//! use vitalscope_common::error::ErrorClassification;
//!
//! if let Err(err) = store.save(batch) {
//!     if err.is_retryable() {
//!         // keep the batch buffered and try again on the next save
//!     }
//! }
//! ```

use std::fmt;
use std::time::Duration;

/// Standard interface for classifying errors by their characteristics
pub trait ErrorClassification {
    /// Check if this error is retryable
    ///
    /// Retryable errors are transient: busy or locked databases, pool
    /// exhaustion, connection timeouts.
    fn is_retryable(&self) -> bool;

    /// Get the error severity level
    fn severity(&self) -> ErrorSeverity;

    /// Check if this is a critical error requiring immediate attention
    fn is_critical(&self) -> bool {
        self.severity() == ErrorSeverity::Critical
    }

    /// Get the suggested retry delay if applicable
    fn retry_after(&self) -> Option<Duration> {
        None
    }
}

/// Error severity levels for monitoring and alerting
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    /// Informational, typically for debugging
    Info,
    /// Warning, should be monitored but not critical
    Warning,
    /// Error, requires attention and action
    Error,
    /// Critical, immediate action required
    Critical,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "INFO"),
            Self::Warning => write!(f, "WARN"),
            Self::Error => write!(f, "ERROR"),
            Self::Critical => write!(f, "CRITICAL"),
        }
    }
}
