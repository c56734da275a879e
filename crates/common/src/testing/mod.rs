//! Testing utilities and helpers
//!
//! - **[`assertions`]**: float comparison and error-message assertions
//! - **[`temp`]**: self-cleaning temporary directories
//!
//! The mock clock lives in [`crate::time`] because production code accepts a
//! [`Clock`](crate::time::Clock) too.
//!
//! ```rust
//! use vitalscope_common::testing::{assert_approx_eq, TempDir};
//!
//! let dir = TempDir::new("vitalscope-doc").unwrap();
//! assert!(dir.path().exists());
//! assert_approx_eq(66.666_7, 66.67, 0.01);
//! ```

pub mod assertions;
pub mod temp;

pub use assertions::assert_approx_eq;
pub use temp::TempDir;
