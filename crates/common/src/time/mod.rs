//! Time utilities and abstractions
//!
//! - **[`clock`]**: wall-clock abstraction with a settable mock for tests
//! - **[`format`]**: epoch-millisecond conversions and UTC day keys
//!
//! ```rust
//! use vitalscope_common::time::{utc_date_key, Clock, MockClock};
//!
//! let clock = MockClock::at_millis(1_700_000_000_000);
//! assert_eq!(utc_date_key(clock.now_millis()), "2023-11-14");
//! ```

pub mod clock;
pub mod format;

// Re-export commonly used items
pub use clock::{Clock, MockClock, SystemClock};
pub use format::{millis_to_utc, utc_date_key};
