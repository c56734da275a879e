//! Custom assertions for testing

// These assertions are designed to panic on failure
#![allow(clippy::missing_panics_doc)]

/// Assert that an error's `Display` output contains a substring
///
/// ```
/// let result: Result<(), String> = Err("Storage error: disk full".to_string());
/// vitalscope_common::assert_error_contains!(result, "disk full");
/// ```
#[macro_export]
macro_rules! assert_error_contains {
    ($result:expr, $substring:expr) => {
        match &$result {
            Ok(_) => panic!("Expected error but got Ok"),
            Err(e) => {
                let error_msg = format!("{}", e);
                assert!(
                    error_msg.contains($substring),
                    "Error message '{}' does not contain '{}'",
                    error_msg,
                    $substring
                );
            }
        }
    };
}

/// Assert that two floats are within `epsilon` of each other
pub fn assert_approx_eq(actual: f64, expected: f64, epsilon: f64) {
    let diff = (actual - expected).abs();
    assert!(
        diff <= epsilon,
        "Values not approximately equal: actual {} expected {} (diff {}, epsilon {})",
        actual,
        expected,
        diff,
        epsilon
    );
}
