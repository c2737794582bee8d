//! Shared test utilities for the grid mock server workspace.
//!
//! This crate provides common testing infrastructure including:
//! - Temporary public directories seeded with a template snapshot
//! - A fake upstream metrics service bound to a local port
//! - Common test fixtures (template document, payloads)
//! - Approximate float assertions
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```
//!
//! Then import in your tests:
//!
//! ```ignore
//! use test_utils::{fixtures, spawn_fake_upstream, assert_approx_eq};
//! ```

pub mod fixtures;
pub mod paths;
pub mod upstream;

// Re-export commonly used items at the crate root
pub use fixtures::*;
pub use paths::*;
pub use upstream::*;

/// Macro for approximate floating-point equality assertions.
///
/// # Usage
///
/// ```ignore
/// use test_utils::assert_approx_eq;
///
/// assert_approx_eq!(1.0001_f64, 1.0_f64, 0.001_f64); // passes
/// assert_approx_eq!(1.1_f32, 1.0_f32, 0.001_f32);    // fails
/// ```
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let left: f64 = $left as f64;
        let right: f64 = $right as f64;
        let epsilon: f64 = $epsilon as f64;
        let diff = (left - right).abs();
        if !(diff <= epsilon) {
            panic!(
                "assertion failed: `(left ≈ right)`\n  left: `{:?}`,\n right: `{:?}`,\n  diff: `{:?}` > epsilon `{:?}`",
                left, right, diff, epsilon
            );
        }
    }};
}

/// Approximate equality against a JSON number field.
///
/// Panics if the value is missing or not a number.
#[macro_export]
macro_rules! assert_json_approx_eq {
    ($value:expr, $expected:expr, $epsilon:expr) => {{
        let actual = $value
            .as_f64()
            .unwrap_or_else(|| panic!("expected a JSON number, got {:?}", $value));
        $crate::assert_approx_eq!(actual, $expected, $epsilon);
    }};
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_assert_approx_eq_passes() {
        assert_approx_eq!(1.0001, 1.0, 0.001);
        assert_approx_eq!(0.0, 0.0, 0.0001);
        assert_approx_eq!(-5.5, -5.500001, 0.0001);
    }

    #[test]
    #[should_panic(expected = "assertion failed")]
    fn test_assert_approx_eq_fails() {
        assert_approx_eq!(1.1, 1.0, 0.001);
    }

    #[test]
    #[should_panic(expected = "assertion failed")]
    fn test_assert_approx_eq_rejects_nan() {
        assert_approx_eq!(f64::NAN, 0.0, 0.001);
    }

    #[test]
    fn test_assert_json_approx_eq() {
        let value = serde_json::json!(905.0000001);
        assert_json_approx_eq!(value, 905.0, 1e-6);
    }
}
