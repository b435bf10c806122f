//! Shared test utilities for the ogcapi-connect workspace.
//!
//! This crate provides common testing infrastructure including:
//! - OGC API documents captured from a demonstration service
//! - Tile matrix set and collection generators
//! - Test data path helpers
//! - Approximate equality macros
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
//! use test_utils::{fixtures, assert_approx_eq};
//! ```

pub mod fixtures;
pub mod generators;
pub mod paths;

// Re-export commonly used items at the crate root
pub use fixtures::*;
pub use generators::*;
pub use paths::*;

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
        if diff > epsilon {
            panic!(
                "assertion failed: `(left ≈ right)`\n  left: `{:?}`,\n right: `{:?}`,\n  diff: `{:?}` > epsilon `{:?}`",
                left, right, diff, epsilon
            );
        }
    }};
}

/// Macro for approximate equality of bounding boxes given as
/// `(min_x, min_y, max_x, max_y)` tuples.
///
/// # Usage
///
/// ```ignore
/// use test_utils::assert_bbox_approx_eq;
///
/// assert_bbox_approx_eq!((-180.0, -90.0, 180.0, 90.0), (-180.0, -90.0, 180.0, 90.0001), 0.001);
/// ```
#[macro_export]
macro_rules! assert_bbox_approx_eq {
    (($a1:expr, $b1:expr, $c1:expr, $d1:expr), ($a2:expr, $b2:expr, $c2:expr, $d2:expr), $epsilon:expr) => {{
        $crate::assert_approx_eq!($a1, $a2, $epsilon);
        $crate::assert_approx_eq!($b1, $b2, $epsilon);
        $crate::assert_approx_eq!($c1, $c2, $epsilon);
        $crate::assert_approx_eq!($d1, $d2, $epsilon);
    }};
}
