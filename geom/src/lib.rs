//! Angular math on the circular degree domain, shared by the guidance
//! crates.

mod angle;

pub use crate::angle::Angle;

// Reduce rounding errors from arithmetic, so angles that should compare equal
// actually do.
pub(crate) fn trim_f64(x: f64) -> f64 {
    (x * 10_000_000.0).round() / 10_000_000.0
}
