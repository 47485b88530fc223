use std::{cmp, fmt, ops};

use serde::{Deserialize, Serialize};

use crate::trim_f64;

/// An angle in degrees, normalized to [0, 360). 0 points back along the
/// reference direction; 180 is directly opposite it.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Angle(f64);

// By construction, Angle is a finite f64 with trimmed precision.
impl Eq for Angle {}
impl Ord for Angle {
    fn cmp(&self, other: &Angle) -> cmp::Ordering {
        self.partial_cmp(other).unwrap()
    }
}

impl Angle {
    pub const ZERO: Angle = Angle::const_degrees(0.0);

    pub fn degrees(value: f64) -> Angle {
        if !value.is_finite() {
            panic!("Bad Angle {}", value);
        }
        Angle(trim_f64(value.rem_euclid(360.0)))
    }

    // Can't panic inside a const fn. Only pass in finite values already in
    // [0, 360).
    pub const fn const_degrees(value: f64) -> Angle {
        Angle(value)
    }

    pub fn normalized_degrees(self) -> f64 {
        self.0
    }

    /// The shortest rotation between two angles, ignoring direction. Always
    /// in [0, 180].
    pub fn deviation(self, other: Angle) -> Angle {
        let diff = (self.0 - other.0).abs();
        Angle(diff.min(360.0 - diff))
    }

    /// Reflect across the 0-180 axis, swapping left and right. Zero is its
    /// own reflection.
    pub fn mirror(self) -> Angle {
        if self.0 == 0.0 {
            self
        } else {
            Angle(360.0 - self.0)
        }
    }

    pub fn approx_eq(self, other: Angle, within_degrees: f64) -> bool {
        self.deviation(other).0 < within_degrees
    }
}

impl fmt::Display for Angle {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Angle({} degrees)", self.0)
    }
}

impl ops::Add for Angle {
    type Output = Angle;

    fn add(self, other: Angle) -> Angle {
        Angle::degrees(self.0 + other.0)
    }
}

impl ops::Sub for Angle {
    type Output = Angle;

    fn sub(self, other: Angle) -> Angle {
        Angle::degrees(self.0 - other.0)
    }
}

impl ops::Mul<f64> for Angle {
    type Output = Angle;

    fn mul(self, scalar: f64) -> Angle {
        Angle::degrees(self.0 * scalar)
    }
}

/// The ratio of two angles, mostly useful for comparing deviations.
impl ops::Div for Angle {
    type Output = f64;

    fn div(self, other: Angle) -> f64 {
        self.0 / other.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalization() {
        assert_eq!(Angle::degrees(370.0), Angle::degrees(10.0));
        assert_eq!(Angle::degrees(-10.0), Angle::degrees(350.0));
        assert_eq!(Angle::degrees(360.0), Angle::ZERO);
    }

    #[test]
    fn test_deviation() {
        assert_eq!(
            Angle::degrees(350.0).deviation(Angle::degrees(10.0)),
            Angle::degrees(20.0)
        );
        assert_eq!(
            Angle::degrees(10.0).deviation(Angle::degrees(350.0)),
            Angle::degrees(20.0)
        );
        assert_eq!(
            Angle::degrees(90.0).deviation(Angle::degrees(270.0)),
            Angle::degrees(180.0)
        );
        assert_eq!(Angle::ZERO.deviation(Angle::ZERO), Angle::ZERO);
    }

    #[test]
    fn test_mirror() {
        assert_eq!(Angle::degrees(90.0).mirror(), Angle::degrees(270.0));
        assert_eq!(Angle::degrees(180.0).mirror(), Angle::degrees(180.0));
        assert_eq!(Angle::ZERO.mirror(), Angle::ZERO);
        let angle = Angle::degrees(123.4);
        assert_eq!(angle.mirror().mirror(), angle);
    }

    #[test]
    fn test_ratio() {
        let narrow = Angle::degrees(10.0);
        let wide = Angle::degrees(15.0);
        assert!(wide / narrow > 1.4);
        assert!(narrow / wide < 1.0);
        assert!(Angle::degrees(100.0).approx_eq(Angle::degrees(100.5), 1.0));
    }
}
