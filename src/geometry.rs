use derive_more::Display;
use std::f64::consts::PI;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Rotates `self` clockwise (screen coordinates) around `pivot`.
    pub fn rotate_around(self, pivot: Point, angle: Degrees) -> Self {
        let (sin, cos) = angle.to_radians().sin_cos();
        let (dx, dy) = (self.x - pivot.x, self.y - pivot.y);
        Self::new(
            pivot.x + dx * cos - dy * sin,
            pivot.y + dx * sin + dy * cos,
        )
    }
}

/// An angle in degrees. 0 points straight up, growing clockwise.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Display)]
#[display("{_0:.2}°")]
pub struct Degrees(f64);

impl Degrees {
    pub const fn new(value: f64) -> Self {
        Self(value)
    }

    pub fn value(self) -> f64 {
        self.0
    }

    pub fn to_radians(self) -> f64 {
        self.0 * PI / 180.0
    }

    /// Folds the angle into `[0, 360)`.
    pub fn normalized(self) -> Self {
        let folded = if self.0 < 0.0 { self.0 + 360.0 } else { self.0 };
        // -0.0 + 0.0 == +0.0
        if (0.0..360.0).contains(&folded) {
            Self(folded + 0.0)
        } else {
            Self(folded.rem_euclid(360.0) % 360.0 + 0.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{a} != {b}");
    }

    #[test]
    fn test_normalized_wraps_negative_angles() {
        assert_close(Degrees::new(-90.0).normalized().value(), 270.0);
        assert_close(Degrees::new(45.0).normalized().value(), 45.0);
        assert_close(Degrees::new(180.0).normalized().value(), 180.0);
    }

    #[test]
    fn test_normalized_never_reaches_full_turn() {
        let cases = [-1e-20, -0.0, 360.0, -360.0, 720.5];
        for raw in cases {
            let n = Degrees::new(raw).normalized().value();
            assert!((0.0..360.0).contains(&n), "{raw} -> {n}");
            assert!(n.is_sign_positive(), "{raw} -> {n}");
        }
    }

    #[test]
    fn test_rotate_around_is_clockwise() {
        let pivot = Point::new(100.0, 100.0);
        let top = Point::new(100.0, 50.0);

        let right = top.rotate_around(pivot, Degrees::new(90.0));
        assert_close(right.x, 150.0);
        assert_close(right.y, 100.0);

        let bottom = top.rotate_around(pivot, Degrees::new(180.0));
        assert_close(bottom.x, 100.0);
        assert_close(bottom.y, 150.0);
    }

    #[test]
    fn test_degrees_display() {
        assert_eq!(Degrees::new(12.5).to_string(), "12.50°");
    }
}
