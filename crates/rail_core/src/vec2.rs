//! 2D vector math and the angle convention shared by every geometry module.
//!
//! Angle 0 points north (screen up, `-y`) and angles grow clockwise, so
//! `from_angle(0) == (0, -1)` and `from_angle(PI / 2) == (1, 0)`.

use std::f64::consts::{PI, TAU};
use std::ops::{Add, Mul, Sub};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Unit vector pointing along `angle`.
    pub fn from_angle(angle: f64) -> Self {
        Self::new(angle.sin(), -angle.cos())
    }

    /// Inverse of [`Vec2::from_angle`], normalized to `(-PI, PI]`.
    pub fn angle(self) -> f64 {
        normalize_angle(self.x.atan2(-self.y))
    }

    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }

    pub fn distance(self, other: Vec2) -> f64 {
        (other - self).length()
    }

    pub fn lerp(self, other: Vec2, t: f64) -> Vec2 {
        self + (other - self) * t
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Vec2 {
    type Output = Vec2;
    fn mul(self, rhs: f64) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

/// Wraps an angle into `(-PI, PI]`.
pub fn normalize_angle(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(TAU);
    if wrapped > PI {
        wrapped - TAU
    } else {
        wrapped
    }
}

/// The opposite facing. A connector's travel direction is its flipped orientation.
pub fn flip_orientation(angle: f64) -> f64 {
    normalize_angle(angle + PI)
}
