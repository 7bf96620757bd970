//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};

/// 3D vector used for positions, velocities and directions
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0, z: 0.0 };

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn distance(&self, other: &Self) -> f64 {
        (*self - *other).length()
    }

    pub fn length(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    pub fn normalize(&self) -> Self {
        let len = self.length();
        if len > 0.0001 {
            Self { x: self.x / len, y: self.y / len, z: self.z / len }
        } else {
            Self::default()
        }
    }

    /// Heading in the XY plane, degrees counter-clockwise from +X
    pub fn heading_degrees(&self) -> f64 {
        self.y.atan2(self.x).to_degrees()
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl std::ops::Add for Vector3 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self { x: self.x + rhs.x, y: self.y + rhs.y, z: self.z + rhs.z }
    }
}

impl std::ops::AddAssign for Vector3 {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
        self.z += rhs.z;
    }
}

impl std::ops::Sub for Vector3 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self { x: self.x - rhs.x, y: self.y - rhs.y, z: self.z - rhs.z }
    }
}

impl std::ops::Mul<f64> for Vector3 {
    type Output = Self;
    fn mul(self, rhs: f64) -> Self {
        Self { x: self.x * rhs, y: self.y * rhs, z: self.z * rhs }
    }
}

impl std::ops::MulAssign<f64> for Vector3 {
    fn mul_assign(&mut self, rhs: f64) {
        self.x *= rhs;
        self.y *= rhs;
        self.z *= rhs;
    }
}

impl std::fmt::Display for Vector3 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.2}, {:.2}, {:.2})", self.x, self.y, self.z)
    }
}

/// Sign that maps zero to zero (`f64::signum` returns 1.0 for +0.0)
pub fn sign(value: f64) -> f64 {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_is_euclidean() {
        let a = Vector3::new(1.0, 2.0, 2.0);
        assert!((a.distance(&Vector3::ZERO) - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_normalize_zero_vector_stays_zero() {
        assert_eq!(Vector3::ZERO.normalize(), Vector3::ZERO);
        let n = Vector3::new(0.0, 3.0, 4.0).normalize();
        assert!((n.length() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_heading_degrees() {
        assert!((Vector3::new(1.0, 1.0, 0.0).heading_degrees() - 45.0).abs() < 1e-9);
        assert!((Vector3::new(-1.0, 0.0, 0.0).heading_degrees() - 180.0).abs() < 1e-9);
    }

    #[test]
    fn test_sign_of_zero_is_zero() {
        assert_eq!(sign(0.0), 0.0);
        assert_eq!(sign(-0.0), 0.0);
        assert_eq!(sign(-3.5), -1.0);
        assert_eq!(sign(2.0), 1.0);
    }
}
