use serde::{Serialize, Deserialize};
use nalgebra::{Rotation2, Vector2};
use crate::constants::AU;

/// High-precision Cartesian position (f64, meters)
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CartesianPosition {
    pub x: f64,  // meters
    pub y: f64,
    pub z: f64,
}

impl CartesianPosition {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn from_au(x: f64, y: f64, z: f64) -> Self {
        Self::new(x * AU, y * AU, z * AU)
    }

    pub fn magnitude(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Components in AU
    pub fn to_au(&self) -> (f64, f64, f64) {
        (self.x / AU, self.y / AU, self.z / AU)
    }

    /// Longitude in the XY plane, radians in [-π, π]
    pub fn longitude(&self) -> f64 {
        self.y.atan2(self.x)
    }

    /// Project onto the display plane used for HEE plots.
    ///
    /// Plots put HEE Y on the horizontal axis and HEE X on the vertical axis,
    /// so the two components are swapped. Result is in AU.
    pub fn to_plot_xy(&self) -> Vector2<f64> {
        Vector2::new(self.y / AU, self.x / AU)
    }
}

/// Polar sample in the ecliptic plane (r in AU, angle in radians)
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PolarPosition {
    pub r: f64,
    pub angle: f64,
}

impl PolarPosition {
    pub fn new(r: f64, angle: f64) -> Self {
        Self { r, angle }
    }

    pub fn to_cartesian(&self) -> Vector2<f64> {
        Vector2::new(self.r * self.angle.cos(), self.r * self.angle.sin())
    }
}

/// Rotate a planar point counter-clockwise by `angle` radians
pub fn rotate(point: Vector2<f64>, angle: f64) -> Vector2<f64> {
    Rotation2::new(angle) * point
}

/// Euclidean distance between two planar points
pub fn planar_distance(a: Vector2<f64>, b: Vector2<f64>) -> f64 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    (dx * dx + dy * dy).sqrt()
}

/// Normalize angle to [0, 2π)
pub fn normalize_angle(angle: f64) -> f64 {
    use std::f64::consts::TAU;
    let mut a = angle % TAU;
    if a < 0.0 {
        a += TAU;
    }
    a
}
