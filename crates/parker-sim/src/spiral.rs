//! Parker spiral sample geometry
//!
//! Each branch is an Archimedean spiral: plasma leaves the source at constant
//! radial speed `v` while the source corotates at `ω`, so the winding angle at
//! radius `r` is `ω (r - r_min) / v`.

use crate::params::PhysicalParameters;
use nalgebra::Vector2;
use parker_core::coordinates::{rotate, PolarPosition};
use serde::{Serialize, Deserialize};

/// Spiral branch identifier
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpiralBranch {
    Slow,
    Fast,
}

impl SpiralBranch {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Slow => "Slow",
            Self::Fast => "Fast",
        }
    }

    /// Display color
    pub fn color(&self) -> &'static str {
        match self {
            Self::Slow => "red",
            Self::Fast => "blue",
        }
    }

    /// Wind speed (AU/s) that sets this branch's winding rate.
    ///
    /// The slow branch winds with the fast-wind speed and the fast branch with
    /// the slow-wind speed, following the observational convention of the
    /// plotted model.
    pub fn winding_speed(&self, params: &PhysicalParameters) -> f64 {
        match self {
            Self::Slow => params.fast_speed_au,
            Self::Fast => params.slow_speed_au,
        }
    }

    pub fn all() -> &'static [SpiralBranch] {
        &[Self::Slow, Self::Fast]
    }
}

/// One immutable sample along a branch
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SamplePoint {
    pub index: usize,
    /// Radius (AU)
    pub radius: f64,
    /// Winding angle at the reference time, before alignment (radians)
    pub winding_angle: f64,
    /// Cartesian position after the alignment rotation (AU)
    pub aligned: Vector2<f64>,
}

impl SamplePoint {
    /// Aligned polar angle (radians)
    pub fn aligned_angle(&self) -> f64 {
        self.aligned.y.atan2(self.aligned.x)
    }
}

/// `count` radii evenly spaced over `[min, max]`, both endpoints included
pub fn sample_radii(min: f64, max: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![min],
        _ => {
            let step = (max - min) / (count - 1) as f64;
            (0..count)
                .map(|i| if i == count - 1 { max } else { min + step * i as f64 })
                .collect()
        }
    }
}

/// Unrotated-then-aligned sample points for both branches
#[derive(Clone, Debug, PartialEq)]
pub struct SpiralGeometry {
    slow: Vec<SamplePoint>,
    fast: Vec<SamplePoint>,
}

impl SpiralGeometry {
    /// Sample both branches and apply the fixed alignment rotation once
    pub fn build(params: &PhysicalParameters) -> Self {
        let radii = sample_radii(params.radius_min, params.radius_max, params.sample_count);
        let branch = |b: SpiralBranch| -> Vec<SamplePoint> {
            let speed = b.winding_speed(params);
            radii
                .iter()
                .enumerate()
                .map(|(index, &radius)| {
                    let winding_angle = params.angular_speed * (radius - params.radius_min) / speed;
                    let flat = PolarPosition::new(radius, winding_angle).to_cartesian();
                    SamplePoint {
                        index,
                        radius,
                        winding_angle,
                        aligned: rotate(flat, params.alignment_angle_radians),
                    }
                })
                .collect()
        };

        let geometry = Self { slow: branch(SpiralBranch::Slow), fast: branch(SpiralBranch::Fast) };
        tracing::debug!(
            "Built spiral geometry: {} samples per branch over [{}, {}] AU",
            params.sample_count, params.radius_min, params.radius_max
        );
        geometry
    }

    /// Geometry from precomputed points (may be empty)
    pub fn from_points(slow: Vec<SamplePoint>, fast: Vec<SamplePoint>) -> Self {
        Self { slow, fast }
    }

    pub fn points(&self, branch: SpiralBranch) -> &[SamplePoint] {
        match branch {
            SpiralBranch::Slow => &self.slow,
            SpiralBranch::Fast => &self.fast,
        }
    }

    pub fn sample_count(&self) -> usize {
        self.fast.len()
    }

    /// Aligned points of a branch rotated by `phase` radians
    pub fn rotated(&self, branch: SpiralBranch, phase: f64) -> Vec<Vector2<f64>> {
        self.points(branch).iter().map(|p| rotate(p.aligned, phase)).collect()
    }
}
