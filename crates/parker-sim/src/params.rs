//! Physical parameters and run configuration

use crate::error::{SimError, SimResult};
use crate::time_controller::FrameClock;
use parker_core::constants::*;
use parker_log::reader::DEFAULT_TARGET_ROWS;
use parker_log::{parse_observation_time, LogError};
use serde::{Serialize, Deserialize};
use std::f64::consts::PI;
use std::path::Path;

/// Immutable physical constants driving the spiral geometry
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PhysicalParameters {
    /// Solar rotation period (seconds)
    pub rotation_period_seconds: f64,
    /// Angular speed 2π / period (rad/s)
    pub angular_speed: f64,
    /// Inner sampling radius (AU)
    pub radius_min: f64,
    /// Outer sampling radius (AU)
    pub radius_max: f64,
    /// Samples per branch
    pub sample_count: usize,
    /// Slow wind speed (AU/s)
    pub slow_speed_au: f64,
    /// Fast wind speed (AU/s)
    pub fast_speed_au: f64,
    /// Rotation aligning the spiral with the observer longitude (radians)
    pub alignment_angle_radians: f64,
}

impl PhysicalParameters {
    /// Build from engineering units, checking the model invariants
    pub fn new(
        rotation_period_days: f64,
        radius_min: f64,
        radius_max: f64,
        sample_count: usize,
        slow_speed_km_s: f64,
        fast_speed_km_s: f64,
        alignment_deg: f64,
    ) -> SimResult<Self> {
        if !(rotation_period_days.is_finite() && rotation_period_days > 0.0) {
            return Err(SimError::InvalidParameters(format!(
                "rotation period must be positive, got {} days",
                rotation_period_days
            )));
        }
        if !(radius_min.is_finite() && radius_max.is_finite() && radius_min < radius_max) {
            return Err(SimError::InvalidParameters(format!(
                "radius range [{}, {}] is empty",
                radius_min, radius_max
            )));
        }
        if sample_count == 0 {
            return Err(SimError::InvalidParameters("sample count must be > 0".into()));
        }
        for (name, speed) in [("slow", slow_speed_km_s), ("fast", fast_speed_km_s)] {
            if !(speed.is_finite() && speed > 0.0) {
                return Err(SimError::InvalidParameters(format!(
                    "{} wind speed must be positive, got {} km/s",
                    name, speed
                )));
            }
        }

        let rotation_period_seconds = rotation_period_days * SECONDS_PER_DAY;

        Ok(Self {
            rotation_period_seconds,
            angular_speed: 2.0 * PI / rotation_period_seconds,
            radius_min,
            radius_max,
            sample_count,
            slow_speed_au: km_s_to_au_s(slow_speed_km_s),
            fast_speed_au: km_s_to_au_s(fast_speed_km_s),
            alignment_angle_radians: alignment_deg.to_radians(),
        })
    }
}

impl Default for PhysicalParameters {
    fn default() -> Self {
        let period = SOLAR_ROTATION_DAYS * SECONDS_PER_DAY;
        Self {
            rotation_period_seconds: period,
            angular_speed: 2.0 * PI / period,
            radius_min: SPIRAL_R_MIN_AU,
            radius_max: SPIRAL_R_MAX_AU,
            sample_count: SPIRAL_SAMPLES,
            slow_speed_au: km_s_to_au_s(SLOW_WIND_KM_S),
            fast_speed_au: km_s_to_au_s(FAST_WIND_KM_S),
            alignment_angle_radians: alignment_from_offset(EARTH_LONGITUDE_OFFSET_DEG).to_radians(),
        }
    }
}

/// Alignment rotation (degrees) for a heliographic longitude offset of Earth.
///
/// The offset is negated and shifted by a quarter turn.
pub fn alignment_from_offset(offset_deg: f64) -> f64 {
    -offset_deg + 90.0
}

/// Run configuration, loadable from JSON
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpiralConfig {
    /// Observation start, e.g. "2008-JAN-23 16:39:33"
    pub obs_time: String,
    pub rotation_period_days: f64,
    pub radius_min_au: f64,
    pub radius_max_au: f64,
    pub sample_count: usize,
    pub slow_speed_km_s: f64,
    pub fast_speed_km_s: f64,
    /// Heliographic longitude offset of Earth (degrees)
    pub earth_offset_deg: f64,
    /// Simulated hours per frame
    pub hours_per_frame: f64,
    pub frame_count: u32,
    /// Timer interval between frames (ms)
    pub frame_interval_ms: u64,
    /// Log rows extracted by the reader
    pub target_rows: Vec<usize>,
}

impl Default for SpiralConfig {
    fn default() -> Self {
        Self {
            obs_time: "2008-JAN-23 16:39:33".to_string(),
            rotation_period_days: SOLAR_ROTATION_DAYS,
            radius_min_au: SPIRAL_R_MIN_AU,
            radius_max_au: SPIRAL_R_MAX_AU,
            sample_count: SPIRAL_SAMPLES,
            slow_speed_km_s: SLOW_WIND_KM_S,
            fast_speed_km_s: FAST_WIND_KM_S,
            earth_offset_deg: EARTH_LONGITUDE_OFFSET_DEG,
            hours_per_frame: HOURS_PER_FRAME,
            frame_count: 360,
            frame_interval_ms: 100,
            target_rows: DEFAULT_TARGET_ROWS.to_vec(),
        }
    }
}

impl SpiralConfig {
    pub fn load(path: &Path) -> SimResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    pub fn save(&self, path: &Path) -> SimResult<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Validated physical parameters for this configuration
    pub fn parameters(&self) -> SimResult<PhysicalParameters> {
        PhysicalParameters::new(
            self.rotation_period_days,
            self.radius_min_au,
            self.radius_max_au,
            self.sample_count,
            self.slow_speed_km_s,
            self.fast_speed_km_s,
            alignment_from_offset(self.earth_offset_deg),
        )
    }

    /// Frame clock starting at `obs_time`
    pub fn clock(&self) -> SimResult<FrameClock> {
        if !(self.hours_per_frame > 0.0) {
            return Err(SimError::InvalidParameters(format!(
                "hours per frame must be positive, got {}",
                self.hours_per_frame
            )));
        }
        let start = parse_observation_time(&self.obs_time).map_err(LogError::from)?;
        Ok(FrameClock::new(start, self.hours_per_frame).with_frame_count(self.frame_count))
    }
}
