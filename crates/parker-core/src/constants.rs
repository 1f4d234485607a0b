/// Astronomical unit in kilometers
pub const AU_KM: f64 = 1.495978707e8;

/// Astronomical unit in meters
pub const AU: f64 = 1.495978707e11;

/// Seconds per hour
pub const SECONDS_PER_HOUR: f64 = 3600.0;

/// Seconds per day
pub const SECONDS_PER_DAY: f64 = 86400.0;

/// Sidereal solar rotation period in days (Carrington)
pub const SOLAR_ROTATION_DAYS: f64 = 25.38;

/// Typical slow solar-wind speed in km/s
pub const SLOW_WIND_KM_S: f64 = 400.0;

/// Typical fast solar-wind speed in km/s
pub const FAST_WIND_KM_S: f64 = 750.0;

/// Inner sampling radius of the spiral in AU
pub const SPIRAL_R_MIN_AU: f64 = 0.3;

/// Outer sampling radius of the spiral in AU
pub const SPIRAL_R_MAX_AU: f64 = 2.5;

/// Number of samples along each spiral branch
pub const SPIRAL_SAMPLES: usize = 50;

/// Heliographic longitude offset of Earth used to align the spiral (degrees)
pub const EARTH_LONGITUDE_OFFSET_DEG: f64 = 46.0;

/// Simulated hours between two animation frames
pub const HOURS_PER_FRAME: f64 = 1.927;

/// Rotation sweep step: one degree per frame
pub const DEGREES_PER_FRAME: f64 = 1.0;

/// Observer distance from the Sun in AU (fixed along +X)
pub const OBSERVER_RADIUS_AU: f64 = 1.0;

/// Convert a speed in km/s to AU per second
pub fn km_s_to_au_s(speed_km_s: f64) -> f64 {
    speed_km_s / AU_KM
}
