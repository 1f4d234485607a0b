//! Ephemeris collaborator interface and an analytic circular-orbit provider
//!
//! The spiral engine itself only needs an observer on the +X axis. This module
//! supplies body positions for overlays: the Earth marker and orbit track, and
//! the two STEREO spacecraft on their heliocentric drift orbits.

use crate::error::{SimError, SimResult};
use hifitime::{Duration, Epoch};
use parker_core::constants::SECONDS_PER_DAY;
use nalgebra::Vector2;
use parker_core::coordinates::{normalize_angle, rotate, CartesianPosition};

/// Reference frame of a returned position
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ReferenceFrame {
    /// Heliocentric Earth Ecliptic: +X from the Sun towards Earth
    HeliocentricEarthEcliptic,
    /// Heliocentric ecliptic, J2000 equinox
    EclipticJ2000,
}

/// Position lookups by body name
pub trait Ephemeris {
    /// Heliocentric position of a named body
    fn body_position(&self, body: &str, epoch: Epoch, frame: ReferenceFrame) -> SimResult<CartesianPosition>;

    /// Position of an observer (body or spacecraft)
    fn observer_position(&self, id: &str, epoch: Epoch, frame: ReferenceFrame) -> SimResult<CartesianPosition> {
        self.body_position(id, epoch, frame)
    }
}

/// Spacecraft known to the default ephemeris
pub const SPACECRAFT: [&str; 2] = ["STEREO-A", "STEREO-B"];

/// Circular, coplanar orbit
#[derive(Clone, Debug, PartialEq)]
pub struct CircularOrbit {
    pub name: String,
    /// Orbit radius (AU)
    pub radius_au: f64,
    /// Orbital period (days)
    pub period_days: f64,
    /// Epoch at which `longitude_deg` holds
    pub reference_epoch: Epoch,
    /// Ecliptic longitude at the reference epoch (degrees)
    pub longitude_deg: f64,
}

impl CircularOrbit {
    pub fn new(
        name: impl Into<String>,
        radius_au: f64,
        period_days: f64,
        reference_epoch: Epoch,
        longitude_deg: f64,
    ) -> Self {
        Self { name: name.into(), radius_au, period_days, reference_epoch, longitude_deg }
    }

    pub fn earth() -> Self {
        Self::new("Earth", 1.0, 365.256363, j2000(), 100.464572)
    }

    /// STEREO Ahead: inside Earth's orbit, drifting ahead about 22° per year
    pub fn stereo_a() -> Self {
        // ~21.4° ahead of Earth at the reference epoch
        Self::new("STEREO-A", 0.96, 346.0, stereo_reference(), 143.689)
    }

    /// STEREO Behind: outside Earth's orbit, falling behind about 22° per year
    pub fn stereo_b() -> Self {
        // ~23.6° behind Earth at the reference epoch
        Self::new("STEREO-B", 1.09, 388.0, stereo_reference(), 98.689)
    }

    /// Ecliptic longitude at `epoch` (radians, [0, 2π))
    pub fn longitude(&self, epoch: Epoch) -> f64 {
        let days = (epoch - self.reference_epoch).to_seconds() / SECONDS_PER_DAY;
        let turns = days / self.period_days;
        normalize_angle(self.longitude_deg.to_radians() + turns * std::f64::consts::TAU)
    }
}

fn j2000() -> Epoch {
    Epoch::from_gregorian_utc(2000, 1, 1, 12, 0, 0, 0)
}

fn stereo_reference() -> Epoch {
    Epoch::from_gregorian_utc(2008, 1, 23, 16, 39, 33, 0)
}

/// Analytic ephemeris from circular orbits; the Sun sits at the origin
#[derive(Clone, Debug)]
pub struct CircularEphemeris {
    orbits: Vec<CircularOrbit>,
}

impl Default for CircularEphemeris {
    fn default() -> Self {
        Self {
            orbits: vec![CircularOrbit::earth(), CircularOrbit::stereo_a(), CircularOrbit::stereo_b()],
        }
    }
}

impl CircularEphemeris {
    pub fn new(orbits: Vec<CircularOrbit>) -> Self {
        Self { orbits }
    }

    fn orbit(&self, body: &str) -> Option<&CircularOrbit> {
        self.orbits.iter().find(|o| o.name.eq_ignore_ascii_case(body))
    }

    /// Earth longitude, the HEE reference direction
    fn earth_longitude(&self, epoch: Epoch) -> SimResult<f64> {
        self.orbit("Earth")
            .map(|o| o.longitude(epoch))
            .ok_or_else(|| SimError::Ephemeris("HEE frame needs an Earth orbit".into()))
    }
}

impl Ephemeris for CircularEphemeris {
    fn body_position(&self, body: &str, epoch: Epoch, frame: ReferenceFrame) -> SimResult<CartesianPosition> {
        if body.eq_ignore_ascii_case("Sun") {
            return Ok(CartesianPosition::new(0.0, 0.0, 0.0));
        }

        let orbit = self
            .orbit(body)
            .ok_or_else(|| SimError::Ephemeris(format!("Body not found: {}", body)))?;

        let mut lon = orbit.longitude(epoch);
        if frame == ReferenceFrame::HeliocentricEarthEcliptic {
            lon -= self.earth_longitude(epoch)?;
        }

        Ok(CartesianPosition::from_au(orbit.radius_au * lon.cos(), orbit.radius_au * lon.sin(), 0.0))
    }
}

/// Sample a body's track at a fixed step.
///
/// For `HeliocentricEarthEcliptic` the whole track is expressed in the HEE
/// frame of `start`, so the Earth track traces a circle instead of sitting
/// on the +X axis.
pub fn sample_track(
    ephemeris: &dyn Ephemeris,
    body: &str,
    start: Epoch,
    step: Duration,
    count: usize,
    frame: ReferenceFrame,
) -> SimResult<Vec<CartesianPosition>> {
    let frame_rotation = match frame {
        ReferenceFrame::HeliocentricEarthEcliptic => {
            -ephemeris.observer_position("Earth", start, ReferenceFrame::EclipticJ2000)?.longitude()
        }
        ReferenceFrame::EclipticJ2000 => 0.0,
    };

    let mut track = Vec::with_capacity(count);
    let mut epoch = start;
    for _ in 0..count {
        let p = ephemeris.body_position(body, epoch, ReferenceFrame::EclipticJ2000)?;
        let xy = rotate(Vector2::new(p.x, p.y), frame_rotation);
        track.push(CartesianPosition::new(xy.x, xy.y, p.z));
        epoch = epoch + step;
    }
    Ok(track)
}

/// Leading part of a track up to its first full revolution.
///
/// Longitudes are measured relative to the first sample; the track is cut
/// before the first sample where that relative longitude wraps back.
pub fn first_orbit(track: &[CartesianPosition]) -> &[CartesianPosition] {
    let Some(first) = track.first() else {
        return track;
    };
    let origin = first.longitude();
    let shifted: Vec<f64> = track.iter().map(|p| normalize_angle(p.longitude() - origin)).collect();

    match shifted.windows(2).position(|w| w[1] < w[0]) {
        Some(end) => &track[..end],
        None => track,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use parker_core::constants::AU;

    #[test]
    fn test_earth_on_hee_x_axis() {
        let eph = CircularEphemeris::default();
        let epoch = Epoch::from_gregorian_utc(2008, 1, 23, 16, 39, 33, 0);
        let earth = eph.observer_position("Earth", epoch, ReferenceFrame::HeliocentricEarthEcliptic).unwrap();
        assert_relative_eq!(earth.x / AU, 1.0, epsilon = 1e-12);
        assert_relative_eq!(earth.y / AU, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_sun_at_origin_and_unknown_body() {
        let eph = CircularEphemeris::default();
        let sun = eph.body_position("Sun", j2000(), ReferenceFrame::EclipticJ2000).unwrap();
        assert_eq!(sun.magnitude(), 0.0);
        assert!(eph.body_position("Voyager 1", j2000(), ReferenceFrame::EclipticJ2000).is_err());
    }

    #[test]
    fn test_stereo_pair_in_hee() {
        let eph = CircularEphemeris::default();
        let epoch = Epoch::from_gregorian_utc(2008, 1, 23, 16, 39, 33, 0);
        let hee = ReferenceFrame::HeliocentricEarthEcliptic;

        let a = eph.observer_position("STEREO-A", epoch, hee).unwrap();
        assert_relative_eq!(a.magnitude() / AU, 0.96, epsilon = 1e-9);
        assert_relative_eq!(a.longitude().to_degrees(), 21.4, epsilon = 0.01);

        let b = eph.observer_position("stereo-b", epoch, hee).unwrap();
        assert_relative_eq!(b.magnitude() / AU, 1.09, epsilon = 1e-9);
        assert_relative_eq!(b.longitude().to_degrees(), -23.6, epsilon = 0.01);

        // A year on, A has pulled further ahead and B has fallen further behind
        let later = epoch + Duration::from_seconds(365.0 * SECONDS_PER_DAY);
        assert!(eph.observer_position("STEREO-A", later, hee).unwrap().longitude().to_degrees() > 21.4);
        assert!(eph.observer_position("STEREO-B", later, hee).unwrap().longitude().to_degrees() < -23.6);
    }

    #[test]
    fn test_earth_longitude_advances() {
        let earth = CircularOrbit::earth();
        assert_relative_eq!(earth.longitude(j2000()), 100.464572_f64.to_radians(), epsilon = 1e-9);

        let quarter = j2000() + Duration::from_seconds(earth.period_days / 4.0 * SECONDS_PER_DAY);
        let expected = normalize_angle(100.464572_f64.to_radians() + std::f64::consts::FRAC_PI_2);
        assert_relative_eq!(earth.longitude(quarter), expected, epsilon = 1e-6);
    }

    #[test]
    fn test_first_orbit_truncates_after_one_turn() {
        let eph = CircularEphemeris::default();
        let step = Duration::from_seconds(SECONDS_PER_DAY);
        let track = sample_track(&eph, "Earth", j2000(), step, 700, ReferenceFrame::EclipticJ2000).unwrap();
        let orbit = first_orbit(&track);
        // One sample per day over one sidereal year
        assert!(orbit.len() >= 365 && orbit.len() <= 366, "len {}", orbit.len());

        assert!(first_orbit(&[]).is_empty());
    }

    #[test]
    fn test_hee_track_starts_on_x_axis() {
        let eph = CircularEphemeris::default();
        let start = Epoch::from_gregorian_utc(2008, 1, 23, 16, 39, 33, 0);
        let step = Duration::from_seconds(SECONDS_PER_DAY);
        let track =
            sample_track(&eph, "Earth", start, step, 100, ReferenceFrame::HeliocentricEarthEcliptic).unwrap();
        assert_relative_eq!(track[0].x / AU, 1.0, epsilon = 1e-9);
        assert_relative_eq!(track[0].y / AU, 0.0, epsilon = 1e-9);
        // Prograde motion: Earth moves to +Y in the fixed HEE frame
        assert!(track[30].y > 0.0);
        assert_relative_eq!(track[30].magnitude() / AU, 1.0, epsilon = 1e-9);
    }
}
