//! Parker spiral geometry and frame-advance engine

pub mod engine;
pub mod ephemeris;
pub mod error;
pub mod params;
pub mod sink;
pub mod spiral;
pub mod time_controller;

pub use engine::{rotation_phase, Advance, BranchFrame, FrameAdvanceEngine, FrameState};
pub use ephemeris::{
    first_orbit, sample_track, CircularEphemeris, CircularOrbit, Ephemeris, ReferenceFrame, SPACECRAFT,
};
pub use error::{SimError, SimResult};
pub use params::{alignment_from_offset, PhysicalParameters, SpiralConfig};
pub use sink::{FrameSink, NullSink};
pub use spiral::{sample_radii, SamplePoint, SpiralBranch, SpiralGeometry};
pub use time_controller::FrameClock;
