//! Shared constants and coordinate helpers for the Parker spiral workspace

pub mod constants;
pub mod coordinates;


pub use coordinates::{CartesianPosition, PolarPosition, planar_distance, rotate, normalize_angle};
