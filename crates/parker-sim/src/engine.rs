//! Frame-advance engine
//!
//! Rotates the aligned spiral by one degree per frame and measures every
//! sample's distance to an observer fixed at 1 AU on the +X axis.

use crate::error::SimResult;
use crate::sink::FrameSink;
use crate::spiral::{SpiralBranch, SpiralGeometry};
use crate::time_controller::FrameClock;
use hifitime::Epoch;
use nalgebra::Vector2;
use parker_core::constants::{DEGREES_PER_FRAME, OBSERVER_RADIUS_AU};
use parker_core::coordinates::{planar_distance, rotate};
use parker_log::{format_log_timestamp, LogRow};

/// Rotation phase (radians) for a frame, wrapping every 360 frames
pub fn rotation_phase(frame_index: u32) -> f64 {
    let degrees = f64::from(frame_index % 360) * DEGREES_PER_FRAME;
    degrees.to_radians()
}

/// Positions and distances of one branch for one frame
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BranchFrame {
    pub positions: Vec<Vector2<f64>>,
    pub distances: Vec<f64>,
}

impl BranchFrame {
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Everything computed for one frame
#[derive(Clone, Debug, PartialEq)]
pub struct FrameState {
    pub frame_index: u32,
    /// Rotation applied to the aligned spiral (radians)
    pub rotation_phase: f64,
    /// Simulated time of the frame
    pub epoch: Epoch,
    /// `epoch` as written to the log, e.g. `23-Jan-2008 16:39 UT`
    pub timestamp_text: String,
    pub slow: BranchFrame,
    pub fast: BranchFrame,
}

impl FrameState {
    pub fn branch(&self, branch: SpiralBranch) -> &BranchFrame {
        match branch {
            SpiralBranch::Slow => &self.slow,
            SpiralBranch::Fast => &self.fast,
        }
    }

    /// Fast-branch samples in log form
    pub fn log_rows(&self) -> Vec<LogRow> {
        self.fast
            .positions
            .iter()
            .zip(&self.fast.distances)
            .map(|(p, d)| LogRow::new(p.x, p.y, *d))
            .collect()
    }
}

/// Outcome of `FrameAdvanceEngine::advance`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Advance {
    /// New frame computed and handed to the sink
    Advanced,
    /// Same frame index as last time; nothing recomputed or recorded
    Unchanged,
}

/// Stateful engine driven once per timer tick. Not reentrant.
pub struct FrameAdvanceEngine {
    geometry: SpiralGeometry,
    clock: FrameClock,
    observer: Vector2<f64>,
    /// Last computed frame; `None` until the first advance
    state: Option<FrameState>,
}

impl FrameAdvanceEngine {
    pub fn new(geometry: SpiralGeometry, clock: FrameClock) -> Self {
        Self {
            geometry,
            clock,
            observer: Vector2::new(OBSERVER_RADIUS_AU, 0.0),
            state: None,
        }
    }

    pub fn geometry(&self) -> &SpiralGeometry {
        &self.geometry
    }

    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut FrameClock {
        &mut self.clock
    }

    /// Observer position (AU)
    pub fn observer(&self) -> Vector2<f64> {
        self.observer
    }

    /// Index of the last advanced frame
    pub fn last_frame(&self) -> Option<u32> {
        self.state.as_ref().map(|s| s.frame_index)
    }

    /// Most recent frame state
    pub fn state(&self) -> Option<&FrameState> {
        self.state.as_ref()
    }

    fn branch_frame(&self, branch: SpiralBranch, phase: f64) -> BranchFrame {
        let positions: Vec<Vector2<f64>> = self
            .geometry
            .points(branch)
            .iter()
            // Rotated output is mirrored through the Sun
            .map(|p| -rotate(p.aligned, phase))
            .collect();
        let distances = positions.iter().map(|p| planar_distance(*p, self.observer)).collect();
        BranchFrame { positions, distances }
    }

    /// Compute a frame without touching engine state
    pub fn compute(&self, frame_index: u32) -> FrameState {
        let rotation_phase = rotation_phase(frame_index);
        let epoch = self.clock.epoch_at(frame_index);

        FrameState {
            frame_index,
            rotation_phase,
            epoch,
            timestamp_text: format_log_timestamp(epoch),
            slow: self.branch_frame(SpiralBranch::Slow, rotation_phase),
            fast: self.branch_frame(SpiralBranch::Fast, rotation_phase),
        }
    }

    /// Advance to `frame_index` and hand the new frame to `sink`.
    ///
    /// A repeated index is a no-op: the previous state is kept and the sink is
    /// not called. If the sink fails the engine stays on its previous frame.
    pub fn advance(&mut self, frame_index: u32, sink: &mut dyn FrameSink) -> SimResult<Advance> {
        if self.last_frame() == Some(frame_index) {
            tracing::trace!("Frame {} repeated, skipping", frame_index);
            return Ok(Advance::Unchanged);
        }

        let state = self.compute(frame_index);
        sink.record(&state)?;
        tracing::debug!(
            "Advanced to frame {} ({:.4} rad, {})",
            frame_index, state.rotation_phase, state.timestamp_text
        );
        self.state = Some(state);
        Ok(Advance::Advanced)
    }
}
