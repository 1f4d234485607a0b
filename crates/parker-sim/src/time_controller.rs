//! Frame clock for spiral playback

use hifitime::{Duration, Epoch};
use parker_core::constants::{HOURS_PER_FRAME, SECONDS_PER_HOUR};

/// Maps frame indices to simulated epochs and hands out frame indices to a
/// periodic driver
pub struct FrameClock {
    /// Observation time of frame 0
    start: Epoch,
    /// Simulated hours between consecutive frames
    hours_per_frame: f64,
    /// Next frame to hand out
    next: u32,
    /// Last frame handed out
    last: Option<u32>,
    /// Stop after this many frames
    frame_count: Option<u32>,
    paused: bool,
}

impl FrameClock {
    pub fn new(start: Epoch, hours_per_frame: f64) -> Self {
        Self {
            start,
            hours_per_frame,
            next: 0,
            last: None,
            frame_count: None,
            paused: false,
        }
    }

    /// Clock with the default step of 1.927 hours per frame
    pub fn at_epoch(start: Epoch) -> Self {
        Self::new(start, HOURS_PER_FRAME)
    }

    /// Limit the number of frames handed out by `tick`
    pub fn with_frame_count(mut self, frame_count: u32) -> Self {
        self.frame_count = Some(frame_count);
        self
    }

    pub fn start(&self) -> Epoch {
        self.start
    }

    pub fn hours_per_frame(&self) -> f64 {
        self.hours_per_frame
    }

    /// Display epoch of a frame: start + frame * step
    pub fn epoch_at(&self, frame_index: u32) -> Epoch {
        let seconds = f64::from(frame_index) * self.hours_per_frame * SECONDS_PER_HOUR;
        self.start + Duration::from_seconds(seconds)
    }

    /// Last frame handed out by `tick`
    pub fn current(&self) -> Option<u32> {
        self.last
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// All frames handed out
    pub fn is_finished(&self) -> bool {
        matches!(self.frame_count, Some(count) if self.next >= count)
    }

    /// Frame index for one timer tick.
    ///
    /// While paused the previous index is repeated, so the engine sees a
    /// duplicate tick and does no work. Returns `None` once finished, or when
    /// paused before the first frame.
    pub fn tick(&mut self) -> Option<u32> {
        if self.paused {
            return self.last;
        }
        if self.is_finished() {
            return None;
        }

        let frame = self.next;
        self.next += 1;
        self.last = Some(frame);
        Some(frame)
    }

    /// Continue playback from `frame_index`
    pub fn jump_to(&mut self, frame_index: u32) {
        self.next = frame_index;
    }

    pub fn reset(&mut self) {
        self.next = 0;
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start() -> Epoch {
        Epoch::from_gregorian_utc(2008, 1, 23, 16, 39, 33, 0)
    }

    #[test]
    fn test_epoch_step() {
        let clock = FrameClock::at_epoch(start());
        assert_eq!(clock.epoch_at(0), start());

        let elapsed = clock.epoch_at(10) - start();
        assert!((elapsed.to_seconds() - 10.0 * 1.927 * 3600.0).abs() < 1e-6);
    }

    #[test]
    fn test_tick_sequence_and_finish() {
        let mut clock = FrameClock::at_epoch(start()).with_frame_count(3);
        assert_eq!(clock.tick(), Some(0));
        assert_eq!(clock.tick(), Some(1));
        assert_eq!(clock.tick(), Some(2));
        assert!(clock.is_finished());
        assert_eq!(clock.tick(), None);
    }

    #[test]
    fn test_pause_repeats_frame() {
        let mut clock = FrameClock::at_epoch(start());
        assert_eq!(clock.tick(), Some(0));
        clock.pause();
        assert_eq!(clock.tick(), Some(0));
        assert_eq!(clock.tick(), Some(0));
        clock.resume();
        assert_eq!(clock.tick(), Some(1));
    }

    #[test]
    fn test_paused_before_first_frame() {
        let mut clock = FrameClock::at_epoch(start());
        clock.toggle_pause();
        assert!(clock.is_paused());
        assert_eq!(clock.tick(), None);
    }

    #[test]
    fn test_jump_and_reset() {
        let mut clock = FrameClock::at_epoch(start());
        clock.jump_to(90);
        assert_eq!(clock.tick(), Some(90));
        clock.reset();
        assert_eq!(clock.current(), None);
        assert_eq!(clock.tick(), Some(0));
    }
}
