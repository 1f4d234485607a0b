//! Frame sinks: consumers of computed frames

use crate::engine::FrameState;
use crate::error::SimResult;
use parker_log::SpiralLogWriter;

/// Receives every newly advanced frame
pub trait FrameSink {
    fn record(&mut self, frame: &FrameState) -> SimResult<()>;
}

/// Discards frames
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl FrameSink for NullSink {
    fn record(&mut self, _frame: &FrameState) -> SimResult<()> {
        Ok(())
    }
}

/// Appends the fast branch of each frame as one log block
impl FrameSink for SpiralLogWriter {
    fn record(&mut self, frame: &FrameState) -> SimResult<()> {
        if frame.fast.is_empty() {
            tracing::debug!("Frame {} has no samples, nothing logged", frame.frame_index);
            return Ok(());
        }
        self.append(frame.frame_index, &frame.timestamp_text, &frame.log_rows())?;
        Ok(())
    }
}

/// Fan out to two sinks, first to second
impl<A: FrameSink, B: FrameSink> FrameSink for (A, B) {
    fn record(&mut self, frame: &FrameState) -> SimResult<()> {
        self.0.record(frame)?;
        self.1.record(frame)
    }
}

impl<S: FrameSink + ?Sized> FrameSink for &mut S {
    fn record(&mut self, frame: &FrameState) -> SimResult<()> {
        (**self).record(frame)
    }
}

impl<S: FrameSink> FrameSink for Option<S> {
    fn record(&mut self, frame: &FrameState) -> SimResult<()> {
        match self {
            Some(sink) => sink.record(frame),
            None => Ok(()),
        }
    }
}
