use std::io::Write;

use crate::foundation::core::{Canvas, Fps};
use crate::foundation::error::{RaceError, RaceResult};
use crate::session::race_session::Frame;

/// What an export announces to its sink up front.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinkConfig {
    /// Surface the frames were laid out for.
    pub canvas: Canvas,
    /// Export cadence.
    pub fps: Fps,
}

/// Destination for the frames an export commits.
///
/// Frames arrive in commit order; `Frame::sequence` strictly increases across calls.
/// An export calls `begin` once, then `push_frame` per frame, then `end` exactly once.
pub trait FrameSink: Send {
    /// Open the sink.
    fn begin(&mut self, cfg: SinkConfig) -> RaceResult<()>;
    /// Accept one frame.
    fn push_frame(&mut self, frame: &Frame) -> RaceResult<()>;
    /// Close the sink. Runs even when the export failed.
    fn end(&mut self) -> RaceResult<()>;
}

/// Keeps every frame in a `Vec`.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<Frame>,
    ended: bool,
}

impl InMemorySink {
    /// Empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Settings from the last `begin`.
    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg
    }

    /// Frames received since the last `begin`.
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Consume the sink, keeping its frames.
    pub fn into_frames(self) -> Vec<Frame> {
        self.frames
    }

    /// Whether `end` has been called since the last `begin`.
    pub fn is_ended(&self) -> bool {
        self.ended
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> RaceResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        self.ended = false;
        Ok(())
    }

    fn push_frame(&mut self, frame: &Frame) -> RaceResult<()> {
        self.frames.push(frame.clone());
        Ok(())
    }

    fn end(&mut self) -> RaceResult<()> {
        self.ended = true;
        Ok(())
    }
}

/// Writes each frame as one JSON object per line.
#[derive(Debug)]
pub struct JsonLinesSink<W: Write + Send> {
    out: W,
    written: u64,
}

impl<W: Write + Send> JsonLinesSink<W> {
    /// Wrap a writer.
    pub fn new(out: W) -> Self {
        Self { out, written: 0 }
    }

    /// Lines written so far.
    pub fn written(&self) -> u64 {
        self.written
    }

    /// Recover the writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> FrameSink for JsonLinesSink<W> {
    fn begin(&mut self, _cfg: SinkConfig) -> RaceResult<()> {
        self.written = 0;
        Ok(())
    }

    fn push_frame(&mut self, frame: &Frame) -> RaceResult<()> {
        serde_json::to_writer(&mut self.out, frame)
            .map_err(|e| RaceError::serde(format!("frame {}: {e}", frame.sequence)))?;
        self.out
            .write_all(b"\n")
            .map_err(|e| RaceError::sink(format!("write frame {}: {e}", frame.sequence)))?;
        self.written += 1;
        Ok(())
    }

    fn end(&mut self) -> RaceResult<()> {
        self.out
            .flush()
            .map_err(|e| RaceError::sink(format!("flush: {e}")))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
