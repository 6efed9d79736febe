use std::io::Write;

use anyhow::Context as _;

use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::FlowResult;

/// Configuration provided to a [`FrameSink`] at the start of an export.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct SinkConfig {
    /// Scene being exported.
    pub scene: String,
    pub fps: Fps,
    /// Index of the first frame the sink will receive.
    pub start: FrameIndex,
}

/// Sink contract for consuming sampled frames in timeline order.
///
/// Ordering contract: `push_frame` is called in strictly increasing `FrameIndex` order, one call
/// per ticked frame.
pub trait FrameSink<F> {
    fn begin(&mut self, cfg: SinkConfig) -> FlowResult<()>;
    fn push_frame(&mut self, idx: FrameIndex, frame: &F) -> FlowResult<()>;
    fn end(&mut self) -> FlowResult<()>;
}

/// In-memory sink for tests and debugging.
#[derive(Debug)]
pub struct InMemorySink<F> {
    cfg: Option<SinkConfig>,
    /// Frames in timeline order.
    pub frames: Vec<(FrameIndex, F)>,
}

impl<F> Default for InMemorySink<F> {
    fn default() -> Self {
        Self {
            cfg: None,
            frames: Vec::new(),
        }
    }
}

impl<F> InMemorySink<F> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(&self) -> Option<&SinkConfig> {
        self.cfg.as_ref()
    }
}

impl<F: Clone> FrameSink<F> for InMemorySink<F> {
    fn begin(&mut self, cfg: SinkConfig) -> FlowResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &F) -> FlowResult<()> {
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> FlowResult<()> {
        Ok(())
    }
}

#[derive(serde::Serialize)]
struct FrameLine<'a, F> {
    frame: u64,
    time: f64,
    state: &'a F,
}

/// Writes one JSON object per frame: `{"frame": .., "time": .., "state": ..}`.
pub struct JsonLinesSink<W: Write> {
    out: W,
    fps: Option<Fps>,
    written: u64,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            fps: None,
            written: 0,
        }
    }

    /// Lines written so far.
    pub fn written(&self) -> u64 {
        self.written
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write, F: serde::Serialize> FrameSink<F> for JsonLinesSink<W> {
    fn begin(&mut self, cfg: SinkConfig) -> FlowResult<()> {
        self.fps = Some(cfg.fps);
        self.written = 0;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &F) -> FlowResult<()> {
        let time = self
            .fps
            .map_or(0.0, |fps| fps.frames_to_seconds(idx.as_i64()));
        let line = FrameLine {
            frame: idx.0,
            time,
            state: frame,
        };
        serde_json::to_writer(&mut self.out, &line)?;
        self.out
            .write_all(b"\n")
            .with_context(|| format!("write frame {}", idx.0))?;
        self.written += 1;
        Ok(())
    }

    fn end(&mut self) -> FlowResult<()> {
        self.out.flush().context("flush json lines")?;
        Ok(())
    }
}
