use crate::export::sink::{FrameSink, SinkConfig};
use crate::foundation::core::{FrameIndex, FrameRange};
use crate::foundation::error::{FlowError, FlowResult};
use crate::player::driver::{Driver, DriverState};
use crate::scene::Scene;

/// Options controlling [`export`].
#[derive(Clone, Copy, Debug)]
pub struct ExportOpts {
    /// Frames to export. `None` exports from frame zero until the scene finishes.
    pub range: Option<FrameRange>,
    /// Upper bound on exported frames, guarding against scenes that never finish.
    pub max_frames: u64,
}

impl Default for ExportOpts {
    fn default() -> Self {
        Self {
            range: None,
            max_frames: 100_000,
        }
    }
}

/// Export statistics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct ExportStats {
    /// First exported frame.
    pub start: FrameIndex,
    /// Frames pushed into the sink.
    pub frames_written: u64,
    /// Whether the scene finished inside the exported range.
    pub finished: bool,
}

/// Drive `driver` as fast as possible and push one sampled frame per tick into `sink`.
///
/// The driver is seeked to the range start first, so the output only depends on the scene and
/// the range. Frames arrive in strictly increasing order. The export ends at the range end or
/// when the scene finishes, whichever comes first.
#[tracing::instrument(skip(driver, sink), fields(scene = driver.scene().name()))]
pub fn export<S, K>(
    driver: &mut Driver<S>,
    opts: ExportOpts,
    sink: &mut K,
) -> FlowResult<ExportStats>
where
    S: Scene,
    K: FrameSink<S::Frame> + ?Sized,
{
    if opts.range.is_some_and(FrameRange::is_empty) {
        return Err(FlowError::validation("export range must be non-empty"));
    }
    if opts.max_frames == 0 {
        return Err(FlowError::validation("export max_frames must be non-zero"));
    }

    let start = opts.range.map_or(FrameIndex(0), |r| r.start);
    driver.seek(start)?;
    if driver.frame() < start {
        return Err(FlowError::validation(format!(
            "export range starts at frame {} but the scene ends at frame {}",
            start.0,
            driver.frame().0
        )));
    }

    sink.begin(SinkConfig {
        scene: driver.scene().name().to_owned(),
        fps: driver.project().fps(),
        start,
    })?;

    let mut stats = ExportStats {
        start,
        ..ExportStats::default()
    };
    loop {
        let idx = driver.frame();
        if opts.range.is_some_and(|r| idx >= r.end) {
            break;
        }
        if driver.state() == DriverState::Finished {
            stats.finished = true;
            break;
        }
        if stats.frames_written >= opts.max_frames {
            return Err(FlowError::validation(format!(
                "export exceeded {} frames; is the scene unbounded?",
                opts.max_frames
            )));
        }
        driver.advance()?;
        sink.push_frame(idx, &driver.scene().sample(idx))?;
        stats.frames_written += 1;
    }
    if driver.state() == DriverState::Finished {
        stats.finished = true;
    }
    sink.end()?;

    tracing::debug!(
        frames = stats.frames_written,
        finished = stats.finished,
        "export done"
    );
    Ok(stats)
}

#[cfg(test)]
#[path = "../../tests/unit/export/exporter.rs"]
mod tests;
