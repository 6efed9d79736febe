use crate::events::registry::TimeEventRegistry;
use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::FlowResult;
use crate::threading::context::{FlowCtx, ThreadTable};

/// Static project configuration.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ProjectSettings {
    /// Display name, used in logs and sink configuration.
    pub name: String,
    /// Frame rate of the project clock.
    pub fps: Fps,
}

impl Default for ProjectSettings {
    fn default() -> Self {
        Self {
            name: "project".to_owned(),
            fps: Fps::default(),
        }
    }
}

/// Clock, time events and thread bookkeeping of one playback or render session.
///
/// Only the driver moves the clock. Tasks observe the project through the [`FlowCtx`] the
/// driver hands out for each tick.
#[derive(Debug)]
pub struct Project {
    settings: ProjectSettings,
    frame: FrameIndex,
    events: TimeEventRegistry,
    threads: ThreadTable,
}

impl Project {
    /// Create a project at frame zero.
    pub fn new(settings: ProjectSettings) -> FlowResult<Self> {
        Fps::new(settings.fps.num, settings.fps.den)?;
        Ok(Self {
            settings,
            frame: FrameIndex(0),
            events: TimeEventRegistry::new(),
            threads: ThreadTable::default(),
        })
    }

    /// Project name.
    pub fn name(&self) -> &str {
        &self.settings.name
    }

    /// Settings the project was created with.
    pub fn settings(&self) -> &ProjectSettings {
        &self.settings
    }

    /// Frame rate.
    pub fn fps(&self) -> Fps {
        self.settings.fps
    }

    /// Current frame.
    pub fn frame(&self) -> FrameIndex {
        self.frame
    }

    /// Current time in seconds.
    pub fn time(&self) -> f64 {
        self.fps().frames_to_seconds(self.frame.as_i64())
    }

    /// Convert seconds to frames at the project frame rate.
    pub fn seconds_to_frames(&self, seconds: f64) -> i64 {
        self.fps().seconds_to_frames(seconds)
    }

    /// Convert frames to seconds at the project frame rate.
    pub fn frames_to_seconds(&self, frames: i64) -> f64 {
        self.fps().frames_to_seconds(frames)
    }

    /// Time events of this project.
    pub fn events(&self) -> &TimeEventRegistry {
        &self.events
    }

    /// Mutable time events, for timeline tooling between passes.
    pub fn events_mut(&mut self) -> &mut TimeEventRegistry {
        &mut self.events
    }

    pub(crate) fn context(&mut self) -> FlowCtx<'_> {
        FlowCtx::new(self.frame, self.settings.fps, &mut self.events, &mut self.threads)
    }

    pub(crate) fn advance_frame(&mut self) {
        self.frame = self.frame.next();
    }

    /// Back to frame zero with no threads. Time events persist.
    pub(crate) fn rewind(&mut self) {
        self.frame = FrameIndex(0);
        self.threads.clear();
    }
}
