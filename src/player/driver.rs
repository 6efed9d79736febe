use crate::foundation::core::FrameIndex;
use crate::foundation::error::{FlowError, FlowResult};
use crate::player::project::Project;
use crate::scene::Scene;
use crate::threading::thread::Thread;

/// Lifecycle of a driver pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DriverState {
    /// Reset, nothing ticked yet.
    Idle,
    /// At least one root thread is alive.
    Ticking,
    /// Every root thread finished.
    Finished,
    /// A root thread failed. Only [`Driver::reset`] leaves this state.
    Failed,
}

/// Options controlling a [`Driver`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DriverOpts {
    /// Start a fresh pass when advancing a finished driver.
    pub looping: bool,
}

/// Owns a project and the root threads of a scene, and ticks them against the project clock.
///
/// Each [`Driver::advance`] steps every live root thread once, in the order the scene returned
/// them, and then moves the clock forward by one frame. Real-time playback and exports both go
/// through `advance`, so they observe the same frame sequence.
pub struct Driver<S: Scene> {
    project: Project,
    scene: S,
    roots: Vec<Thread>,
    state: DriverState,
    opts: DriverOpts,
}

impl<S: Scene> Driver<S> {
    /// Create a driver and instantiate the first pass.
    pub fn new(project: Project, scene: S, opts: DriverOpts) -> Self {
        let mut driver = Self {
            project,
            scene,
            roots: Vec::new(),
            state: DriverState::Idle,
            opts,
        };
        driver.reset();
        driver
    }

    pub fn project(&self) -> &Project {
        &self.project
    }

    /// Mutable project access, for timeline tooling between passes.
    pub fn project_mut(&mut self) -> &mut Project {
        &mut self.project
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn opts(&self) -> DriverOpts {
        self.opts
    }

    /// Current frame of the project clock (number of ticks in this pass).
    pub fn frame(&self) -> FrameIndex {
        self.project.frame()
    }

    /// Root threads of the current pass.
    pub fn roots(&self) -> &[Thread] {
        &self.roots
    }

    /// Sample of the most recently ticked frame, `None` before the first tick of a pass.
    pub fn sample(&self) -> Option<S::Frame> {
        let frame = self.project.frame().0.checked_sub(1)?;
        Some(self.scene.sample(FrameIndex(frame)))
    }

    /// Start a fresh pass: frame zero, scene state reset, root threads re-instantiated.
    ///
    /// Time events survive the reset.
    pub fn reset(&mut self) {
        self.project.rewind();
        self.scene.reset();
        self.roots = self.scene.threads().into_iter().map(Thread::new).collect();
        self.state = DriverState::Idle;
        tracing::debug!(
            scene = self.scene.name(),
            roots = self.roots.len(),
            "driver reset"
        );
    }

    /// Tick once. From [`DriverState::Finished`] this is a no-op unless the driver loops.
    ///
    /// A failure while stepping a root thread propagates and leaves the clock where it was.
    /// The driver then refuses to tick until it is reset.
    pub fn advance(&mut self) -> FlowResult<DriverState> {
        self.ensure_not_failed()?;
        if self.state == DriverState::Finished {
            if !self.opts.looping {
                return Ok(self.state);
            }
            tracing::debug!(scene = self.scene.name(), "looping");
            self.reset();
        }
        self.tick()?;
        Ok(self.state)
    }

    fn ensure_not_failed(&self) -> FlowResult<()> {
        if self.state == DriverState::Failed {
            return Err(FlowError::validation(format!(
                "scene '{}' failed at frame {}, reset before ticking again",
                self.scene.name(),
                self.project.frame().0
            )));
        }
        Ok(())
    }

    fn tick(&mut self) -> FlowResult<()> {
        let stepped = {
            let mut cx = self.project.context();
            self.roots.iter_mut().try_for_each(|root| root.step(&mut cx))
        };
        if let Err(err) = stepped {
            tracing::debug!(frame = self.project.frame().0, error = %err, "scene failed");
            self.state = DriverState::Failed;
            return Err(err);
        }
        self.project.advance_frame();

        if self.roots.iter().any(Thread::is_alive) {
            self.state = DriverState::Ticking;
        } else {
            tracing::debug!(frame = self.project.frame().0, "scene finished");
            self.state = DriverState::Finished;
        }
        Ok(())
    }

    /// Replay to `frame`. Resets first unless `frame` lies ahead in the current pass.
    ///
    /// Stops early when the scene finishes before `frame`.
    #[tracing::instrument(skip(self), fields(scene = self.scene.name()))]
    pub fn seek(&mut self, frame: FrameIndex) -> FlowResult<()> {
        self.ensure_not_failed()?;
        if frame < self.project.frame() || self.state == DriverState::Finished {
            self.reset();
        }
        while self.project.frame() < frame && self.state != DriverState::Finished {
            self.tick()?;
        }
        Ok(())
    }

    /// Tick until the scene finishes. Returns the frame count of the pass.
    ///
    /// Fails on a failed driver, and when the scene is still running after `limit` frames.
    pub fn run_to_end(&mut self, limit: u64) -> FlowResult<u64> {
        self.ensure_not_failed()?;
        while self.state != DriverState::Finished {
            if self.project.frame().0 >= limit {
                return Err(FlowError::validation(format!(
                    "scene '{}' did not finish within {limit} frames",
                    self.scene.name()
                )));
            }
            self.tick()?;
        }
        Ok(self.project.frame().0)
    }

    /// Length of the scene in frames, measured on a fresh pass. Leaves the driver reset.
    #[tracing::instrument(skip(self), fields(scene = self.scene.name()))]
    pub fn duration(&mut self, limit: u64) -> FlowResult<u64> {
        self.reset();
        let frames = self.run_to_end(limit);
        self.reset();
        frames
    }
}

impl<S: Scene> std::fmt::Debug for Driver<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Driver")
            .field("scene", &self.scene.name())
            .field("frame", &self.project.frame())
            .field("state", &self.state)
            .field("roots", &self.roots)
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/player/driver.rs"]
mod tests;
