use std::time::Duration;

use crate::foundation::core::FrameIndex;
use crate::foundation::error::{FlowError, FlowResult};
use crate::player::driver::{Driver, DriverState};
use crate::scene::Scene;

/// User-facing playback state. Persisted between sessions, so it is serde-friendly.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PlayerState {
    /// Hold the current frame; `update` only serves queued requests.
    pub paused: bool,
    /// Jump back to `start_frame` after the end instead of pausing.
    pub looping: bool,
    /// Frames advanced per elapsed frame interval.
    pub speed: u32,
    /// First frame of the playback range.
    pub start_frame: u64,
    /// End of the playback range; `None` plays until the scene finishes.
    pub end_frame: Option<u64>,
    /// Set when playback reached the end and paused.
    pub finished: bool,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self {
            paused: true,
            looping: true,
            speed: 1,
            start_frame: 0,
            end_frame: None,
            finished: false,
        }
    }
}

/// Outcome of one [`Player::update`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlayerTick {
    /// Clock after the update.
    pub frame: FrameIndex,
    /// Ticks performed by the update, seeks excluded.
    pub advanced: u64,
    /// Whether a requested seek was served.
    pub seeked: bool,
}

/// Real-time player on top of a [`Driver`].
///
/// Commands are queued and served by the next [`Player::update`], which converts elapsed wall
/// time into whole frames. Feeding the same elapsed durations replays the same frames.
pub struct Player<S: Scene> {
    driver: Driver<S>,
    state: PlayerState,
    acc: f64,
    requested_seek: Option<u64>,
}

impl<S: Scene> Player<S> {
    pub fn new(driver: Driver<S>, state: PlayerState) -> FlowResult<Self> {
        validate_state(&state)?;
        let requested_seek = Some(state.start_frame);
        Ok(Self {
            driver,
            state,
            acc: 0.0,
            requested_seek,
        })
    }

    pub fn driver(&self) -> &Driver<S> {
        &self.driver
    }

    pub fn driver_mut(&mut self) -> &mut Driver<S> {
        &mut self.driver
    }

    pub fn state(&self) -> &PlayerState {
        &self.state
    }

    /// Current frame of the driven project.
    pub fn frame(&self) -> FrameIndex {
        self.driver.frame()
    }

    /// Current time in seconds.
    pub fn time(&self) -> f64 {
        self.driver.project().time()
    }

    /// Edit the playback state. The range is re-validated and the clock re-clamped.
    pub fn update_state(&mut self, f: impl FnOnce(&mut PlayerState)) -> FlowResult<()> {
        let mut next = self.state.clone();
        f(&mut next);
        validate_state(&next)?;
        self.state = next;
        if !self.in_range(self.frame().0) {
            self.requested_seek = Some(self.clamp(self.frame().0));
        }
        Ok(())
    }

    pub fn request_seek(&mut self, frame: u64) {
        self.requested_seek = Some(self.clamp(frame));
    }

    pub fn request_reset(&mut self) {
        self.request_seek(0);
    }

    pub fn request_next_frame(&mut self) {
        let frame = self.frame().0.saturating_add(u64::from(self.state.speed));
        self.request_seek(frame);
    }

    /// Pause or resume. Resuming a finished, non-looping playback starts over.
    pub fn toggle_playback(&mut self) {
        self.state.paused = !self.state.paused;
        if !self.state.paused && self.state.finished {
            self.state.finished = false;
            self.request_reset();
        }
        tracing::debug!(paused = self.state.paused, "toggle playback");
    }

    /// Serve queued commands, then advance by the frames `elapsed` is worth.
    pub fn update(&mut self, elapsed: Duration) -> FlowResult<PlayerTick> {
        if let Some(frame) = self.requested_seek.take() {
            self.driver.seek(FrameIndex(frame))?;
            self.acc = 0.0;
            return Ok(self.report(0, true));
        }
        if self.state.paused {
            return Ok(self.report(0, false));
        }

        let fps = self.driver.project().fps().as_f64();
        self.acc += elapsed.as_secs_f64();
        let due = (self.acc * fps).floor();
        self.acc -= due / fps;

        let mut advanced = 0;
        let ticks = (due as u64).saturating_mul(u64::from(self.state.speed));
        for _ in 0..ticks {
            if self.at_end() {
                if self.state.looping && self.state.start_frame != self.end_frame() {
                    self.driver.seek(FrameIndex(self.state.start_frame))?;
                    continue;
                }
                self.state.paused = true;
                self.state.finished = true;
                tracing::debug!(frame = self.frame().0, "playback finished");
                break;
            }
            self.driver.advance()?;
            advanced += 1;
        }
        Ok(self.report(advanced, false))
    }

    fn report(&self, advanced: u64, seeked: bool) -> PlayerTick {
        PlayerTick {
            frame: self.frame(),
            advanced,
            seeked,
        }
    }

    fn end_frame(&self) -> u64 {
        self.state.end_frame.unwrap_or(u64::MAX)
    }

    fn at_end(&self) -> bool {
        self.driver.state() == DriverState::Finished || self.frame().0 >= self.end_frame()
    }

    fn in_range(&self, frame: u64) -> bool {
        frame >= self.state.start_frame && frame <= self.end_frame()
    }

    fn clamp(&self, frame: u64) -> u64 {
        frame.clamp(self.state.start_frame, self.end_frame())
    }
}

fn validate_state(state: &PlayerState) -> FlowResult<()> {
    if state.speed == 0 {
        return Err(FlowError::validation("player speed must be non-zero"));
    }
    if state.end_frame.is_some_and(|end| end < state.start_frame) {
        return Err(FlowError::validation(
            "player end_frame must not precede start_frame",
        ));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/player/playback.rs"]
mod tests;
