use crate::foundation::error::FlowResult;
use crate::threading::context::FlowCtx;
use crate::threading::task::{Step, Task};

/// Progress-reporting task, see [`tween`].
pub struct Tween<F> {
    seconds: f64,
    on_progress: F,
    frames: Option<i64>,
    elapsed: i64,
}

/// Report normalized progress once per frame for `seconds`.
///
/// The callback receives `i / n` on the `i`-th resume, where `n` is the duration in frames, and
/// `1.0` on the resume that finishes the task. The task consumes exactly `n` steps; a
/// non-positive duration reports `1.0` and finishes immediately.
pub fn tween<F>(seconds: f64, on_progress: F) -> Tween<F>
where
    F: FnMut(f64),
{
    Tween {
        seconds,
        on_progress,
        frames: None,
        elapsed: 0,
    }
}

impl<F> Tween<F> {
    /// Duration of the tween in seconds.
    pub fn seconds(&self) -> f64 {
        self.seconds
    }
}

impl<F> Task for Tween<F>
where
    F: FnMut(f64),
{
    fn name(&self) -> &str {
        "tween"
    }

    fn resume(&mut self, cx: &mut FlowCtx<'_>) -> FlowResult<Step> {
        let frames = *self
            .frames
            .get_or_insert_with(|| cx.seconds_to_frames(self.seconds));
        if self.elapsed >= frames {
            (self.on_progress)(1.0);
            return Ok(Step::Done);
        }
        (self.on_progress)(self.elapsed as f64 / frames as f64);
        self.elapsed += 1;
        Ok(Step::Yield)
    }
}
