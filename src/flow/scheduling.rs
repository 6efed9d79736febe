use crate::foundation::core::FrameIndex;
use crate::foundation::error::FlowResult;
use crate::threading::action::Action;
use crate::threading::context::FlowCtx;
use crate::threading::task::{Step, Task};

/// Frame-exact wait followed by an optional action.
///
/// Built by [`wait_for`], [`wait_for_then`] and [`delay`].
pub struct WaitFor {
    name: &'static str,
    seconds: f64,
    until: Option<i64>,
    after: Option<Action>,
}

/// Block for `round(seconds * fps)` frames, counted from the frame of the first resume.
///
/// Zero or negative durations finish on the first resume without consuming a step.
pub fn wait_for(seconds: f64) -> WaitFor {
    WaitFor {
        name: "wait_for",
        seconds,
        until: None,
        after: None,
    }
}

/// [`wait_for`], then run `after` to completion.
pub fn wait_for_then(seconds: f64, after: Action) -> WaitFor {
    WaitFor {
        after: Some(after),
        ..wait_for(seconds)
    }
}

/// Do nothing for `seconds`, then run `action` to completion.
pub fn delay(seconds: f64, action: Action) -> WaitFor {
    WaitFor {
        name: "delay",
        ..wait_for_then(seconds, action)
    }
}

impl WaitFor {
    /// Requested duration in seconds.
    pub fn seconds(&self) -> f64 {
        self.seconds
    }
}

impl Task for WaitFor {
    fn name(&self) -> &str {
        self.name
    }

    fn resume(&mut self, cx: &mut FlowCtx<'_>) -> FlowResult<Step> {
        let now = cx.frame().as_i64();
        let until = *self
            .until
            .get_or_insert_with(|| now + cx.seconds_to_frames(self.seconds));
        if now < until {
            return Ok(Step::Yield);
        }
        match &mut self.after {
            Some(after) => after.resume(cx),
            None => Ok(Step::Done),
        }
    }
}

/// Wait for a named time event, see [`wait_until`].
pub struct WaitUntil {
    event: String,
    target: Option<FrameIndex>,
    after: Option<Action>,
}

/// Block until the project reaches the target frame of time event `event`.
///
/// The event is registered on the first resume, so an event never scheduled by timeline
/// tooling fires right away. A target already in the past does not block.
pub fn wait_until(event: impl Into<String>) -> WaitUntil {
    WaitUntil {
        event: event.into(),
        target: None,
        after: None,
    }
}

/// [`wait_until`], then run `after` to completion.
pub fn wait_until_then(event: impl Into<String>, after: Action) -> WaitUntil {
    WaitUntil {
        after: Some(after),
        ..wait_until(event)
    }
}

impl WaitUntil {
    /// Name of the awaited event.
    pub fn event(&self) -> &str {
        &self.event
    }
}

impl Task for WaitUntil {
    fn name(&self) -> &str {
        "wait_until"
    }

    fn resume(&mut self, cx: &mut FlowCtx<'_>) -> FlowResult<Step> {
        let target = match self.target {
            Some(target) => target,
            None => {
                let target = cx.register_event(&self.event);
                self.target = Some(target);
                target
            }
        };
        if cx.frame() < target {
            return Ok(Step::Yield);
        }
        match &mut self.after {
            Some(after) => after.resume(cx),
            None => Ok(Step::Done),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/flow/scheduling.rs"]
mod tests;
