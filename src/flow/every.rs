use std::cell::RefCell;
use std::rc::Rc;

use crate::foundation::error::FlowResult;
use crate::threading::context::FlowCtx;
use crate::threading::task::{Step, Task};

type EveryCallback = Box<dyn FnMut(u64)>;

struct EveryState {
    interval: f64,
    callback: Option<EveryCallback>,
    changed: bool,
    tick: u64,
}

/// Handle controlling a repeating timer created by [`every`].
#[derive(Clone)]
pub struct EveryTimer {
    state: Rc<RefCell<EveryState>>,
}

/// Task driving an [`EveryTimer`]. It never finishes.
pub struct EveryRunner {
    state: Rc<RefCell<EveryState>>,
    started: bool,
    acc: i64,
}

/// Task blocking until an [`EveryTimer`] fires, see [`EveryTimer::sync`].
pub struct EverySync {
    state: Rc<RefCell<EveryState>>,
}

/// Call `callback` every `seconds`.
///
/// The runner calls `callback(0)` on its first resume and then once every
/// `seconds_to_frames(seconds)` frames with an incrementing tick. The interval is read on every
/// resume, so [`EveryTimer::set_interval`] applies without restarting the tick counter.
pub fn every(seconds: f64, callback: impl FnMut(u64) + 'static) -> (EveryTimer, EveryRunner) {
    let state = Rc::new(RefCell::new(EveryState {
        interval: seconds,
        callback: Some(Box::new(callback)),
        changed: false,
        tick: 0,
    }));
    (
        EveryTimer {
            state: state.clone(),
        },
        EveryRunner {
            state,
            started: false,
            acc: 0,
        },
    )
}

impl EveryTimer {
    /// Change the interval. Takes effect on the next runner resume.
    pub fn set_interval(&self, seconds: f64) {
        let mut state = self.state.borrow_mut();
        state.interval = seconds;
        state.changed = false;
    }

    /// Replace the callback; the tick counter keeps counting.
    pub fn set_callback(&self, callback: impl FnMut(u64) + 'static) {
        let mut state = self.state.borrow_mut();
        state.callback = Some(Box::new(callback));
        state.changed = false;
    }

    /// Current interval in seconds.
    pub fn interval(&self) -> f64 {
        self.state.borrow().interval
    }

    /// Tick passed to the most recent callback invocation.
    pub fn tick(&self) -> u64 {
        self.state.borrow().tick
    }

    /// Task that finishes once the timer has fired during the current step.
    pub fn sync(&self) -> EverySync {
        EverySync {
            state: self.state.clone(),
        }
    }
}

impl EveryRunner {
    fn fire(&self, tick: u64) {
        let callback = {
            let mut state = self.state.borrow_mut();
            state.tick = tick;
            state.callback.take()
        };
        if let Some(mut callback) = callback {
            callback(tick);
            let mut state = self.state.borrow_mut();
            // A callback installed while this one ran wins.
            if state.callback.is_none() {
                state.callback = Some(callback);
            }
        }
        self.state.borrow_mut().changed = true;
    }
}

impl Task for EveryRunner {
    fn name(&self) -> &str {
        "every"
    }

    fn resume(&mut self, cx: &mut FlowCtx<'_>) -> FlowResult<Step> {
        if !self.started {
            self.started = true;
            self.fire(0);
        }
        let interval = cx.seconds_to_frames(self.state.borrow().interval);
        if self.acc >= interval {
            self.acc = 0;
            let tick = self.state.borrow().tick + 1;
            self.fire(tick);
        } else {
            self.state.borrow_mut().changed = false;
        }
        self.acc += 1;
        Ok(Step::Yield)
    }
}

impl Task for EverySync {
    fn name(&self) -> &str {
        "every_sync"
    }

    fn resume(&mut self, _cx: &mut FlowCtx<'_>) -> FlowResult<Step> {
        if self.state.borrow().changed {
            Ok(Step::Done)
        } else {
            Ok(Step::Yield)
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/flow/every.rs"]
mod tests;
