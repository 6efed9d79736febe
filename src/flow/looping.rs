use crate::foundation::error::FlowResult;
use crate::threading::context::FlowCtx;
use crate::threading::task::{BoxTask, Step, Task};

/// Repeated task, see [`loop_n`] and [`loop_forever`].
pub struct Loop<F> {
    iterations: Option<u64>,
    index: u64,
    current: Option<BoxTask>,
    factory: F,
    warned: bool,
}

/// Call `factory(i)` for `i` in `0..iterations`.
///
/// A returned task runs to completion before the next iteration starts. `None` makes the
/// iteration an idle one that consumes a single step.
pub fn loop_n<F>(iterations: u64, factory: F) -> Loop<F>
where
    F: FnMut(u64) -> Option<BoxTask>,
{
    Loop {
        iterations: Some(iterations),
        index: 0,
        current: None,
        factory,
        warned: false,
    }
}

/// Like [`loop_n`] without an upper bound. The loop never finishes on its own.
///
/// Run it on a spawned thread or inside [`any`](crate::any) so something else decides when
/// it stops being driven. A factory returning tasks that finish without yielding makes the
/// tick spin forever.
pub fn loop_forever<F>(factory: F) -> Loop<F>
where
    F: FnMut(u64) -> Option<BoxTask>,
{
    Loop {
        iterations: None,
        ..loop_n(0, factory)
    }
}

impl<F> Loop<F> {
    /// Index of the iteration currently running.
    pub fn index(&self) -> u64 {
        self.index
    }
}

impl<F> Task for Loop<F>
where
    F: FnMut(u64) -> Option<BoxTask>,
{
    fn name(&self) -> &str {
        "loop"
    }

    fn resume(&mut self, cx: &mut FlowCtx<'_>) -> FlowResult<Step> {
        if self.iterations.is_none() && !self.warned && cx.in_root_thread() {
            self.warned = true;
            tracing::warn!("unbounded loop driven by a root thread; the scene never finishes");
        }
        loop {
            if let Some(task) = &mut self.current {
                if task.resume(cx)? == Step::Yield {
                    return Ok(Step::Yield);
                }
                self.current = None;
                self.index += 1;
                continue;
            }
            if self.iterations.is_some_and(|n| self.index >= n) {
                return Ok(Step::Done);
            }
            match (self.factory)(self.index) {
                Some(task) => self.current = Some(task),
                None => {
                    self.index += 1;
                    return Ok(Step::Yield);
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/flow/looping.rs"]
mod tests;
