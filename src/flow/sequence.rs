use std::collections::VecDeque;

use crate::foundation::error::FlowResult;
use crate::threading::context::FlowCtx;
use crate::threading::task::{BoxTask, Fused, Step, Task};

/// Staggered concurrent start, see [`sequence`].
pub struct Sequence {
    delay: f64,
    pending: VecDeque<BoxTask>,
    running: Vec<Fused>,
    next_start: Option<i64>,
}

/// Start each task `delay` seconds after the previous one started, then wait for all of them.
///
/// Start times do not depend on when earlier tasks finish. A task is first advanced in the
/// resume it starts in. Started tasks advance with [`all`](crate::all) rules.
pub fn sequence(delay: f64, tasks: impl IntoIterator<Item = BoxTask>) -> Sequence {
    Sequence {
        delay,
        pending: tasks.into_iter().collect(),
        running: Vec::new(),
        next_start: None,
    }
}

impl Sequence {
    /// Tasks not started yet.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }
}

impl Task for Sequence {
    fn name(&self) -> &str {
        "sequence"
    }

    fn resume(&mut self, cx: &mut FlowCtx<'_>) -> FlowResult<Step> {
        let now = cx.frame().as_i64();
        let interval = cx.seconds_to_frames(self.delay);
        let mut start_at = self.next_start.unwrap_or(now);
        while start_at <= now {
            let Some(task) = self.pending.pop_front() else {
                break;
            };
            self.running.push(Fused::new(task));
            start_at += interval;
            self.next_start = Some(start_at);
        }

        let running = &mut self.running;
        cx.in_group(|cx| {
            running
                .iter_mut()
                .filter(|t| !t.is_done())
                .try_for_each(|t| t.resume(cx).map(drop))
        })?;

        if self.pending.is_empty() && self.running.iter().all(Fused::is_done) {
            Ok(Step::Done)
        } else {
            Ok(Step::Yield)
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/flow/sequence.rs"]
mod tests;
