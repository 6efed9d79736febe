use std::collections::VecDeque;

use crate::foundation::error::FlowResult;
use crate::threading::action::Action;
use crate::threading::context::FlowCtx;
use crate::threading::task::{Step, Task};

/// Actions run one after another, see [`chain`].
pub struct Chain {
    items: VecDeque<Action>,
}

/// Run `items` strictly one after another.
///
/// Callables run synchronously and take no step. A task runs to completion before the next
/// item starts, and the next item starts in the same resume the previous one finished in.
pub fn chain(items: impl IntoIterator<Item = Action>) -> Chain {
    Chain {
        items: items.into_iter().collect(),
    }
}

impl Chain {
    /// Items not started or still running.
    pub fn remaining(&self) -> usize {
        self.items.len()
    }
}

impl Task for Chain {
    fn name(&self) -> &str {
        "chain"
    }

    fn resume(&mut self, cx: &mut FlowCtx<'_>) -> FlowResult<Step> {
        while let Some(item) = self.items.front_mut() {
            if item.resume(cx)? == Step::Yield {
                return Ok(Step::Yield);
            }
            self.items.pop_front();
        }
        Ok(Step::Done)
    }
}
