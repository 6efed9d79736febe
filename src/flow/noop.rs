use crate::foundation::error::FlowResult;
use crate::threading::context::FlowCtx;
use crate::threading::task::{Step, Task};

/// Task that finishes on its first resume.
#[derive(Debug, Default, Clone, Copy)]
pub struct Noop;

/// Placeholder task consuming no steps.
pub fn noop() -> Noop {
    Noop
}

impl Task for Noop {
    fn name(&self) -> &str {
        "noop"
    }

    fn resume(&mut self, _cx: &mut FlowCtx<'_>) -> FlowResult<Step> {
        Ok(Step::Done)
    }
}
