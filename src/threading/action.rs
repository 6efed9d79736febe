use crate::foundation::error::FlowResult;
use crate::threading::context::FlowCtx;
use crate::threading::task::{BoxTask, Step, Task};

type Callback = Box<dyn FnOnce() -> FlowResult<()>>;

enum ActionKind {
    Task(BoxTask),
    Call(Option<Callback>),
}

/// Something to run as part of a flow: a task, or a plain callable.
///
/// A callable runs synchronously on the first resume and finishes in that same resume, so it
/// takes zero scheduler steps. A task runs to completion.
pub struct Action {
    kind: ActionKind,
}

impl Action {
    /// Wrap a task.
    pub fn task(task: impl Task + 'static) -> Self {
        Self {
            kind: ActionKind::Task(Box::new(task)),
        }
    }

    /// Wrap a zero-duration callable.
    pub fn call(f: impl FnOnce() + 'static) -> Self {
        Self::try_call(move || {
            f();
            Ok(())
        })
    }

    /// Wrap a zero-duration callable that can fail.
    pub fn try_call(f: impl FnOnce() -> FlowResult<()> + 'static) -> Self {
        Self {
            kind: ActionKind::Call(Some(Box::new(f))),
        }
    }

    /// `true` for actions built from a callable.
    pub fn is_call(&self) -> bool {
        matches!(self.kind, ActionKind::Call(_))
    }
}

impl From<BoxTask> for Action {
    fn from(task: BoxTask) -> Self {
        Self {
            kind: ActionKind::Task(task),
        }
    }
}

impl Task for Action {
    fn name(&self) -> &str {
        match &self.kind {
            ActionKind::Task(task) => task.name(),
            ActionKind::Call(_) => "call",
        }
    }

    fn resume(&mut self, cx: &mut FlowCtx<'_>) -> FlowResult<Step> {
        match &mut self.kind {
            ActionKind::Task(task) => task.resume(cx),
            ActionKind::Call(f) => {
                if let Some(f) = f.take() {
                    f()?;
                }
                Ok(Step::Done)
            }
        }
    }
}
