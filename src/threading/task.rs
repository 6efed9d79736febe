use std::borrow::Cow;

use crate::foundation::error::FlowResult;
use crate::threading::context::FlowCtx;

/// Outcome of resuming a task once.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    /// The task suspended and consumed one scheduler step.
    Yield,
    /// The task reached its end during this resume.
    Done,
}

impl Step {
    /// `true` for [`Step::Done`].
    pub fn is_done(self) -> bool {
        matches!(self, Self::Done)
    }
}

/// A resumable computation advanced one step at a time.
///
/// `resume` runs the body until its next suspension point. Work done before a suspension
/// happens synchronously inside the call. Once `resume` returned [`Step::Done`] it must not be
/// called again; [`Thread`](crate::Thread) and every combinator respect that.
///
/// A body that never returns keeps the whole tick from finishing. That is a caller error, the
/// scheduler does not bound it.
pub trait Task {
    /// Stable display name used for diagnostics.
    fn name(&self) -> &str;

    /// Advance the task by one step.
    fn resume(&mut self, cx: &mut FlowCtx<'_>) -> FlowResult<Step>;
}

/// Type-erased task.
pub type BoxTask = Box<dyn Task>;

impl<T: Task + ?Sized> Task for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn resume(&mut self, cx: &mut FlowCtx<'_>) -> FlowResult<Step> {
        (**self).resume(cx)
    }
}

/// Task backed by a closure, see [`from_fn`].
pub struct FnTask<F> {
    name: Cow<'static, str>,
    f: F,
}

/// Build a task from a closure that is called once per resume.
///
/// The closure owns whatever state the task needs; returning [`Step::Done`] ends it.
pub fn from_fn<F>(name: impl Into<Cow<'static, str>>, f: F) -> FnTask<F>
where
    F: FnMut(&mut FlowCtx<'_>) -> FlowResult<Step>,
{
    FnTask {
        name: name.into(),
        f,
    }
}

impl<F> Task for FnTask<F>
where
    F: FnMut(&mut FlowCtx<'_>) -> FlowResult<Step>,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn resume(&mut self, cx: &mut FlowCtx<'_>) -> FlowResult<Step> {
        (self.f)(cx)
    }
}

/// Task wrapper overriding the display name, see [`TaskExt::named`].
pub struct Named<T> {
    name: Cow<'static, str>,
    inner: T,
}

impl<T: Task> Task for Named<T> {
    fn name(&self) -> &str {
        &self.name
    }

    fn resume(&mut self, cx: &mut FlowCtx<'_>) -> FlowResult<Step> {
        self.inner.resume(cx)
    }
}

/// Convenience adapters available on every task.
pub trait TaskExt: Task + Sized {
    /// Replace the threadable name reported for diagnostics.
    fn named(self, name: impl Into<Cow<'static, str>>) -> Named<Self> {
        Named {
            name: name.into(),
            inner: self,
        }
    }

    /// Erase the task type.
    fn boxed(self) -> BoxTask
    where
        Self: 'static,
    {
        Box::new(self)
    }
}

impl<T: Task> TaskExt for T {}

/// Holds a task and remembers whether it finished, so it is never resumed past its end.
pub(crate) struct Fused {
    task: BoxTask,
    done: bool,
}

impl Fused {
    pub(crate) fn new(task: BoxTask) -> Self {
        Self { task, done: false }
    }

    pub(crate) fn is_done(&self) -> bool {
        self.done
    }

    pub(crate) fn resume(&mut self, cx: &mut FlowCtx<'_>) -> FlowResult<Step> {
        if self.done {
            return Ok(Step::Done);
        }
        let step = self.task.resume(cx)?;
        self.done = step.is_done();
        Ok(step)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/threading/task.rs"]
mod tests;
