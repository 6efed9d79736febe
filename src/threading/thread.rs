use crate::foundation::error::FlowResult;
use crate::threading::context::FlowCtx;
use crate::threading::task::{BoxTask, Step};

/// Identifier of a thread, unique within one project session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ThreadId(pub u64);

/// A single schedulable unit wrapping a task.
///
/// A thread owns the threads its body spawns. They are stepped right after the body on every
/// tick, and they are abandoned as soon as the body finishes.
pub struct Thread {
    id: Option<ThreadId>,
    name: String,
    runner: BoxTask,
    alive: bool,
    steps: u64,
    children: Vec<Thread>,
}

impl Thread {
    /// Wrap `task`. The thread takes the task's threadable name.
    pub fn new(task: BoxTask) -> Self {
        let name = task.name().to_owned();
        Self {
            id: None,
            name,
            runner: task,
            alive: true,
            steps: 0,
            children: Vec::new(),
        }
    }

    /// Wrap `task` under an explicit name.
    pub fn named(name: impl Into<String>, task: BoxTask) -> Self {
        let mut thread = Self::new(task);
        thread.name = name.into();
        thread
    }

    pub(crate) fn with_id(id: ThreadId, task: BoxTask) -> Self {
        let mut thread = Self::new(task);
        thread.id = Some(id);
        thread
    }

    /// Id issued by the project; `None` until the thread is first stepped.
    pub fn id(&self) -> Option<ThreadId> {
        self.id
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// `false` once the body finished, failed, or the thread was cancelled.
    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Number of times the body was resumed.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Live child threads, in spawn order.
    pub fn children(&self) -> &[Thread] {
        &self.children
    }

    /// Advance the body by one step, then every live child.
    ///
    /// A no-op once the thread is not alive. A failure inside the body ends the thread and is
    /// returned attributed to it; a failure inside a child aborts the rest of the tick.
    pub fn step(&mut self, cx: &mut FlowCtx<'_>) -> FlowResult<()> {
        if !self.alive {
            return Ok(());
        }
        let id = match self.id {
            Some(id) => id,
            None => {
                let id = cx.threads_mut().issue();
                self.id = Some(id);
                id
            }
        };
        if !cx.is_alive(id) {
            tracing::trace!(thread = %self.name, "cancelled");
            self.abandon(cx);
            return Ok(());
        }

        cx.depth += 1;
        let res = self.step_body(cx);
        cx.depth -= 1;
        res
    }

    fn step_body(&mut self, cx: &mut FlowCtx<'_>) -> FlowResult<()> {
        let mark = cx.spawned.len();
        let res = self.runner.resume(cx);
        let spawned = cx.spawned.split_off(mark);
        self.steps += 1;

        match res {
            Err(e) => {
                release(spawned, cx);
                self.abandon(cx);
                return Err(e.in_thread(&self.name));
            }
            Ok(Step::Done) => {
                tracing::trace!(thread = %self.name, steps = self.steps, "finished");
                release(spawned, cx);
                self.abandon(cx);
                return Ok(());
            }
            Ok(Step::Yield) => {}
        }

        self.children.extend(spawned);
        for child in &mut self.children {
            child.step(cx)?;
        }
        self.children.retain(Thread::is_alive);
        Ok(())
    }

    /// Stop the thread and every descendant without running them again.
    fn abandon(&mut self, cx: &mut FlowCtx<'_>) {
        self.alive = false;
        if let Some(id) = self.id {
            cx.threads_mut().end(id);
        }
        release(std::mem::take(&mut self.children), cx);
    }
}

fn release(threads: Vec<Thread>, cx: &mut FlowCtx<'_>) {
    for mut thread in threads {
        thread.abandon(cx);
    }
}

impl std::fmt::Debug for Thread {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Thread")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("alive", &self.alive)
            .field("steps", &self.steps)
            .field("children", &self.children.len())
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/threading/thread.rs"]
mod tests;
