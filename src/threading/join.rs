use crate::foundation::error::FlowResult;
use crate::threading::context::FlowCtx;
use crate::threading::task::{BoxTask, Fused, Step, Task};
use crate::threading::thread::ThreadId;

/// Completion rule of a join.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JoinMode {
    /// Complete once every member finished.
    All,
    /// Complete once any member finished.
    Any,
}

/// Group of tasks advanced together, see [`all`] and [`any`].
pub struct Join {
    mode: JoinMode,
    members: Vec<Fused>,
}

/// Run `tasks` concurrently until every one of them finished.
///
/// Each resume advances every unfinished task once, in the given order. Tasks finishing on the
/// same resume are all observed in that resume. An empty group finishes on its first resume.
pub fn all(tasks: impl IntoIterator<Item = BoxTask>) -> Join {
    Join::new(JoinMode::All, tasks)
}

/// Run `tasks` concurrently until one of them finished.
///
/// Each resume advances every unfinished task once, like [`all`], so the outcome does not
/// depend on argument order. Once a task finished the others are abandoned where they stand:
/// they are neither cancelled nor rewound.
pub fn any(tasks: impl IntoIterator<Item = BoxTask>) -> Join {
    Join::new(JoinMode::Any, tasks)
}

impl Join {
    /// Build a join with an explicit mode.
    pub fn new(mode: JoinMode, tasks: impl IntoIterator<Item = BoxTask>) -> Self {
        Self {
            mode,
            members: tasks.into_iter().map(Fused::new).collect(),
        }
    }

    /// Completion rule.
    pub fn mode(&self) -> JoinMode {
        self.mode
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// `true` for an empty group.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl Task for Join {
    fn name(&self) -> &str {
        match self.mode {
            JoinMode::All => "all",
            JoinMode::Any => "any",
        }
    }

    fn resume(&mut self, cx: &mut FlowCtx<'_>) -> FlowResult<Step> {
        let members = &mut self.members;
        cx.in_group(|cx| {
            members
                .iter_mut()
                .filter(|m| !m.is_done())
                .try_for_each(|m| m.resume(cx).map(drop))
        })?;
        let complete = match self.mode {
            JoinMode::All => self.members.iter().all(Fused::is_done),
            JoinMode::Any => self.members.is_empty() || self.members.iter().any(Fused::is_done),
        };
        Ok(if complete { Step::Done } else { Step::Yield })
    }
}

/// Waits on spawned threads, see [`join`] and [`join_any`].
pub struct JoinThreads {
    mode: JoinMode,
    ids: Vec<ThreadId>,
}

/// Block until every spawned thread in `ids` ended.
pub fn join(ids: impl IntoIterator<Item = ThreadId>) -> JoinThreads {
    JoinThreads {
        mode: JoinMode::All,
        ids: ids.into_iter().collect(),
    }
}

/// Block until at least one spawned thread in `ids` ended.
pub fn join_any(ids: impl IntoIterator<Item = ThreadId>) -> JoinThreads {
    JoinThreads {
        mode: JoinMode::Any,
        ids: ids.into_iter().collect(),
    }
}

impl Task for JoinThreads {
    fn name(&self) -> &str {
        "join"
    }

    fn resume(&mut self, cx: &mut FlowCtx<'_>) -> FlowResult<Step> {
        let waiting = match self.mode {
            JoinMode::All => self.ids.iter().any(|&id| cx.is_alive(id)),
            JoinMode::Any => !self.ids.is_empty() && self.ids.iter().all(|&id| cx.is_alive(id)),
        };
        Ok(if waiting { Step::Yield } else { Step::Done })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/threading/join.rs"]
mod tests;
