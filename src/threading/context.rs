use std::collections::BTreeSet;

use crate::events::registry::TimeEventRegistry;
use crate::foundation::core::{Fps, FrameIndex};
use crate::threading::task::Task;
use crate::threading::thread::{Thread, ThreadId};

/// Per-project bookkeeping of issued thread ids and the ones that ended.
#[derive(Debug, Default)]
pub(crate) struct ThreadTable {
    issued: u64,
    ended: BTreeSet<ThreadId>,
}

impl ThreadTable {
    pub(crate) fn issue(&mut self) -> ThreadId {
        let id = ThreadId(self.issued);
        self.issued += 1;
        id
    }

    pub(crate) fn is_alive(&self, id: ThreadId) -> bool {
        id.0 < self.issued && !self.ended.contains(&id)
    }

    /// Mark `id` as ended. Returns `true` when it was alive before.
    pub(crate) fn end(&mut self, id: ThreadId) -> bool {
        id.0 < self.issued && self.ended.insert(id)
    }

    pub(crate) fn clear(&mut self) {
        self.issued = 0;
        self.ended.clear();
    }
}

/// Scoped handle handed to every [`Task::resume`] call.
///
/// It is the only way a task body observes the project: the clock, the frame rate, the
/// time-event registry and the threads spawned from the current thread. A context lives for
/// exactly one driver tick and is never shared across sessions.
pub struct FlowCtx<'a> {
    frame: FrameIndex,
    fps: Fps,
    events: &'a mut TimeEventRegistry,
    threads: &'a mut ThreadTable,
    pub(crate) spawned: Vec<Thread>,
    pub(crate) depth: usize,
    groups: usize,
}

impl<'a> FlowCtx<'a> {
    pub(crate) fn new(
        frame: FrameIndex,
        fps: Fps,
        events: &'a mut TimeEventRegistry,
        threads: &'a mut ThreadTable,
    ) -> Self {
        Self {
            frame,
            fps,
            events,
            threads,
            spawned: Vec::new(),
            depth: 0,
            groups: 0,
        }
    }

    /// Frame currently being ticked.
    pub fn frame(&self) -> FrameIndex {
        self.frame
    }

    /// Project frame rate.
    pub fn fps(&self) -> Fps {
        self.fps
    }

    /// Current time in seconds.
    pub fn time(&self) -> f64 {
        self.fps.frames_to_seconds(self.frame.as_i64())
    }

    /// Convert seconds to frames at the project frame rate.
    pub fn seconds_to_frames(&self, seconds: f64) -> i64 {
        self.fps.seconds_to_frames(seconds)
    }

    /// Convert frames to seconds at the project frame rate.
    pub fn frames_to_seconds(&self, frames: i64) -> f64 {
        self.fps.frames_to_seconds(frames)
    }

    /// Read access to the time-event registry.
    pub fn events(&self) -> &TimeEventRegistry {
        self.events
    }

    /// Register `name` at the current frame and return its target frame.
    pub fn register_event(&mut self, name: &str) -> FrameIndex {
        self.events.register(name, self.frame)
    }

    /// `true` while a root thread body is being resumed directly, outside spawned children
    /// and outside the members of a join or sequence.
    pub fn in_root_thread(&self) -> bool {
        self.depth <= 1 && self.groups == 0
    }

    /// Run `f` with the context marked as inside a group of concurrent members.
    pub(crate) fn in_group<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        self.groups += 1;
        let res = f(self);
        self.groups -= 1;
        res
    }

    /// Spawn `task` as a child of the thread currently being stepped.
    ///
    /// The child is first stepped in this same tick, right after the spawning body yields.
    /// It is cancelled when the spawning thread finishes.
    pub fn spawn(&mut self, task: impl Task + 'static) -> ThreadId {
        let id = self.threads.issue();
        let thread = Thread::with_id(id, Box::new(task));
        tracing::trace!(thread = thread.name(), id = id.0, "spawn");
        self.spawned.push(thread);
        id
    }

    /// Stop driving the spawned thread `id`. Its state is abandoned, no cleanup runs.
    ///
    /// Returns `false` when the thread already ended.
    pub fn cancel(&mut self, id: ThreadId) -> bool {
        let was_alive = self.threads.end(id);
        if was_alive {
            tracing::trace!(id = id.0, "cancel");
        }
        was_alive
    }

    /// Whether the thread `id` is still being driven.
    pub fn is_alive(&self, id: ThreadId) -> bool {
        self.threads.is_alive(id)
    }

    pub(crate) fn threads_mut(&mut self) -> &mut ThreadTable {
        self.threads
    }
}
