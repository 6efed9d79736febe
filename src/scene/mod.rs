//! The authoring seam between scene code and the scheduler.

use std::cell::RefCell;
use std::marker::PhantomData;
use std::rc::Rc;

use crate::foundation::core::FrameIndex;
use crate::threading::task::BoxTask;

/// A scene instantiates root tasks and exposes the state they animate.
///
/// The driver calls [`Scene::reset`] and then [`Scene::threads`] at the start of every pass, so
/// both must rebuild everything a pass depends on. Anything left over from a previous pass breaks
/// deterministic replay.
pub trait Scene {
    /// Snapshot produced for each ticked frame.
    type Frame;

    fn name(&self) -> &str;

    /// Restore the initial state before a new pass.
    fn reset(&mut self) {}

    /// Root tasks of a fresh pass, in the order they are stepped.
    fn threads(&mut self) -> Vec<BoxTask>;

    /// Sample the state after `frame` was ticked.
    fn sample(&self, frame: FrameIndex) -> Self::Frame;
}

/// Closure-built [`Scene`] over shared state `S`.
///
/// `init` builds the state for every pass, `threads` receives a handle to it to capture into
/// tasks, and `sample` turns it into a frame.
pub struct FnScene<S, I, T, P, F> {
    name: String,
    state: Rc<RefCell<S>>,
    init: I,
    threads: T,
    sample: P,
    _frame: PhantomData<fn() -> F>,
}

impl<S, I, T, P, F> FnScene<S, I, T, P, F>
where
    I: Fn() -> S,
    T: FnMut(&Rc<RefCell<S>>) -> Vec<BoxTask>,
    P: Fn(&S, FrameIndex) -> F,
{
    pub fn new(name: impl Into<String>, init: I, threads: T, sample: P) -> Self {
        let state = Rc::new(RefCell::new(init()));
        Self {
            name: name.into(),
            state,
            init,
            threads,
            sample,
            _frame: PhantomData,
        }
    }

    /// Shared handle to the scene state.
    pub fn state(&self) -> Rc<RefCell<S>> {
        self.state.clone()
    }
}

impl<S, I, T, P, F> Scene for FnScene<S, I, T, P, F>
where
    I: Fn() -> S,
    T: FnMut(&Rc<RefCell<S>>) -> Vec<BoxTask>,
    P: Fn(&S, FrameIndex) -> F,
{
    type Frame = F;

    fn name(&self) -> &str {
        &self.name
    }

    fn reset(&mut self) {
        *self.state.borrow_mut() = (self.init)();
    }

    fn threads(&mut self) -> Vec<BoxTask> {
        (self.threads)(&self.state)
    }

    fn sample(&self, frame: FrameIndex) -> F {
        (self.sample)(&self.state.borrow(), frame)
    }
}
