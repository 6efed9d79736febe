//! frameflow is a cooperative task scheduler and frame-clock time model for animation.
//!
//! Scenes describe time-varying state as [`Task`]s. A [`Driver`] owns the project clock and, on
//! every tick, resumes each root [`Thread`] exactly once before moving the clock forward by one
//! frame. Tasks compose through [`all`], [`any`], [`chain`], [`sequence`], [`loop_n`] and the
//! other flow combinators, and synchronize with named time events through [`wait_until`].
//!
//! The same driver backs real-time playback ([`Player`]) and as-fast-as-possible export
//! ([`export()`] into a [`FrameSink`]), so both observe the same frames.
#![forbid(unsafe_code)]

mod foundation;

pub(crate) mod events;
pub(crate) mod export;
pub(crate) mod flow;
pub(crate) mod player;
/// The scene authoring seam.
pub mod scene;
pub(crate) mod threading;


pub use crate::foundation::core::{
    Fps, FrameIndex, FrameRange, frames_to_seconds, seconds_to_frames,
};
pub use crate::foundation::error::{FlowError, FlowResult};

pub use crate::threading::action::Action;
pub use crate::threading::context::FlowCtx;
pub use crate::threading::join::{Join, JoinMode, JoinThreads, all, any, join, join_any};
pub use crate::threading::task::{BoxTask, FnTask, Named, Step, Task, TaskExt, from_fn};
pub use crate::threading::thread::{Thread, ThreadId};

pub use crate::flow::chain::{Chain, chain};
pub use crate::flow::every::{EveryRunner, EverySync, EveryTimer, every};
pub use crate::flow::looping::{Loop, loop_forever, loop_n};
pub use crate::flow::noop::{Noop, noop};
pub use crate::flow::scheduling::{
    WaitFor, WaitUntil, delay, wait_for, wait_for_then, wait_until, wait_until_then,
};
pub use crate::flow::sequence::{Sequence, sequence};
pub use crate::flow::tween::{Tween, tween};

pub use crate::events::registry::{SavedTimeEvent, TimeEvent, TimeEventRegistry};

pub use crate::export::exporter::{ExportOpts, ExportStats, export};
pub use crate::export::sink::{FrameSink, InMemorySink, JsonLinesSink, SinkConfig};
pub use crate::player::driver::{Driver, DriverOpts, DriverState};
pub use crate::player::playback::{Player, PlayerState, PlayerTick};
pub use crate::player::project::{Project, ProjectSettings};
pub use crate::scene::{FnScene, Scene};
