//! Cooperative threads: the task contract, the per-tick context, threads and joins.

pub(crate) mod action;
pub(crate) mod context;
pub(crate) mod join;
pub(crate) mod task;
pub(crate) mod thread;
