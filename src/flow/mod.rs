//! Combinators expressing common animation timing patterns on top of [`crate::Task`].

pub(crate) mod chain;
pub(crate) mod every;
pub(crate) mod looping;
pub(crate) mod noop;
pub(crate) mod scheduling;
pub(crate) mod sequence;
pub(crate) mod tween;
