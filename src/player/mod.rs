//! Session layer: the project clock, the scheduler driver and real-time playback.

pub(crate) mod driver;
pub(crate) mod playback;
pub(crate) mod project;
