//! Named time events that `wait_until` synchronizes against.

pub(crate) mod registry;
