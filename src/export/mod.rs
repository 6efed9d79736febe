//! Exporting: drive a scene frame by frame into a [`sink::FrameSink`].

pub(crate) mod exporter;
pub(crate) mod sink;
