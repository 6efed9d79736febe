use std::collections::BTreeMap;

use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::FlowResult;

/// Runtime state of one named time event.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct TimeEvent {
    /// Event name, unique within a project.
    pub name: String,
    /// Frame at which the event was last registered (where `wait_until` started waiting).
    pub initial_frame: FrameIndex,
    /// Frame at which the event fires.
    pub target_frame: FrameIndex,
    /// Distance from `initial_frame` to `target_frame`, in frames.
    pub offset: u64,
}

/// Persisted form of a time event, as written by timeline tooling.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SavedTimeEvent {
    /// Event name.
    pub name: String,
    /// Target time in seconds from the start of the project.
    pub target_time: f64,
}

/// Mapping from event names to the frames at which they fire.
///
/// Entries are created lazily by [`register`](Self::register) and persist for the whole
/// session. Timeline tooling edits them between passes with [`set_offset`](Self::set_offset),
/// [`set_target`](Self::set_target) or [`load`](Self::load).
#[derive(Debug)]
pub struct TimeEventRegistry {
    lookup: BTreeMap<String, TimeEvent>,
    preserve_timing: bool,
    revision: u64,
}

impl Default for TimeEventRegistry {
    fn default() -> Self {
        Self {
            lookup: BTreeMap::new(),
            preserve_timing: true,
            revision: 0,
        }
    }
}

impl TimeEventRegistry {
    /// Empty registry preserving target frames across re-registration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `name` as reached at frame `now` and return the frame at which it fires.
    ///
    /// The first registration schedules the event at `now`. Later registrations move the
    /// initial frame to `now`; with timing preserved the target stays put and the offset
    /// absorbs the change, otherwise the offset stays put and the target moves.
    pub fn register(&mut self, name: &str, now: FrameIndex) -> FrameIndex {
        let Some(event) = self.lookup.get_mut(name) else {
            tracing::debug!(event = name, frame = now.0, "registered time event");
            self.lookup.insert(
                name.to_owned(),
                TimeEvent {
                    name: name.to_owned(),
                    initial_frame: now,
                    target_frame: now,
                    offset: 0,
                },
            );
            self.revision += 1;
            return now;
        };

        let mut changed = false;
        if event.initial_frame != now {
            event.initial_frame = now;
            changed = true;
        }
        if self.preserve_timing {
            let offset = event.target_frame.0.saturating_sub(event.initial_frame.0);
            if event.offset != offset {
                event.offset = offset;
                changed = true;
            }
        } else {
            let target = FrameIndex(event.initial_frame.0.saturating_add(event.offset));
            if event.target_frame != target {
                event.target_frame = target;
                changed = true;
            }
        }
        if changed {
            self.revision += 1;
        }
        event.target_frame
    }

    /// Look up an event.
    pub fn get(&self, name: &str) -> Option<&TimeEvent> {
        self.lookup.get(name)
    }

    /// Events ordered by name.
    pub fn iter(&self) -> impl Iterator<Item = &TimeEvent> {
        self.lookup.values()
    }

    /// Number of known events.
    pub fn len(&self) -> usize {
        self.lookup.len()
    }

    /// `true` when no event is known.
    pub fn is_empty(&self) -> bool {
        self.lookup.is_empty()
    }

    /// Move an existing event to `initial_frame + offset`.
    ///
    /// `preserve` becomes the registry's timing policy for the next pass. Returns `false` when
    /// the event is unknown or already at that offset.
    pub fn set_offset(&mut self, name: &str, offset: u64, preserve: bool) -> bool {
        let Some(event) = self.lookup.get_mut(name) else {
            return false;
        };
        if event.offset == offset {
            return false;
        }
        self.preserve_timing = preserve;
        event.offset = offset;
        event.target_frame = FrameIndex(event.initial_frame.0.saturating_add(offset));
        self.revision += 1;
        tracing::debug!(event = name, offset, target = event.target_frame.0, "moved time event");
        true
    }

    /// Schedule `name` at an absolute frame, creating it when unknown.
    pub fn set_target(&mut self, name: &str, target: FrameIndex) {
        let event = self
            .lookup
            .entry(name.to_owned())
            .or_insert_with(|| TimeEvent {
                name: name.to_owned(),
                initial_frame: FrameIndex(0),
                target_frame: target,
                offset: 0,
            });
        event.target_frame = target;
        event.offset = target.0.saturating_sub(event.initial_frame.0);
        self.revision += 1;
    }

    /// Whether re-registration keeps targets (`true`) or offsets (`false`) stable.
    pub fn preserve_timing(&self) -> bool {
        self.preserve_timing
    }

    /// Set the re-registration policy, see [`preserve_timing`](Self::preserve_timing).
    pub fn set_preserve_timing(&mut self, preserve: bool) {
        self.preserve_timing = preserve;
    }

    /// Monotonic counter bumped on every observable change.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Replace the registry content with saved events.
    ///
    /// Events already known keep their initial frame and offset; only their targets are
    /// taken from `saved`. Events missing from `saved` are dropped.
    pub fn load(&mut self, saved: &[SavedTimeEvent], fps: Fps) {
        let mut previous = std::mem::take(&mut self.lookup);
        for s in saved {
            let frames = fps.seconds_to_frames(s.target_time).max(0) as u64;
            let mut event = previous.remove(&s.name).unwrap_or_else(|| TimeEvent {
                name: s.name.clone(),
                initial_frame: FrameIndex(0),
                target_frame: FrameIndex(0),
                offset: 0,
            });
            event.target_frame = FrameIndex(frames);
            self.lookup.insert(s.name.clone(), event);
        }
        self.revision += 1;
    }

    /// Saved form of every event, ordered by name.
    pub fn to_saved(&self, fps: Fps) -> Vec<SavedTimeEvent> {
        self.lookup
            .values()
            .map(|e| SavedTimeEvent {
                name: e.name.clone(),
                target_time: fps.frames_to_seconds(e.target_frame.as_i64()),
            })
            .collect()
    }

    /// Load saved events from a JSON array.
    pub fn load_json(&mut self, json: &str, fps: Fps) -> FlowResult<()> {
        let saved: Vec<SavedTimeEvent> = serde_json::from_str(json)?;
        self.load(&saved, fps);
        Ok(())
    }

    /// Serialize the saved form as a JSON array.
    pub fn to_json(&self, fps: Fps) -> FlowResult<String> {
        Ok(serde_json::to_string_pretty(&self.to_saved(fps))?)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/events/registry.rs"]
mod tests;
