use crate::foundation::error::{FlowError, FlowResult};

/// Absolute 0-based frame index on the project clock.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

impl FrameIndex {
    /// Signed view used when mixing the clock with converted durations.
    pub fn as_i64(self) -> i64 {
        i64::try_from(self.0).unwrap_or(i64::MAX)
    }

    /// Next frame, saturating.
    pub fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

/// Half-open frame range `[start, end)` on the project clock.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FrameRange {
    /// Inclusive range start.
    pub start: FrameIndex,
    /// Exclusive range end.
    pub end: FrameIndex, // exclusive
}

impl FrameRange {
    /// Create a validated range with `start <= end`.
    pub fn new(start: FrameIndex, end: FrameIndex) -> FlowResult<Self> {
        if start.0 > end.0 {
            return Err(FlowError::validation("FrameRange start must be <= end"));
        }
        Ok(Self { start, end })
    }

    /// Number of frames contained in the range.
    pub fn len_frames(self) -> u64 {
        self.end.0.saturating_sub(self.start.0)
    }

    /// Return `true` when the range has no frames.
    pub fn is_empty(self) -> bool {
        self.start.0 == self.end.0
    }

    /// Return `true` when `f` is inside `[start, end)`.
    pub fn contains(self, f: FrameIndex) -> bool {
        self.start.0 <= f.0 && f.0 < self.end.0
    }
}

/// Frames-per-second represented as a rational `num/den`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    /// Numerator (frames).
    pub num: u32,
    /// Denominator (seconds), must be non-zero.
    pub den: u32, // must be > 0
}

impl Fps {
    /// Create a validated FPS value.
    pub fn new(num: u32, den: u32) -> FlowResult<Self> {
        if den == 0 {
            return Err(FlowError::validation("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(FlowError::validation("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    /// Whole-number frame rate.
    pub fn whole(fps: u32) -> FlowResult<Self> {
        Self::new(fps, 1)
    }

    /// Convert to floating-point FPS.
    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    /// Duration of one frame in seconds.
    pub fn frame_duration_secs(self) -> f64 {
        f64::from(self.den) / f64::from(self.num)
    }

    /// Convert a duration in seconds to a frame count, see [`seconds_to_frames`].
    pub fn seconds_to_frames(self, seconds: f64) -> i64 {
        seconds_to_frames(seconds, self.as_f64())
    }

    /// Convert a frame count to seconds, see [`frames_to_seconds`].
    pub fn frames_to_seconds(self, frames: i64) -> f64 {
        frames_to_seconds(frames, self.as_f64())
    }
}

impl Default for Fps {
    fn default() -> Self {
        Self { num: 30, den: 1 }
    }
}

/// Convert seconds to a whole number of frames.
///
/// Rounds to the nearest frame with ties away from zero, so `0.5s` at `1fps` is one frame and
/// `-0.5s` is minus one. Negative durations are not rejected; callers clamp where it matters.
pub fn seconds_to_frames(seconds: f64, framerate: f64) -> i64 {
    (seconds * framerate).round() as i64
}

/// Convert a frame count back to seconds.
pub fn frames_to_seconds(frames: i64, framerate: f64) -> f64 {
    frames as f64 / framerate
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
