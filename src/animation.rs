use crate::bone::AnimationClip;
use crate::import::RawAnimation;

/// Animation library - loaded once, read-only during playback
///
/// Clips are kept in import order. Several may be stored, but only one
/// (selected by index) drives the skeleton at a time.
#[derive(Debug, Clone, Default)]
pub struct AnimationLibrary {
    clips: Vec<AnimationClip>,
}

impl AnimationLibrary {
    /// Create empty animation library
    pub fn new() -> Self {
        Self::default()
    }

    /// Convert and store an imported clip, returning its index
    pub fn add_clip(&mut self, raw: &RawAnimation, default_ticks_per_second: f32) -> usize {
        self.push(AnimationClip::from_raw(raw, default_ticks_per_second))
    }

    /// Store an already-built clip, returning its index
    pub fn push(&mut self, clip: AnimationClip) -> usize {
        self.clips.push(clip);
        self.clips.len() - 1
    }

    pub fn clip(&self, index: usize) -> Option<&AnimationClip> {
        self.clips.get(index)
    }

    pub fn clips(&self) -> &[AnimationClip] {
        &self.clips
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.clips.iter().map(|clip| clip.name.as_str())
    }
}

/// Playback cursor for the active clip
///
/// A single looping clock with no terminal state.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PlaybackState {
    /// Current time in ticks, kept within `[0, duration)`
    pub time: f32,
}

impl PlaybackState {
    /// Advance by `delta_seconds` of wall time and wrap into the clip.
    ///
    /// A clip without a positive duration cannot be played; time stays at 0.
    pub fn advance(self, delta_seconds: f32, clip: &AnimationClip) -> PlaybackState {
        if !clip.is_playable() {
            return PlaybackState { time: 0.0 };
        }

        let mut time = (self.time + delta_seconds * clip.ticks_per_second).rem_euclid(clip.duration);
        // rem_euclid can round up to the divisor itself
        if !time.is_finite() || time >= clip.duration {
            time = 0.0;
        }
        PlaybackState { time }
    }

    /// Back to the start of the clip
    pub fn reset(self) -> PlaybackState {
        PlaybackState { time: 0.0 }
    }
}
