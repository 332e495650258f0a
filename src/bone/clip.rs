use std::collections::HashMap;

use glam::{Quat, Vec3};

use crate::error::Result;
use crate::import::{QuatKey, RawAnimation, RawChannel, VectorKey};

// ============================================================================
// Keyframe storage
// ============================================================================

/// A timestamped channel value. Time is in clip ticks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keyframe<T> {
    pub time: f32,
    pub value: T,
}

impl From<&VectorKey> for Keyframe<Vec3> {
    fn from(key: &VectorKey) -> Self {
        Self {
            time: key.time,
            value: Vec3::from_array(key.value),
        }
    }
}

impl From<&QuatKey> for Keyframe<Quat> {
    fn from(key: &QuatKey) -> Self {
        let [x, y, z, w] = key.value;
        Self {
            time: key.time,
            value: Quat::from_xyzw(x, y, z, w),
        }
    }
}

/// Per-bone keyframes. The three channels are sized and timed independently;
/// an empty channel means "identity" for that component.
#[derive(Debug, Clone, Default)]
pub struct BoneTracks {
    pub positions: Vec<Keyframe<Vec3>>,
    pub rotations: Vec<Keyframe<Quat>>,
    pub scales: Vec<Keyframe<Vec3>>,
}

impl BoneTracks {
    /// Copy keys out of an imported channel as-is. Times are not checked for
    /// monotonicity here; sampling tolerates malformed tracks.
    pub fn from_channel(channel: &RawChannel) -> Self {
        Self {
            positions: channel.position_keys.iter().map(Keyframe::from).collect(),
            rotations: channel.rotation_keys.iter().map(Keyframe::from).collect(),
            scales: channel.scaling_keys.iter().map(Keyframe::from).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty() && self.rotations.is_empty() && self.scales.is_empty()
    }
}

// ============================================================================
// Animation clip
// ============================================================================

/// An imported animation clip, immutable after load
#[derive(Debug, Clone)]
pub struct AnimationClip {
    pub name: String,
    /// Length in ticks
    pub duration: f32,
    pub ticks_per_second: f32,
    tracks: Vec<BoneTracks>,
    /// Bone name to index into `tracks`
    track_index: HashMap<String, usize>,
}

impl AnimationClip {
    /// Build from importer data. A zero tick rate is replaced by
    /// `default_ticks_per_second`.
    pub fn from_raw(raw: &RawAnimation, default_ticks_per_second: f32) -> Self {
        let ticks_per_second = if raw.ticks_per_second != 0.0 {
            raw.ticks_per_second
        } else {
            default_ticks_per_second
        };

        let mut tracks = Vec::with_capacity(raw.channels.len());
        let mut track_index = HashMap::with_capacity(raw.channels.len());

        for channel in &raw.channels {
            let bone_tracks = BoneTracks::from_channel(channel);
            // A repeated channel name replaces the earlier one
            match track_index.get(&channel.node_name) {
                Some(&existing) => tracks[existing] = bone_tracks,
                None => {
                    track_index.insert(channel.node_name.clone(), tracks.len());
                    tracks.push(bone_tracks);
                }
            }
        }

        Self {
            name: raw.name.clone(),
            duration: raw.duration,
            ticks_per_second,
            tracks,
            track_index,
        }
    }

    /// Parse a single clip from JSON string
    pub fn from_json(json: &str, default_ticks_per_second: f32) -> Result<Self> {
        let raw: RawAnimation = serde_json::from_str(json)?;
        Ok(Self::from_raw(&raw, default_ticks_per_second))
    }

    /// Index of the track set for a bone name, resolved once at load time
    pub fn track_index(&self, bone_name: &str) -> Option<usize> {
        self.track_index.get(bone_name).copied()
    }

    pub fn track(&self, index: usize) -> Option<&BoneTracks> {
        self.tracks.get(index)
    }

    pub fn tracks_for(&self, bone_name: &str) -> Option<&BoneTracks> {
        self.track_index(bone_name).and_then(|i| self.track(i))
    }

    pub fn track_count(&self) -> usize {
        self.tracks.len()
    }

    /// Playable clips have a positive length
    pub fn is_playable(&self) -> bool {
        self.duration > 0.0
    }
}
