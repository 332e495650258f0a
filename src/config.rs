//! Per-model skinning configuration.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::skeleton_constants::{DEFAULT_TICKS_PER_SECOND, MAX_BONE_UNIFORMS, WEIGHT_EPSILON};

/// Tunables for loading and playing back an animated model.
///
/// Every field is optional in JSON; missing fields take the defaults below.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SkinningConfig {
    /// Capacity of the renderer's bone uniform array
    pub max_bones: usize,
    /// Ticks per second substituted when a clip reports zero
    pub default_ticks_per_second: f32,
    /// Threshold for the "vertex has any bone influence" test
    pub weight_epsilon: f32,
    /// Index of the clip that drives playback
    pub active_clip: usize,
}

impl Default for SkinningConfig {
    fn default() -> Self {
        Self {
            max_bones: MAX_BONE_UNIFORMS,
            default_ticks_per_second: DEFAULT_TICKS_PER_SECOND,
            weight_epsilon: WEIGHT_EPSILON,
            active_clip: 0,
        }
    }
}

impl SkinningConfig {
    /// Parse from JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
