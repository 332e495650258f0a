//! Shared constants for the skinning pipeline.
//!
//! These values describe the contract between the CPU-side skeleton data and
//! the vertex shader that consumes it, so both sides must agree on them.

/// Maximum number of bones that may influence a single vertex.
///
/// Hard cap: the vertex layout carries exactly four `ivec4`/`vec4` slots.
pub const MAX_BONE_INFLUENCES: usize = 4;

/// Capacity of the `bones[]` uniform array in the skinning shader.
pub const MAX_BONE_UNIFORMS: usize = 100;

/// Ticks per second used when an imported clip reports zero.
pub const DEFAULT_TICKS_PER_SECOND: f32 = 25.0;

/// Bone ID stored in a vertex slot that carries no influence.
pub const UNUSED_BONE_SLOT: i32 = -1;

/// Threshold for the shader's `dot(weights, weights)` guard.
pub const WEIGHT_EPSILON: f32 = 1e-4;
