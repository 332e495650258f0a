//! Skinning Rig - skeletal animation core
//!
//! Turns an imported skeleton plus keyframed clips into one skinning matrix
//! per bone each frame, and prepares per-vertex bone IDs/weights once at load.
//! Pure data transformation: no rendering API state lives here.

pub mod animation;
pub mod bone;
pub mod config;
pub mod error;
pub mod import;
pub mod math;
pub mod model;
pub mod scene;
pub mod skeleton_constants;
pub mod skin;
pub mod uniforms;

pub use animation::{AnimationLibrary, PlaybackState};
pub use bone::{
    evaluate_pose, resolve_segment, ActiveClip, AnimationClip, Bone, BoneId, BoneTracks,
    Keyframe, NodeBindings, PoseStats, Segment, SkeletonRegistry,
};
pub use config::SkinningConfig;
pub use error::{Result, SkinningError};
pub use import::SceneData;
pub use math::{Mat4, Mat4Extended, Quat, Vec3};
pub use model::AnimatedModel;
pub use scene::{NodeIndex, NodeTree, SceneNode};
pub use skin::{build_vertex_skin_data, MeshBuffers, MeshVertex, VertexSkinData};
pub use uniforms::{skin_position, BoneUniforms};
