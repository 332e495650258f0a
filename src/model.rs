//! Animated model: owns one skeleton, its clips and its meshes.
//!
//! Loading is the write phase: bones are registered from every mesh, the
//! registry is sealed, and all name lookups are resolved. After that only
//! the playback clock and the bone transforms change.

use std::path::Path;

use glam::{Mat4, Vec3};

use crate::animation::{AnimationLibrary, PlaybackState};
use crate::bone::{evaluate_pose, ActiveClip, NodeBindings, SkeletonRegistry};
use crate::config::SkinningConfig;
use crate::error::{Result, SkinningError};
use crate::import::SceneData;
use crate::math::mat4_from_rows;
use crate::scene::NodeTree;
use crate::skin::{model_center, MeshBuffers};
use crate::uniforms::BoneUniforms;

/// A loaded, animatable model. Each instance is fully independent.
#[derive(Debug, Clone)]
pub struct AnimatedModel {
    config: SkinningConfig,
    registry: SkeletonRegistry,
    tree: NodeTree,
    bindings: NodeBindings,
    library: AnimationLibrary,
    playback: PlaybackState,
    meshes: Vec<MeshBuffers>,
    model_center: Vec3,
    global_inverse: Mat4,
}

impl AnimatedModel {
    /// Build a model from importer output.
    ///
    /// A missing root or an incomplete scene aborts. Mesh-level problems are
    /// logged and the affected mesh is left out.
    pub fn load(scene: &SceneData, config: SkinningConfig) -> Result<Self> {
        if scene.incomplete {
            return Err(SkinningError::IncompleteScene);
        }
        let root = scene.root.as_ref().ok_or(SkinningError::MissingRootNode)?;

        let mut registry = SkeletonRegistry::new();
        for mesh in &scene.meshes {
            for bone in &mesh.bones {
                registry.register_bone(&bone.name, mat4_from_rows(&bone.offset_matrix))?;
            }
        }
        registry.seal();

        if let Err(e) = registry.validate_capacity(config.max_bones) {
            log::warn!("{}; the renderer will not be able to draw this skeleton", e);
        }

        let tree = NodeTree::from_desc(root);

        let mut meshes = Vec::new();
        for (_, node) in tree.depth_first() {
            for &mesh_index in &node.meshes {
                let Some(mesh) = scene.meshes.get(mesh_index) else {
                    log::warn!(
                        "Node '{}' references mesh {} of {}, skipping",
                        node.name,
                        mesh_index,
                        scene.meshes.len()
                    );
                    continue;
                };
                match MeshBuffers::from_mesh(mesh, &registry, scene.directory.as_deref()) {
                    Ok(buffers) => meshes.push(buffers),
                    Err(e) => log::warn!("Skipping mesh on node '{}': {}", node.name, e),
                }
            }
        }

        let mut library = AnimationLibrary::new();
        for raw in &scene.animations {
            library.add_clip(raw, config.default_ticks_per_second);
        }
        if library.is_empty() {
            log::debug!("No animation clips, model renders in bind pose");
        } else if library.clip(config.active_clip).is_none() {
            log::warn!(
                "Active clip {} not found among {} clips, model renders in bind pose",
                config.active_clip,
                library.len()
            );
        } else {
            log::debug!(
                "Playing clip {} of {}: {:?}",
                config.active_clip,
                library.len(),
                library.names().nth(config.active_clip)
            );
        }

        let bindings = NodeBindings::resolve(&tree, &registry, library.clips());
        let model_center = model_center(&scene.meshes);
        let global_inverse = tree.global_inverse_transform();

        log::info!(
            "Loaded model: {} nodes, {} meshes, {} bones ({} bound to nodes), {} clips, center {:?}",
            tree.len(),
            meshes.len(),
            registry.bone_count(),
            bindings.bound_bone_count(),
            library.len(),
            model_center
        );

        Ok(Self {
            config,
            registry,
            tree,
            bindings,
            library,
            playback: PlaybackState::default(),
            meshes,
            model_center,
            global_inverse,
        })
    }

    /// Parse an importer JSON scene and load it
    pub fn from_json(json: &str, config: SkinningConfig) -> Result<Self> {
        let scene = SceneData::from_json(json)?;
        Self::load(&scene, config)
    }

    /// Read a JSON scene file and load it; textures resolve against the
    /// file's directory
    pub fn from_json_file(path: &Path, config: SkinningConfig) -> Result<Self> {
        let scene = SceneData::from_json_file(path)?;
        Self::load(&scene, config)
    }

    /// Advance playback and rebuild every bone transform.
    ///
    /// Without an active clip the skeleton is put in bind pose; a clip with
    /// no length yields identity for every bone.
    pub fn update_animation(&mut self, delta_seconds: f32) {
        let index = self.config.active_clip;
        let Some(clip) = self.library.clip(index) else {
            self.registry.reset_to_bind_pose();
            return;
        };

        if !clip.is_playable() {
            self.playback = self.playback.reset();
            self.registry.reset_to_identity();
            return;
        }

        self.playback = self.playback.advance(delta_seconds, clip);
        let active = ActiveClip {
            index,
            clip,
            time: self.playback.time,
        };
        let stats = evaluate_pose(&self.tree, &self.bindings, Some(active), &mut self.registry);
        log::trace!(
            "Pose at tick {:.3}: {} bones written",
            self.playback.time,
            stats.written
        );
    }

    /// Skinning matrices indexed by bone ID
    pub fn bone_transforms(&self) -> &[Mat4] {
        self.registry.bone_transforms()
    }

    /// Current playback time in ticks
    pub fn animation_time(&self) -> f32 {
        self.playback.time
    }

    pub fn registry(&self) -> &SkeletonRegistry {
        &self.registry
    }

    pub fn tree(&self) -> &NodeTree {
        &self.tree
    }

    pub fn meshes(&self) -> &[MeshBuffers] {
        &self.meshes
    }

    pub fn library(&self) -> &AnimationLibrary {
        &self.library
    }

    pub fn config(&self) -> &SkinningConfig {
        &self.config
    }

    pub fn model_center(&self) -> Vec3 {
        self.model_center
    }

    /// Inverse of the root's bind transform. Not applied to bone matrices.
    pub fn global_inverse_transform(&self) -> Mat4 {
        self.global_inverse
    }

    /// Current bone transforms packed for upload
    pub fn bone_uniforms(&self) -> Result<BoneUniforms> {
        BoneUniforms::from_transforms(self.bone_transforms())
    }
}
