use std::collections::HashMap;

use glam::Mat4;

use super::id::{Bone, BoneId};
use crate::error::{Result, SkinningError};

/// Name-to-ID table for a skeleton plus the flat bone transform array.
///
/// Registration is a closed phase: once [`seal`](Self::seal) is called the
/// ID space is fixed and the transform array is allocated to match it.
#[derive(Debug, Clone, Default)]
pub struct SkeletonRegistry {
    /// Bones indexed by `BoneId`
    bones: Vec<Bone>,
    index_of: HashMap<String, BoneId>,
    /// One skinning matrix per bone, handed to the renderer
    bone_transforms: Vec<Mat4>,
    sealed: bool,
}

impl SkeletonRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a bone, returning its ID.
    ///
    /// Registering a known name returns the existing ID and keeps the offset
    /// matrix recorded the first time.
    pub fn register_bone(&mut self, name: &str, offset_matrix: Mat4) -> Result<BoneId> {
        if let Some(&id) = self.index_of.get(name) {
            return Ok(id);
        }
        if self.sealed {
            return Err(SkinningError::RegistrySealed {
                name: name.to_string(),
            });
        }

        let id = BoneId(self.bones.len() as u32);
        self.bones.push(Bone::new(name, id, offset_matrix));
        self.index_of.insert(name.to_string(), id);
        Ok(id)
    }

    /// Close registration and size the transform array to the bone count
    pub fn seal(&mut self) {
        if self.sealed {
            return;
        }
        self.sealed = true;
        self.bone_transforms = vec![Mat4::IDENTITY; self.bones.len()];
        log::info!(
            "Skeleton sealed: bone transforms sized to {} elements",
            self.bone_transforms.len()
        );
    }

    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    pub fn bone_count(&self) -> usize {
        self.bones.len()
    }

    pub fn find_bone(&self, name: &str) -> Option<&Bone> {
        self.bone_id(name).map(|id| &self.bones[id.index()])
    }

    pub fn bone_id(&self, name: &str) -> Option<BoneId> {
        self.index_of.get(name).copied()
    }

    pub fn bone(&self, id: BoneId) -> Option<&Bone> {
        self.bones.get(id.index())
    }

    /// Bones in ID order
    pub fn bones(&self) -> impl Iterator<Item = &Bone> {
        self.bones.iter()
    }

    /// Flat skinning matrices indexed by `BoneId`; empty until sealed
    pub fn bone_transforms(&self) -> &[Mat4] {
        &self.bone_transforms
    }

    /// Store a bone's skinning matrix in both the bone and the flat array.
    ///
    /// An ID outside the transform array is a registry/array desync; the
    /// array is left untouched and the caller decides how loudly to fail.
    pub fn set_final_transform(&mut self, id: BoneId, transform: Mat4) -> Result<()> {
        let len = self.bone_transforms.len();
        let slot = self
            .bone_transforms
            .get_mut(id.index())
            .ok_or(SkinningError::BoneIndexOutOfBounds { id: id.0, len })?;
        *slot = transform;

        if let Some(bone) = self.bones.get_mut(id.index()) {
            bone.final_transformation = transform;
        }
        Ok(())
    }

    /// Set every bone to its own offset matrix (bind pose)
    pub fn reset_to_bind_pose(&mut self) {
        for (slot, bone) in self.bone_transforms.iter_mut().zip(self.bones.iter_mut()) {
            *slot = bone.offset_matrix;
            bone.final_transformation = bone.offset_matrix;
        }
    }

    /// Set every bone to identity
    pub fn reset_to_identity(&mut self) {
        for (slot, bone) in self.bone_transforms.iter_mut().zip(self.bones.iter_mut()) {
            *slot = Mat4::IDENTITY;
            bone.final_transformation = Mat4::IDENTITY;
        }
    }

    /// Check the bone count against the renderer's uniform capacity
    pub fn validate_capacity(&self, max_bones: usize) -> Result<()> {
        if self.bones.len() > max_bones {
            return Err(SkinningError::TooManyBones {
                count: self.bones.len(),
                max: max_bones,
            });
        }
        Ok(())
    }
}
