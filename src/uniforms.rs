//! Renderer contract: the bone matrix uniform block and a CPU reference of
//! the vertex shader's skinning blend.

use glam::{Mat4, Vec3, Vec4};

use crate::error::{Result, SkinningError};
use crate::math::Mat4Extended;
use crate::skeleton_constants::MAX_BONE_UNIFORMS;
use crate::skin::VertexSkinData;

/// `uniform mat4 bones[MAX_BONE_UNIFORMS]`, column-major
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct BoneUniforms {
    pub matrices: [[f32; 16]; MAX_BONE_UNIFORMS],
}

static_assertions::const_assert_eq!(
    std::mem::size_of::<BoneUniforms>(),
    MAX_BONE_UNIFORMS * 64
);

impl BoneUniforms {
    /// Pack bone transforms; slots past the skeleton stay identity.
    ///
    /// Exceeding the uniform capacity is undefined on the GPU side, so it is
    /// rejected here.
    pub fn from_transforms(transforms: &[Mat4]) -> Result<Self> {
        if transforms.len() > MAX_BONE_UNIFORMS {
            return Err(SkinningError::TooManyBones {
                count: transforms.len(),
                max: MAX_BONE_UNIFORMS,
            });
        }

        let mut matrices = [Mat4::IDENTITY.to_uniform(); MAX_BONE_UNIFORMS];
        for (slot, transform) in matrices.iter_mut().zip(transforms) {
            *slot = transform.to_uniform();
        }
        Ok(Self { matrices })
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }
}

/// Skin one position the way the vertex shader does.
///
/// `sum(bones[id] * weight)` over the used slots, applied to the position.
/// Vertices whose `dot(weights, weights) <= eps` are passed through
/// unchanged. Slots with a negative or out-of-range ID contribute nothing.
pub fn skin_position(position: Vec3, skin: &VertexSkinData, bone_transforms: &[Mat4], eps: f32) -> Vec3 {
    if !skin.is_influenced(eps) {
        return position;
    }

    let mut blended = Mat4::ZERO;
    for (&id, &weight) in skin.bone_ids.iter().zip(&skin.weights) {
        let Ok(index) = usize::try_from(id) else {
            continue;
        };
        if let Some(bone) = bone_transforms.get(index) {
            blended += *bone * weight;
        }
    }

    let p = blended * Vec4::from((position, 1.0));
    p.truncate()
}
