//! Per-vertex skinning data and GPU-ready mesh buffers.
//!
//! Built once at load time from importer meshes. Bone IDs come from the
//! sealed [`SkeletonRegistry`], so the registry must hold every bone before
//! any mesh is prepared.

use glam::Vec3;
use static_assertions::const_assert_eq;

use crate::bone::SkeletonRegistry;
use crate::error::{Result, SkinningError};
use crate::import::{resolve_texture_path, MeshData, RawBone};
use crate::skeleton_constants::{MAX_BONE_INFLUENCES, UNUSED_BONE_SLOT};

/// Bone IDs and weights for one vertex, index-aligned with the vertex buffer
///
/// Matches the shader's `ivec4 boneIDs` / `vec4 weights` attributes.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct VertexSkinData {
    /// Influencing bone per slot, `-1` for an unused slot
    pub bone_ids: [i32; MAX_BONE_INFLUENCES],
    /// Weight per slot, 0 for an unused slot
    pub weights: [f32; MAX_BONE_INFLUENCES],
}

const_assert_eq!(std::mem::size_of::<VertexSkinData>(), 32);

impl Default for VertexSkinData {
    fn default() -> Self {
        Self {
            bone_ids: [UNUSED_BONE_SLOT; MAX_BONE_INFLUENCES],
            weights: [0.0; MAX_BONE_INFLUENCES],
        }
    }
}

impl VertexSkinData {
    /// Put an influence in the first free slot.
    ///
    /// A slot is free while its weight is exactly 0. Returns `false` when all
    /// slots are taken; the influence is then dropped and existing slots are
    /// left alone.
    pub fn add_influence(&mut self, bone_id: i32, weight: f32) -> bool {
        match self.weights.iter().position(|&w| w == 0.0) {
            Some(slot) => {
                self.bone_ids[slot] = bone_id;
                self.weights[slot] = weight;
                true
            }
            None => false,
        }
    }

    /// Number of slots carrying a nonzero weight
    pub fn influence_count(&self) -> usize {
        self.weights.iter().filter(|&&w| w != 0.0).count()
    }

    /// The renderer's guard: skin only when `dot(weights, weights) > eps`
    pub fn is_influenced(&self, eps: f32) -> bool {
        let w = glam::Vec4::from_array(self.weights);
        w.dot(w) > eps
    }
}

/// Build skin data for `vertex_count` vertices from a mesh's bone list.
///
/// Bones unknown to the registry, zero weights and vertex indices past the
/// end of the mesh are skipped with a warning. A fifth influence on one
/// vertex is dropped.
pub fn build_vertex_skin_data(
    vertex_count: usize,
    bones: &[RawBone],
    registry: &SkeletonRegistry,
) -> Vec<VertexSkinData> {
    let mut skin = vec![VertexSkinData::default(); vertex_count];
    let mut dropped = 0usize;

    for bone in bones {
        let Some(id) = registry.bone_id(&bone.name) else {
            log::warn!("Bone '{}' is not in the skeleton, skipping its weights", bone.name);
            continue;
        };

        for influence in &bone.weights {
            if influence.weight == 0.0 {
                continue;
            }
            let Some(vertex) = skin.get_mut(influence.vertex_id as usize) else {
                let err = SkinningError::VertexOutOfRange {
                    bone: bone.name.clone(),
                    vertex: influence.vertex_id,
                    vertex_count,
                };
                log::warn!("{}", err);
                continue;
            };

            if !vertex.add_influence(id.as_shader_id(), influence.weight) {
                log::debug!(
                    "Vertex {} already has {} influences, dropping bone '{}'",
                    influence.vertex_id,
                    MAX_BONE_INFLUENCES,
                    bone.name
                );
                dropped += 1;
            }
        }
    }

    if dropped > 0 {
        log::warn!(
            "Dropped {} bone influences over the {}-per-vertex limit",
            dropped,
            MAX_BONE_INFLUENCES
        );
    }

    skin
}

/// Static vertex attributes for a skinned mesh
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub tex_coords: [f32; 2],
}

const_assert_eq!(std::mem::size_of::<MeshVertex>(), 32);

/// Vertex, index and skin buffers for one mesh, ready for upload
#[derive(Debug, Clone, Default)]
pub struct MeshBuffers {
    pub name: String,
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
    /// One entry per vertex
    pub skin: Vec<VertexSkinData>,
    /// Diffuse texture path, resolved against the model directory when one
    /// is known. Loading it is the renderer's job.
    pub diffuse_texture: Option<String>,
}

impl MeshBuffers {
    /// Flatten an imported mesh. Attribute counts and face indices are
    /// checked; a mismatch is `InvalidMesh`.
    ///
    /// With a `directory`, a relative texture path is joined onto it.
    pub fn from_mesh(
        mesh: &MeshData,
        registry: &SkeletonRegistry,
        directory: Option<&str>,
    ) -> Result<Self> {
        let vertex_count = mesh.positions.len();

        if !mesh.normals.is_empty() && mesh.normals.len() != vertex_count {
            return Err(SkinningError::InvalidMesh(format!(
                "'{}' has {} normals for {} positions",
                mesh.name,
                mesh.normals.len(),
                vertex_count
            )));
        }
        if let Some(uvs) = &mesh.tex_coords {
            if uvs.len() != vertex_count {
                return Err(SkinningError::InvalidMesh(format!(
                    "'{}' has {} texture coordinates for {} positions",
                    mesh.name,
                    uvs.len(),
                    vertex_count
                )));
            }
        }

        let indices: Vec<u32> = mesh.faces.iter().flatten().copied().collect();
        if let Some(&bad) = indices.iter().find(|&&i| i as usize >= vertex_count) {
            return Err(SkinningError::InvalidMesh(format!(
                "'{}' face index {} out of range for {} vertices",
                mesh.name, bad, vertex_count
            )));
        }

        let vertices = (0..vertex_count)
            .map(|i| MeshVertex {
                position: mesh.positions[i],
                normal: mesh.normals.get(i).copied().unwrap_or([0.0; 3]),
                tex_coords: mesh
                    .tex_coords
                    .as_ref()
                    .map_or([0.0; 2], |uvs| uvs[i]),
            })
            .collect();

        Ok(Self {
            name: mesh.name.clone(),
            vertices,
            indices,
            skin: build_vertex_skin_data(vertex_count, &mesh.bones, registry),
            diffuse_texture: mesh.diffuse_texture.as_deref().map(|file| match directory {
                Some(dir) => resolve_texture_path(dir, file),
                None => file.to_string(),
            }),
        })
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn skin_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.skin)
    }
}

/// Center of the axis-aligned bounds of every mesh position.
/// The origin when there are no vertices.
pub fn model_center(meshes: &[MeshData]) -> Vec3 {
    let mut positions = meshes
        .iter()
        .flat_map(|mesh| mesh.positions.iter())
        .map(|&p| Vec3::from_array(p));

    let Some(first) = positions.next() else {
        return Vec3::ZERO;
    };
    let (min, max) = positions.fold((first, first), |(min, max), p| (min.min(p), max.max(p)));
    (min + max) * 0.5
}
