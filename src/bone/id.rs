use glam::Mat4;

/// Dense index of a bone in the skeleton.
///
/// IDs are handed out in registration order starting at 0, so they double as
/// indices into the bone transform array and as the integers written into the
/// per-vertex bone ID attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BoneId(pub u32);

impl BoneId {
    /// Convert to array index
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Value written into the shader's `ivec4 boneIDs` attribute
    #[inline]
    pub const fn as_shader_id(self) -> i32 {
        self.0 as i32
    }
}

/// A named skeletal joint
#[derive(Debug, Clone)]
pub struct Bone {
    pub name: String,
    pub id: BoneId,
    /// Bind-pose inverse: mesh space to bone space
    pub offset_matrix: Mat4,
    /// Skinning matrix from the last pose evaluation
    pub final_transformation: Mat4,
}

impl Bone {
    pub fn new(name: impl Into<String>, id: BoneId, offset_matrix: Mat4) -> Self {
        Self {
            name: name.into(),
            id,
            offset_matrix,
            final_transformation: Mat4::IDENTITY,
        }
    }
}
