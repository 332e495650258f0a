//! Linear algebra primitives using glam.

pub use glam::{Mat4, Quat, Vec2, Vec3, Vec4};

/// Convert an importer matrix stored row by row (`a1..a4, b1..b4, ...`) into
/// glam's column-major layout.
pub fn mat4_from_rows(rows: &[f32; 16]) -> Mat4 {
    Mat4::from_cols_array(rows).transpose()
}

/// Build `translation * rotation * scale`.
#[inline]
pub fn compose_trs(translation: Vec3, rotation: Quat, scale: Vec3) -> Mat4 {
    Mat4::from_translation(translation) * Mat4::from_quat(rotation) * Mat4::from_scale(scale)
}

/// Helpers on top of `glam::Mat4` used by the pose and uniform code.
pub trait Mat4Extended {
    /// Component-wise comparison with an absolute tolerance
    fn approx_eq(&self, other: &Mat4, eps: f32) -> bool;

    /// Column-major flat array, ready for a `mat4` uniform upload
    fn to_uniform(&self) -> [f32; 16];
}

impl Mat4Extended for Mat4 {
    fn approx_eq(&self, other: &Mat4, eps: f32) -> bool {
        self.abs_diff_eq(*other, eps)
    }

    #[inline(always)]
    fn to_uniform(&self) -> [f32; 16] {
        self.to_cols_array()
    }
}
