//! Importer-facing scene description.
//!
//! The scene importer itself lives outside this crate. These types describe
//! what it hands over: a node tree with bind transforms, meshes with per-bone
//! weight lists, and raw keyframe channels. Matrices arrive row by row, the
//! way most interchange formats store them, and are converted on load.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Row-major 4x4 identity, the default for omitted matrices
pub const IDENTITY_ROWS: [f32; 16] = [
    1.0, 0.0, 0.0, 0.0, //
    0.0, 1.0, 0.0, 0.0, //
    0.0, 0.0, 1.0, 0.0, //
    0.0, 0.0, 0.0, 1.0,
];

fn identity_rows() -> [f32; 16] {
    IDENTITY_ROWS
}

/// Everything the importer produced for one model file
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SceneData {
    /// Root of the node tree; `None` means the import failed structurally
    #[serde(default)]
    pub root: Option<SceneNodeDesc>,

    /// Set by the importer when it could not read the whole file
    #[serde(default)]
    pub incomplete: bool,

    #[serde(default)]
    pub meshes: Vec<MeshData>,

    #[serde(default)]
    pub animations: Vec<RawAnimation>,

    /// Directory the scene was read from; relative texture paths resolve
    /// against it. Not part of the JSON.
    #[serde(skip)]
    pub directory: Option<String>,
}

impl SceneData {
    /// Parse from JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a JSON scene file, remembering its directory
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let mut scene = Self::from_json(&contents)?;
        scene.directory = Some(model_directory(&path.to_string_lossy()));
        Ok(scene)
    }
}

/// One node of the imported scene graph. Children are owned by their parent.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SceneNodeDesc {
    pub name: String,

    /// Local bind transform, row-major
    #[serde(default = "identity_rows")]
    pub transform: [f32; 16],

    /// Indices into `SceneData::meshes` drawn at this node
    #[serde(default)]
    pub meshes: Vec<usize>,

    #[serde(default)]
    pub children: Vec<SceneNodeDesc>,
}

impl SceneNodeDesc {
    /// Leaf node with an identity transform
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transform: IDENTITY_ROWS,
            meshes: Vec::new(),
            children: Vec::new(),
        }
    }
}

/// A single weight of one bone on one vertex
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct VertexWeight {
    pub vertex_id: u32,
    pub weight: f32,
}

/// A bone as declared by a mesh: bind-pose offset plus its vertex weights
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawBone {
    pub name: String,

    /// Mesh space to bone space at bind time, row-major
    #[serde(default = "identity_rows")]
    pub offset_matrix: [f32; 16],

    #[serde(default)]
    pub weights: Vec<VertexWeight>,
}

/// Raw mesh geometry and skinning input
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MeshData {
    #[serde(default)]
    pub name: String,

    pub positions: Vec<[f32; 3]>,

    /// Either empty or one normal per position
    #[serde(default)]
    pub normals: Vec<[f32; 3]>,

    /// First UV channel, if the mesh has one
    #[serde(default)]
    pub tex_coords: Option<Vec<[f32; 2]>>,

    /// Polygon index lists (triangles after importer triangulation)
    #[serde(default)]
    pub faces: Vec<Vec<u32>>,

    #[serde(default)]
    pub bones: Vec<RawBone>,

    /// Diffuse texture path as written in the source file
    #[serde(default)]
    pub diffuse_texture: Option<String>,
}

/// Translation or scale key
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct VectorKey {
    pub time: f32,
    pub value: [f32; 3],
}

/// Rotation key, quaternion stored as `[x, y, z, w]`
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct QuatKey {
    pub time: f32,
    pub value: [f32; 4],
}

/// Keyframes for one node. Channel key counts are independent.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawChannel {
    pub node_name: String,

    #[serde(default)]
    pub position_keys: Vec<VectorKey>,

    #[serde(default)]
    pub rotation_keys: Vec<QuatKey>,

    #[serde(default)]
    pub scaling_keys: Vec<VectorKey>,
}

/// One imported animation clip, times in ticks
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawAnimation {
    #[serde(default)]
    pub name: String,

    pub duration: f32,

    /// Zero means "unspecified"
    #[serde(default)]
    pub ticks_per_second: f32,

    #[serde(default)]
    pub channels: Vec<RawChannel>,
}

/// Directory a model file lives in, `"."` for bare file names
pub fn model_directory(path: &str) -> String {
    match path.rfind(['/', '\\']) {
        Some(idx) => path[..idx].to_string(),
        None => ".".to_string(),
    }
}

/// Resolve a texture reference against the model directory.
///
/// Absolute paths (`C:...`, `/...`, or anything containing `:/`) are kept as
/// they are; everything else is taken relative to `directory`.
pub fn resolve_texture_path(directory: &str, filename: &str) -> String {
    let bytes = filename.as_bytes();
    let windows_absolute = bytes.len() > 2 && bytes[1] == b':' && bytes[0].is_ascii_uppercase();
    let other_absolute = filename.starts_with('/') || filename.contains(":/");

    if windows_absolute || other_absolute {
        filename.to_string()
    } else {
        format!("{}/{}", directory, filename)
    }
}
