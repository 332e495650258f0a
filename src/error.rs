use std::io;
use thiserror::Error;

/// Errors raised while building or driving an animated model
#[derive(Error, Debug)]
pub enum SkinningError {
    /// The imported scene has no root node
    #[error("Scene has no root node")]
    MissingRootNode,

    /// The importer flagged the scene as incomplete
    #[error("Scene is flagged incomplete by the importer")]
    IncompleteScene,

    /// A new bone was registered after the registry was sealed
    #[error("Cannot register bone '{name}': skeleton registry is sealed")]
    RegistrySealed { name: String },

    /// A bone ID does not fit the bone transform array
    #[error("Bone id {id} out of bounds for bone transforms (size {len})")]
    BoneIndexOutOfBounds { id: u32, len: usize },

    /// More bones than the shader uniform array can hold
    #[error("Skeleton has {count} bones, uniform capacity is {max}")]
    TooManyBones { count: usize, max: usize },

    /// A bone influence targets a vertex the mesh does not have
    #[error("Bone '{bone}' references vertex {vertex}, mesh has {vertex_count} vertices")]
    VertexOutOfRange {
        bone: String,
        vertex: u32,
        vertex_count: usize,
    },

    /// Mesh attribute or index data is inconsistent
    #[error("Invalid mesh: {0}")]
    InvalidMesh(String),

    /// JSON input could not be parsed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error while reading input
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Result type using SkinningError
pub type Result<T> = std::result::Result<T, SkinningError>;
