pub mod cache;
pub mod clip;
pub mod id;
pub mod pose;
pub mod registry;
pub mod sample;

pub use cache::*;
pub use clip::*;
pub use id::*;
pub use pose::*;
pub use registry::*;
pub use sample::*;
