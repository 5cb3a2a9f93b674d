//! Model loading and caching.

pub mod artifact;
pub mod cache;
pub mod loader;

pub use artifact::ModelArtifact;
pub use cache::ModelCache;
pub use loader::ModelLoader;
