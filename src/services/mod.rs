//! Service layer modules for external collaborators.
//!
//! Contains clients for Redis caching, the embedding service, the output
//! document store, and the external renderer. All of them are optional.

pub mod cache;
pub mod embeddings;
pub mod output_store;
pub mod renderer;

pub use cache::RedisCache;
pub use embeddings::{EmbeddingClient, EmbeddingSimilarity};
pub use output_store::OutputStore;
pub use renderer::{RenderWarning, SceneRenderer};
