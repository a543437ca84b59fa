//! Rustbot vector data storage crate
//!
//! Stores embedded knowledge-base chunks and answers nearest-neighbour
//! queries. Qdrant is the production backend; `MemoryStorage` keeps everything
//! in process.

pub mod chunk_id;
pub mod error;
pub mod storage;

// Re-export main types
pub use chunk_id::{generate_chunk_id, hash_content};
pub use error::{VectorDataError, VectorDataResult};
pub use rustbot_config::VectorStorageConfig;
pub use storage::{
    EmbeddedChunk, MemoryStorage, QdrantStorage, SearchHit, StorageStats, VectorStorage,
};
