pub mod memory;
pub mod qdrant;
pub mod traits;

pub use self::memory::MemoryStorage;
pub use self::qdrant::QdrantStorage;
pub use self::traits::{EmbeddedChunk, SearchHit, StorageStats, VectorStorage};
