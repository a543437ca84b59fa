use super::documents::{FileContent, collect_documents};
use super::service::IndexerService;
use crate::{IndexerError, IndexerResult};
use async_trait::async_trait;
use rustbot_chunking::MarkdownChunker;
use rustbot_common::CorrelationId;
use rustbot_embeddings::EmbeddingService;
use rustbot_vector_data::{EmbeddedChunk, VectorStorage};
use std::path::Path;
use std::sync::Arc;

type EmbeddingServiceRef = Arc<dyn EmbeddingService>;
type VectorStorageRef = Arc<dyn VectorStorage>;

/// Outcome of an ingestion run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexResult {
    /// Documents whose chunks were stored
    pub files_indexed: usize,
    /// Documents rejected by the chunker
    pub files_failed: usize,
    /// Chunks produced by the chunker, blank ones included
    pub chunks_created: usize,
    /// Chunks embedded and written to the vector store
    pub chunks_stored: usize,
}

impl IndexResult {
    fn absorb(&mut self, other: &Self) {
        self.files_indexed = self.files_indexed.saturating_add(other.files_indexed);
        self.files_failed = self.files_failed.saturating_add(other.files_failed);
        self.chunks_created = self.chunks_created.saturating_add(other.chunks_created);
        self.chunks_stored = self.chunks_stored.saturating_add(other.chunks_stored);
    }
}

/// Chunks, embeds and stores knowledge-base documents
pub struct Indexer {
    chunker: MarkdownChunker,
    embedding_service: EmbeddingServiceRef,
    storage: VectorStorageRef,
}

impl Indexer {
    /// Creates a new indexer with required dependencies.
    ///
    /// # Arguments
    ///
    /// * `chunker` - Markdown chunker carrying the word budget
    /// * `embedding_service` - Service for generating embeddings
    /// * `vector_storage` - Vector index backend
    pub fn new(
        chunker: MarkdownChunker,
        embedding_service: Arc<dyn EmbeddingService>,
        vector_storage: Arc<dyn VectorStorage>,
    ) -> Self {
        Self {
            chunker,
            embedding_service,
            storage: vector_storage,
        }
    }

    /// Chunk, embed and store one document
    ///
    /// Blank chunks are counted as created but not stored. Stored chunks are
    /// numbered from 1 in document order.
    async fn index_document(
        &self,
        file: &FileContent,
        correlation_id: &CorrelationId,
    ) -> IndexerResult<IndexResult> {
        let chunks = self.chunker.chunk_document(&file.content)?;
        let chunks_created = chunks.len();

        let texts: Vec<String> = chunks
            .into_iter()
            .filter(|text| !text.trim().is_empty())
            .collect();

        if texts.is_empty() {
            tracing::warn!(file = %file.path, "Document produced only blank chunks");
            return Ok(IndexResult {
                files_indexed: 1,
                chunks_created,
                ..IndexResult::default()
            });
        }

        let embeddings = self
            .embedding_service
            .generate_embeddings(texts.iter().map(String::as_str).collect())
            .await?;

        if embeddings.len() != texts.len() {
            return Err(IndexerError::EmbeddingCount {
                expected: texts.len(),
                actual: embeddings.len(),
            });
        }

        let embedded: Vec<EmbeddedChunk> = texts
            .into_iter()
            .zip(embeddings)
            .enumerate()
            .map(|(index, (text, embedding))| EmbeddedChunk {
                position: index.saturating_add(1),
                text,
                embedding,
            })
            .collect();

        let stored = self
            .storage
            .store_chunks(&file.path, &embedded, correlation_id)
            .await?;

        tracing::debug!(
            file = %file.path,
            hash = %file.hash,
            chunks_created,
            chunks_stored = stored.len(),
            "Indexed document"
        );

        Ok(IndexResult {
            files_indexed: 1,
            files_failed: 0,
            chunks_created,
            chunks_stored: stored.len(),
        })
    }
}

#[async_trait]
impl IndexerService for Indexer {
    #[tracing::instrument(skip(self, files), fields(file_count = files.len(), correlation_id))]
    async fn index_file_content(&self, files: Vec<FileContent>) -> IndexerResult<IndexResult> {
        let correlation_id = CorrelationId::new();
        tracing::Span::current().record("correlation_id", tracing::field::display(&correlation_id));

        let mut result = IndexResult::default();

        for file in &files {
            match self.index_document(file, &correlation_id).await {
                Ok(file_result) => result.absorb(&file_result),
                Err(IndexerError::Chunking(e)) => {
                    tracing::warn!(file = %file.path, error = %e, "Skipping document");
                    result.files_failed = result.files_failed.saturating_add(1);
                }
                Err(e) => return Err(e),
            }
        }

        tracing::info!(
            correlation_id = %correlation_id,
            files_indexed = result.files_indexed,
            files_failed = result.files_failed,
            chunks_stored = result.chunks_stored,
            "Indexing complete"
        );

        Ok(result)
    }

    async fn index_directory(&self, dir: &Path, extension: &str) -> IndexerResult<IndexResult> {
        let files = collect_documents(dir, extension)?;
        self.index_file_content(files).await
    }

    async fn prepare_collection(&self, recreate: bool) -> IndexerResult<()> {
        if recreate && self.storage.drop_collection().await? {
            tracing::info!("Dropped existing collection");
        }
        self.storage.ensure_collection().await?;
        Ok(())
    }

    async fn drop_collection(&self) -> IndexerResult<bool> {
        Ok(self.storage.drop_collection().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustbot_config::ChunkingConfig;
    use rustbot_embeddings::{DefaultEmbeddingService, MockEmbeddingProvider};
    use rustbot_vector_data::MemoryStorage;

    fn indexer_with(storage: MemoryStorage, fail_embeddings: bool) -> Indexer {
        let provider = if fail_embeddings {
            MockEmbeddingProvider::new(8).with_failure()
        } else {
            MockEmbeddingProvider::new(8)
        };
        let embedding_service = Arc::new(DefaultEmbeddingService::with_provider(
            Arc::new(provider),
            4,
        ));
        let chunker = MarkdownChunker::new(ChunkingConfig::new(5, 20).unwrap());
        Indexer::new(chunker, embedding_service, Arc::new(storage))
    }

    #[tokio::test]
    async fn test_indexes_documents_and_numbers_chunks() {
        let storage = MemoryStorage::default();
        let indexer = indexer_with(storage.clone(), false);
        indexer.prepare_collection(false).await.unwrap();

        let files = vec![FileContent::new(
            "kb/ownership.md",
            "# Moves\nValues move by default.\n# Borrows\nReferences borrow values.",
        )];

        let result = indexer.index_file_content(files).await.unwrap();

        assert_eq!(result.files_indexed, 1);
        assert_eq!(result.files_failed, 0);
        assert_eq!(result.chunks_created, 2);
        assert_eq!(result.chunks_stored, 2);
        assert_eq!(
            storage.stored_positions().await,
            vec![
                ("kb/ownership.md".to_string(), 1),
                ("kb/ownership.md".to_string(), 2)
            ]
        );
    }

    #[tokio::test]
    async fn test_failed_document_is_counted_and_skipped() {
        let storage = MemoryStorage::default();
        let indexer = indexer_with(storage.clone(), false);
        indexer.prepare_collection(false).await.unwrap();

        let files = vec![
            FileContent::new("kb/broken.md", "# A\n# \n# B\ntext"),
            FileContent::new("kb/fine.md", "Plain note."),
        ];

        let result = indexer.index_file_content(files).await.unwrap();

        assert_eq!(result.files_failed, 1);
        assert_eq!(result.files_indexed, 1);
        assert_eq!(
            storage.stored_positions().await,
            vec![("kb/fine.md".to_string(), 1)]
        );
    }

    #[tokio::test]
    async fn test_blank_trailing_chunk_is_not_stored() {
        let storage = MemoryStorage::default();
        let indexer = indexer_with(storage.clone(), false);
        indexer.prepare_collection(false).await.unwrap();

        // heading-free text over budget ends in an empty trailing flush
        let files = vec![FileContent::new(
            "kb/prose.md",
            "One two three four five six. Seven eight nine ten eleven twelve. ",
        )];

        let result = indexer.index_file_content(files).await.unwrap();

        assert_eq!(result.chunks_created, 3);
        assert_eq!(result.chunks_stored, 2);
    }

    #[tokio::test]
    async fn test_embedding_failure_aborts() {
        let storage = MemoryStorage::default();
        let indexer = indexer_with(storage, true);
        indexer.prepare_collection(false).await.unwrap();

        let result = indexer
            .index_file_content(vec![FileContent::new("kb/a.md", "text")])
            .await;
        assert!(matches!(result, Err(IndexerError::Embedding(_))));
    }

    #[tokio::test]
    async fn test_prepare_collection_recreates() {
        let storage = MemoryStorage::default();
        let indexer = indexer_with(storage.clone(), false);
        indexer.prepare_collection(false).await.unwrap();
        indexer
            .index_file_content(vec![FileContent::new("kb/a.md", "text")])
            .await
            .unwrap();

        indexer.prepare_collection(true).await.unwrap();

        assert!(storage.collection_exists().await.unwrap());
        assert!(storage.stored_positions().await.is_empty());
    }
}
