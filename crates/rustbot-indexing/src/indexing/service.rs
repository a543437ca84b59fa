//! Indexer service trait for dependency injection and testing

use super::{FileContent, IndexResult};
use async_trait::async_trait;
use std::path::Path;

/// Knowledge-base ingestion operations
#[async_trait]
pub trait IndexerService: Send + Sync {
    /// Index documents already read into memory
    ///
    /// A document the chunker rejects is counted in `files_failed` and
    /// ingestion moves on. Embedding and storage failures abort the run.
    async fn index_file_content(&self, files: Vec<FileContent>) -> crate::IndexerResult<IndexResult>;

    /// Read every `extension` file under `dir` and index it
    async fn index_directory(&self, dir: &Path, extension: &str)
    -> crate::IndexerResult<IndexResult>;

    /// Make sure the collection exists, dropping it first when `recreate` is set
    async fn prepare_collection(&self, recreate: bool) -> crate::IndexerResult<()>;

    /// Drop the collection from storage
    async fn drop_collection(&self) -> crate::IndexerResult<bool>;
}

/// Test utilities for mocking IndexerService
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils {
    use super::{FileContent, IndexResult, IndexerService, Path, async_trait};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Mock implementation of IndexerService for testing
    #[derive(Debug, Default)]
    pub struct MockIndexerService {
        pub files_to_return: usize,
        pub chunks_to_return: usize,
        pub should_error: bool,
        runs: AtomicUsize,
    }

    impl MockIndexerService {
        pub fn new(files: usize, chunks: usize) -> Self {
            Self {
                files_to_return: files,
                chunks_to_return: chunks,
                ..Self::default()
            }
        }

        pub fn with_error() -> Self {
            Self {
                should_error: true,
                ..Self::default()
            }
        }

        /// Number of indexing runs requested so far
        pub fn runs(&self) -> usize {
            self.runs.load(Ordering::SeqCst)
        }

        fn result(&self) -> crate::IndexerResult<IndexResult> {
            self.runs.fetch_add(1, Ordering::SeqCst);
            if self.should_error {
                return Err(mock_error());
            }
            Ok(IndexResult {
                files_indexed: self.files_to_return,
                files_failed: 0,
                chunks_created: self.chunks_to_return,
                chunks_stored: self.chunks_to_return,
            })
        }
    }

    fn mock_error() -> crate::IndexerError {
        crate::IndexerError::Io {
            message: "Mock error".to_string(),
            source: None,
        }
    }

    #[async_trait]
    impl IndexerService for MockIndexerService {
        async fn index_file_content(
            &self,
            _files: Vec<FileContent>,
        ) -> crate::IndexerResult<IndexResult> {
            self.result()
        }

        async fn index_directory(
            &self,
            _dir: &Path,
            _extension: &str,
        ) -> crate::IndexerResult<IndexResult> {
            self.result()
        }

        async fn prepare_collection(&self, _recreate: bool) -> crate::IndexerResult<()> {
            if self.should_error {
                Err(mock_error())
            } else {
                Ok(())
            }
        }

        async fn drop_collection(&self) -> crate::IndexerResult<bool> {
            if self.should_error {
                Err(mock_error())
            } else {
                Ok(true)
            }
        }
    }
}
