//! Service construction
//!
//! Builds the embedding, storage, retrieval and chat services from the loaded
//! configuration. Ingestion and retrieval share one embedding service and one
//! vector store.

use std::sync::Arc;

use anyhow::Context;
use rustbot_chat::{Assistant, ChatClient, OllamaChatClient};
use rustbot_chunking::MarkdownChunker;
use rustbot_config::ApplicationConfig;
use rustbot_embeddings::{DefaultEmbeddingService, EmbeddingService};
use rustbot_indexing::Indexer;
use rustbot_search::{Search, SearchService};
use rustbot_vector_data::{QdrantStorage, VectorStorage};
use tracing::info;

/// Initialize the embedding service
///
/// # Errors
///
/// Returns error if the HTTP client cannot be built
pub fn setup_embedding_service(
    config: &ApplicationConfig,
) -> anyhow::Result<Arc<dyn EmbeddingService>> {
    info!(model = %config.embedding.model, "Initializing embedding service");
    let service = DefaultEmbeddingService::new(&config.embedding)
        .context("Failed to initialize embedding service")?;
    Ok(Arc::new(service))
}

/// Initialize vector storage (Qdrant)
///
/// # Errors
///
/// Returns error if the Qdrant client cannot be built
pub fn setup_vector_storage(config: &ApplicationConfig) -> anyhow::Result<Arc<dyn VectorStorage>> {
    info!(
        url = %config.vector_storage.url,
        collection = %config.vector_storage.collection_name,
        "Initializing vector storage"
    );
    let storage = QdrantStorage::new(&config.vector_storage)
        .context("Failed to initialize vector storage")?;
    Ok(Arc::new(storage))
}

/// Initialize the knowledge-base indexer
///
/// # Errors
///
/// Returns error if a backing service cannot be built
pub fn setup_indexer(config: &ApplicationConfig) -> anyhow::Result<Indexer> {
    Ok(Indexer::new(
        MarkdownChunker::new(config.chunking),
        setup_embedding_service(config)?,
        setup_vector_storage(config)?,
    ))
}

/// Initialize the search service
///
/// # Errors
///
/// Returns error if a backing service cannot be built
pub fn setup_search_service(config: &ApplicationConfig) -> anyhow::Result<Arc<dyn SearchService>> {
    let search = Search::new(
        setup_embedding_service(config)?,
        setup_vector_storage(config)?,
        &config.search,
    );
    Ok(Arc::new(search))
}

/// Initialize the chat model client
///
/// # Errors
///
/// Returns error if the HTTP client cannot be built
pub fn setup_chat_client(config: &ApplicationConfig) -> anyhow::Result<Arc<dyn ChatClient>> {
    info!(model = %config.chat.model, "Initializing chat client");
    let client =
        OllamaChatClient::new(&config.chat).context("Failed to initialize chat client")?;
    Ok(Arc::new(client))
}

/// Initialize a conversation backed by retrieval and the chat model
///
/// # Errors
///
/// Returns error if any backing service cannot be built
pub fn setup_assistant(config: &ApplicationConfig) -> anyhow::Result<Assistant> {
    Ok(Assistant::new(
        setup_chat_client(config)?,
        setup_search_service(config)?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_services_build_without_servers() {
        let config = ApplicationConfig::default();

        assert!(setup_indexer(&config).is_ok());
        assert!(setup_search_service(&config).is_ok());

        let assistant = setup_assistant(&config).expect("Should build assistant");
        assert_eq!(assistant.client().model_name(), config.chat.model);
        assert!(assistant.history().is_empty());
    }
}
