//! `rustbot setup`: create the index and ingest the knowledge base

use std::io::Write;
use std::path::Path;

use anyhow::Context;
use rustbot_indexing::IndexerService;

/// Prepare the collection, then index every document under `kb_dir`
///
/// # Errors
///
/// Returns error if the collection cannot be prepared, the directory cannot be
/// read, or an embedding/storage call fails
pub async fn run<W: Write>(
    indexer: &dyn IndexerService,
    kb_dir: &Path,
    extension: &str,
    recreate: bool,
    out: &mut W,
) -> anyhow::Result<()> {
    indexer
        .prepare_collection(recreate)
        .await
        .context("Failed to prepare the vector index")?;

    let result = indexer
        .index_directory(kb_dir, extension)
        .await
        .with_context(|| format!("Failed to index '{}'", kb_dir.display()))?;

    writeln!(
        out,
        "Indexed {} documents from {} ({} failed): {} chunks created, {} stored",
        result.files_indexed,
        kb_dir.display(),
        result.files_failed,
        result.chunks_created,
        result.chunks_stored
    )?;
    Ok(())
}
