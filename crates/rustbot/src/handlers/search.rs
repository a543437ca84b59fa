//! `rustbot search`: inspect retrieval for a query

use std::io::Write;

use rustbot_common::CorrelationId;
use rustbot_search::{SearchHit, SearchService};

const PREVIEW_CHARS: usize = 160;

/// First line of the chunk's text, shortened to `PREVIEW_CHARS`
fn preview(hit: &SearchHit) -> String {
    let line = hit
        .text
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or_default();

    if line.chars().count() > PREVIEW_CHARS {
        let short: String = line.chars().take(PREVIEW_CHARS).collect();
        format!("{short}...")
    } else {
        line.to_string()
    }
}

/// Print the `limit` hits nearest to `query`, best first
///
/// # Errors
///
/// Returns error if embedding the query or the vector search fails
#[tracing::instrument(skip(search, out), fields(correlation_id))]
pub async fn run<W: Write>(
    search: &dyn SearchService,
    query: &str,
    limit: usize,
    out: &mut W,
) -> anyhow::Result<()> {
    let correlation_id = CorrelationId::new();
    tracing::Span::current().record("correlation_id", tracing::field::display(&correlation_id));

    let hits = search.search(query, limit, &correlation_id).await?;
    if hits.is_empty() {
        writeln!(out, "No results")?;
        return Ok(());
    }

    for (rank, hit) in hits.iter().enumerate() {
        writeln!(
            out,
            "{}. [{:.3}] {} #{}",
            rank.saturating_add(1),
            hit.score,
            hit.source,
            hit.position
        )?;
        writeln!(out, "   {}", preview(hit))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustbot_search::test_mocks::MockSearch;

    #[tokio::test]
    async fn test_hits_are_listed_with_scores() {
        let search = MockSearch::with_results(vec![
            (
                "kb/ch04-01.md".to_string(),
                "\n## What Is Ownership?\nOwnership is a set of rules.".to_string(),
                0.91,
            ),
            (
                "kb/ch04-02.md".to_string(),
                "References and Borrowing".to_string(),
                0.42,
            ),
        ]);
        let mut out = Vec::new();

        run(&search, "ownership", 5, &mut out)
            .await
            .expect("Should search");

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "1. [0.910] kb/ch04-01.md #1\n   ## What Is Ownership?\n\
             2. [0.420] kb/ch04-02.md #2\n   References and Borrowing\n"
        );
    }

    #[tokio::test]
    async fn test_limit_and_empty_results() {
        let search = MockSearch::with_results(vec![
            ("a.md".to_string(), "one".to_string(), 0.9),
            ("b.md".to_string(), "two".to_string(), 0.8),
        ]);
        let mut out = Vec::new();
        run(&search, "q", 1, &mut out).await.expect("Should search");
        assert_eq!(String::from_utf8(out).unwrap().lines().count(), 2);

        let mut out = Vec::new();
        run(&MockSearch::empty(), "q", 3, &mut out)
            .await
            .expect("Should search");
        assert_eq!(String::from_utf8(out).unwrap(), "No results\n");
    }

    #[test]
    fn test_preview_is_truncated() {
        let hit = SearchHit {
            chunk_id: rustbot_vector_data::generate_chunk_id("a.md", 0),
            source: "a.md".to_string(),
            position: 1,
            text: "x".repeat(200),
            score: 1.0,
        };
        let shown = preview(&hit);
        assert_eq!(shown.chars().count(), PREVIEW_CHARS + 3);
        assert!(shown.ends_with("..."));
    }
}
