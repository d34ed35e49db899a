//! # Output Formatting
//!
//! The output contract is small and fixed: the assembled prompt is echoed
//! (dimmed) for inspection, then either the `Response:`/`Sources:` block
//! or the no-match message. Sources render as a JSON list with `null`
//! marking chunks that carry no provenance, so the list length always
//! equals the number of retrieved chunks.

use anyhow::Result;
use colored::Colorize;
use docq_rag::RetrievedContext;

/// Printed when retrieval comes back empty or below the relevance cutoff
pub const NO_MATCH_MESSAGE: &str = "Unable to find matching results.";

/// Render the source list. Missing metadata appears as `null`, never
/// dropped.
pub fn format_sources(sources: &[Option<String>]) -> String {
    serde_json::to_string(sources).unwrap_or_else(|_| "[]".to_string())
}

/// Print the no-match message, and nothing else.
pub fn print_no_match() {
    println!("{NO_MATCH_MESSAGE}");
}

/// Echo the assembled prompt before the model call.
pub fn print_prompt(prompt: &str) {
    println!("{}", prompt.dimmed());
}

/// Print the final answer with its sources.
pub fn print_response(
    query: &str,
    response: &str,
    sources: &[Option<String>],
    json: bool,
) -> Result<()> {
    if json {
        let output = serde_json::json!({
            "query": query,
            "response": response,
            "sources": sources,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("Response: {}", response);
        println!("Sources: {}", format_sources(sources));
    }
    Ok(())
}

/// Print retrieved context without an answer (`--no-llm`).
pub fn print_context(query: &str, context: &RetrievedContext, json: bool) -> Result<()> {
    let sources = context.sources();

    if json {
        let output = serde_json::json!({
            "query": query,
            "chunks": context.chunks(),
            "sources": sources,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    for chunk in context.chunks() {
        let score_pct = (chunk.score * 100.0).round() as i32;
        println!(
            "  {} {} ({}% match)",
            "•".cyan(),
            chunk.chunk.text,
            score_pct
        );
    }
    println!("Sources: {}", format_sources(&sources));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_sources_preserves_length_and_order() {
        let sources = vec![
            Some("data/a.md".to_string()),
            None,
            Some("data/b.md".to_string()),
        ];
        let rendered = format_sources(&sources);
        assert_eq!(rendered, r#"["data/a.md",null,"data/b.md"]"#);
    }

    #[test]
    fn test_format_sources_empty() {
        assert_eq!(format_sources(&[]), "[]");
    }

    #[test]
    fn test_no_match_message_is_exact() {
        assert_eq!(NO_MATCH_MESSAGE, "Unable to find matching results.");
    }
}
