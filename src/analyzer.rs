use anyhow::Context;
use serde_json::{Map, Value};

use crate::config::ChunkingConfig;
use crate::errors::AnalyzerError;
use crate::{merger, segmenter};

/// System prompt sent with every chunk.
pub const SYSTEM_PROMPT: &str = "You are a helpful assistant that analyzes PDF documents. \
     Extract all relevant information and return it in a detailed JSON format.";

/// One generation request against the remote text-generation service.
///
/// Implementations own the HTTP client, credentials, and any retry policy;
/// the analyzer only sees the raw model output (expected to be JSON).
#[allow(async_fn_in_trait)]
pub trait ChunkCompleter {
    async fn complete(&self, system: &str, user: &str) -> anyhow::Result<String>;
}

/// Per-chunk user prompt combining the chunk text with the caller's instruction.
pub fn build_prompt(chunk: &str, instruction: &str) -> String {
    format!(
        "Text chunk to analyze:\n{chunk}\n\nInstruction: {instruction}\n\
         Return the information in a detailed JSON format, capturing all relevant details from the text."
    )
}

/// Analyze a document: segment it, run every chunk through the completer in
/// chunk order, and merge the per-chunk JSON results into one mapping.
///
/// A chunk whose completion or JSON parsing fails contributes an
/// `{error, chunk_preview}` marker in its slot instead of aborting the run,
/// so partial results survive individual chunk failures.
pub async fn analyze_document<C: ChunkCompleter>(
    completer: &C,
    text: &str,
    instruction: &str,
    chunking: &ChunkingConfig,
) -> Result<Map<String, Value>, AnalyzerError> {
    let chunks = segmenter::segment(text, chunking.size, chunking.overlap)?;
    tracing::info!("Analyzing {} chars in {} chunks", text.chars().count(), chunks.len());

    let mut results = Vec::with_capacity(chunks.len());
    for (i, chunk) in chunks.iter().enumerate() {
        tracing::debug!("Processing chunk {}/{}", i + 1, chunks.len());

        let result = match process_chunk(completer, chunk, instruction).await {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!("Chunk {}/{} failed: {e:#}", i + 1, chunks.len());
                merger::error_marker(&format!("{e:#}"), chunk)
            }
        };
        results.push(result);
    }

    Ok(merger::merge_results(results))
}

async fn process_chunk<C: ChunkCompleter>(
    completer: &C,
    chunk: &str,
    instruction: &str,
) -> anyhow::Result<Map<String, Value>> {
    let prompt = build_prompt(chunk, instruction);
    let raw = completer
        .complete(SYSTEM_PROMPT, &prompt)
        .await
        .context("Completion request failed")?;

    let value: Value =
        serde_json::from_str(raw.trim()).context("Model output is not valid JSON")?;

    match value {
        Value::Object(map) => Ok(map),
        other => anyhow::bail!("Model output is not a JSON object: {other}"),
    }
}
