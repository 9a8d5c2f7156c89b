//! Serialisable alignment jobs and analyzer payload parsing.
//!
//! A job bundles everything one alignment needs: the answer text, the analyzer's segments and
//! the unannotated render tree. Jobs let captured answers be replayed through the engine from a
//! JSON file, which is what the command-line harness does.

use crate::config::AlignConfig;
use crate::error::{Error, Result};
use crate::segment::{RawSegment, SegmentStream};
use crate::tree::{count_attributed_spans, RenderNode};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Input for one alignment: answer text, analyzer output and render tree.
pub struct AlignmentJob {
    /// The assistant's answer as originally written, formatting included.
    pub full_text: String,
    /// Analyzer segments in the order they were returned.
    #[serde(default)]
    pub segments: Vec<RawSegment>,
    /// Render tree of `full_text` before annotation.
    pub tree: RenderNode,
}

#[derive(Debug, Clone, Serialize)]
/// Result of running an [`AlignmentJob`].
pub struct AlignmentOutcome {
    /// The reconciled segment stream.
    pub segments: SegmentStream,
    /// The annotated render tree.
    pub tree: RenderNode,
    /// Number of attributed spans in `tree`.
    pub attributed_spans: usize,
}

impl AlignmentJob {
    /// Read a job from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or does not hold a job.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&contents)
    }

    /// Parse a job from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON does not describe a job.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    #[must_use]
    /// Reconcile the segments and annotate the tree.
    pub fn run(self, config: &AlignConfig) -> AlignmentOutcome {
        let segments = crate::reconcile(&self.full_text, &self.segments);
        let tree = crate::align_with(self.tree, &segments, config);
        let attributed_spans = count_attributed_spans(&tree);
        AlignmentOutcome {
            segments,
            tree,
            attributed_spans,
        }
    }
}

#[derive(Deserialize)]
struct SegmentsEnvelope {
    segments: Vec<RawSegment>,
}

/// Parse the analyzer's final payload into segments.
///
/// Accepts a JSON array of records, an object with a `segments` array, or newline-delimited
/// JSON records (one per line, blank lines ignored).
///
/// # Errors
///
/// Returns an error if the payload matches none of these shapes.
pub fn parse_segments_json(json: &str) -> Result<Vec<RawSegment>> {
    let trimmed = json.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }
    if trimmed.starts_with('[') {
        return Ok(serde_json::from_str(trimmed)?);
    }
    if let Ok(envelope) = serde_json::from_str::<SegmentsEnvelope>(trimmed) {
        return Ok(envelope.segments);
    }
    trimmed
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| serde_json::from_str::<RawSegment>(line).map_err(Error::from))
        .collect()
}

#[cfg(test)]
#[path = "tests/job.rs"]
mod tests;
