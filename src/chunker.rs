//! Noun chunk detection
//!
//! Identifies noun phrases using pattern matching on fine tags within each
//! sentence.
//! Pattern: (DET | PRP$)? (NOUN+ POS)? (ADJ | NUM)* NOUN+, plus lone pronouns.

use crate::config::ChunkerConfig;
use crate::doc::{NounChunk, Span};
use crate::tags::PosTag;

/// Noun chunk detector
#[derive(Debug, Clone, Default)]
pub struct NounChunker {
    config: ChunkerConfig,
}

impl NounChunker {
    /// Create a new chunker with default config
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a chunker with custom config
    pub fn with_config(config: ChunkerConfig) -> Self {
        Self { config }
    }

    /// Set maximum chunk length
    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.config.max_length = max_length;
        self
    }

    /// Extract noun chunks, never crossing a sentence boundary.
    pub fn extract_chunks(&self, tags: &[PosTag], sents: &[Span]) -> Vec<NounChunk> {
        self.scan(tags, sents, self.config.include_pronouns)
    }

    /// Every nominal group, pronouns included regardless of configuration.
    pub(crate) fn nominal_groups(&self, tags: &[PosTag], sent: Span) -> Vec<NounChunk> {
        self.scan(tags, &[sent], true)
    }

    fn scan(&self, tags: &[PosTag], sents: &[Span], pronouns: bool) -> Vec<NounChunk> {
        let mut chunks = Vec::new();

        for sent in sents {
            let mut i = sent.start;
            while i < sent.end {
                match self.match_noun_phrase(tags, i, sent.end, pronouns) {
                    Some(chunk) => {
                        i = chunk.span.end;
                        chunks.push(chunk);
                    }
                    None => i += 1,
                }
            }
        }

        chunks
    }

    /// Try to match a noun phrase starting at `start`, ending before `limit`.
    fn match_noun_phrase(
        &self,
        tags: &[PosTag],
        start: usize,
        limit: usize,
        pronouns: bool,
    ) -> Option<NounChunk> {
        if pronouns && matches!(tags[start], PosTag::PRP | PosTag::WP) {
            return Some(NounChunk {
                span: Span::new(start, start + 1),
                root: start,
            });
        }

        let mut end = start;

        // Optional predeterminer + determiner: "all the", "its", "whose".
        if tags[end] == PosTag::PDT && end + 1 < limit {
            end += 1;
        }
        if matches!(tags[end], PosTag::DT | PosTag::PRPS | PosTag::WPS | PosTag::WDT) {
            end += 1;
        }

        // Optional possessor: "Google 's".
        let mut k = end;
        while k < limit && tags[k].is_noun() {
            k += 1;
        }
        if k > end && k < limit && tags[k] == PosTag::POS {
            end = k + 1;
        }

        // Modifiers.
        while end < limit
            && (tags[end].is_adjective() || matches!(tags[end], PosTag::CD | PosTag::HYPH))
        {
            end += 1;
        }

        // Required: at least one noun.
        let noun_start = end;
        while end < limit && tags[end].is_noun() {
            end += 1;
        }
        if end == noun_start {
            return None;
        }

        let root = end - 1;
        let max_length = self.config.max_length.max(1);
        let start = start.max(end.saturating_sub(max_length));

        Some(NounChunk {
            span: Span::new(start, end),
            root,
        })
    }
}
