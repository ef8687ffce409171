//! Library settings, loaded from TOML.
//!
//! Every section has a default, so an empty file (or `Settings::default()`)
//! reproduces the built-in English behavior.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{NlpError, Result};

/// Top-level settings for building a [`LanguageModel`](crate::LanguageModel).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Optional TSV lexicon that replaces the bundled English lexicon.
    pub lexicon_path: Option<PathBuf>,
    pub content_words: ContentWordConfig,
    pub chunker: ChunkerConfig,
    pub sentences: SentenceConfig,
}

impl Settings {
    /// Parse settings from a TOML string.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        toml::from_str(raw).map_err(|e| NlpError::Config(e.to_string()))
    }

    /// Load settings from a TOML file.
    ///
    /// A relative `lexicon_path` is resolved against the file's directory.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        let mut settings = Self::from_toml_str(&raw)?;

        if let Some(lexicon) = settings.lexicon_path.take() {
            let resolved = match path.parent() {
                Some(dir) if lexicon.is_relative() => dir.join(lexicon),
                _ => lexicon,
            };
            settings.lexicon_path = Some(resolved);
        }

        debug!("Loaded settings from {}", path.display());
        Ok(settings)
    }
}

/// Exclusion masks used by the content-word classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentWordConfig {
    /// Lemmas of light/auxiliary verbs that never count as content.
    pub lemma_mask: Vec<String>,
    /// Coarse categories that never count as content.
    pub pos_mask: Vec<String>,
    /// Fine tags that never count as content.
    pub tag_mask: Vec<String>,
    /// Fine-tag prefix excluded wholesale (wh-words).
    pub tag_prefix_mask: String,
}

impl Default for ContentWordConfig {
    fn default() -> Self {
        Self {
            lemma_mask: ["do", "be", "use", "have"].map(String::from).to_vec(),
            pos_mask: ["PUNCT", "SPACE"].map(String::from).to_vec(),
            tag_mask: ["TO", "CC", "IN", "DT", "PRP$", "PRP", "EX"]
                .map(String::from)
                .to_vec(),
            tag_prefix_mask: "W".to_string(),
        }
    }
}

/// Noun chunk detection settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkerConfig {
    /// Emit personal pronouns ("it", "they") as single-token chunks.
    pub include_pronouns: bool,
    /// Maximum number of tokens in a chunk.
    pub max_length: usize,
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self {
            include_pronouns: true,
            max_length: 8,
        }
    }
}

/// Sentence segmentation settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SentenceConfig {
    /// Additional abbreviations (with trailing period, e.g. "Gov.") that do
    /// not end a sentence.
    pub abbreviations: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_toml_gives_defaults() {
        let settings = Settings::from_toml_str("").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.content_words.lemma_mask.len(), 4);
        assert!(settings.chunker.include_pronouns);
    }

    #[test]
    fn test_partial_sections_keep_other_defaults() {
        let settings = Settings::from_toml_str(
            r#"
            [chunker]
            max_length = 3

            [sentences]
            abbreviations = ["Gov."]
            "#,
        )
        .unwrap();

        assert_eq!(settings.chunker.max_length, 3);
        assert!(settings.chunker.include_pronouns);
        assert_eq!(settings.sentences.abbreviations, vec!["Gov.".to_string()]);
        assert_eq!(settings.content_words, ContentWordConfig::default());
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = Settings::from_toml_str("chunker = 5").unwrap_err();
        assert!(matches!(err, NlpError::Config(_)));
    }

    #[test]
    fn test_load_resolves_relative_lexicon_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("docwalk.toml");
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "lexicon_path = \"lexicon.tsv\"").unwrap();

        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings.lexicon_path, Some(dir.path().join("lexicon.tsv")));
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = Settings::load(Path::new("/nonexistent/docwalk.toml")).unwrap_err();
        assert!(matches!(err, NlpError::Io(_)));
    }
}
