//! Word lexicon: known words, their admissible fine tags and lemmas.
//!
//! The lexicon is a TSV with one word per line:
//! `word<TAB>TAG[,TAG...]<TAB>lemma`. The first tag is the preferred one and
//! the lemma column is optional (it defaults to the lowercased word). Lines
//! starting with `#` are comments.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use crate::error::{NlpError, Result};
use crate::tags::PosTag;

/// Lexicon bundled with the crate.
const BUNDLED_ENGLISH: &str = include_str!("../../data/en_lexicon.tsv");

/// One lexicon record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexEntry {
    /// Admissible tags, preferred first. Never empty.
    pub tags: Vec<PosTag>,
    pub lemma: Option<String>,
}

impl LexEntry {
    pub fn preferred(&self) -> PosTag {
        self.tags[0]
    }

    pub fn allows(&self, tag: PosTag) -> bool {
        self.tags.contains(&tag)
    }
}

#[derive(Debug, Clone)]
pub struct Lexicon {
    entries: HashMap<String, LexEntry>,
}

impl Lexicon {
    /// The English lexicon shipped with the crate.
    pub fn english() -> Result<Self> {
        Self::parse(BUNDLED_ENGLISH, "bundled English lexicon")
    }

    /// Load a lexicon from a TSV file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|e| {
            NlpError::ModelUnavailable(format!(
                "cannot read lexicon {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::parse(&raw, &path.display().to_string())
    }

    /// Parse TSV lexicon data. `source` names the data in log messages.
    ///
    /// Malformed lines are skipped with a warning; a lexicon with no usable
    /// entries is reported as unavailable.
    pub fn parse(raw: &str, source: &str) -> Result<Self> {
        let mut entries = HashMap::new();

        for (line_no, line) in raw.lines().enumerate() {
            let line = line.trim_end_matches('\r');
            if line.trim().is_empty() || line.starts_with('#') {
                continue;
            }

            let mut fields = line.split('\t');
            let word = fields.next().unwrap_or("").trim();
            let tag_field = fields.next().unwrap_or("").trim();
            let lemma = fields
                .next()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(String::from);

            if word.is_empty() || tag_field.is_empty() {
                warn!("{}:{}: expected word and tags", source, line_no + 1);
                continue;
            }

            let tags: std::result::Result<Vec<PosTag>, _> =
                tag_field.split(',').map(|t| t.trim().parse()).collect();
            match tags {
                Ok(tags) if !tags.is_empty() => {
                    entries.insert(word.to_string(), LexEntry { tags, lemma });
                }
                Ok(_) => warn!("{}:{}: no tags for {}", source, line_no + 1, word),
                Err(e) => warn!("{}:{}: {}", source, line_no + 1, e),
            }
        }

        if entries.is_empty() {
            return Err(NlpError::ModelUnavailable(format!(
                "{} contains no lexicon entries",
                source
            )));
        }

        debug!("Loaded {} lexicon entries from {}", entries.len(), source);
        Ok(Self { entries })
    }

    /// Look a word up by exact spelling only.
    pub fn get(&self, word: &str) -> Option<&LexEntry> {
        self.entries.get(word)
    }

    /// Look a word up by exact spelling, then lowercased.
    pub fn lookup(&self, word: &str) -> Option<&LexEntry> {
        self.entries.get(word).or_else(|| {
            let lower = word.to_lowercase();
            if lower == word {
                None
            } else {
                self.entries.get(&lower)
            }
        })
    }

    /// Whether `base` is listed as a verb base form.
    pub fn is_verb_base(&self, base: &str) -> bool {
        self.entries
            .get(base)
            .is_some_and(|e| e.allows(PosTag::VB) || e.allows(PosTag::VBP))
    }

    /// Whether `base` is listed as a singular common noun.
    pub fn is_noun_base(&self, base: &str) -> bool {
        self.entries.get(base).is_some_and(|e| e.allows(PosTag::NN))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
