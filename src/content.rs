//! Content-word classification.
//!
//! A token carries content unless it is a wh-word, a light verb, punctuation
//! or whitespace, or a function word. Each exclusion is a configurable mask.

use std::collections::HashSet;
use std::sync::LazyLock;

use tracing::debug;

use crate::config::ContentWordConfig;
use crate::doc::Token;
use crate::error::{NlpError, Result};
use crate::tags::{PosTag, UPos};

static DEFAULT_CLASSIFIER: LazyLock<ContentWordClassifier> =
    LazyLock::new(ContentWordClassifier::default);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentWordClassifier {
    lemma_mask: HashSet<String>,
    pos_mask: HashSet<UPos>,
    tag_mask: HashSet<PosTag>,
    tag_prefix_mask: String,
}

impl Default for ContentWordClassifier {
    fn default() -> Self {
        Self {
            lemma_mask: ["do", "be", "use", "have"].map(String::from).into(),
            pos_mask: [UPos::Punct, UPos::Space].into(),
            tag_mask: [
                PosTag::TO,
                PosTag::CC,
                PosTag::IN,
                PosTag::DT,
                PosTag::PRPS,
                PosTag::PRP,
                PosTag::EX,
            ]
            .into(),
            tag_prefix_mask: "W".to_string(),
        }
    }
}

impl ContentWordClassifier {
    /// Build a classifier from configured masks.
    ///
    /// Every tag in the masks must belong to its closed set.
    pub fn try_from_config(config: &ContentWordConfig) -> Result<Self> {
        let invalid = |e: NlpError| NlpError::Config(format!("content_words: {}", e));

        let pos_mask = config
            .pos_mask
            .iter()
            .map(|p| p.parse::<UPos>())
            .collect::<Result<HashSet<_>>>()
            .map_err(invalid)?;
        let tag_mask = config
            .tag_mask
            .iter()
            .map(|t| t.parse::<PosTag>())
            .collect::<Result<HashSet<_>>>()
            .map_err(invalid)?;

        Ok(Self {
            lemma_mask: config.lemma_mask.iter().cloned().collect(),
            pos_mask,
            tag_mask,
            tag_prefix_mask: config.tag_prefix_mask.clone(),
        })
    }

    pub fn is_content_word(&self, token: &Token) -> bool {
        self.classify(token.tag, &token.lemma, token.pos)
    }

    /// Classify from the three attributes that decide content.
    pub fn classify(&self, tag: PosTag, lemma: &str, pos: UPos) -> bool {
        let wh_word =
            !self.tag_prefix_mask.is_empty() && tag.as_str().starts_with(&self.tag_prefix_mask);

        !wh_word
            && !self.lemma_mask.contains(lemma)
            && !self.pos_mask.contains(&pos)
            && !self.tag_mask.contains(&tag)
    }

    /// Classify from raw tag strings.
    ///
    /// A tag outside the closed sets never names a content word.
    pub fn classify_raw(&self, tag: &str, lemma: &str, pos: &str) -> bool {
        match (tag.parse::<PosTag>(), pos.parse::<UPos>()) {
            (Ok(tag), Ok(pos)) => self.classify(tag, lemma, pos),
            (Err(e), _) | (_, Err(e)) => {
                debug!("Treating token as non-content: {}", e);
                false
            }
        }
    }
}

/// Classify with the default masks.
pub fn is_content_word(token: &Token) -> bool {
    DEFAULT_CLASSIFIER.is_content_word(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> ContentWordClassifier {
        ContentWordClassifier::default()
    }

    #[test]
    fn test_default_matches_default_config() {
        let from_config =
            ContentWordClassifier::try_from_config(&ContentWordConfig::default()).unwrap();
        assert_eq!(from_config, classifier());
    }

    #[test]
    fn test_nouns_and_verbs_are_content() {
        let c = classifier();
        assert!(c.classify(PosTag::NN, "authority", UPos::Noun));
        assert!(c.classify(PosTag::VBD, "fine", UPos::Verb));
        assert!(c.classify(PosTag::NNP, "Google", UPos::Propn));
        assert!(c.classify(PosTag::JJ, "european", UPos::Adj));
    }

    #[test]
    fn test_function_words_are_not_content() {
        let c = classifier();
        assert!(!c.classify(PosTag::IN, "on", UPos::Adp));
        assert!(!c.classify(PosTag::DT, "the", UPos::Det));
        assert!(!c.classify(PosTag::PRPS, "its", UPos::Pron));
        assert!(!c.classify(PosTag::TO, "to", UPos::Part));
        assert!(!c.classify(PosTag::CC, "and", UPos::Cconj));
        assert!(!c.classify(PosTag::EX, "there", UPos::Pron));
    }

    #[test]
    fn test_wh_words_are_not_content() {
        let c = classifier();
        for tag in [PosTag::WDT, PosTag::WP, PosTag::WPS, PosTag::WRB] {
            assert!(!c.classify(tag, "which", UPos::Pron));
        }
    }

    #[test]
    fn test_light_verbs_are_not_content() {
        let c = classifier();
        assert!(!c.classify(PosTag::VBZ, "be", UPos::Aux));
        assert!(!c.classify(PosTag::VBD, "have", UPos::Verb));
        assert!(!c.classify(PosTag::VBP, "do", UPos::Verb));
        assert!(!c.classify(PosTag::VB, "use", UPos::Verb));
    }

    #[test]
    fn test_punctuation_and_space_are_not_content() {
        let c = classifier();
        assert!(!c.classify(PosTag::Period, ".", UPos::Punct));
        assert!(!c.classify(PosTag::Space, "\n", UPos::Space));
    }

    #[test]
    fn test_classify_raw() {
        let c = classifier();
        assert!(c.classify_raw("NN", "authority", "NOUN"));
        assert!(!c.classify_raw("IN", "on", "ADP"));
        assert!(!c.classify_raw("BOGUS", "authority", "NOUN"));
        assert!(!c.classify_raw("NN", "authority", "BOGUS"));
    }

    #[test]
    fn test_configured_masks() {
        let config = ContentWordConfig {
            lemma_mask: vec!["fine".to_string()],
            pos_mask: vec![],
            tag_mask: vec![],
            tag_prefix_mask: String::new(),
        };
        let c = ContentWordClassifier::try_from_config(&config).unwrap();
        assert!(!c.classify(PosTag::VBD, "fine", UPos::Verb));
        assert!(c.classify(PosTag::WDT, "which", UPos::Det));
        assert!(c.classify(PosTag::Period, ".", UPos::Punct));
    }

    #[test]
    fn test_bad_configured_tag_is_config_error() {
        let config = ContentWordConfig {
            tag_mask: vec!["NOPE".to_string()],
            ..ContentWordConfig::default()
        };
        let err = ContentWordClassifier::try_from_config(&config).unwrap_err();
        assert!(matches!(err, NlpError::Config(_)));
    }

    #[test]
    fn test_free_function_uses_defaults() {
        let token = crate::doc::tests::token(0, "authorities", 0, PosTag::NNS, 0);
        assert!(is_content_word(&token));
        let token = crate::doc::tests::token(0, "in", 0, PosTag::IN, 0);
        assert!(!is_content_word(&token));
    }
}
