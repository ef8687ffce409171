//! Tokenize and tag: text in, `(word, tag)` pairs out.

use std::sync::Arc;

use crate::error::{require_text, NlpError, Result};
use crate::model::LanguageModel;
use crate::tags::PosTag;

#[derive(Debug, Clone)]
pub struct Preprocessor {
    model: Arc<LanguageModel>,
}

impl Preprocessor {
    pub fn new(model: Arc<LanguageModel>) -> Self {
        Self { model }
    }

    /// A preprocessor over the shared English model.
    pub fn english() -> Result<Self> {
        Ok(Self::new(LanguageModel::shared()?))
    }

    /// Split `text` into words and tag each one, in order.
    ///
    /// Line breaks are not emitted as tokens.
    pub fn preprocess(&self, text: &str) -> Result<Vec<(String, PosTag)>> {
        require_text(text)?;

        let words: Vec<&str> = self
            .model
            .tokenizer()
            .tokenize(text)
            .into_iter()
            .filter(|t| !t.is_space())
            .map(|t| t.text)
            .collect();
        let tags = self.model.tagger().tag(&words);
        if tags.len() != words.len() {
            return Err(NlpError::MalformedDocument(format!(
                "tagger returned {} tags for {} words",
                tags.len(),
                words.len()
            )));
        }

        Ok(words.into_iter().map(String::from).zip(tags).collect())
    }
}

/// Tokenize and tag `text` with the shared English model.
pub fn preprocess(text: &str) -> Result<Vec<(String, PosTag)>> {
    Preprocessor::english()?.preprocess(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headline_pairs() {
        let pairs = preprocess(
            "European authorities fined Google a record $5.1 billion on Wednesday for abusing \
             its power in the mobile phone market and ordered the company to alter its practices",
        )
        .unwrap();

        let expect = |word: &str, tag: PosTag| {
            assert!(
                pairs.contains(&(word.to_string(), tag)),
                "missing ({}, {})",
                word,
                tag
            );
        };
        expect("European", PosTag::JJ);
        expect("authorities", PosTag::NNS);
        expect("fined", PosTag::VBD);
        expect("Google", PosTag::NNP);
        expect("$", PosTag::Dollar);
        expect("5.1", PosTag::CD);
        expect("alter", PosTag::VB);
    }

    #[test]
    fn test_no_whitespace_tokens() {
        let pairs = preprocess("Google appealed.\n\nRegulators waited.").unwrap();
        assert!(pairs.iter().all(|(w, t)| !w.trim().is_empty() && *t != PosTag::Space));
        assert_eq!(pairs.len(), 6);
    }

    #[test]
    fn test_empty_input_is_rejected() {
        let err = preprocess(" \n ").unwrap_err();
        assert!(matches!(err, NlpError::InvalidInput(_)));
    }

    #[test]
    fn test_wrong_tag_count_is_reported() {
        struct Mute;
        impl crate::tagger::Tagger for Mute {
            fn tag(&self, _words: &[&str]) -> Vec<PosTag> {
                Vec::new()
            }
        }

        let model = LanguageModel::english().unwrap().with_tagger(Box::new(Mute));
        let err = Preprocessor::new(Arc::new(model))
            .preprocess("Google paid.")
            .unwrap_err();
        assert!(matches!(err, NlpError::MalformedDocument(_)));
    }
}
