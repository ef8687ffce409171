//! Document parsing: text in, fully annotated [`Doc`] out.

use std::sync::Arc;

use tracing::debug;

use crate::dependency::coarse_tags;
use crate::doc::{Doc, Token};
use crate::error::{require_text, NlpError, Result};
use crate::model::LanguageModel;

/// Turns raw text into a parsed document.
pub trait DocumentParser {
    /// Parse `text`. Empty or whitespace-only text is rejected before any
    /// stage runs.
    fn parse(&self, text: &str) -> Result<Doc>;
}

/// The built-in parser: tokenize, tag, lemmatize, segment sentences,
/// attach dependencies, chunk noun phrases and recognize entities.
#[derive(Debug, Clone)]
pub struct Pipeline {
    model: Arc<LanguageModel>,
}

impl Pipeline {
    pub fn new(model: Arc<LanguageModel>) -> Self {
        Self { model }
    }

    /// A pipeline over the shared English model.
    pub fn english() -> Result<Self> {
        Ok(Self::new(LanguageModel::shared()?))
    }

    pub fn model(&self) -> &LanguageModel {
        &self.model
    }
}

impl DocumentParser for Pipeline {
    fn parse(&self, text: &str) -> Result<Doc> {
        require_text(text)?;
        let model = &self.model;

        let raw = model.tokenizer().tokenize(text);
        let words: Vec<&str> = raw.iter().map(|t| t.text).collect();
        let tags = model.tagger().tag(&words);
        if tags.len() != words.len() {
            return Err(NlpError::MalformedDocument(format!(
                "tagger returned {} tags for {} tokens",
                tags.len(),
                words.len()
            )));
        }

        let lemmas: Vec<String> = words
            .iter()
            .zip(&tags)
            .map(|(word, tag)| model.lemmatizer().lemmatize(word, *tag))
            .collect();
        let sents = model.sentencizer().segment(&words, &tags);
        let arcs = model.dependencies().parse(&tags, &lemmas, &sents);
        let pos = coarse_tags(&tags, &lemmas, &arcs);
        let noun_chunks = model.chunker().extract_chunks(&tags, &sents);

        let mut sent_of = vec![0; words.len()];
        for (s, span) in sents.iter().enumerate() {
            sent_of[span.start..span.end].fill(s);
        }

        let tokens: Vec<Token> = raw
            .iter()
            .zip(lemmas)
            .enumerate()
            .map(|(i, (token, lemma))| Token {
                i,
                text: token.text.to_string(),
                start: token.start,
                end: token.end,
                whitespace: text[token.end..].starts_with(char::is_whitespace),
                lemma,
                pos: pos[i],
                tag: tags[i],
                dep: arcs[i].dep,
                head: arcs[i].head,
                sent: sent_of[i],
            })
            .collect();

        let ents = model.ner().extract(&tokens, &sents);

        debug!(
            "Parsed {} tokens, {} sentences, {} noun chunks, {} entities",
            tokens.len(),
            sents.len(),
            noun_chunks.len(),
            ents.len()
        );

        Doc::new(text.to_string(), tokens, sents, noun_chunks, ents)
    }
}

/// Parse `text` with the shared English model.
pub fn parse(text: &str) -> Result<Doc> {
    Pipeline::english()?.parse(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tags::{DepLabel, EntityLabel, PosTag, UPos};

    const HEADLINE: &str = "European authorities fined Google a record $5.1 billion on \
        Wednesday for abusing its power in the mobile phone market and ordered the company \
        to alter its practices";

    fn pipeline() -> Pipeline {
        Pipeline::english().unwrap()
    }

    #[test]
    fn test_empty_input_is_rejected() {
        for text in ["", "   ", "\n\t\n"] {
            let err = pipeline().parse(text).unwrap_err();
            assert!(matches!(err, NlpError::InvalidInput(_)));
        }
    }

    #[test]
    fn test_headline_document() {
        let doc = pipeline().parse(HEADLINE).unwrap();

        let fined = &doc.tokens()[2];
        assert_eq!(fined.text, "fined");
        assert_eq!(fined.lemma, "fine");
        assert_eq!(fined.pos, UPos::Verb);
        assert!(fined.is_root());

        let chunk = doc.noun_chunks()[0];
        assert_eq!(doc.span_text(chunk.span), "European authorities");
        let root = &doc.tokens()[chunk.root];
        assert_eq!(root.dep, DepLabel::Nsubj);
        assert_eq!(doc.head(root).text, "fined");

        let ents: Vec<(&str, EntityLabel)> = doc
            .ents()
            .iter()
            .map(|e| (doc.span_text(e.span), e.label))
            .collect();
        assert!(ents.contains(&("Google", EntityLabel::Org)));
        assert!(ents.contains(&("$5.1 billion", EntityLabel::Money)));
        assert!(ents.contains(&("Wednesday", EntityLabel::Date)));
        assert!(ents.contains(&("European", EntityLabel::Norp)));
    }

    #[test]
    fn test_offsets_and_whitespace() {
        let doc = pipeline().parse("Google paid.").unwrap();
        let texts: Vec<&str> = doc.tokens().iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["Google", "paid", "."]);
        assert!(doc.tokens()[0].whitespace);
        assert!(!doc.tokens()[1].whitespace);
        for token in doc.tokens() {
            assert_eq!(&doc.text()[token.start..token.end], token.text);
        }
    }

    #[test]
    fn test_line_breaks_become_space_tokens() {
        let doc = pipeline().parse("Google appealed.\n\nRegulators waited.").unwrap();
        let space = doc
            .tokens()
            .iter()
            .find(|t| t.tag == PosTag::Space)
            .unwrap();
        assert_eq!(space.pos, UPos::Space);
        assert_eq!(doc.sents().len(), 2);
    }

    #[test]
    fn test_sentence_indices_follow_spans() {
        let doc = pipeline()
            .parse("Google appealed. Regulators waited. The fine stands.")
            .unwrap();
        assert_eq!(doc.sents().len(), 3);
        for (s, span) in doc.sents().iter().enumerate() {
            for token in doc.span_tokens(*span) {
                assert_eq!(token.sent, s);
                assert!(span.contains(token.head));
            }
        }
    }
}
