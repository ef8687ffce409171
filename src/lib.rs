//! docwalk - English tokenizing, tagging and parsed-document traversal.
//!
//! Two independent pipelines share one read-only [`LanguageModel`]:
//! [`Preprocessor`] turns text into `(word, tag)` pairs, and [`Pipeline`]
//! parses text into a [`Doc`] whose noun chunks, entities, tokens and
//! sentences are walked with the functions in [`traversal`].

pub mod chunker;
pub mod config;
pub mod content;
pub mod dependency;
pub mod doc;
pub mod error;
pub mod lemmatizer;
pub mod model;
pub mod ner;
pub mod parser;
pub mod preprocess;
pub mod sentencizer;
pub mod tagger;
pub mod tags;
pub mod tokenizer;
pub mod traversal;

pub use config::{ChunkerConfig, ContentWordConfig, SentenceConfig, Settings};
pub use content::{is_content_word, ContentWordClassifier};
pub use doc::{Doc, Entity, NounChunk, Span, Token};
pub use error::{NlpError, Result};
pub use model::LanguageModel;
pub use ner::{NerBackend, RuleNerBackend};
pub use parser::{parse, DocumentParser, Pipeline};
pub use preprocess::{preprocess, Preprocessor};
pub use tags::{DepLabel, EntityLabel, PosTag, UPos};
pub use tagger::{LexiconTagger, Tagger};
pub use tokenizer::{RawToken, RuleTokenizer, Tokenizer};
pub use traversal::{DefaultTokenHandler, TokenHandler, TokenReport};
