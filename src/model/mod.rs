//! The English language model: lexicon plus every pipeline stage built
//! from it.
//!
//! A model is immutable once built and is shared between pipelines through
//! an `Arc`. [`LanguageModel::shared`] loads the default model once per
//! process.

pub mod lexicon;

use std::fmt;
use std::sync::{Arc, OnceLock};

use tracing::info;

use crate::chunker::NounChunker;
use crate::config::Settings;
use crate::content::ContentWordClassifier;
use crate::dependency::DependencyParser;
use crate::error::{NlpError, Result};
use crate::lemmatizer::Lemmatizer;
use crate::ner::{NerBackend, RuleNerBackend};
use crate::sentencizer::Sentencizer;
use crate::tagger::{LexiconTagger, Tagger};
use crate::tokenizer::{RuleTokenizer, Tokenizer};

pub use lexicon::{LexEntry, Lexicon};

static SHARED_MODEL: OnceLock<Arc<LanguageModel>> = OnceLock::new();

pub struct LanguageModel {
    settings: Settings,
    lexicon: Arc<Lexicon>,
    tokenizer: Box<dyn Tokenizer>,
    tagger: Box<dyn Tagger>,
    lemmatizer: Lemmatizer,
    sentencizer: Sentencizer,
    dependencies: DependencyParser,
    chunker: NounChunker,
    ner: Box<dyn NerBackend>,
    classifier: ContentWordClassifier,
}

impl LanguageModel {
    /// The built-in English model with default settings.
    pub fn english() -> Result<Self> {
        Self::from_settings(Settings::default())
    }

    /// Build a model from settings, loading the configured lexicon if any.
    pub fn from_settings(settings: Settings) -> Result<Self> {
        let lexicon = match &settings.lexicon_path {
            Some(path) => Lexicon::from_path(path)?,
            None => Lexicon::english()?,
        };
        let lexicon = Arc::new(lexicon);
        let classifier = ContentWordClassifier::try_from_config(&settings.content_words)?;
        let abbreviations = &settings.sentences.abbreviations;

        let model = Self {
            tokenizer: Box::new(
                RuleTokenizer::new()
                    .with_line_breaks(true)
                    .with_abbreviations(abbreviations.iter().cloned()),
            ),
            tagger: Box::new(LexiconTagger::new(Arc::clone(&lexicon))),
            lemmatizer: Lemmatizer::new(Arc::clone(&lexicon)),
            sentencizer: Sentencizer::new().with_abbreviations(abbreviations.iter().cloned()),
            dependencies: DependencyParser::new(),
            chunker: NounChunker::with_config(settings.chunker.clone()),
            ner: Box::new(RuleNerBackend::new()),
            classifier,
            lexicon,
            settings,
        };

        info!(
            "Loaded language model ({} lexicon entries, NER backend: {})",
            model.lexicon.len(),
            model.ner.backend_id()
        );
        Ok(model)
    }

    /// The process-wide default English model, loaded on first use.
    pub fn shared() -> Result<Arc<Self>> {
        if let Some(model) = SHARED_MODEL.get() {
            return Ok(Arc::clone(model));
        }

        let model = Arc::new(Self::english()?);

        // Another thread may have stored a model first; either is fine.
        let _ = SHARED_MODEL.set(model);

        SHARED_MODEL
            .get()
            .cloned()
            .ok_or_else(|| NlpError::ModelUnavailable("failed to cache shared model".to_string()))
    }

    /// Replace the tokenizer. It should emit line-break tokens for
    /// whitespace runs containing a newline.
    pub fn with_tokenizer(mut self, tokenizer: Box<dyn Tokenizer>) -> Self {
        self.tokenizer = tokenizer;
        self
    }

    pub fn with_tagger(mut self, tagger: Box<dyn Tagger>) -> Self {
        self.tagger = tagger;
        self
    }

    pub fn with_ner_backend(mut self, ner: Box<dyn NerBackend>) -> Self {
        self.ner = ner;
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    pub fn tokenizer(&self) -> &dyn Tokenizer {
        self.tokenizer.as_ref()
    }

    pub fn tagger(&self) -> &dyn Tagger {
        self.tagger.as_ref()
    }

    pub fn lemmatizer(&self) -> &Lemmatizer {
        &self.lemmatizer
    }

    pub fn sentencizer(&self) -> &Sentencizer {
        &self.sentencizer
    }

    pub fn dependencies(&self) -> &DependencyParser {
        &self.dependencies
    }

    pub fn chunker(&self) -> &NounChunker {
        &self.chunker
    }

    pub fn ner(&self) -> &dyn NerBackend {
        self.ner.as_ref()
    }

    pub fn classifier(&self) -> &ContentWordClassifier {
        &self.classifier
    }
}

impl fmt::Debug for LanguageModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LanguageModel")
            .field("settings", &self.settings)
            .field("lexicon_entries", &self.lexicon.len())
            .field("ner", &self.ner.backend_id())
            .finish_non_exhaustive()
    }
}
