//! Read-only walks over a parsed [`Doc`].
//!
//! Every walk borrows the document and yields borrowed text; calling a walk
//! again starts it over.

use crate::content::{self, ContentWordClassifier};
use crate::doc::{Doc, Token};
use crate::tags::{EntityLabel, UPos};

/// Each noun chunk's text with the text of its root's head.
pub fn noun_chunks(doc: &Doc) -> impl Iterator<Item = (&str, &str)> + '_ {
    doc.noun_chunks().iter().map(move |chunk| {
        let root = &doc.tokens()[chunk.root];
        (doc.span_text(chunk.span), doc.head(root).text.as_str())
    })
}

/// Each entity's text with its label.
pub fn entities(doc: &Doc) -> impl Iterator<Item = (&str, EntityLabel)> + '_ {
    doc.ents()
        .iter()
        .map(move |ent| (doc.span_text(ent.span), ent.label))
}

/// Each sentence's text.
pub fn sentences(doc: &Doc) -> impl Iterator<Item = &str> + '_ {
    doc.sents().iter().map(move |sent| doc.span_text(*sent))
}

/// Per-category hook called for every token by [`tokens`].
///
/// Dispatch is on the coarse category: `VERB` goes to `on_verb`, `NOUN` to
/// `on_noun` and everything else (auxiliaries and proper nouns included) to
/// `on_other`.
pub trait TokenHandler {
    fn on_verb(&self, token: &Token) -> Option<String>;

    fn on_noun(&self, token: &Token) -> Option<String>;

    fn on_other(&self, _token: &Token) -> Option<String> {
        None
    }
}

/// Reports the lemma of verbs (their root form) and nouns (their singular).
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultTokenHandler;

impl TokenHandler for DefaultTokenHandler {
    fn on_verb(&self, token: &Token) -> Option<String> {
        Some(token.lemma.clone())
    }

    fn on_noun(&self, token: &Token) -> Option<String> {
        Some(token.lemma.clone())
    }
}

/// What [`tokens`] yields for one token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenReport<'d> {
    pub text: &'d str,
    pub is_content: bool,
    pub detail: Option<String>,
}

/// Every token with its content flag (default masks) and the handler's
/// detail.
pub fn tokens<'d, H>(doc: &'d Doc, handler: &'d H) -> impl Iterator<Item = TokenReport<'d>> + 'd
where
    H: TokenHandler + ?Sized,
{
    doc.tokens()
        .iter()
        .map(move |token| report(token, content::is_content_word(token), handler))
}

/// Like [`tokens`], classifying content with `classifier`.
pub fn tokens_with<'d, H>(
    doc: &'d Doc,
    classifier: &'d ContentWordClassifier,
    handler: &'d H,
) -> impl Iterator<Item = TokenReport<'d>> + 'd
where
    H: TokenHandler + ?Sized,
{
    doc.tokens()
        .iter()
        .map(move |token| report(token, classifier.is_content_word(token), handler))
}

fn report<'d, H>(token: &'d Token, is_content: bool, handler: &H) -> TokenReport<'d>
where
    H: TokenHandler + ?Sized,
{
    let detail = match token.pos {
        UPos::Verb => handler.on_verb(token),
        UPos::Noun => handler.on_noun(token),
        _ => handler.on_other(token),
    };
    TokenReport {
        text: &token.text,
        is_content,
        detail,
    }
}
