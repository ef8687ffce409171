//! Parsed document model.
//!
//! A [`Doc`] owns the source text and every annotation produced for it.
//! Spans are token ranges; their surface text is sliced from the source, so
//! reading a span never allocates.

use serde::Serialize;

use crate::error::{NlpError, Result};
use crate::tags::{DepLabel, EntityLabel, PosTag, UPos};

/// One token of a parsed document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    /// Position in the document's token sequence.
    pub i: usize,
    pub text: String,
    /// Byte offset of the token in the source text.
    pub start: usize,
    pub end: usize,
    /// Whether whitespace follows the token in the source text.
    pub whitespace: bool,
    pub lemma: String,
    pub pos: UPos,
    pub tag: PosTag,
    pub dep: DepLabel,
    /// Index of the governing token. The sentence root points at itself.
    pub head: usize,
    /// Index of the sentence containing the token.
    pub sent: usize,
}

impl Token {
    pub fn is_root(&self) -> bool {
        self.head == self.i
    }
}

/// Half-open token range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, i: usize) -> bool {
        self.start <= i && i < self.end
    }

    pub fn overlaps(&self, other: &Span) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// A noun phrase and its syntactic root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NounChunk {
    pub span: Span,
    pub root: usize,
}

/// A named entity mention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Entity {
    pub span: Span,
    pub label: EntityLabel,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Doc {
    text: String,
    tokens: Vec<Token>,
    sents: Vec<Span>,
    noun_chunks: Vec<NounChunk>,
    ents: Vec<Entity>,
}

impl Doc {
    /// Assemble a document, checking that every span is well formed.
    ///
    /// Sentences must partition the tokens; chunks must not overlap each
    /// other and neither may entities (a chunk and an entity may overlap).
    pub fn new(
        text: String,
        tokens: Vec<Token>,
        sents: Vec<Span>,
        noun_chunks: Vec<NounChunk>,
        ents: Vec<Entity>,
    ) -> Result<Self> {
        let n = tokens.len();
        let malformed = |msg: String| Err(NlpError::MalformedDocument(msg));

        for (i, token) in tokens.iter().enumerate() {
            if token.i != i || token.head >= n || token.end > text.len() || token.start > token.end {
                return malformed(format!("token {} is out of place", i));
            }
        }

        let mut expected_start = 0;
        for (s, sent) in sents.iter().enumerate() {
            if sent.start != expected_start || sent.is_empty() || sent.end > n {
                return malformed(format!("sentence {} does not continue the partition", s));
            }
            expected_start = sent.end;
        }
        if expected_start != n {
            return malformed("sentences do not cover every token".to_string());
        }

        if let Some(bad) = noun_chunks
            .iter()
            .find(|c| c.span.is_empty() || c.span.end > n || !c.span.contains(c.root))
        {
            return malformed(format!("noun chunk {:?} is out of range", bad.span));
        }
        if has_overlap(noun_chunks.iter().map(|c| c.span)) {
            return malformed("noun chunks overlap".to_string());
        }

        if let Some(bad) = ents.iter().find(|e| e.span.is_empty() || e.span.end > n) {
            return malformed(format!("entity {:?} is out of range", bad.span));
        }
        if has_overlap(ents.iter().map(|e| e.span)) {
            return malformed("entities overlap".to_string());
        }

        Ok(Self {
            text,
            tokens,
            sents,
            noun_chunks,
            ents,
        })
    }

    /// The source text.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn token(&self, i: usize) -> Option<&Token> {
        self.tokens.get(i)
    }

    /// The governing token of `token`.
    pub fn head(&self, token: &Token) -> &Token {
        &self.tokens[token.head]
    }

    pub fn sents(&self) -> &[Span] {
        &self.sents
    }

    pub fn noun_chunks(&self) -> &[NounChunk] {
        &self.noun_chunks
    }

    pub fn ents(&self) -> &[Entity] {
        &self.ents
    }

    /// Tokens covered by `span`.
    pub fn span_tokens(&self, span: Span) -> &[Token] {
        &self.tokens[span.start..span.end]
    }

    /// Source text covered by `span`, from its first token's start to its
    /// last token's end.
    pub fn span_text(&self, span: Span) -> &str {
        if span.is_empty() {
            return "";
        }
        let start = self.tokens[span.start].start;
        let end = self.tokens[span.end - 1].end;
        &self.text[start..end]
    }

    /// Serialize the document with all annotations.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| NlpError::Serialization(e.to_string()))
    }
}

/// Whether any two spans overlap.
fn has_overlap(spans: impl Iterator<Item = Span>) -> bool {
    let mut spans: Vec<Span> = spans.collect();
    spans.sort_by_key(|s| (s.start, s.end));
    spans.windows(2).any(|w| w[0].overlaps(&w[1]))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Build a token with the given attributes and no trailing context.
    pub(crate) fn token(i: usize, text: &str, start: usize, tag: PosTag, head: usize) -> Token {
        Token {
            i,
            text: text.to_string(),
            start,
            end: start + text.len(),
            whitespace: true,
            lemma: text.to_lowercase(),
            pos: tag.coarse(),
            tag,
            dep: if head == i { DepLabel::Root } else { DepLabel::Dep },
            head,
            sent: 0,
        }
    }

    fn sample() -> (String, Vec<Token>) {
        let text = "Google paid fines.".to_string();
        let tokens = vec![
            token(0, "Google", 0, PosTag::NNP, 1),
            token(1, "paid", 7, PosTag::VBD, 1),
            token(2, "fines", 12, PosTag::NNS, 1),
            token(3, ".", 17, PosTag::Period, 1),
        ];
        (text, tokens)
    }

    #[test]
    fn test_span_text_slices_source() {
        let (text, tokens) = sample();
        let doc = Doc::new(text, tokens, vec![Span::new(0, 4)], vec![], vec![]).unwrap();
        assert_eq!(doc.span_text(Span::new(0, 3)), "Google paid fines");
        assert_eq!(doc.span_text(Span::new(3, 4)), ".");
        assert_eq!(doc.span_text(Span::new(2, 2)), "");
        assert_eq!(doc.head(&doc.tokens()[0]).text, "paid");
        assert!(doc.tokens()[1].is_root());
    }

    #[test]
    fn test_sentences_must_partition() {
        let (text, tokens) = sample();
        let err = Doc::new(
            text.clone(),
            tokens.clone(),
            vec![Span::new(0, 2)],
            vec![],
            vec![],
        )
        .unwrap_err();
        assert!(matches!(err, NlpError::MalformedDocument(_)));

        let err = Doc::new(
            text,
            tokens,
            vec![Span::new(0, 2), Span::new(1, 4)],
            vec![],
            vec![],
        )
        .unwrap_err();
        assert!(matches!(err, NlpError::MalformedDocument(_)));
    }

    #[test]
    fn test_entities_may_overlap_chunks_but_not_each_other() {
        let (text, tokens) = sample();
        let chunk = NounChunk {
            span: Span::new(0, 1),
            root: 0,
        };
        let org = Entity {
            span: Span::new(0, 1),
            label: EntityLabel::Org,
        };
        let doc = Doc::new(
            text.clone(),
            tokens.clone(),
            vec![Span::new(0, 4)],
            vec![chunk],
            vec![org],
        );
        assert!(doc.is_ok());

        let wide = Entity {
            span: Span::new(0, 2),
            label: EntityLabel::Org,
        };
        let err = Doc::new(
            text.clone(),
            tokens.clone(),
            vec![Span::new(0, 4)],
            vec![],
            vec![org, wide],
        );
        assert!(matches!(err, Err(NlpError::MalformedDocument(_))));

        // Listed out of order, still overlapping.
        let late = Entity {
            span: Span::new(2, 4),
            label: EntityLabel::Org,
        };
        let early = Entity {
            span: Span::new(1, 3),
            label: EntityLabel::Org,
        };
        let err = Doc::new(text, tokens, vec![Span::new(0, 4)], vec![], vec![late, early]);
        assert!(matches!(err, Err(NlpError::MalformedDocument(_))));
    }

    #[test]
    fn test_chunk_root_must_be_inside() {
        let (text, tokens) = sample();
        let chunk = NounChunk {
            span: Span::new(0, 1),
            root: 2,
        };
        let err = Doc::new(text, tokens, vec![Span::new(0, 4)], vec![chunk], vec![]);
        assert!(matches!(err, Err(NlpError::MalformedDocument(_))));
    }

    #[test]
    fn test_to_json_uses_tag_strings() {
        let (text, tokens) = sample();
        let doc = Doc::new(text, tokens, vec![Span::new(0, 4)], vec![], vec![]).unwrap();
        let json = doc.to_json().unwrap();
        assert!(json.contains("\"tag\":\"NNP\""));
        assert!(json.contains("\"dep\":\"ROOT\""));
    }
}
