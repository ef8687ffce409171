//! Rule-based sentence segmentation over tagged tokens.

use std::collections::HashSet;
use std::sync::LazyLock;

use crate::doc::Span;
use crate::tags::PosTag;

/// Abbreviations that precede a name and never end a sentence.
static TITLES: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "Mr.", "Mrs.", "Ms.", "Dr.", "Prof.", "Sr.", "Jr.", "St.", "Mt.", "Gen.", "Col.", "Lt.",
        "Capt.", "Sgt.", "Rep.", "Sen.", "Gov.", "No.", "Fig.", "vs.",
    ]
    .into_iter()
    .collect()
});

#[derive(Debug, Clone, Default)]
pub struct Sentencizer {
    extra_titles: HashSet<String>,
}

impl Sentencizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Treat these abbreviations as never ending a sentence.
    pub fn with_abbreviations<I, S>(mut self, abbreviations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra_titles
            .extend(abbreviations.into_iter().map(Into::into));
        self
    }

    /// Split tokens into sentences. The result partitions `0..words.len()`.
    pub fn segment(&self, words: &[&str], tags: &[PosTag]) -> Vec<Span> {
        let n = words.len();
        let mut sents = Vec::new();
        let mut start = 0;
        let mut i = 0;

        while i < n {
            // A line break before any words joins the sentence after it.
            let leading_break = i == start && tags[i] == PosTag::Space;
            if leading_break || !self.is_terminal(words, tags, i) {
                i += 1;
                continue;
            }

            // Closing quotes, brackets and whitespace stay with the sentence
            // they close.
            let mut end = i + 1;
            while end < n
                && matches!(
                    tags[end],
                    PosTag::CloseQuote | PosTag::RightParen | PosTag::Space
                )
            {
                end += 1;
            }
            // Repeated terminal marks ("?!") belong together.
            while end < n && tags[end] == PosTag::Period {
                end += 1;
            }

            if end < n && !opens_sentence(words[end], tags[end]) {
                i = end;
                continue;
            }

            sents.push(Span::new(start, end));
            start = end;
            i = end;
        }

        if start < n {
            sents.push(Span::new(start, n));
        }
        sents
    }

    fn is_terminal(&self, words: &[&str], tags: &[PosTag], i: usize) -> bool {
        let word = words[i];
        match tags[i] {
            PosTag::Period => true,
            // Paragraph breaks.
            PosTag::Space => word.matches('\n').count() >= 2,
            PosTag::Colon if word == "..." => words
                .get(i + 1)
                .is_some_and(|next| next.starts_with(char::is_uppercase)),
            _ if word.len() > 1 && word.ends_with('.') => {
                // An abbreviation ends a sentence only when a capitalized
                // non-name follows it: "in the U.S. He said".
                if TITLES.contains(word) || self.extra_titles.contains(word) {
                    return false;
                }
                match (words.get(i + 1), tags.get(i + 1)) {
                    (Some(next), Some(tag)) => {
                        next.starts_with(char::is_uppercase) && !tag.is_proper_noun()
                    }
                    _ => false,
                }
            }
            _ => false,
        }
    }
}

fn opens_sentence(word: &str, tag: PosTag) -> bool {
    let first = word.chars().next().unwrap_or(' ');
    !first.is_lowercase() || matches!(tag, PosTag::OpenQuote | PosTag::LeftParen)
}
