//! Treebank-style word tokenization.
//!
//! Tokens are byte ranges into the input, so every token text is a slice of
//! the original string. Splitting follows the usual English conventions:
//! punctuation and currency symbols become their own tokens, contractions
//! split before the clitic (`don't` -> `do` `n't`), while decimals,
//! initialisms, known abbreviations, URLs and hyphenated words stay whole.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

/// A token produced by a [`Tokenizer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawToken<'t> {
    pub text: &'t str,
    /// Byte offset of the first character.
    pub start: usize,
    /// Byte offset one past the last character.
    pub end: usize,
}

impl RawToken<'_> {
    /// Whitespace tokens are only produced for runs containing a line break.
    pub fn is_space(&self) -> bool {
        self.text.chars().all(char::is_whitespace)
    }
}

/// Splits text into tokens.
pub trait Tokenizer: Send + Sync {
    fn tokenize<'t>(&self, text: &'t str) -> Vec<RawToken<'t>>;
}

/// Rule-based English tokenizer.
#[derive(Debug, Clone, Default)]
pub struct RuleTokenizer {
    /// Emit whitespace runs that contain a newline as tokens.
    keep_line_breaks: bool,
    /// Abbreviations kept whole in addition to the built-in list.
    extra_abbreviations: HashSet<String>,
}

impl RuleTokenizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_line_breaks(mut self, keep: bool) -> Self {
        self.keep_line_breaks = keep;
        self
    }

    pub fn with_abbreviations<I, S>(mut self, abbreviations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra_abbreviations
            .extend(abbreviations.into_iter().map(Into::into));
        self
    }
}

static URL_OR_EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[a-zA-Z][a-zA-Z0-9+.-]*://\S+|www\.\S+|[\w.+-]+@[\w-]+\.[\w.-]+)$")
        .expect("url pattern should compile")
});

// U.S., e.g., p.m.
static INITIALISM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[A-Za-z]\.){2,}$").expect("initialism pattern should compile")
});

static CLITIC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:n['’]t|['’](?:s|re|ve|ll|m|d))$").expect("clitic pattern should compile")
});

pub(crate) static ABBREVIATIONS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "Mr.", "Mrs.", "Ms.", "Dr.", "Prof.", "Sr.", "Jr.", "St.", "Mt.", "Gen.", "Col.", "Lt.",
        "Capt.", "Sgt.", "Rep.", "Sen.", "Gov.", "Inc.", "Corp.", "Co.", "Ltd.", "Bros.", "vs.",
        "etc.", "approx.", "Jan.", "Feb.", "Mar.", "Apr.", "Jun.", "Jul.", "Aug.", "Sep.",
        "Sept.", "Oct.", "Nov.", "Dec.", "No.", "Fig.", "Ave.", "Dept.", "Univ.",
    ]
    .into_iter()
    .collect()
});

const OPENING: &[char] = &['(', '[', '{', '"', '“', '‘', '`', '$', '#', '£', '€', '¥'];
const CLOSING: &[char] = &[')', ']', '}', '"', '”', '’', ',', ';', ':', '!', '?', '%', '\''];

impl Tokenizer for RuleTokenizer {
    fn tokenize<'t>(&self, text: &'t str) -> Vec<RawToken<'t>> {
        let mut tokens = Vec::new();
        let mut chunk_start: Option<usize> = None;
        let mut space_start: Option<usize> = None;

        for (i, c) in text.char_indices() {
            if c.is_whitespace() {
                if let Some(start) = chunk_start.take() {
                    self.split_chunk(text, start, i, &mut tokens);
                }
                space_start.get_or_insert(i);
            } else {
                if let Some(start) = space_start.take() {
                    self.push_space(text, start, i, &mut tokens);
                }
                chunk_start.get_or_insert(i);
            }
        }
        if let Some(start) = chunk_start {
            self.split_chunk(text, start, text.len(), &mut tokens);
        }
        if let Some(start) = space_start {
            self.push_space(text, start, text.len(), &mut tokens);
        }

        tokens
    }
}

impl RuleTokenizer {
    fn push_space<'t>(&self, text: &'t str, start: usize, end: usize, out: &mut Vec<RawToken<'t>>) {
        let run = &text[start..end];
        if self.keep_line_breaks && run.contains('\n') {
            out.push(RawToken {
                text: run,
                start,
                end,
            });
        }
    }

    /// Split one whitespace-free chunk `text[start..end]` into tokens.
    fn split_chunk<'t>(
        &self,
        text: &'t str,
        mut start: usize,
        mut end: usize,
        out: &mut Vec<RawToken<'t>>,
    ) {
        // Leading symbols.
        while start < end {
            let c = first_char(&text[start..end]);
            let is_open = OPENING.contains(&c)
                || (c == '\'' && end - start > 1 && !CLITIC.is_match(&text[start..end]));
            if !is_open || end - start == c.len_utf8() {
                break;
            }
            push(text, start, start + c.len_utf8(), out);
            start += c.len_utf8();
        }

        // Trailing symbols, collected in reverse.
        let mut trailing: Vec<(usize, usize)> = Vec::new();
        while start < end {
            let chunk = &text[start..end];
            let c = last_char(chunk);
            if chunk == "..." || chunk == "--" {
                break;
            }
            if (c.is_alphanumeric() || c == '/') && URL_OR_EMAIL.is_match(chunk) {
                break;
            }
            if chunk.len() > 3 && chunk.ends_with("...") {
                trailing.push((end - 3, end));
                end -= 3;
                continue;
            }
            if chunk.len() == c.len_utf8() {
                break;
            }
            if c == '.' {
                if self.is_abbreviation(chunk) {
                    break;
                }
                trailing.push((end - 1, end));
                end -= 1;
                continue;
            }
            // A trailing apostrophe ("companies'") splits off as a possessive marker.
            if CLOSING.contains(&c) {
                trailing.push((end - c.len_utf8(), end));
                end -= c.len_utf8();
                continue;
            }
            break;
        }

        split_core(text, start, end, out);

        for (s, e) in trailing.into_iter().rev() {
            push(text, s, e, out);
        }
    }

    fn is_abbreviation(&self, chunk: &str) -> bool {
        ABBREVIATIONS.contains(chunk)
            || self.extra_abbreviations.contains(chunk)
            || INITIALISM.is_match(chunk)
    }
}

fn push<'t>(text: &'t str, start: usize, end: usize, out: &mut Vec<RawToken<'t>>) {
    if start < end {
        out.push(RawToken {
            text: &text[start..end],
            start,
            end,
        });
    }
}

/// Split the core of a chunk: ellipses and dashes inside words, then clitics.
fn split_core<'t>(text: &'t str, start: usize, end: usize, out: &mut Vec<RawToken<'t>>) {
    if start >= end {
        return;
    }
    let core = &text[start..end];
    if URL_OR_EMAIL.is_match(core) || core == "..." || core == "--" {
        push(text, start, end, out);
        return;
    }

    for sep in ["...", "--"] {
        if let Some(pos) = core.find(sep) {
            split_core(text, start, start + pos, out);
            push(text, start + pos, start + pos + sep.len(), out);
            split_core(text, start + pos + sep.len(), end, out);
            return;
        }
    }

    if let Some(m) = CLITIC.find(core) {
        if m.start() > 0 {
            push(text, start, start + m.start(), out);
            push(text, start + m.start(), end, out);
            return;
        }
    }

    push(text, start, end, out);
}

fn first_char(s: &str) -> char {
    s.chars().next().unwrap_or(' ')
}

fn last_char(s: &str) -> char {
    s.chars().next_back().unwrap_or(' ')
}
