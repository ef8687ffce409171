//! Part-of-speech tagging.
//!
//! [`LexiconTagger`] assigns each token its preferred lexicon tag (or a guess
//! from word shape and suffix for unknown words), then runs one left-to-right
//! pass of contextual correction rules over the sentence.

use std::sync::{Arc, LazyLock};

use regex::Regex;

use crate::model::Lexicon;
use crate::tags::PosTag;

/// Assigns one fine-grained tag per token.
pub trait Tagger: Send + Sync {
    /// Returns exactly `words.len()` tags, in order.
    fn tag(&self, words: &[&str]) -> Vec<PosTag>;
}

static NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(?:\d+(?:[,.]\d+)*|\.\d+)(?:/\d+)?$")
        .expect("number pattern should compile")
});

static ORDINAL_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\d+(?:st|nd|rd|th)$").expect("ordinal pattern should compile")
});

static DECADE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{2,4}'?s$").expect("decade pattern should compile"));

static URL_LIKE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[a-zA-Z][a-zA-Z0-9+.-]*://|www\.|[\w.+-]+@[\w-]+\.)")
        .expect("url pattern should compile")
});

const NOUN_SUFFIXES: &[&str] = &[
    "tion", "sion", "ment", "ness", "ity", "ance", "ence", "ship", "ism", "ist", "dom", "hood",
    "ure", "age", "ery", "er", "or",
];
const ADJECTIVE_SUFFIXES: &[&str] = &[
    "ous", "ful", "ive", "able", "ible", "less", "ish", "ary", "ical", "ic", "al", "ian",
];
const VERB_SUFFIXES: &[&str] = &["ize", "ise", "ify", "ate"];

#[derive(Debug, Clone)]
pub struct LexiconTagger {
    lexicon: Arc<Lexicon>,
}

impl LexiconTagger {
    pub fn new(lexicon: Arc<Lexicon>) -> Self {
        Self { lexicon }
    }

    /// Admissible tags for one word, preferred first.
    fn candidates(&self, word: &str, sentence_start: bool, open_quote: &mut bool) -> Vec<PosTag> {
        if let Some(tag) = punctuation_tag(word, open_quote) {
            return vec![tag];
        }

        if let Some(entry) = self.lexicon.get(word) {
            return entry.tags.clone();
        }
        if let Some(entry) = self.lexicon.lookup(word) {
            // Content words capitalized mid-sentence are usually names
            // ("Apple", "Will Smith" aside from the modal).
            if !sentence_start && is_titlecase(word) && !is_function_tag(entry.preferred()) {
                let mut tags = vec![PosTag::NNP];
                tags.extend(entry.tags.iter().copied());
                return tags;
            }
            return entry.tags.clone();
        }

        self.guess(word, sentence_start)
    }

    /// Guess tags for a word missing from the lexicon.
    fn guess(&self, word: &str, sentence_start: bool) -> Vec<PosTag> {
        if NUMBER.is_match(word) {
            return vec![PosTag::CD];
        }
        if ORDINAL_NUMBER.is_match(word) {
            return vec![PosTag::JJ];
        }
        if DECADE.is_match(word) {
            return vec![PosTag::NNS, PosTag::CD];
        }
        if URL_LIKE.is_match(word) {
            return vec![PosTag::ADD];
        }

        let lower = word.to_lowercase();
        let capitalized = word.chars().next().is_some_and(char::is_uppercase);

        if capitalized && !sentence_start {
            let plural_acronym = word.len() > 2
                && word.ends_with('s')
                && is_all_caps(&word[..word.len() - 1]);
            if plural_acronym {
                return vec![PosTag::NNPS];
            }
            return vec![PosTag::NNP];
        }

        if word.contains('-') && word.chars().any(char::is_alphabetic) {
            return vec![PosTag::JJ, PosTag::NN];
        }

        let suffix_guess = self.guess_suffix(&lower);
        if capitalized && sentence_start {
            // A sentence-initial capital only says "name" when no suffix
            // points elsewhere.
            return suffix_guess.unwrap_or_else(|| vec![PosTag::NNP, PosTag::NN]);
        }
        suffix_guess.unwrap_or_else(|| vec![PosTag::NN, PosTag::JJ, PosTag::VB])
    }

    fn guess_suffix(&self, lower: &str) -> Option<Vec<PosTag>> {
        if lower.len() > 4 && lower.ends_with("ing") {
            return Some(vec![PosTag::VBG, PosTag::NN, PosTag::JJ]);
        }
        if lower.len() > 3 && lower.ends_with("ed") {
            return Some(vec![PosTag::VBD, PosTag::VBN, PosTag::JJ]);
        }
        if lower.len() > 3 && lower.ends_with("ly") {
            return Some(vec![PosTag::RB, PosTag::JJ]);
        }
        if lower.len() > 3
            && lower.ends_with('s')
            && !lower.ends_with("ss")
            && !lower.ends_with("us")
            && !lower.ends_with("is")
        {
            let verb_only = plural_bases(lower).iter().any(|b| self.lexicon.is_verb_base(b))
                && !plural_bases(lower).iter().any(|b| self.lexicon.is_noun_base(b));
            return Some(if verb_only {
                vec![PosTag::VBZ, PosTag::NNS]
            } else {
                vec![PosTag::NNS, PosTag::VBZ]
            });
        }
        if NOUN_SUFFIXES.iter().any(|s| lower.len() > s.len() + 2 && lower.ends_with(s)) {
            return Some(vec![PosTag::NN]);
        }
        if ADJECTIVE_SUFFIXES.iter().any(|s| lower.len() > s.len() + 2 && lower.ends_with(s)) {
            return Some(vec![PosTag::JJ, PosTag::NN]);
        }
        if VERB_SUFFIXES.iter().any(|s| lower.len() > s.len() + 2 && lower.ends_with(s)) {
            return Some(vec![PosTag::VB, PosTag::VBP, PosTag::JJ]);
        }
        None
    }
}

impl Tagger for LexiconTagger {
    fn tag(&self, words: &[&str]) -> Vec<PosTag> {
        let mut open_quote = false;
        let candidates: Vec<Vec<PosTag>> = words
            .iter()
            .enumerate()
            .map(|(i, word)| self.candidates(word, starts_sentence(words, i), &mut open_quote))
            .collect();

        let mut tags: Vec<PosTag> = candidates.iter().map(|c| c[0]).collect();
        for i in 0..tags.len() {
            tags[i] = contextual_tag(words, &candidates, &tags, i);
        }
        tags
    }
}

/// Apply the contextual rules to token `i`, given final tags for `0..i`.
fn contextual_tag(
    words: &[&str],
    candidates: &[Vec<PosTag>],
    tags: &[PosTag],
    i: usize,
) -> PosTag {
    let current = tags[i];
    let allowed = &candidates[i];
    let allows = |t: PosTag| allowed.contains(&t);
    let word = words[i].to_lowercase();
    let prev = prev_non_adverb(tags, i);
    let prev_tag = i.checked_sub(1).map(|p| tags[p]);
    let next_tag = candidates.get(i + 1).map(|c| c[0]);

    // Infinitive and modal complements: "to alter", "will not go", "did n't see".
    if let Some(p) = prev {
        let p_word = words[p].to_lowercase();
        let do_support = matches!(p_word.as_str(), "do" | "does" | "did");
        if (tags[p] == PosTag::TO || tags[p] == PosTag::MD || do_support) && allows(PosTag::VB) {
            return PosTag::VB;
        }
    }

    // Nominal context: "a record", "its power", "the building".
    if let Some(p) = prev_tag {
        let nominal_context = matches!(
            p,
            PosTag::DT | PosTag::PRPS | PosTag::POS | PosTag::PDT | PosTag::WPS
        ) || p.is_adjective()
            || (p == PosTag::IN && current != PosTag::VBG);
        if nominal_context {
            if matches!(current, PosTag::VB | PosTag::VBP) && allows(PosTag::NN) {
                return PosTag::NN;
            }
            if current == PosTag::VBZ && allows(PosTag::NNS) {
                return PosTag::NNS;
            }
            if current == PosTag::VBG && p != PosTag::IN && allows(PosTag::NN) {
                return if next_tag.is_some_and(|t| t.is_noun()) {
                    PosTag::JJ
                } else {
                    PosTag::NN
                };
            }
        }
    }

    // Past tense vs participle: "was fined", "has ordered", "they fined".
    if matches!(current, PosTag::VBD | PosTag::VBN) && allows(PosTag::VBD) && allows(PosTag::VBN) {
        let mut back = i;
        let mut hops = 0;
        while back > 0 && hops < 4 {
            back -= 1;
            let w = words[back].to_lowercase();
            if is_have_form(&w) || is_be_form(&w) {
                return PosTag::VBN;
            }
            if !tags[back].is_adverb() {
                hops += 1;
                if tags[back].is_verb() || tags[back] == PosTag::MD || tags[back] == PosTag::IN {
                    break;
                }
            }
        }
        if prev_tag.is_some_and(|p| matches!(p, PosTag::DT | PosTag::PRPS)) && allows(PosTag::JJ) {
            return PosTag::JJ;
        }
        return PosTag::VBD;
    }

    // Present tense after a subject: "they use", "companies compete",
    // and "regulators fine companies" for words usually read as nouns.
    if matches!(current, PosTag::VB | PosTag::NN) && allows(PosTag::VBP) {
        if let Some(p) = prev_tag {
            let plural_subject =
                matches!(p, PosTag::PRP | PosTag::NNS | PosTag::NNPS | PosTag::WDT | PosTag::WP)
                    && !matches!(
                        words[i - 1].to_lowercase().as_str(),
                        "it" | "he" | "she" | "him" | "them" | "us" | "me"
                    );
            let has_object = next_tag.is_some_and(|t| {
                t.is_noun()
                    || matches!(t, PosTag::DT | PosTag::PRPS | PosTag::PDT | PosTag::CD)
            });
            let object_ok = current == PosTag::VB
                || (has_object && !matches!(p, PosTag::WDT | PosTag::WP));
            if plural_subject && object_ok {
                return PosTag::VBP;
            }
        }
    }

    // Nouns following a subject are usually verbs: "Google fines", "authorities order".
    if current == PosTag::NNS
        && allows(PosTag::VBZ)
        && prev_tag.is_some_and(|p| matches!(p, PosTag::NNP | PosTag::PRP))
        && next_tag.is_some_and(|t| matches!(t, PosTag::DT | PosTag::PRPS | PosTag::NNP))
    {
        return PosTag::VBZ;
    }

    match word.as_str() {
        "'s" | "’s" => {
            let after_pronoun = prev_tag == Some(PosTag::PRP) || prev_tag == Some(PosTag::EX);
            let before_verb = next_tag.is_some_and(|t| matches!(t, PosTag::VBG | PosTag::VBN));
            if after_pronoun || before_verb {
                return PosTag::VBZ;
            }
            return PosTag::POS;
        }
        "her" => {
            let before_nominal =
                next_tag.is_some_and(|t| t.is_noun() || t.is_adjective() || t == PosTag::CD);
            return if before_nominal {
                PosTag::PRPS
            } else {
                PosTag::PRP
            };
        }
        "that" => {
            if prev_tag.is_some_and(|p| p.is_noun())
                && next_tag.is_some_and(|t| t.is_finite_verb() || t == PosTag::VB)
            {
                return PosTag::WDT;
            }
            let before_nominal = next_tag.is_some_and(|t| t.is_noun() || t.is_adjective());
            if before_nominal && !prev_tag.is_some_and(|p| p.is_verb()) {
                return PosTag::DT;
            }
        }
        _ => {}
    }

    // Particles only follow verbs: "picked up", but "up the hill".
    if current == PosTag::RP && !prev_tag.is_some_and(|p| p.is_verb()) && allows(PosTag::IN) {
        return PosTag::IN;
    }

    current
}

/// Index of the nearest preceding token that is not an adverb.
fn prev_non_adverb(tags: &[PosTag], i: usize) -> Option<usize> {
    (0..i).rev().find(|&j| !tags[j].is_adverb())
}

fn punctuation_tag(word: &str, open_quote: &mut bool) -> Option<PosTag> {
    if word.chars().all(char::is_whitespace) {
        return Some(PosTag::Space);
    }
    let tag = match word {
        "." | "!" | "?" => PosTag::Period,
        "," => PosTag::Comma,
        ":" | ";" | "..." | "--" | "-" | "—" | "–" => PosTag::Colon,
        "``" | "“" | "‘" | "`" => PosTag::OpenQuote,
        "''" | "”" | "’" => PosTag::CloseQuote,
        "\"" => {
            *open_quote = !*open_quote;
            if *open_quote {
                PosTag::OpenQuote
            } else {
                PosTag::CloseQuote
            }
        }
        "'" => PosTag::POS,
        "(" | "[" | "{" => PosTag::LeftParen,
        ")" | "]" | "}" => PosTag::RightParen,
        "$" | "£" | "€" | "¥" | "US$" => PosTag::Dollar,
        "#" => PosTag::Hash,
        "%" => PosTag::NN,
        "&" => PosTag::CC,
        _ if word.chars().all(|c| !c.is_alphanumeric()) => {
            let first = word.chars().next().unwrap_or(' ');
            if word.chars().count() > 1 && word.chars().all(|c| c == first) {
                PosTag::NFP
            } else {
                PosTag::SYM
            }
        }
        _ => return None,
    };
    Some(tag)
}

/// Candidate singular forms for a word ending in "s".
pub(crate) fn plural_bases(lower: &str) -> Vec<String> {
    let mut bases = Vec::new();
    if let Some(stem) = lower.strip_suffix("ies") {
        bases.push(format!("{}y", stem));
    }
    if let Some(stem) = lower.strip_suffix("es") {
        bases.push(stem.to_string());
    }
    if let Some(stem) = lower.strip_suffix('s') {
        bases.push(stem.to_string());
    }
    bases
}

/// Whether token `i` opens a sentence, looking through opening quotes and
/// brackets.
fn starts_sentence(words: &[&str], i: usize) -> bool {
    let mut j = i;
    while j > 0 {
        let prev = words[j - 1];
        if matches!(prev, "." | "!" | "?") || prev.chars().all(char::is_whitespace) {
            return true;
        }
        if !matches!(prev, "\"" | "``" | "“" | "‘" | "(" | "[" | "{") {
            return false;
        }
        j -= 1;
    }
    true
}

fn is_titlecase(word: &str) -> bool {
    let mut chars = word.chars();
    chars.next().is_some_and(char::is_uppercase) && chars.all(|c| !c.is_uppercase())
}

fn is_all_caps(word: &str) -> bool {
    word.chars().any(char::is_alphabetic) && word.chars().all(|c| !c.is_lowercase())
}

fn is_function_tag(tag: PosTag) -> bool {
    matches!(
        tag,
        PosTag::DT
            | PosTag::IN
            | PosTag::CC
            | PosTag::PRP
            | PosTag::PRPS
            | PosTag::MD
            | PosTag::TO
            | PosTag::WDT
            | PosTag::WP
            | PosTag::WPS
            | PosTag::WRB
            | PosTag::EX
            | PosTag::PDT
            | PosTag::RP
            | PosTag::UH
    )
}

pub(crate) fn is_be_form(lower: &str) -> bool {
    matches!(
        lower,
        "be" | "am" | "is" | "are" | "was" | "were" | "been" | "being" | "'re" | "'m"
    )
}

pub(crate) fn is_have_form(lower: &str) -> bool {
    matches!(lower, "have" | "has" | "had" | "having" | "'ve")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tagger() -> LexiconTagger {
        LexiconTagger::new(Arc::new(Lexicon::english().unwrap()))
    }

    fn tag_str(text: &str) -> Vec<(String, &'static str)> {
        let words: Vec<&str> = text.split_whitespace().collect();
        let tags = tagger().tag(&words);
        words
            .iter()
            .zip(tags)
            .map(|(w, t)| (w.to_string(), t.as_str()))
            .collect()
    }

    fn tags_of(text: &str) -> Vec<&'static str> {
        tag_str(text).into_iter().map(|(_, t)| t).collect()
    }

    #[test]
    fn test_headline_sentence() {
        let tagged = tag_str(
            "European authorities fined Google a record $ 5.1 billion on Wednesday for abusing its power",
        );
        let expected = [
            ("European", "JJ"),
            ("authorities", "NNS"),
            ("fined", "VBD"),
            ("Google", "NNP"),
            ("a", "DT"),
            ("record", "NN"),
            ("$", "$"),
            ("5.1", "CD"),
            ("billion", "CD"),
            ("on", "IN"),
            ("Wednesday", "NNP"),
            ("for", "IN"),
            ("abusing", "VBG"),
            ("its", "PRP$"),
            ("power", "NN"),
        ];
        for (pair, (word, tag)) in tagged.iter().zip(expected) {
            assert_eq!(pair.0, word);
            assert_eq!(pair.1, tag, "tag for {}", word);
        }
    }

    #[test]
    fn test_infinitive_after_to() {
        assert_eq!(
            tags_of("ordered the company to alter its practices"),
            vec!["VBD", "DT", "NN", "TO", "VB", "PRP$", "NNS"]
        );
    }

    #[test]
    fn test_participle_after_auxiliary() {
        assert_eq!(tags_of("Google was fined"), vec!["NNP", "VBD", "VBN"]);
        assert_eq!(tags_of("they have ordered"), vec!["PRP", "VBP", "VBN"]);
    }

    #[test]
    fn test_modal_and_present_tense() {
        assert_eq!(tags_of("we will appeal"), vec!["PRP", "MD", "VB"]);
        assert_eq!(tags_of("they use phones"), vec!["PRP", "VBP", "NNS"]);
    }

    #[test]
    fn test_noun_preferred_word_as_present_verb() {
        assert_eq!(
            tags_of("Regulators fine companies ."),
            vec!["NNS", "VBP", "NNS", "."]
        );
        assert_eq!(tags_of("they record the calls")[1], "VBP");
        assert_eq!(tags_of("the fine companies")[1], "NN");
    }

    #[test]
    fn test_unknown_words_by_shape() {
        assert_eq!(tags_of("quickly"), vec!["RB"]);
        assert_eq!(tags_of("the regulators"), vec!["DT", "NNS"]);
        assert_eq!(tags_of("in 2018"), vec!["IN", "CD"]);
        assert_eq!(tags_of("the 5th"), vec!["DT", "JJ"]);
    }

    #[test]
    fn test_punctuation_tags() {
        assert_eq!(
            tags_of("\" Stop , \" she said ."),
            vec!["``", "VB", ",", "''", "PRP", "VBD", "."]
        );
        assert_eq!(tags_of("( 5 % )"), vec!["-LRB-", "CD", "NN", "-RRB-"]);
    }

    #[test]
    fn test_wh_words() {
        assert_eq!(tags_of("who knows"), vec!["WP", "VBZ"]);
        assert_eq!(tags_of("the company that sells"), vec!["DT", "NN", "WDT", "VBZ"]);
    }

    #[test]
    fn test_possessive_clitic() {
        assert_eq!(tags_of("Google 's power"), vec!["NNP", "POS", "NN"]);
        assert_eq!(tags_of("it 's over"), vec!["PRP", "VBZ", "IN"]);
    }

    #[test]
    fn test_one_tag_per_word() {
        let words = ["a", "b", "c", "!", "?"];
        assert_eq!(tagger().tag(&words).len(), words.len());
        assert!(tagger().tag(&[]).is_empty());
    }
}
