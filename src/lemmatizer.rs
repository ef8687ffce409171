//! Lemmatization from fine tags.
//!
//! Irregular forms come from the lexicon's lemma column. Regular inflections
//! are undone by suffix rules, preferring candidates the lexicon knows.

use std::sync::Arc;

use crate::model::Lexicon;
use crate::tags::PosTag;
use crate::tagger::plural_bases;

/// Stem endings after which a dropped final "e" is restored
/// ("creat" -> "create", "abus" -> "abuse").
const E_RESTORING_ENDINGS: &[&str] = &[
    "at", "iz", "is", "us", "ur", "ud", "ut", "ag", "av", "ev", "iv", "ov", "c", "g", "bl", "dl",
    "gl", "kl", "pl", "tl", "zl",
];

#[derive(Debug, Clone)]
pub struct Lemmatizer {
    lexicon: Arc<Lexicon>,
}

impl Lemmatizer {
    pub fn new(lexicon: Arc<Lexicon>) -> Self {
        Self { lexicon }
    }

    /// Base form of `word` read as `tag`.
    pub fn lemmatize(&self, word: &str, tag: PosTag) -> String {
        if tag.is_proper_noun() {
            return word.to_string();
        }
        if matches!(word, "'s" | "’s") {
            return if tag == PosTag::VBZ { "be" } else { "'s" }.to_string();
        }

        if let Some(entry) = self.lexicon.lookup(word) {
            if entry.allows(tag) {
                return match &entry.lemma {
                    Some(lemma) => lemma.clone(),
                    None => word.to_lowercase(),
                };
            }
        }

        let lower = word.to_lowercase();
        if !lower.chars().all(char::is_alphabetic) {
            return lower;
        }

        match tag {
            PosTag::NNS => self.singular(&lower),
            PosTag::VBZ => self.verb_from_s(&lower),
            PosTag::VBD | PosTag::VBN => self.verb_from_suffix(&lower, "ed"),
            PosTag::VBG => self.verb_from_suffix(&lower, "ing"),
            PosTag::JJR => adjective_base(&lower, "er"),
            PosTag::JJS => adjective_base(&lower, "est"),
            _ => lower,
        }
    }

    fn singular(&self, lower: &str) -> String {
        let bases = plural_bases(lower);
        if let Some(known) = bases.iter().find(|b| self.lexicon.is_noun_base(b)) {
            return known.clone();
        }
        regular_s_base(lower)
    }

    fn verb_from_s(&self, lower: &str) -> String {
        let bases = plural_bases(lower);
        if let Some(known) = bases.iter().find(|b| self.lexicon.is_verb_base(b)) {
            return known.clone();
        }
        regular_s_base(lower)
    }

    /// Undo "-ed" / "-ing": fined -> fine, ordered -> order, stopped -> stop,
    /// denied -> deny, abusing -> abuse, running -> run.
    fn verb_from_suffix(&self, lower: &str, suffix: &str) -> String {
        let Some(stem) = lower.strip_suffix(suffix) else {
            return lower.to_string();
        };
        if stem.len() < 2 {
            return lower.to_string();
        }

        let mut candidates = vec![stem.to_string(), format!("{}e", stem)];
        if let Some(undoubled) = undouble(stem) {
            candidates.push(undoubled);
        }
        if suffix == "ed" {
            if let Some(y_stem) = stem.strip_suffix('i') {
                candidates.push(format!("{}y", y_stem));
            }
        }
        if suffix == "ing" {
            if let Some(ie_stem) = stem.strip_suffix('y') {
                candidates.push(format!("{}ie", ie_stem));
            }
        }
        if let Some(known) = candidates.iter().find(|c| self.lexicon.is_verb_base(c)) {
            return known.clone();
        }

        if suffix == "ed" {
            if let Some(y_stem) = stem.strip_suffix('i') {
                return format!("{}y", y_stem);
            }
        }
        if let Some(undoubled) = undouble(stem) {
            return undoubled;
        }
        if E_RESTORING_ENDINGS.iter().any(|e| stem.ends_with(e)) {
            return format!("{}e", stem);
        }
        stem.to_string()
    }
}

/// "stopp" -> "stop", but never "fall" -> "fal".
fn undouble(stem: &str) -> Option<String> {
    if stem.chars().count() < 3 {
        return None;
    }
    let mut rev = stem.chars().rev();
    let (last, before) = (rev.next()?, rev.next()?);
    let doubled = last == before
        && last.is_ascii_alphabetic()
        && !matches!(last, 'l' | 's' | 'z' | 'f')
        && !matches!(last, 'a' | 'e' | 'i' | 'o' | 'u');
    doubled.then(|| stem[..stem.len() - last.len_utf8()].to_string())
}

fn regular_s_base(lower: &str) -> String {
    if let Some(stem) = lower.strip_suffix("ies") {
        if stem.len() > 1 {
            return format!("{}y", stem);
        }
    }
    for sibilant in ["sses", "xes", "zes", "ches", "shes"] {
        if lower.ends_with(sibilant) {
            return lower[..lower.len() - 2].to_string();
        }
    }
    match lower.strip_suffix('s') {
        Some(stem) if !stem.is_empty() && !stem.ends_with('s') => stem.to_string(),
        _ => lower.to_string(),
    }
}

fn adjective_base(lower: &str, suffix: &str) -> String {
    let Some(stem) = lower.strip_suffix(suffix) else {
        return lower.to_string();
    };
    if stem.len() < 2 {
        return lower.to_string();
    }
    if let Some(y_stem) = stem.strip_suffix('i') {
        return format!("{}y", y_stem);
    }
    undouble(stem).unwrap_or_else(|| stem.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lemmatizer() -> Lemmatizer {
        Lemmatizer::new(Arc::new(Lexicon::english().unwrap()))
    }

    #[test]
    fn test_regular_verbs() {
        let l = lemmatizer();
        assert_eq!(l.lemmatize("fined", PosTag::VBD), "fine");
        assert_eq!(l.lemmatize("ordered", PosTag::VBD), "order");
        assert_eq!(l.lemmatize("abusing", PosTag::VBG), "abuse");
        assert_eq!(l.lemmatize("stopped", PosTag::VBD), "stop");
        assert_eq!(l.lemmatize("denied", PosTag::VBN), "deny");
        assert_eq!(l.lemmatize("alters", PosTag::VBZ), "alter");
    }

    #[test]
    fn test_unknown_verbs_use_rules() {
        let l = lemmatizer();
        assert_eq!(l.lemmatize("regulated", PosTag::VBN), "regulate");
        assert_eq!(l.lemmatize("grabbed", PosTag::VBD), "grab");
        assert_eq!(l.lemmatize("jumped", PosTag::VBD), "jump");
        assert_eq!(l.lemmatize("copied", PosTag::VBD), "copy");
    }

    #[test]
    fn test_irregular_forms_from_lexicon() {
        let l = lemmatizer();
        assert_eq!(l.lemmatize("was", PosTag::VBD), "be");
        assert_eq!(l.lemmatize("took", PosTag::VBD), "take");
        assert_eq!(l.lemmatize("people", PosTag::NNS), "person");
        assert_eq!(l.lemmatize("better", PosTag::JJR), "good");
        assert_eq!(l.lemmatize("n't", PosTag::RB), "not");
    }

    #[test]
    fn test_plural_nouns() {
        let l = lemmatizer();
        assert_eq!(l.lemmatize("authorities", PosTag::NNS), "authority");
        assert_eq!(l.lemmatize("practices", PosTag::NNS), "practice");
        assert_eq!(l.lemmatize("boxes", PosTag::NNS), "box");
        assert_eq!(l.lemmatize("regulators", PosTag::NNS), "regulator");
        assert_eq!(l.lemmatize("glass", PosTag::NN), "glass");
    }

    #[test]
    fn test_clitic_s() {
        let l = lemmatizer();
        assert_eq!(l.lemmatize("'s", PosTag::VBZ), "be");
        assert_eq!(l.lemmatize("'s", PosTag::POS), "'s");
    }

    #[test]
    fn test_proper_nouns_keep_case() {
        let l = lemmatizer();
        assert_eq!(l.lemmatize("Google", PosTag::NNP), "Google");
        assert_eq!(l.lemmatize("The", PosTag::DT), "the");
    }

    #[test]
    fn test_comparatives() {
        let l = lemmatizer();
        assert_eq!(l.lemmatize("bigger", PosTag::JJR), "big");
        assert_eq!(l.lemmatize("happiest", PosTag::JJS), "happy");
    }

    #[test]
    fn test_multibyte_stems() {
        let l = lemmatizer();
        // Both characters end in two identical continuation bytes.
        assert_eq!(l.lemmatize("x啕ed", PosTag::VBD), "x啕");
        assert_eq!(l.lemmatize("啕ing", PosTag::VBG), "啕");
        assert_eq!(l.lemmatize("xततed", PosTag::VBD), "xतत");
        assert_eq!(l.lemmatize("x啕er", PosTag::JJR), "x啕");
        assert_eq!(l.lemmatize("müdded", PosTag::VBD), "müd");
    }
}
