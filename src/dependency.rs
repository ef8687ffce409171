//! Rule-based dependency attachment.
//!
//! Each sentence is reduced to nominal groups (noun chunks, pronouns and
//! money/number runs) and verb groups (auxiliaries, adverbs and a main
//! verb). Groups are attached to each other by position, then the remaining
//! single tokens are attached to the nearest plausible head. Heads never
//! leave their sentence, and every sentence has exactly one root.

use crate::chunker::NounChunker;
use crate::doc::{NounChunk, Span};
use crate::tags::{DepLabel, PosTag, UPos};

/// Subordinating words that introduce a clause rather than a prepositional
/// object when a finite verb follows their noun phrase.
const SUBORDINATORS: &[&str] = &[
    "that", "because", "if", "while", "although", "though", "since", "whether", "unless", "after",
    "before", "until", "once",
];

/// Head and relation of one token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attachment {
    pub head: usize,
    pub dep: DepLabel,
}

#[derive(Debug, Clone, Copy)]
struct VerbGroup {
    start: usize,
    end: usize,
    main: usize,
    finite: bool,
}

#[derive(Debug, Clone, Copy)]
struct Attached {
    group: NounChunk,
    head: usize,
    dep: DepLabel,
}

#[derive(Debug, Clone, Default)]
pub struct DependencyParser {
    chunker: NounChunker,
}

impl DependencyParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach every token to a head within its sentence.
    pub fn parse(&self, tags: &[PosTag], lemmas: &[String], sents: &[Span]) -> Vec<Attachment> {
        let mut out: Vec<Attachment> = (0..tags.len())
            .map(|i| Attachment {
                head: i,
                dep: DepLabel::Root,
            })
            .collect();

        for &sent in sents {
            let mut groups = self.chunker.nominal_groups(tags, sent);
            groups.extend(number_groups(tags, sent, &groups));
            groups.sort_by_key(|g| g.span.start);

            let clause = Clause {
                tags,
                lemmas,
                sent,
                verbs: verb_groups(tags, sent),
                groups,
            };
            clause.attach(&mut out);
        }

        out
    }
}

/// Coarse categories after attachment: `be` and auxiliary `have`/`do` are
/// `AUX`, everything else keeps its tag's default category.
pub fn coarse_tags(tags: &[PosTag], lemmas: &[String], attachments: &[Attachment]) -> Vec<UPos> {
    tags.iter()
        .zip(lemmas)
        .zip(attachments)
        .map(|((tag, lemma), arc)| {
            if tag.is_verb() && (lemma == "be" || arc.dep == DepLabel::Aux) {
                UPos::Aux
            } else {
                tag.coarse()
            }
        })
        .collect()
}

/// Currency amounts ("$ 5.1 billion", root on the symbol) and bare number
/// runs not already inside a noun chunk.
fn number_groups(tags: &[PosTag], sent: Span, chunks: &[NounChunk]) -> Vec<NounChunk> {
    let covered = |i: usize| chunks.iter().any(|c| c.span.contains(i));
    let mut groups = Vec::new();
    let mut i = sent.start;

    while i < sent.end {
        if covered(i) {
            i += 1;
            continue;
        }
        let symbol = matches!(tags[i], PosTag::Dollar | PosTag::Hash);
        let first_number = if symbol { i + 1 } else { i };
        let mut end = first_number;
        while end < sent.end && tags[end] == PosTag::CD && !covered(end) {
            end += 1;
        }
        if end == first_number {
            i += 1;
            continue;
        }
        let root = if symbol { i } else { end - 1 };
        groups.push(NounChunk {
            span: Span::new(i, end),
            root,
        });
        i = end;
    }

    groups
}

fn verb_groups(tags: &[PosTag], sent: Span) -> Vec<VerbGroup> {
    let mut groups = Vec::new();
    let mut i = sent.start;

    while i < sent.end {
        if !(tags[i].is_verb() || tags[i] == PosTag::MD) {
            i += 1;
            continue;
        }
        let start = i;
        let mut main = i;
        let mut end = i + 1;
        loop {
            let mut k = end;
            while k < sent.end && tags[k].is_adverb() {
                k += 1;
            }
            if k < sent.end && tags[k].is_verb() {
                main = k;
                end = k + 1;
            } else {
                break;
            }
        }
        groups.push(VerbGroup {
            start,
            end,
            main,
            finite: (start..end).any(|t| tags[t].is_finite_verb()),
        });
        i = end;
    }

    groups
}

struct Clause<'a> {
    tags: &'a [PosTag],
    lemmas: &'a [String],
    sent: Span,
    verbs: Vec<VerbGroup>,
    groups: Vec<NounChunk>,
}

impl Clause<'_> {
    fn attach(&self, out: &mut [Attachment]) {
        let root = self.root();
        for t in self.sent.start..self.sent.end {
            out[t] = Attachment {
                head: root,
                dep: DepLabel::Dep,
            };
        }
        out[root] = Attachment {
            head: root,
            dep: DepLabel::Root,
        };

        let mut assigned = vec![false; self.sent.len()];
        let mut set = |out: &mut [Attachment], t: usize, head: usize, dep: DepLabel| {
            if t != root {
                out[t] = Attachment { head, dep };
            }
            assigned[t - self.sent.start] = true;
        };

        for vg in &self.verbs {
            self.attach_verb_group(vg, root, out, &mut set);
        }
        for group in &self.groups {
            self.attach_inside_group(group, out, &mut set);
        }
        self.attach_nominals(root, out, &mut set);
        drop(set);

        for t in self.sent.start..self.sent.end {
            if assigned[t - self.sent.start] || t == root {
                continue;
            }
            let (head, dep) = self.attach_single(t, root);
            out[t] = Attachment { head, dep };
        }

        self.break_cycles(root, out);
    }

    /// First finite clause verb; otherwise the first verb, the first
    /// nominal, or the first non-punctuation token.
    fn root(&self) -> usize {
        let clausal = self.verbs.iter().find(|vg| {
            vg.finite
                && !self.is_infinitive(vg)
                && !self.follows_preposition(vg)
                && self.relative_antecedent(vg).is_none()
        });
        if let Some(vg) = clausal.or(self.verbs.first()) {
            return vg.main;
        }
        if let Some(group) = self.groups.first() {
            return group.root;
        }
        (self.sent.start..self.sent.end)
            .find(|&t| !self.tags[t].is_punct() && self.tags[t] != PosTag::Space)
            .unwrap_or(self.sent.start)
    }

    fn attach_verb_group(
        &self,
        vg: &VerbGroup,
        root: usize,
        out: &mut [Attachment],
        set: &mut impl FnMut(&mut [Attachment], usize, usize, DepLabel),
    ) {
        for t in vg.start..vg.end {
            if t == vg.main {
                continue;
            }
            let dep = if self.tags[t].is_adverb() {
                if self.lemmas[t] == "not" {
                    DepLabel::Neg
                } else {
                    DepLabel::Advmod
                }
            } else {
                DepLabel::Aux
            };
            set(out, t, vg.main, dep);
        }

        if self.is_infinitive(vg) {
            set(out, vg.start - 1, vg.main, DepLabel::Aux);
        }
        if vg.main == root {
            set(out, vg.main, root, DepLabel::Root);
            return;
        }

        let before = self.before(vg.start);
        let (head, dep) = if self.follows_preposition(vg) {
            (vg.start - 1, DepLabel::Pcomp)
        } else if self.is_infinitive(vg) {
            match self.prev_main(vg.start - 1) {
                Some(v) => (v, DepLabel::Xcomp),
                None => (root, DepLabel::Advcl),
            }
        } else if let Some((pronoun, antecedent)) = self.relative_antecedent(vg) {
            if self.tags[pronoun] == PosTag::WDT {
                set(out, pronoun, vg.main, DepLabel::Nsubj);
            }
            (antecedent, DepLabel::Relcl)
        } else if let Some(cc) = before.filter(|&b| self.tags[b] == PosTag::CC) {
            let first = if vg.finite {
                self.prev_finite_main(cc).or_else(|| self.prev_main(cc))
            } else {
                self.prev_main(cc)
            };
            let head = first.unwrap_or(root);
            set(out, cc, head, DepLabel::Cc);
            (head, DepLabel::Conj)
        } else if let Some(group) = self
            .groups
            .iter()
            .find(|g| !vg.finite && g.span.end == vg.start)
        {
            (group.root, DepLabel::Acl)
        } else if vg.finite {
            match self.prev_main(vg.start) {
                Some(v) => (v, DepLabel::Ccomp),
                None => (root, DepLabel::Dep),
            }
        } else {
            (root, DepLabel::Advcl)
        };
        set(out, vg.main, head, dep);
    }

    fn attach_inside_group(
        &self,
        group: &NounChunk,
        out: &mut [Attachment],
        set: &mut impl FnMut(&mut [Attachment], usize, usize, DepLabel),
    ) {
        let span = group.span;
        let possessive = (span.start..span.end).find(|&t| self.tags[t] == PosTag::POS);
        let symbol_root = matches!(self.tags[group.root], PosTag::Dollar | PosTag::Hash);
        let last_number = (span.start..span.end)
            .rev()
            .find(|&t| self.tags[t] == PosTag::CD);

        for t in span.start..span.end {
            if t == group.root {
                continue;
            }
            let (head, dep) = match possessive {
                // "Google 's power": the possessor hangs off the root.
                Some(p) if t == p => (p - 1, DepLabel::Case),
                Some(p) if t + 1 == p => (group.root, DepLabel::Poss),
                Some(p) if t + 1 < p => (p - 1, modifier_label(self.tags[t])),
                _ if symbol_root && Some(t) == last_number => (group.root, DepLabel::Nummod),
                _ if symbol_root => (last_number.unwrap_or(group.root), DepLabel::Compound),
                _ => (group.root, modifier_label(self.tags[t])),
            };
            set(out, t, head, dep);
        }
    }

    fn attach_nominals(
        &self,
        root: usize,
        out: &mut [Attachment],
        set: &mut impl FnMut(&mut [Attachment], usize, usize, DepLabel),
    ) {
        let mut attached: Vec<Attached> = Vec::new();
        let mut with_object: Vec<usize> = Vec::new();

        for (g, group) in self.groups.iter().enumerate() {
            let span = group.span;
            let prev = attached.last().filter(|a| a.group.span.end == span.start);
            let before = self.before(span.start);
            let subject_of = self
                .next_verb_group(span.end)
                .filter(|vg| vg.finite && self.only_adverbs(span.end, vg.start))
                .map(|vg| vg.main);

            let (head, dep) = if group.root == root {
                (root, DepLabel::Root)
            } else if let Some(b) = before.filter(|&b| matches!(self.tags[b], PosTag::IN | PosTag::TO)) {
                match subject_of {
                    Some(verb) if SUBORDINATORS.contains(&self.lemmas[b].as_str()) => {
                        set(out, b, verb, DepLabel::Mark);
                        (verb, DepLabel::Nsubj)
                    }
                    _ => (b, DepLabel::Pobj),
                }
            } else if let Some(conjunct) = before
                .filter(|&b| self.tags[b] == PosTag::CC)
                .and_then(|b| attached.iter().rev().find(|a| a.group.span.end == b))
            {
                let first = if conjunct.dep == DepLabel::Conj {
                    conjunct.head
                } else {
                    conjunct.group.root
                };
                set(out, span.start - 1, first, DepLabel::Cc);
                (first, DepLabel::Conj)
            } else if let Some(verb) = subject_of {
                (verb, DepLabel::Nsubj)
            } else if let Some(vg) = self.prev_verb_group(span.start) {
                let next_adjacent = self
                    .groups
                    .get(g + 1)
                    .is_some_and(|next| next.span.start == span.end);
                match prev {
                    Some(p) if matches!(p.dep, DepLabel::Dobj | DepLabel::Attr | DepLabel::Appos) => {
                        (p.group.root, DepLabel::Appos)
                    }
                    _ if self.lemmas[vg.main] == "be" => (vg.main, DepLabel::Attr),
                    _ if vg.end == span.start && next_adjacent => (vg.main, DepLabel::Dative),
                    _ if with_object.contains(&vg.main) => (vg.main, DepLabel::Npadvmod),
                    _ => {
                        with_object.push(vg.main);
                        (vg.main, DepLabel::Dobj)
                    }
                }
            } else if let Some(vg) = self.verbs.iter().find(|vg| {
                vg.start >= span.end
                    && vg.finite
                    && self.relative_antecedent(vg).is_none()
                    && !self.groups[g + 1..]
                        .iter()
                        .any(|other| other.span.start < vg.start)
            }) {
                (vg.main, DepLabel::Nsubj)
            } else {
                (root, DepLabel::Npadvmod)
            };

            set(out, group.root, head, dep);
            attached.push(Attached {
                group: *group,
                head,
                dep,
            });
        }
    }

    /// Head and relation for a token outside every group.
    fn attach_single(&self, t: usize, root: usize) -> (usize, DepLabel) {
        let tag = self.tags[t];
        let prev = self.prev_main(t);
        let next = self.next_verb_group(t + 1).map(|vg| vg.main);

        match tag {
            PosTag::IN | PosTag::TO => {
                let of_noun = (self.lemmas[t] == "of")
                    .then(|| self.groups.iter().find(|g| g.span.end == t))
                    .flatten();
                let head = of_noun
                    .map(|g| g.root)
                    .or(prev)
                    .or_else(|| {
                        self.groups
                            .iter()
                            .rev()
                            .find(|g| g.span.end <= t)
                            .map(|g| g.root)
                    })
                    .unwrap_or(root);
                (head, DepLabel::Prep)
            }
            PosTag::RP => (prev.unwrap_or(root), DepLabel::Prt),
            PosTag::RB | PosTag::RBR | PosTag::RBS | PosTag::WRB => {
                let dep = if self.lemmas[t] == "not" {
                    DepLabel::Neg
                } else {
                    DepLabel::Advmod
                };
                (prev.or(next).unwrap_or(root), dep)
            }
            PosTag::JJ | PosTag::JJR | PosTag::JJS => match prev {
                Some(v) => (v, DepLabel::Acomp),
                None => (root, DepLabel::Dep),
            },
            PosTag::CC => (prev.unwrap_or(root), DepLabel::Cc),
            PosTag::EX => (next.unwrap_or(root), DepLabel::Expl),
            _ if tag.is_punct() => (root, DepLabel::Punct),
            _ => (root, DepLabel::Dep),
        }
    }

    /// Reattach to the root any token whose head chain does not reach it.
    fn break_cycles(&self, root: usize, out: &mut [Attachment]) {
        let limit = self.sent.len();
        for t in self.sent.start..self.sent.end {
            let mut cur = t;
            let mut steps = 0;
            while cur != root && steps <= limit {
                cur = out[cur].head;
                steps += 1;
            }
            if cur != root || !self.sent.contains(out[t].head) {
                out[t] = Attachment {
                    head: root,
                    dep: DepLabel::Dep,
                };
            }
        }
    }

    fn before(&self, i: usize) -> Option<usize> {
        (i > self.sent.start).then(|| i - 1)
    }

    fn is_infinitive(&self, vg: &VerbGroup) -> bool {
        self.before(vg.start)
            .is_some_and(|b| self.tags[b] == PosTag::TO && self.tags[vg.start] == PosTag::VB)
    }

    fn follows_preposition(&self, vg: &VerbGroup) -> bool {
        self.tags[vg.main] == PosTag::VBG
            && self.before(vg.start).is_some_and(|b| self.tags[b] == PosTag::IN)
    }

    /// "the company, which altered": the relative pronoun and the root of
    /// the noun phrase it refers to.
    fn relative_antecedent(&self, vg: &VerbGroup) -> Option<(usize, usize)> {
        let pronoun = self
            .before(vg.start)
            .filter(|&p| matches!(self.tags[p], PosTag::WDT | PosTag::WP))?;
        let mut end = pronoun;
        if self.before(end).is_some_and(|c| self.tags[c] == PosTag::Comma) {
            end -= 1;
        }
        self.groups
            .iter()
            .find(|g| g.span.end == end)
            .map(|g| (pronoun, g.root))
    }

    fn prev_verb_group(&self, before: usize) -> Option<&VerbGroup> {
        self.verbs.iter().rev().find(|vg| vg.end <= before)
    }

    fn prev_main(&self, before: usize) -> Option<usize> {
        self.prev_verb_group(before).map(|vg| vg.main)
    }

    fn prev_finite_main(&self, before: usize) -> Option<usize> {
        self.verbs
            .iter()
            .rev()
            .find(|vg| vg.end <= before && vg.finite)
            .map(|vg| vg.main)
    }

    fn next_verb_group(&self, from: usize) -> Option<&VerbGroup> {
        self.verbs.iter().find(|vg| vg.start >= from)
    }

    fn only_adverbs(&self, from: usize, to: usize) -> bool {
        (from..to).all(|t| self.tags[t].is_adverb())
    }
}

fn modifier_label(tag: PosTag) -> DepLabel {
    match tag {
        PosTag::DT | PosTag::PDT | PosTag::WDT => DepLabel::Det,
        PosTag::PRPS | PosTag::WPS => DepLabel::Poss,
        PosTag::JJ | PosTag::JJR | PosTag::JJS => DepLabel::Amod,
        PosTag::CD => DepLabel::Nummod,
        PosTag::HYPH => DepLabel::Punct,
        t if t.is_noun() => DepLabel::Compound,
        _ => DepLabel::Dep,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use PosTag::*;

    fn parse(pairs: &[(&str, PosTag)]) -> Vec<Attachment> {
        let tags: Vec<PosTag> = pairs.iter().map(|(_, t)| *t).collect();
        let lemmas: Vec<String> = pairs.iter().map(|(w, _)| w.to_string()).collect();
        DependencyParser::new().parse(&tags, &lemmas, &[Span::new(0, tags.len())])
    }

    fn arc(head: usize, dep: DepLabel) -> Attachment {
        Attachment { head, dep }
    }

    #[test]
    fn test_headline_attachments() {
        let arcs = parse(&[
            ("european", JJ),    // 0
            ("authority", NNS),  // 1
            ("fine", VBD),       // 2
            ("Google", NNP),     // 3
            ("a", DT),           // 4
            ("record", NN),      // 5
            ("$", Dollar),       // 6
            ("5.1", CD),         // 7
            ("billion", CD),     // 8
            ("on", IN),          // 9
            ("Wednesday", NNP),  // 10
            ("for", IN),         // 11
            ("abuse", VBG),      // 12
            ("its", PRPS),       // 13
            ("power", NN),       // 14
            ("and", CC),         // 15
            ("order", VBD),      // 16
            ("the", DT),         // 17
            ("company", NN),     // 18
            ("to", TO),          // 19
            ("alter", VB),       // 20
            ("its", PRPS),       // 21
            ("practice", NNS),   // 22
            (".", Period),       // 23
        ]);

        assert_eq!(arcs[2], arc(2, DepLabel::Root));
        assert_eq!(arcs[0], arc(1, DepLabel::Amod));
        assert_eq!(arcs[1], arc(2, DepLabel::Nsubj));
        assert_eq!(arcs[3], arc(2, DepLabel::Dative));
        assert_eq!(arcs[5], arc(2, DepLabel::Dobj));
        assert_eq!(arcs[6], arc(5, DepLabel::Appos));
        assert_eq!(arcs[8], arc(6, DepLabel::Nummod));
        assert_eq!(arcs[7], arc(8, DepLabel::Compound));
        assert_eq!(arcs[9], arc(2, DepLabel::Prep));
        assert_eq!(arcs[10], arc(9, DepLabel::Pobj));
        assert_eq!(arcs[12], arc(11, DepLabel::Pcomp));
        assert_eq!(arcs[14], arc(12, DepLabel::Dobj));
        assert_eq!(arcs[13], arc(14, DepLabel::Poss));
        assert_eq!(arcs[15], arc(2, DepLabel::Cc));
        assert_eq!(arcs[16], arc(2, DepLabel::Conj));
        assert_eq!(arcs[18], arc(16, DepLabel::Dobj));
        assert_eq!(arcs[19], arc(20, DepLabel::Aux));
        assert_eq!(arcs[20], arc(16, DepLabel::Xcomp));
        assert_eq!(arcs[22], arc(20, DepLabel::Dobj));
        assert_eq!(arcs[23], arc(2, DepLabel::Punct));
    }

    #[test]
    fn test_auxiliaries_and_negation() {
        let arcs = parse(&[
            ("Google", NNP),
            ("have", VBZ),
            ("not", RB),
            ("be", VBN),
            ("fine", VBN),
        ]);
        assert_eq!(arcs[4], arc(4, DepLabel::Root));
        assert_eq!(arcs[0], arc(4, DepLabel::Nsubj));
        assert_eq!(arcs[1], arc(4, DepLabel::Aux));
        assert_eq!(arcs[2], arc(4, DepLabel::Neg));
        assert_eq!(arcs[3], arc(4, DepLabel::Aux));
    }

    #[test]
    fn test_copula_takes_attribute() {
        let arcs = parse(&[("it", PRP), ("be", VBZ), ("a", DT), ("fine", NN)]);
        assert_eq!(arcs[0], arc(1, DepLabel::Nsubj));
        assert_eq!(arcs[3], arc(1, DepLabel::Attr));
    }

    #[test]
    fn test_relative_clause() {
        let arcs = parse(&[
            ("the", DT),
            ("company", NN),
            (",", Comma),
            ("which", WDT),
            ("appeal", VBD),
            (",", Comma),
            ("pay", VBD),
        ]);
        assert_eq!(arcs[6], arc(6, DepLabel::Root));
        assert_eq!(arcs[1], arc(6, DepLabel::Nsubj));
        assert_eq!(arcs[4], arc(1, DepLabel::Relcl));
        assert_eq!(arcs[3], arc(4, DepLabel::Nsubj));
    }

    #[test]
    fn test_subordinate_clause() {
        let arcs = parse(&[
            ("regulator", NNS),
            ("say", VBD),
            ("that", IN),
            ("Google", NNP),
            ("abuse", VBD),
            ("power", NN),
        ]);
        assert_eq!(arcs[1], arc(1, DepLabel::Root));
        assert_eq!(arcs[3], arc(4, DepLabel::Nsubj));
        assert_eq!(arcs[2], arc(4, DepLabel::Mark));
        assert_eq!(arcs[4], arc(1, DepLabel::Ccomp));
        assert_eq!(arcs[5], arc(4, DepLabel::Dobj));
    }

    #[test]
    fn test_verbless_fragment() {
        let arcs = parse(&[("record", NN), ("fine", NN), ("for", IN), ("Google", NNP)]);
        assert_eq!(arcs[1], arc(1, DepLabel::Root));
        assert_eq!(arcs[2], arc(1, DepLabel::Prep));
        assert_eq!(arcs[3], arc(2, DepLabel::Pobj));
    }

    #[test]
    fn test_heads_stay_in_sentence_and_reach_root() {
        let tags = [NNP, VBD, Period, PRP, VBD, NNS, Period];
        let lemmas: Vec<String> = ["Google", "pay", ".", "it", "appeal", "fine", "."]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let sents = [Span::new(0, 3), Span::new(3, 7)];
        let arcs = DependencyParser::new().parse(&tags, &lemmas, &sents);

        for sent in sents {
            let roots = (sent.start..sent.end).filter(|&t| arcs[t].head == t).count();
            assert_eq!(roots, 1);
            for t in sent.start..sent.end {
                assert!(sent.contains(arcs[t].head));
                let mut cur = t;
                for _ in 0..sent.len() {
                    cur = arcs[cur].head;
                }
                assert_eq!(arcs[cur].dep, DepLabel::Root);
            }
        }
    }

    #[test]
    fn test_coarse_tags_mark_auxiliaries() {
        let tags = [PRP, VBZ, VBN, NN];
        let lemmas: Vec<String> = ["it", "have", "pay", "fine"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let arcs = DependencyParser::new().parse(&tags, &lemmas, &[Span::new(0, 4)]);
        let coarse = coarse_tags(&tags, &lemmas, &arcs);
        assert_eq!(coarse, vec![UPos::Pron, UPos::Aux, UPos::Verb, UPos::Noun]);
    }
}
