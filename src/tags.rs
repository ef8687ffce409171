//! Closed tag sets: fine-grained Penn Treebank tags, coarse universal
//! categories, dependency labels and entity labels.
//!
//! Every set is a plain enum with a canonical string form. Parsing a string
//! outside the set fails with [`NlpError::UnsupportedTag`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::NlpError;

/// Declares a closed tag enum with `as_str`, `ALL`, `Display` and `FromStr`.
macro_rules! closed_tagset {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => $text:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $text)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.pad(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = NlpError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    other => Err(NlpError::UnsupportedTag(format!(
                        "{} is not a valid {}",
                        other,
                        stringify!($name)
                    ))),
                }
            }
        }
    };
}

closed_tagset! {
    /// Fine-grained part-of-speech tag (Penn Treebank, plus the extensions
    /// used by common English parsers for hyphens, whitespace and the like).
    PosTag {
        CC => "CC",
        CD => "CD",
        DT => "DT",
        EX => "EX",
        FW => "FW",
        IN => "IN",
        JJ => "JJ",
        JJR => "JJR",
        JJS => "JJS",
        LS => "LS",
        MD => "MD",
        NN => "NN",
        NNS => "NNS",
        NNP => "NNP",
        NNPS => "NNPS",
        PDT => "PDT",
        POS => "POS",
        PRP => "PRP",
        PRPS => "PRP$",
        RB => "RB",
        RBR => "RBR",
        RBS => "RBS",
        RP => "RP",
        SYM => "SYM",
        TO => "TO",
        UH => "UH",
        VB => "VB",
        VBD => "VBD",
        VBG => "VBG",
        VBN => "VBN",
        VBP => "VBP",
        VBZ => "VBZ",
        WDT => "WDT",
        WP => "WP",
        WPS => "WP$",
        WRB => "WRB",
        Period => ".",
        Comma => ",",
        Colon => ":",
        OpenQuote => "``",
        CloseQuote => "''",
        LeftParen => "-LRB-",
        RightParen => "-RRB-",
        Dollar => "$",
        Hash => "#",
        HYPH => "HYPH",
        NFP => "NFP",
        Space => "_SP",
        ADD => "ADD",
        AFX => "AFX",
        XX => "XX",
    }
}

closed_tagset! {
    /// Coarse universal part-of-speech category.
    UPos {
        Adj => "ADJ",
        Adp => "ADP",
        Adv => "ADV",
        Aux => "AUX",
        Cconj => "CCONJ",
        Det => "DET",
        Intj => "INTJ",
        Noun => "NOUN",
        Num => "NUM",
        Part => "PART",
        Pron => "PRON",
        Propn => "PROPN",
        Punct => "PUNCT",
        Sconj => "SCONJ",
        Sym => "SYM",
        Verb => "VERB",
        X => "X",
        Space => "SPACE",
    }
}

closed_tagset! {
    /// Dependency relation between a token and its head.
    DepLabel {
        Root => "ROOT",
        Nsubj => "nsubj",
        Dobj => "dobj",
        Dative => "dative",
        Pobj => "pobj",
        Prep => "prep",
        Det => "det",
        Amod => "amod",
        Compound => "compound",
        Nummod => "nummod",
        Quantmod => "quantmod",
        Poss => "poss",
        Case => "case",
        Aux => "aux",
        Neg => "neg",
        Advmod => "advmod",
        Prt => "prt",
        Attr => "attr",
        Acomp => "acomp",
        Xcomp => "xcomp",
        Mark => "mark",
        Cc => "cc",
        Conj => "conj",
        Punct => "punct",
        Npadvmod => "npadvmod",
        Pcomp => "pcomp",
        Appos => "appos",
        Acl => "acl",
        Relcl => "relcl",
        Advcl => "advcl",
        Ccomp => "ccomp",
        Expl => "expl",
        Dep => "dep",
    }
}

closed_tagset! {
    /// Named-entity category.
    EntityLabel {
        Person => "PERSON",
        Norp => "NORP",
        Fac => "FAC",
        Org => "ORG",
        Gpe => "GPE",
        Loc => "LOC",
        Product => "PRODUCT",
        Event => "EVENT",
        WorkOfArt => "WORK_OF_ART",
        Law => "LAW",
        Language => "LANGUAGE",
        Date => "DATE",
        Time => "TIME",
        Percent => "PERCENT",
        Money => "MONEY",
        Quantity => "QUANTITY",
        Ordinal => "ORDINAL",
        Cardinal => "CARDINAL",
    }
}

impl PosTag {
    /// Default coarse category for this tag.
    ///
    /// This mapping always reports `VERB` for verb tags. Auxiliary use is
    /// decided from lemmas and attachments in `dependency::coarse_tags`.
    pub fn coarse(&self) -> UPos {
        use PosTag::*;
        match self {
            CC => UPos::Cconj,
            CD => UPos::Num,
            DT | PDT | WDT => UPos::Det,
            EX | PRP | PRPS | WP | WPS => UPos::Pron,
            FW | LS | ADD | XX => UPos::X,
            IN | RP => UPos::Adp,
            JJ | JJR | JJS | AFX => UPos::Adj,
            MD => UPos::Aux,
            NN | NNS => UPos::Noun,
            NNP | NNPS => UPos::Propn,
            POS | TO => UPos::Part,
            RB | RBR | RBS | WRB => UPos::Adv,
            SYM | Dollar | Hash => UPos::Sym,
            UH => UPos::Intj,
            VB | VBD | VBG | VBN | VBP | VBZ => UPos::Verb,
            Period | Comma | Colon | OpenQuote | CloseQuote | LeftParen | RightParen | HYPH
            | NFP => UPos::Punct,
            Space => UPos::Space,
        }
    }

    pub fn is_noun(&self) -> bool {
        matches!(self, PosTag::NN | PosTag::NNS | PosTag::NNP | PosTag::NNPS)
    }

    pub fn is_proper_noun(&self) -> bool {
        matches!(self, PosTag::NNP | PosTag::NNPS)
    }

    pub fn is_verb(&self) -> bool {
        matches!(
            self,
            PosTag::VB | PosTag::VBD | PosTag::VBG | PosTag::VBN | PosTag::VBP | PosTag::VBZ
        )
    }

    /// Verb forms that can head a clause on their own.
    pub fn is_finite_verb(&self) -> bool {
        matches!(self, PosTag::VBD | PosTag::VBP | PosTag::VBZ | PosTag::MD)
    }

    pub fn is_adjective(&self) -> bool {
        matches!(self, PosTag::JJ | PosTag::JJR | PosTag::JJS)
    }

    pub fn is_adverb(&self) -> bool {
        matches!(self, PosTag::RB | PosTag::RBR | PosTag::RBS)
    }

    pub fn is_punct(&self) -> bool {
        self.coarse() == UPos::Punct
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pos_tag_round_trips_through_str() {
        for tag in PosTag::ALL {
            assert_eq!(tag.as_str().parse::<PosTag>().unwrap(), *tag);
        }
    }

    #[test]
    fn test_unknown_tag_is_rejected() {
        let err = "NOPE".parse::<PosTag>().unwrap_err();
        assert!(matches!(err, NlpError::UnsupportedTag(_)));
    }

    #[test]
    fn test_special_tag_spellings() {
        assert_eq!(PosTag::PRPS.as_str(), "PRP$");
        assert_eq!(PosTag::WPS.as_str(), "WP$");
        assert_eq!(PosTag::Space.as_str(), "_SP");
        assert_eq!("-LRB-".parse::<PosTag>().unwrap(), PosTag::LeftParen);
    }

    #[test]
    fn test_coarse_mapping() {
        assert_eq!(PosTag::NNS.coarse(), UPos::Noun);
        assert_eq!(PosTag::NNP.coarse(), UPos::Propn);
        assert_eq!(PosTag::VBD.coarse(), UPos::Verb);
        assert_eq!(PosTag::Comma.coarse(), UPos::Punct);
        assert_eq!(PosTag::Space.coarse(), UPos::Space);
        assert_eq!(PosTag::TO.coarse(), UPos::Part);
        assert_eq!(PosTag::Dollar.coarse(), UPos::Sym);
    }

    #[test]
    fn test_serde_uses_canonical_strings() {
        let json = serde_json::to_string(&PosTag::PRPS).unwrap();
        assert_eq!(json, "\"PRP$\"");
        let label: EntityLabel = serde_json::from_str("\"MONEY\"").unwrap();
        assert_eq!(label, EntityLabel::Money);
        assert_eq!(DepLabel::Root.to_string(), "ROOT");
    }
}
