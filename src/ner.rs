//! Named Entity Recognition over tagged tokens.
//!
//! Provides a `NerBackend` trait for pluggable extraction backends and a
//! built-in `RuleNerBackend` that combines gazetteers, number and date
//! shapes, and capitalization patterns.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;

use crate::doc::{Entity, Span, Token};
use crate::tags::{EntityLabel, PosTag};

/// Trait for pluggable NER backends.
///
/// Backends see the fully tagged and lemmatized tokens of a document and
/// its sentence spans. Returned entities must not overlap each other and
/// must not cross a sentence boundary.
pub trait NerBackend: Send + Sync {
    /// Human-readable backend identifier (e.g. "rules").
    fn backend_id(&self) -> &str;

    /// Extract named entities, in document order.
    fn extract(&self, tokens: &[Token], sents: &[Span]) -> Vec<Entity>;
}

// ============================================================================
// RuleNerBackend
// ============================================================================

/// Rule-based NER backend.
///
/// Scans each sentence left to right and keeps the first rule that matches
/// at each position: amounts, dates, gazetteer phrases (longest first),
/// organization suffixes, person names, then bare numbers.
pub struct RuleNerBackend;

impl RuleNerBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RuleNerBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl NerBackend for RuleNerBackend {
    fn backend_id(&self) -> &str {
        "rules"
    }

    fn extract(&self, tokens: &[Token], sents: &[Span]) -> Vec<Entity> {
        let mut entities = Vec::new();

        for sent in sents {
            let scan = Scan {
                tokens,
                limit: sent.end,
            };
            let mut i = sent.start;
            while i < sent.end {
                match scan.match_at(i) {
                    Some(entity) => {
                        i = entity.span.end;
                        entities.push(entity);
                    }
                    None => i += 1,
                }
            }
        }

        entities
    }
}

// ============================================================================
// Gazetteers
// ============================================================================

static KNOWN_AGENCIES: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "CIA", "FBI", "NSA", "NSC", "DOD", "DOJ", "DOE", "DIA", "DEA", "ATF", "FEMA", "DARPA",
        "USAID", "EPA", "IRS", "SEC", "FTC", "FCC", "FAA", "NASA", "NIST", "NIH", "CDC", "FDA",
        "USDA", "DHS", "NATO", "INTERPOL", "GAO", "OMB", "EU", "UN", "WTO", "IMF", "OECD",
    ]
    .into_iter()
    .collect()
});

static FULL_NAME_AGENCIES: LazyLock<Vec<&'static str>> = LazyLock::new(|| {
    vec![
        "Central Intelligence Agency",
        "Federal Bureau of Investigation",
        "National Security Agency",
        "Department of Defense",
        "Department of Justice",
        "Department of State",
        "Department of Homeland Security",
        "Federal Trade Commission",
        "Securities and Exchange Commission",
        "Bureau of Alcohol, Tobacco, Firearms and Explosives",
        "European Commission",
        "European Union",
        "European Parliament",
        "United Nations",
        "World Trade Organization",
        "Supreme Court",
        "White House",
        "State Department",
        "Pentagon",
        "Congress",
        "Senate",
        "Parliament",
    ]
});

static COMPANIES: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "Google", "Alphabet", "Apple", "Microsoft", "Amazon", "Facebook", "Meta", "Twitter",
        "Samsung", "IBM", "Intel", "Oracle", "Netflix", "Tesla", "Uber", "Yahoo", "Qualcomm",
        "Nokia", "Sony", "Reuters", "Bloomberg",
    ]
    .into_iter()
    .collect()
});

static PRODUCTS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    ["Android", "iPhone", "iPad", "Windows", "Chrome", "Gmail"]
        .into_iter()
        .collect()
});

static US_STATES: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "Alabama",
        "Alaska",
        "Arizona",
        "Arkansas",
        "California",
        "Colorado",
        "Connecticut",
        "Delaware",
        "Florida",
        "Georgia",
        "Hawaii",
        "Idaho",
        "Illinois",
        "Indiana",
        "Iowa",
        "Kansas",
        "Kentucky",
        "Louisiana",
        "Maine",
        "Maryland",
        "Massachusetts",
        "Michigan",
        "Minnesota",
        "Mississippi",
        "Missouri",
        "Montana",
        "Nebraska",
        "Nevada",
        "New Hampshire",
        "New Jersey",
        "New Mexico",
        "New York",
        "North Carolina",
        "North Dakota",
        "Ohio",
        "Oklahoma",
        "Oregon",
        "Pennsylvania",
        "Rhode Island",
        "South Carolina",
        "South Dakota",
        "Tennessee",
        "Texas",
        "Utah",
        "Vermont",
        "Virginia",
        "Washington",
        "West Virginia",
        "Wisconsin",
        "Wyoming",
    ]
    .into_iter()
    .collect()
});

static COUNTRIES_AND_CITIES: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "United States",
        "U.S.",
        "America",
        "United Kingdom",
        "U.K.",
        "Britain",
        "England",
        "France",
        "Germany",
        "Italy",
        "Spain",
        "Ireland",
        "Belgium",
        "Netherlands",
        "Sweden",
        "Russia",
        "Ukraine",
        "China",
        "Japan",
        "India",
        "Korea",
        "Canada",
        "Mexico",
        "Brazil",
        "Australia",
        "Israel",
        "Iran",
        "Iraq",
        "Afghanistan",
        "Pakistan",
        "Washington D.C.",
        "Brussels",
        "Paris",
        "Berlin",
        "Moscow",
        "London",
        "Tokyo",
        "Beijing",
        "Havana",
        "Baghdad",
        "Kabul",
        "Tehran",
        "Langley",
        "Quantico",
        "San Francisco",
        "Los Angeles",
        "Chicago",
        "Boston",
    ]
    .into_iter()
    .collect()
});

static REGIONS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "Europe",
        "Asia",
        "Africa",
        "North America",
        "South America",
        "Latin America",
        "Middle East",
        "Silicon Valley",
        "Atlantic",
        "Pacific",
        "Mediterranean",
    ]
    .into_iter()
    .collect()
});

static NATIONALITIES: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "European", "Europeans", "American", "Americans", "British", "French", "German",
        "Germans", "Italian", "Spanish", "Irish", "Dutch", "Belgian", "Swedish", "Russian",
        "Russians", "Ukrainian", "Chinese", "Japanese", "Indian", "Korean", "Canadian", "Mexican",
        "Brazilian", "Australian", "Israeli", "Iranian", "Iraqi", "Afghan", "Pakistani", "Soviet",
        "African", "Asian", "Arab", "Muslim", "Christian", "Jewish", "Catholic", "Democrat",
        "Democrats", "Republican", "Republicans",
    ]
    .into_iter()
    .collect()
});

/// Every gazetteer phrase with its label.
static GAZETTEER: LazyLock<HashMap<&'static str, EntityLabel>> = LazyLock::new(|| {
    let mut map = HashMap::new();
    map.extend(NATIONALITIES.iter().map(|p| (*p, EntityLabel::Norp)));
    map.extend(REGIONS.iter().map(|p| (*p, EntityLabel::Loc)));
    map.extend(US_STATES.iter().map(|p| (*p, EntityLabel::Gpe)));
    map.extend(COUNTRIES_AND_CITIES.iter().map(|p| (*p, EntityLabel::Gpe)));
    map.extend(PRODUCTS.iter().map(|p| (*p, EntityLabel::Product)));
    map.extend(COMPANIES.iter().map(|p| (*p, EntityLabel::Org)));
    map.extend(KNOWN_AGENCIES.iter().map(|p| (*p, EntityLabel::Org)));
    map.extend(FULL_NAME_AGENCIES.iter().map(|p| (*p, EntityLabel::Org)));
    map
});

/// Longest gazetteer phrase, in tokens.
const MAX_PHRASE_TOKENS: usize = 10;

// ============================================================================
// Dates, amounts and names
// ============================================================================

static WEEKDAYS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "Monday",
        "Tuesday",
        "Wednesday",
        "Thursday",
        "Friday",
        "Saturday",
        "Sunday",
    ]
    .into_iter()
    .collect()
});

static MONTHS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "January",
        "February",
        "March",
        "April",
        "May",
        "June",
        "July",
        "August",
        "September",
        "October",
        "November",
        "December",
        "Jan.",
        "Feb.",
        "Aug.",
        "Sept.",
        "Oct.",
        "Nov.",
        "Dec.",
    ]
    .into_iter()
    .collect()
});

const RELATIVE_DAYS: &[&str] = &["today", "yesterday", "tomorrow"];
const RELATIVE_PERIODS: &[&str] = &["week", "month", "year", "weekend", "quarter", "decade"];
const RELATIVE_MODIFIERS: &[&str] = &["last", "next", "this", "past"];

const CURRENCY_SYMBOLS: &[&str] = &["$", "€", "£", "¥", "US$"];
const CURRENCY_WORDS: &[&str] = &[
    "dollar", "euro", "pound", "yen", "yuan", "cent", "rupee", "franc",
];
const PERCENT_WORDS: &[&str] = &["%", "percent"];
const TIME_MARKERS: &[&str] = &["a.m.", "p.m.", "am", "pm", "o'clock"];
const UNITS: &[&str] = &[
    "mile", "kilometer", "kilometre", "km", "meter", "metre", "foot", "feet", "inch", "ton",
    "tonne", "kilogram", "kg", "gram", "liter", "litre", "gallon", "acre", "degree",
];
const ORDINAL_WORDS: &[&str] = &[
    "first", "second", "third", "fourth", "fifth", "sixth", "seventh", "eighth", "ninth", "tenth",
];

static YEAR_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:1[5-9]|20)\d{2}$").expect("year pattern should compile")
});

static DECADE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:(?:1[5-9]|20)\d0|'\d0)s$").expect("decade pattern should compile")
});

static DATE_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{1,4}[-/]\d{1,2}[-/]\d{1,4}$").expect("date shape pattern should compile")
});

static DAY_OF_MONTH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[12]?\d|3[01])(?:st|nd|rd|th)?$").expect("day pattern should compile")
});

static CLOCK_TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[01]?\d|2[0-3]):[0-5]\d$").expect("clock pattern should compile")
});

static ORDINAL_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d+(?:st|nd|rd|th)$").expect("ordinal pattern should compile")
});

/// Words that precede a person's name and are not part of it.
static PERSON_TITLES: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "President",
        "Secretary",
        "Director",
        "General",
        "Admiral",
        "Colonel",
        "Captain",
        "Lieutenant",
        "Sergeant",
        "Agent",
        "Ambassador",
        "Senator",
        "Representative",
        "Governor",
        "Mayor",
        "Judge",
        "Justice",
        "Commissioner",
        "Chancellor",
        "Minister",
        "Mr.",
        "Mrs.",
        "Ms.",
        "Dr.",
        "Prof.",
    ]
    .into_iter()
    .collect()
});

// Capitalized phrases that are not names.
static NAME_STOPWORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "The United",
        "Top Secret",
        "National Security",
        "Foreign Affairs",
        "Prime Minister",
        "Chief Executive",
        "Vice President",
    ]
    .into_iter()
    .collect()
});

const ORG_SUFFIXES: &[&str] = &[
    "Inc.",
    "Inc",
    "Corp.",
    "Corporation",
    "Co.",
    "Company",
    "Ltd.",
    "LLC",
    "Group",
    "Bank",
    "University",
    "Agency",
    "Commission",
    "Institute",
    "Association",
    "Foundation",
    "Party",
];

// ============================================================================
// Matching
// ============================================================================

/// Matching state for one sentence.
struct Scan<'a> {
    tokens: &'a [Token],
    limit: usize,
}

impl Scan<'_> {
    fn match_at(&self, i: usize) -> Option<Entity> {
        self.match_money(i)
            .or_else(|| self.match_number_with(i, PERCENT_WORDS, EntityLabel::Percent))
            .or_else(|| self.match_time(i))
            .or_else(|| self.match_number_with(i, UNITS, EntityLabel::Quantity))
            .or_else(|| self.match_date(i))
            .or_else(|| self.match_ordinal(i))
            .or_else(|| self.match_gazetteer(i))
            .or_else(|| self.match_organization_suffix(i))
            .or_else(|| self.match_person(i))
            .or_else(|| self.match_cardinal(i))
    }

    fn text(&self, i: usize) -> &str {
        &self.tokens[i].text
    }

    fn lemma_in(&self, i: usize, words: &[&str]) -> bool {
        i < self.limit && words.contains(&self.tokens[i].lemma.as_str())
    }

    fn is_number(&self, i: usize) -> bool {
        i < self.limit && self.tokens[i].tag == PosTag::CD
    }

    /// End of the run of numbers starting at `i`.
    fn number_run(&self, i: usize) -> usize {
        let mut end = i;
        while self.is_number(end) {
            end += 1;
        }
        end
    }

    /// "$ 5.1 billion", "5 million euros".
    fn match_money(&self, i: usize) -> Option<Entity> {
        if CURRENCY_SYMBOLS.contains(&self.text(i)) {
            let end = self.number_run(i + 1);
            return (end > i + 1).then(|| entity(i, end, EntityLabel::Money));
        }
        let end = self.number_run(i);
        (end > i && self.lemma_in(end, CURRENCY_WORDS))
            .then(|| entity(i, end + 1, EntityLabel::Money))
    }

    /// A number run followed by one of `words`: "5 %", "12 miles".
    fn match_number_with(&self, i: usize, words: &[&str], label: EntityLabel) -> Option<Entity> {
        let end = self.number_run(i);
        (end > i && self.lemma_in(end, words)).then(|| entity(i, end + 1, label))
    }

    /// "10:30", "5 p.m.", "10:30 am".
    fn match_time(&self, i: usize) -> Option<Entity> {
        if !self.is_number(i) {
            return None;
        }
        let marked = self.lemma_in(i + 1, TIME_MARKERS);
        if CLOCK_TIME.is_match(self.text(i)) || marked {
            let end = if marked { i + 2 } else { i + 1 };
            return Some(entity(i, end, EntityLabel::Time));
        }
        None
    }

    fn match_date(&self, i: usize) -> Option<Entity> {
        let token = &self.tokens[i];
        let text = token.text.as_str();

        if WEEKDAYS.contains(text) {
            return Some(entity(i, i + 1, EntityLabel::Date));
        }
        if MONTHS.contains(text) && token.tag.is_proper_noun() {
            return Some(entity(i, self.month_end(i + 1), EntityLabel::Date));
        }
        if self.is_number(i) {
            // "27 June 2017"
            if DAY_OF_MONTH.is_match(text) && self.is_month(i + 1) {
                return Some(entity(i, self.month_end(i + 2), EntityLabel::Date));
            }
            if YEAR_PATTERN.is_match(text) || DATE_SHAPE.is_match(text) {
                return Some(entity(i, i + 1, EntityLabel::Date));
            }
        }
        if DECADE_PATTERN.is_match(text) {
            return Some(entity(i, i + 1, EntityLabel::Date));
        }

        let lower = text.to_lowercase();
        if RELATIVE_DAYS.contains(&lower.as_str()) {
            return Some(entity(i, i + 1, EntityLabel::Date));
        }
        let modifies_period = i + 1 < self.limit
            && (self.lemma_in(i + 1, RELATIVE_PERIODS) || WEEKDAYS.contains(self.text(i + 1)));
        if RELATIVE_MODIFIERS.contains(&lower.as_str()) && modifies_period {
            return Some(entity(i, i + 2, EntityLabel::Date));
        }
        None
    }

    fn is_month(&self, i: usize) -> bool {
        i < self.limit && MONTHS.contains(self.text(i))
    }

    /// Extend a month mention over a following day and year:
    /// "June 27 , 2017", "June 2017".
    fn month_end(&self, mut end: usize) -> usize {
        if self.is_number(end) && DAY_OF_MONTH.is_match(self.text(end)) {
            end += 1;
        }
        let year_at = |j: usize| self.is_number(j) && YEAR_PATTERN.is_match(self.text(j));
        if end < self.limit && self.tokens[end].tag == PosTag::Comma && year_at(end + 1) {
            end += 2;
        } else if year_at(end) {
            end += 1;
        }
        end
    }

    fn match_ordinal(&self, i: usize) -> Option<Entity> {
        let token = &self.tokens[i];
        let numeric = ORDINAL_NUMBER.is_match(&token.text);
        let spelled = ORDINAL_WORDS.contains(&token.lemma.as_str())
            && matches!(token.tag, PosTag::JJ | PosTag::RB);
        (numeric || spelled).then(|| entity(i, i + 1, EntityLabel::Ordinal))
    }

    /// Longest gazetteer phrase starting at `i`.
    fn match_gazetteer(&self, i: usize) -> Option<Entity> {
        if !starts_uppercase(self.text(i)) && !PRODUCTS.contains(self.text(i)) {
            return None;
        }

        let mut phrase = String::new();
        let mut best = None;
        for j in i..self.limit.min(i + MAX_PHRASE_TOKENS) {
            phrase.push_str(&self.tokens[j].text);
            if let Some(label) = GAZETTEER.get(phrase.as_str()) {
                best = Some(entity(i, j + 1, *label));
            }
            if self.tokens[j].whitespace {
                phrase.push(' ');
            }
        }
        best
    }

    /// "Acme Widget Corp.": a proper-noun run ending in a corporate word.
    fn match_organization_suffix(&self, i: usize) -> Option<Entity> {
        let end = self.proper_run(i, MAX_PHRASE_TOKENS);
        (i + 1..end)
            .rev()
            .find(|&j| ORG_SUFFIXES.contains(&self.text(j)))
            .map(|j| entity(i, j + 1, EntityLabel::Org))
    }

    /// A title followed by a name, or a run of two or three name-like
    /// proper nouns.
    fn match_person(&self, i: usize) -> Option<Entity> {
        if PERSON_TITLES.contains(self.text(i)) {
            let end = self.name_run(i + 1);
            if end > i + 1 {
                return Some(entity(i + 1, end, EntityLabel::Person));
            }
        }

        let end = self.name_run(i);
        if end - i < 2 {
            return None;
        }
        let phrase = (i..end)
            .map(|j| self.text(j))
            .collect::<Vec<_>>()
            .join(" ");
        if NAME_STOPWORDS.contains(phrase.as_str()) {
            return None;
        }
        Some(entity(i, end, EntityLabel::Person))
    }

    fn match_cardinal(&self, i: usize) -> Option<Entity> {
        let end = self.number_run(i);
        (end > i).then(|| entity(i, end, EntityLabel::Cardinal))
    }

    fn proper_run(&self, i: usize, max: usize) -> usize {
        let mut end = i;
        while end < self.limit && end - i < max && self.tokens[end].tag.is_proper_noun() {
            end += 1;
        }
        end
    }

    /// End of a run of up to three plausible name parts.
    fn name_run(&self, i: usize) -> usize {
        let mut end = i;
        while end < self.limit && end - i < 3 && self.is_name_part(end) {
            end += 1;
        }
        end
    }

    fn is_name_part(&self, i: usize) -> bool {
        let token = &self.tokens[i];
        let text = token.text.as_str();
        token.tag == PosTag::NNP
            && text.len() >= 2
            && starts_uppercase(text)
            && !GAZETTEER.contains_key(text)
            && !WEEKDAYS.contains(text)
            && !MONTHS.contains(text)
            && !PERSON_TITLES.contains(text)
            && !ORG_SUFFIXES.contains(&text)
    }
}

fn entity(start: usize, end: usize, label: EntityLabel) -> Entity {
    Entity {
        span: Span::new(start, end),
        label,
    }
}

fn starts_uppercase(text: &str) -> bool {
    text.chars().next().is_some_and(char::is_uppercase)
}
