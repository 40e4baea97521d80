//! Post-hoc brand screening of generated replies.
//!
//! A lexical heuristic: capitalized word runs are treated as candidate brand
//! mentions and checked against the approved and blocked lists plus a fixed
//! bar vocabulary. It over-flags unusual capitalized words and misses
//! lower-case mentions of unknown brands. Blocked names are always found,
//! whatever their case. Screening only annotates the reply, it never rewrites
//! or rejects it.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use super::catalog::{ApprovedCatalog, BlockedList};

static CAPITALIZED_PHRASE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b[A-Z][A-Za-z0-9'’&-]*(?:[ \t]+[A-Z][A-Za-z0-9'’&-]*)*").unwrap()
});

static WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\S+").unwrap());

/// Units, garnishes, mixers, techniques, glassware, output headings and
/// common sentence starters that may appear capitalized in a recipe.
const GENERIC_VOCABULARY: &[&str] = &[
    // units
    "oz", "ounce", "ounces", "ml", "cl", "dash", "dashes", "splash", "cup", "cups", "tsp",
    "tbsp", "part", "parts", "barspoon", "pinch", "slice", "slices", "wedge", "wedges", "wheel",
    "wheels", "twist", "sprig", "sprigs", "leaf", "leaves", "cube", "cubes",
    // garnishes and produce
    "lime", "lemon", "orange", "grapefruit", "mint", "cherry", "cherries", "olive", "olives",
    "salt", "sugar", "rim", "cucumber", "jalapeño", "jalapeno", "basil", "rosemary", "thyme",
    "ginger", "pineapple", "strawberry", "strawberries", "peel", "zest", "cinnamon", "nutmeg",
    "peach", "mango", "watermelon", "berries", "citrus",
    // base spirits
    "vodka", "gin", "rum", "tequila", "mezcal", "whiskey", "whisky", "bourbon", "rye", "brandy",
    "cognac", "vermouth", "wine", "liqueur", "triple", "sec", "spirit", "spirits",
    // generic mixers
    "juice", "syrup", "simple", "agave", "honey", "soda", "water", "club", "tonic", "cola",
    "beer", "bitters", "grenadine", "cream", "egg", "white", "ice", "crushed", "sparkling",
    "coconut", "cranberry", "tomato", "espresso", "coffee", "lemonade", "puree", "nectar",
    // techniques
    "shake", "stir", "strain", "double", "fine", "muddle", "build", "pour", "top", "fill", "add",
    "combine", "garnish", "serve", "blend", "chill", "float", "layer", "express", "dry", "gently",
    "well", "rinse", "dip",
    // glassware and tools
    "glass", "coupe", "rocks", "highball", "collins", "martini", "shaker", "tin", "mixing",
    "jigger", "pitcher", "flute",
    // output headings
    "title", "ingredients", "instructions", "notes", "note", "optional", "step", "steps", "recipe",
    "tip", "tips", "variation", "variations",
    // drink styles
    "cocktail", "mocktail", "margarita", "mojito", "paloma", "negroni", "spritz", "sangria",
    "mule", "sour", "punch", "fizz", "smash", "cooler", "colada",
    // sentence starters
    "the", "a", "an", "and", "or", "of", "with", "for", "in", "into", "on", "over", "to", "your",
    "you", "it", "this", "that", "then", "enjoy", "cheers", "serves", "yield", "makes", "i", "if",
    "here", "here's", "try", "use", "make", "perfect", "classic", "fresh", "freshly", "large",
    "small", "cold", "light", "dark", "sweet", "spicy",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhraseClass {
    Approved,
    Blocked,
    Generic,
    Unknown,
}

impl PhraseClass {
    pub fn is_flagged(self) -> bool {
        matches!(self, Self::Blocked | Self::Unknown)
    }
}

/// Decides whether a candidate phrase is an allowed name.
pub trait PhraseClassifier: Send + Sync {
    fn classify(&self, phrase: &str) -> PhraseClass;

    /// Pieces of a candidate phrase left once approved names are cut out.
    /// Each piece is screened on its own.
    fn unapproved_parts<'p>(&self, phrase: &'p str) -> Vec<&'p str> {
        vec![phrase]
    }

    /// Blocked names found anywhere in the lowercased reply, regardless of
    /// capitalization.
    fn blocked_mentions(&self, _reply_lower: &str) -> Vec<String> {
        Vec::new()
    }
}

/// Classifier backed by the approved catalog, the blocked list and
/// [`GENERIC_VOCABULARY`].
pub struct LexicalClassifier {
    approved: Vec<String>,
    blocked: Vec<(String, String)>,
}

impl LexicalClassifier {
    pub fn new(approved: &ApprovedCatalog, blocked: &BlockedList) -> Self {
        Self {
            approved: approved.normalized(),
            blocked: blocked
                .iter()
                .map(|name| (name.to_lowercase(), name.to_string()))
                .collect(),
        }
    }

    /// Cut the longest word runs that belong to an approved name out of
    /// `phrase`. Returns whether anything was cut and the remaining runs.
    fn split_on_approved<'p>(&self, phrase: &'p str) -> (bool, Vec<&'p str>) {
        let spans = word_spans(phrase);
        let words: Vec<String> = spans
            .iter()
            .map(|&(start, end)| phrase[start..end].to_lowercase())
            .collect();

        let mut covered = vec![false; words.len()];
        let mut matched = false;
        let mut i = 0;
        while i < words.len() {
            let run_end = (i + 1..=words.len()).rev().find(|&end| {
                let run = words[i..end].join(" ");
                self.approved.iter().any(|name| contains_words(name, &run))
            });
            match run_end {
                Some(end) => {
                    covered[i..end].fill(true);
                    matched = true;
                    i = end;
                }
                None => i += 1,
            }
        }

        let mut rest = Vec::new();
        let mut run_start: Option<usize> = None;
        for (idx, &is_covered) in covered.iter().enumerate() {
            match (is_covered, run_start) {
                (false, None) => run_start = Some(idx),
                (true, Some(first)) => {
                    rest.push(&phrase[spans[first].0..spans[idx - 1].1]);
                    run_start = None;
                }
                _ => {}
            }
        }
        if let Some(first) = run_start {
            rest.push(&phrase[spans[first].0..spans[spans.len() - 1].1]);
        }

        (matched, rest)
    }
}

impl PhraseClassifier for LexicalClassifier {
    fn classify(&self, phrase: &str) -> PhraseClass {
        let phrase = phrase.trim().to_lowercase();
        if phrase.is_empty() {
            return PhraseClass::Generic;
        }
        if self
            .blocked
            .iter()
            .any(|(name, _)| contains_words(&phrase, name))
        {
            return PhraseClass::Blocked;
        }

        let (matched, rest) = self.split_on_approved(&phrase);
        let rest_is_generic = rest
            .iter()
            .all(|part| part.split_whitespace().all(is_generic_word));
        match (matched, rest_is_generic) {
            (true, true) => PhraseClass::Approved,
            (false, true) => PhraseClass::Generic,
            (_, false) => PhraseClass::Unknown,
        }
    }

    fn unapproved_parts<'p>(&self, phrase: &'p str) -> Vec<&'p str> {
        self.split_on_approved(phrase).1
    }

    fn blocked_mentions(&self, reply_lower: &str) -> Vec<String> {
        self.blocked
            .iter()
            .filter(|(name, _)| contains_words(reply_lower, name))
            .map(|(_, display)| display.clone())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenedReply {
    pub text: String,
    pub flagged: Vec<String>,
}

/// Screen a reply against the given lists with the default [`LexicalClassifier`].
pub fn screen_reply(reply: &str, approved: &ApprovedCatalog, blocked: &BlockedList) -> ScreenedReply {
    screen_reply_with(reply, &LexicalClassifier::new(approved, blocked))
}

pub fn screen_reply_with(reply: &str, classifier: &dyn PhraseClassifier) -> ScreenedReply {
    let mut seen = HashSet::new();
    let mut flagged: Vec<String> = Vec::new();

    for candidate in CAPITALIZED_PHRASE.find_iter(reply) {
        for part in classifier.unapproved_parts(candidate.as_str()) {
            let core = trim_generic_edges(part);
            if core.is_empty() {
                continue;
            }
            if classifier.classify(core).is_flagged() && seen.insert(core.to_lowercase()) {
                flagged.push(core.to_string());
            }
        }
    }

    let reply_lower = reply.to_lowercase();
    for name in classifier.blocked_mentions(&reply_lower) {
        let lower = name.to_lowercase();
        let already_reported = seen.iter().any(|f| contains_words(f, &lower));
        if !already_reported && seen.insert(lower) {
            flagged.push(name);
        }
    }

    let text = if flagged.is_empty() {
        reply.to_string()
    } else {
        format!("{reply}{}", advisory_note(&flagged))
    };

    ScreenedReply { text, flagged }
}

pub fn advisory_note(flagged: &[String]) -> String {
    format!(
        "\n\n---\nNote: this reply mentions names that are not on the approved product list ({}). \
         Only approved products should appear in recipes.",
        flagged.join(", ")
    )
}

/// Drop generic words from both ends of a phrase, so "Add Tito's" reports "Tito's".
fn trim_generic_edges(phrase: &str) -> &str {
    let spans = word_spans(phrase);
    let is_kept = |&(start, end): &(usize, usize)| !is_generic_word(&phrase[start..end]);

    let Some(first) = spans.iter().position(is_kept) else {
        return "";
    };
    let last = spans.iter().rposition(is_kept).unwrap_or(first);

    &phrase[spans[first].0..spans[last].1]
}

/// Byte ranges of the whitespace-separated words of `text`.
fn word_spans(text: &str) -> Vec<(usize, usize)> {
    WORD.find_iter(text).map(|m| (m.start(), m.end())).collect()
}

fn is_generic_word(word: &str) -> bool {
    let word = word.to_lowercase();
    GENERIC_VOCABULARY.contains(&word.as_str())
}

/// Whether `needle` occurs in `haystack` on word boundaries.
fn contains_words(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }
    haystack.match_indices(needle).any(|(start, _)| {
        let end = start + needle.len();
        let before = haystack[..start].chars().next_back();
        let after = haystack[end..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}
