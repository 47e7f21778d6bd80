//! NLP annotator seam for the fallback rules.
//!
//! The fallback rules only need three things from an annotator: named
//! entities with a coarse label, a part-of-speech tag per token, and a lemma
//! per token. Anything that can produce an [`Annotation`] can be plugged in.
//!
//! [`LexiconAnnotator`] is the built-in implementation: a gazetteer for
//! entities plus closed word lists and suffix rules for tags and lemmas. It
//! is deliberately small and needs no model files.

use crate::error::AnnotatorError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Coarse entity category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityLabel {
    Person,
    Organization,
    Place,
    CreativeWork,
}

/// Entity mention found in the text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySpan {
    pub text: String,
    pub label: EntityLabel,
    /// First token index
    pub start: usize,
    /// One past the last token index
    pub end: usize,
}

/// Part-of-speech tag, coarse enough for the speech-act heuristics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PosTag {
    Verb,
    Aux,
    Noun,
    Pronoun,
    Determiner,
    Adposition,
    WhWord,
    Interjection,
    Number,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub text: String,
    pub lemma: String,
    pub pos: PosTag,
}

/// Everything the fallback rules read about an utterance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    pub tokens: Vec<Token>,
    pub entities: Vec<EntitySpan>,
}

impl Annotation {
    /// First entity (in text order) carrying one of `labels`.
    pub fn first_entity(&self, labels: &[EntityLabel]) -> Option<&EntitySpan> {
        self.entities.iter().find(|e| labels.contains(&e.label))
    }

    pub fn has_entity(&self, label: EntityLabel) -> bool {
        self.entities.iter().any(|e| e.label == label)
    }

    pub fn has_pos(&self, pos: PosTag) -> bool {
        self.tokens.iter().any(|t| t.pos == pos)
    }

    pub fn has_lemma(&self, lemmas: &[&str]) -> bool {
        self.tokens.iter().any(|t| lemmas.contains(&t.lemma.as_str()))
    }
}

/// Source of entity and syntax annotations.
pub trait Annotator: Send + Sync {
    fn annotate(&self, text: &str) -> Result<Annotation, AnnotatorError>;
}

/// Gazetteer entry for [`LexiconAnnotator`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityEntry {
    pub text: String,
    pub label: EntityLabel,
}

impl EntityEntry {
    pub fn new(text: impl Into<String>, label: EntityLabel) -> Self {
        Self {
            text: text.into(),
            label,
        }
    }
}

pub const WH_WORDS: &[&str] = &[
    "what", "when", "where", "why", "how", "who", "whom", "whose", "which",
];

const AUXILIARIES: &[&str] = &[
    "is", "are", "was", "were", "am", "be", "been", "being", "do", "does", "did", "have", "has",
    "had", "can", "could", "will", "would", "shall", "should", "may", "might", "must", "isn't",
    "aren't", "wasn't", "weren't", "don't", "doesn't", "didn't", "can't", "won't",
];

const PRONOUNS: &[&str] = &[
    "i", "you", "he", "she", "it", "we", "they", "me", "him", "her", "us", "them", "my", "your",
    "his", "its", "our", "their", "mine", "yours", "hers", "ours", "theirs", "myself", "himself",
    "something", "anything", "nothing", "everything",
];

const DETERMINERS: &[&str] = &[
    "a", "an", "the", "this", "that", "these", "those", "some", "any", "every", "each", "no",
];

const ADPOSITIONS: &[&str] = &[
    "in", "on", "at", "to", "from", "with", "about", "of", "for", "by", "into", "over", "after",
    "before", "during", "against", "between", "under", "through",
];

const INTERJECTIONS: &[&str] = &[
    "hello", "hi", "hey", "bye", "goodbye", "ok", "okay", "thanks", "yes", "yeah", "please",
    "wow", "oh",
];

/// Base forms recognized as verbs (matched on lemma).
const VERBS: &[&str] = &[
    "be", "have", "do", "say", "go", "get", "make", "know", "think", "take", "see", "come",
    "want", "look", "use", "find", "give", "tell", "work", "call", "try", "ask", "need", "feel",
    "become", "leave", "put", "mean", "keep", "let", "begin", "seem", "help", "talk", "turn",
    "start", "show", "hear", "play", "run", "move", "like", "live", "believe", "hold", "bring",
    "write", "sit", "stand", "lose", "pay", "meet", "learn", "change", "lead", "understand",
    "watch", "follow", "stop", "speak", "read", "spend", "grow", "open", "walk", "win", "teach",
    "offer", "remember", "love", "consider", "appear", "buy", "wait", "serve", "die", "send",
    "build", "stay", "fall", "reach", "kill", "remain", "suggest", "raise", "pass", "sell",
    "require", "report", "decide", "pull", "drive", "fight", "box", "train", "beat", "marry",
    "retire", "refuse", "convert", "punch", "float", "sting", "light", "born", "eat", "sleep",
    "sing", "dance", "travel", "visit", "explain", "describe", "list", "share", "send", "like",
    "hate", "enjoy", "wonder", "guess",
];

/// Irregular forms whose lemma suffix rules cannot recover.
const IRREGULAR: &[(&str, &str)] = &[
    ("is", "be"),
    ("are", "be"),
    ("was", "be"),
    ("were", "be"),
    ("am", "be"),
    ("been", "be"),
    ("being", "be"),
    ("did", "do"),
    ("does", "do"),
    ("done", "do"),
    ("has", "have"),
    ("had", "have"),
    ("went", "go"),
    ("gone", "go"),
    ("gave", "give"),
    ("given", "give"),
    ("told", "tell"),
    ("made", "make"),
    ("drove", "drive"),
    ("driven", "drive"),
    ("fought", "fight"),
    ("won", "win"),
    ("lost", "lose"),
    ("said", "say"),
    ("got", "get"),
    ("came", "come"),
    ("took", "take"),
    ("knew", "know"),
    ("saw", "see"),
    ("thought", "think"),
    ("became", "become"),
    ("began", "begin"),
    ("left", "leave"),
    ("taught", "teach"),
    ("bought", "buy"),
    ("brought", "bring"),
    ("held", "hold"),
    ("met", "meet"),
    ("ran", "run"),
    ("spoke", "speak"),
    ("wrote", "write"),
    ("fell", "fall"),
    ("died", "die"),
];

/// Gazetteer + word-list annotator.
#[derive(Debug, Clone)]
pub struct LexiconAnnotator {
    /// Phrases as token lists, longest first
    gazetteer: Vec<(Vec<String>, EntityLabel)>,
    verbs: HashSet<&'static str>,
}

impl LexiconAnnotator {
    /// Annotator that knows only the given entities.
    pub fn new(entries: impl IntoIterator<Item = EntityEntry>) -> Self {
        let mut gazetteer: Vec<(Vec<String>, EntityLabel)> = entries
            .into_iter()
            .map(|e| (tokenize(&e.text.to_lowercase()), e.label))
            .filter(|(tokens, _)| !tokens.is_empty())
            .collect();
        gazetteer.sort_by(|a, b| b.0.len().cmp(&a.0.len()));

        Self {
            gazetteer,
            verbs: VERBS.iter().copied().collect(),
        }
    }

    /// Built-in entities plus `extra`.
    pub fn with_defaults(extra: impl IntoIterator<Item = EntityEntry>) -> Self {
        Self::new(default_entities().into_iter().chain(extra))
    }

    fn tag(&self, word: &str, lemma: &str) -> PosTag {
        if WH_WORDS.contains(&word) {
            PosTag::WhWord
        } else if AUXILIARIES.contains(&word) {
            PosTag::Aux
        } else if PRONOUNS.contains(&word) {
            PosTag::Pronoun
        } else if DETERMINERS.contains(&word) {
            PosTag::Determiner
        } else if ADPOSITIONS.contains(&word) {
            PosTag::Adposition
        } else if INTERJECTIONS.contains(&word) {
            PosTag::Interjection
        } else if word.chars().all(|c| c.is_ascii_digit()) {
            PosTag::Number
        } else if self.verbs.contains(lemma) {
            PosTag::Verb
        } else {
            PosTag::Noun
        }
    }

    fn lemmatize(&self, word: &str) -> String {
        if let Some((_, lemma)) = IRREGULAR.iter().find(|(form, _)| *form == word) {
            return lemma.to_string();
        }
        lemma_candidates(word)
            .into_iter()
            .find(|c| self.verbs.contains(c.as_str()))
            .unwrap_or_else(|| word.to_string())
    }

    fn find_entities(&self, words: &[String]) -> Vec<EntitySpan> {
        let keys: Vec<&str> = words
            .iter()
            .map(|w| w.strip_suffix("'s").unwrap_or(w))
            .collect();

        let mut entities = Vec::new();
        let mut i = 0;
        while i < keys.len() {
            let found = self.gazetteer.iter().find(|(phrase, _)| {
                keys.len() - i >= phrase.len()
                    && phrase.iter().zip(&keys[i..]).all(|(p, k)| p.as_str() == *k)
            });
            match found {
                Some((phrase, label)) => {
                    let end = i + phrase.len();
                    entities.push(EntitySpan {
                        text: keys[i..end].join(" "),
                        label: *label,
                        start: i,
                        end,
                    });
                    i = end;
                }
                None => i += 1,
            }
        }
        entities
    }
}

impl Default for LexiconAnnotator {
    fn default() -> Self {
        Self::with_defaults(Vec::new())
    }
}

impl Annotator for LexiconAnnotator {
    fn annotate(&self, text: &str) -> Result<Annotation, AnnotatorError> {
        let words = tokenize(&text.to_lowercase());
        let tokens = words
            .iter()
            .map(|w| {
                let lemma = self.lemmatize(w);
                Token {
                    pos: self.tag(w, &lemma),
                    text: w.clone(),
                    lemma,
                }
            })
            .collect();
        let entities = self.find_entities(&words);
        Ok(Annotation { tokens, entities })
    }
}

/// Split on anything that is not alphanumeric or an apostrophe.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .map(|w| w.trim_matches('\''))
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect()
}

fn lemma_candidates(word: &str) -> Vec<String> {
    let mut out = Vec::new();
    if let Some(stem) = word.strip_suffix("ies") {
        out.push(format!("{}y", stem));
    }
    if let Some(stem) = word.strip_suffix("ied") {
        out.push(format!("{}y", stem));
    }
    for suffix in ["ing", "ed"] {
        if let Some(stem) = word.strip_suffix(suffix) {
            if stem.len() < 2 {
                continue;
            }
            out.push(stem.to_string());
            out.push(format!("{}e", stem));
            // running -> run, stopped -> stop
            let mut chars = stem.chars().rev();
            if let (Some(a), Some(b)) = (chars.next(), chars.next()) {
                if a == b {
                    out.push(stem[..stem.len() - a.len_utf8()].to_string());
                }
            }
        }
    }
    if let Some(stem) = word.strip_suffix("es") {
        out.push(stem.to_string());
    }
    if let Some(stem) = word.strip_suffix('s') {
        out.push(stem.to_string());
    }
    out.push(word.to_string());
    out
}

/// Entities the built-in annotator always knows.
pub fn default_entities() -> Vec<EntityEntry> {
    use EntityLabel::*;

    let people = [
        "muhammad ali",
        "cassius clay",
        "cassius marcellus clay",
        "joe frazier",
        "george foreman",
        "sonny liston",
        "ken norton",
        "larry holmes",
        "leon spinks",
        "floyd patterson",
        "ernie terrell",
        "trevor berbick",
        "howard cosell",
        "angelo dundee",
        "malcolm x",
        "elijah muhammad",
        "laila ali",
        "lonnie ali",
        "mike tyson",
        "elvis presley",
        "nelson mandela",
        "martin luther king",
    ];
    let organizations = [
        "nation of islam",
        "us army",
        "united states army",
        "world boxing association",
        "world boxing council",
        "wba",
        "wbc",
        "ring magazine",
        "supreme court",
        "united nations",
        "olympic committee",
        "espn",
        "nba",
        "nfl",
        "fbi",
        "cia",
    ];
    let places = [
        "louisville",
        "kentucky",
        "chicago",
        "miami",
        "houston",
        "new york",
        "las vegas",
        "kinshasa",
        "zaire",
        "manila",
        "philippines",
        "rome",
        "italy",
        "london",
        "england",
        "america",
        "united states",
        "usa",
        "africa",
        "deer lake",
        "pennsylvania",
        "scottsdale",
        "arizona",
        "atlanta",
        "ghana",
        "vietnam",
    ];
    let works = [
        "when we were kings",
        "facing ali",
        "the soul of a butterfly",
        "king of the world",
        "the greatest my own story",
    ];

    people
        .iter()
        .map(|t| EntityEntry::new(*t, Person))
        .chain(organizations.iter().map(|t| EntityEntry::new(*t, Organization)))
        .chain(places.iter().map(|t| EntityEntry::new(*t, Place)))
        .chain(works.iter().map(|t| EntityEntry::new(*t, CreativeWork)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn annotate(text: &str) -> Annotation {
        LexiconAnnotator::default().annotate(text).unwrap()
    }

    #[test]
    fn test_tokenize() {
        assert_eq!(tokenize("who's he, anyway"), vec!["who's", "he", "anyway"]);
        assert_eq!(tokenize("  'quoted'  "), vec!["quoted"]);
        assert!(tokenize("?!").is_empty());
    }

    #[test]
    fn test_lemmas() {
        let a = LexiconAnnotator::default();
        assert_eq!(a.lemmatize("fought"), "fight");
        assert_eq!(a.lemmatize("making"), "make");
        assert_eq!(a.lemmatize("running"), "run");
        assert_eq!(a.lemmatize("gives"), "give");
        assert_eq!(a.lemmatize("married"), "marry");
        assert_eq!(a.lemmatize("boxes"), "box");
        assert_eq!(a.lemmatize("gloves"), "gloves");
    }

    #[test]
    fn test_tags() {
        let ann = annotate("where did he fight");
        let tags: Vec<PosTag> = ann.tokens.iter().map(|t| t.pos).collect();
        assert_eq!(
            tags,
            vec![PosTag::WhWord, PosTag::Aux, PosTag::Pronoun, PosTag::Verb]
        );
    }

    #[test]
    fn test_longest_entity_wins() {
        let a = LexiconAnnotator::new(vec![
            EntityEntry::new("new york", EntityLabel::Place),
            EntityEntry::new("new york knicks", EntityLabel::Organization),
        ]);
        let ann = a.annotate("the new york knicks play").unwrap();
        assert_eq!(ann.entities.len(), 1);
        assert_eq!(ann.entities[0].text, "new york knicks");
        assert_eq!(ann.entities[0].label, EntityLabel::Organization);
        assert_eq!((ann.entities[0].start, ann.entities[0].end), (1, 4));
    }

    #[test]
    fn test_possessive_entity() {
        let ann = annotate("joe frazier's record");
        assert_eq!(ann.entities[0].text, "joe frazier");
        assert_eq!(ann.entities[0].label, EntityLabel::Person);
    }

    #[test]
    fn test_entity_is_case_insensitive() {
        let ann = annotate("Muhammad Ali");
        assert_eq!(ann.entities[0].text, "muhammad ali");
    }

    #[test]
    fn test_first_entity_filters_labels() {
        let ann = annotate("did joe frazier fight in manila");
        let place = ann.first_entity(&[EntityLabel::Place]).unwrap();
        assert_eq!(place.text, "manila");
        let person = ann
            .first_entity(&[EntityLabel::Person, EntityLabel::CreativeWork])
            .unwrap();
        assert_eq!(person.text, "joe frazier");
    }
}
