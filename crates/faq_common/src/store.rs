//! Pattern store: the question bank loaded once at startup.
//!
//! Three line-oriented sources are kept positionally aligned; line N of each
//! file describes entry N. The position is the entry's identity for the whole
//! process lifetime.

use crate::error::DataLoadError;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Named capture group a pattern may use to report tolerated errors.
pub const FUZZY_ERRORS_GROUP: &str = "fuzzy_errors";

/// Stable identity of an entry (its position in the store).
pub type EntryId = usize;

/// One question/answer pair and the compiled pattern that selects it.
#[derive(Debug, Clone)]
pub struct FaqEntry {
    pub id: EntryId,
    pub question: String,
    pub answer: String,
    /// Pattern text as written in the source file
    pub source: String,
    /// Compiled pattern, anchored at the start of the utterance
    pub pattern: Regex,
}

impl FaqEntry {
    /// Whether the pattern declares a `fuzzy_errors` group.
    pub fn reports_errors(&self) -> bool {
        self.pattern
            .capture_names()
            .any(|name| name == Some(FUZZY_ERRORS_GROUP))
    }
}

/// Locations of the three aligned data sources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataSources {
    pub questions: PathBuf,
    pub answers: PathBuf,
    pub patterns: PathBuf,
}

impl DataSources {
    /// Standard file names inside one directory.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            questions: dir.join("questions.txt"),
            answers: dir.join("answers.txt"),
            patterns: dir.join("fuzzy_regex.txt"),
        }
    }
}

/// Read-only question bank.
#[derive(Debug, Clone, Default)]
pub struct PatternStore {
    entries: Vec<FaqEntry>,
}

impl PatternStore {
    /// Load and validate the three sources from disk.
    pub fn load(sources: &DataSources) -> Result<Self, DataLoadError> {
        let questions = read_lines(&sources.questions)?;
        let answers = read_lines(&sources.answers)?;
        let patterns = read_lines(&sources.patterns)?;

        let store = Self::from_lines(questions, answers, patterns)?;
        info!(
            entries = store.len(),
            patterns = %sources.patterns.display(),
            "FAQ data loaded"
        );
        Ok(store)
    }

    /// Build a store from in-memory lines. Lengths must agree and every
    /// pattern must compile.
    pub fn from_lines(
        questions: Vec<String>,
        answers: Vec<String>,
        patterns: Vec<String>,
    ) -> Result<Self, DataLoadError> {
        if questions.len() != answers.len() || questions.len() != patterns.len() {
            return Err(DataLoadError::LengthMismatch {
                questions: questions.len(),
                answers: answers.len(),
                patterns: patterns.len(),
            });
        }

        let mut entries = Vec::with_capacity(questions.len());
        for (id, ((question, answer), source)) in questions
            .into_iter()
            .zip(answers)
            .zip(patterns)
            .enumerate()
        {
            let pattern = compile_pattern(id + 1, &source)?;
            entries.push(FaqEntry {
                id,
                question,
                answer,
                source,
                pattern,
            });
        }

        debug!(count = entries.len(), "compiled FAQ patterns");
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: EntryId) -> Option<&FaqEntry> {
        self.entries.get(id)
    }

    pub fn question(&self, id: EntryId) -> Option<&str> {
        self.get(id).map(|e| e.question.as_str())
    }

    pub fn answer(&self, id: EntryId) -> Option<&str> {
        self.get(id).map(|e| e.answer.as_str())
    }

    /// Entries in store order.
    pub fn entries(&self) -> &[FaqEntry] {
        &self.entries
    }
}

/// Compile one pattern, anchoring it at the start of the utterance.
fn compile_pattern(line: usize, source: &str) -> Result<Regex, DataLoadError> {
    if source.trim().is_empty() {
        return Err(DataLoadError::EmptyPattern { line });
    }
    Regex::new(&format!("^(?:{})", source))
        .map_err(|source| DataLoadError::InvalidPattern { line, source })
}

/// Read a source file as lines with trailing whitespace removed.
///
/// Blank lines at the very end of the file are dropped so that a trailing
/// newline (or several) does not create phantom entries.
fn read_lines(path: &Path) -> Result<Vec<String>, DataLoadError> {
    let content = fs::read_to_string(path).map_err(|source| DataLoadError::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;

    let mut lines: Vec<String> = content
        .lines()
        .map(|line| line.trim_end().to_string())
        .collect();
    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_patterns_are_anchored() {
        let store = PatternStore::from_lines(
            strings(&["Where was he born?"]),
            strings(&["Louisville"]),
            strings(&["born"]),
        )
        .unwrap();
        let entry = store.get(0).unwrap();
        assert!(entry.pattern.is_match("born in"));
        assert!(!entry.pattern.is_match("where was he born"));
    }

    #[test]
    fn test_alternation_is_grouped_before_anchor() {
        let store = PatternStore::from_lines(
            strings(&["q"]),
            strings(&["a"]),
            strings(&["foo|bar"]),
        )
        .unwrap();
        let pattern = &store.get(0).unwrap().pattern;
        assert!(pattern.is_match("bar baz"));
        assert!(!pattern.is_match("baz bar"));
    }

    #[test]
    fn test_reports_errors() {
        let store = PatternStore::from_lines(
            strings(&["q1", "q2"]),
            strings(&["a1", "a2"]),
            strings(&["fights(?P<fuzzy_errors>\\d)?", "fights"]),
        )
        .unwrap();
        assert!(store.get(0).unwrap().reports_errors());
        assert!(!store.get(1).unwrap().reports_errors());
    }

    #[test]
    fn test_empty_pattern_rejected() {
        let err = PatternStore::from_lines(
            strings(&["q1", "q2"]),
            strings(&["a1", "a2"]),
            strings(&["ok", "   "]),
        )
        .unwrap_err();
        assert!(matches!(err, DataLoadError::EmptyPattern { line: 2 }));
    }

    #[test]
    fn test_in_dir_uses_standard_names() {
        let sources = DataSources::in_dir("/srv/faq");
        assert_eq!(sources.questions, PathBuf::from("/srv/faq/questions.txt"));
        assert_eq!(sources.answers, PathBuf::from("/srv/faq/answers.txt"));
        assert_eq!(sources.patterns, PathBuf::from("/srv/faq/fuzzy_regex.txt"));
    }
}
