//! Fuzzy pattern matcher.
//!
//! Every pattern in the store is tried against the utterance; patterns are
//! independent, so overlapping topics can all match. Candidates are ranked by
//! how many errors the pattern reports having tolerated.

use crate::store::{EntryId, FaqEntry, FUZZY_ERRORS_GROUP};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// One pattern that matched the utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchCandidate {
    pub id: EntryId,
    pub errors: u32,
}

impl MatchCandidate {
    pub fn new(id: EntryId, errors: u32) -> Self {
        Self { id, errors }
    }
}

/// Candidates ordered by ascending error count, ties in store order.
///
/// An empty list means nothing matched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedCandidates(Vec<MatchCandidate>);

impl RankedCandidates {
    /// Rank candidates given in scan order.
    pub fn rank(mut candidates: Vec<MatchCandidate>) -> Self {
        // sort_by_key is stable: equal error counts keep scan order
        candidates.sort_by_key(|c| c.errors);
        Self(candidates)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Best candidate (fewest errors, earliest in store).
    pub fn best(&self) -> Option<&MatchCandidate> {
        self.0.first()
    }

    /// Candidate at a 1-based menu position.
    pub fn at_choice(&self, choice: usize) -> Option<&MatchCandidate> {
        choice.checked_sub(1).and_then(|i| self.0.get(i))
    }

    pub fn iter(&self) -> impl Iterator<Item = &MatchCandidate> {
        self.0.iter()
    }

    pub fn ids(&self) -> Vec<EntryId> {
        self.0.iter().map(|c| c.id).collect()
    }
}

/// Match a normalized utterance against every entry.
pub fn match_utterance(utterance: &str, entries: &[FaqEntry]) -> RankedCandidates {
    let mut found = Vec::new();

    for entry in entries {
        let Some(caps) = entry.pattern.captures(utterance) else {
            continue;
        };
        let errors = match caps.name(FUZZY_ERRORS_GROUP) {
            Some(m) => m.as_str().trim().parse::<u32>().unwrap_or_else(|_| {
                warn!(
                    entry = entry.id,
                    value = m.as_str(),
                    "non-numeric fuzzy_errors capture, counting as 0"
                );
                0
            }),
            None => 0,
        };
        found.push(MatchCandidate::new(entry.id, errors));
    }

    let ranked = RankedCandidates::rank(found);
    debug!(utterance, candidates = ?ranked.ids(), "matched utterance");
    ranked
}
