//! Clarification menus for ambiguous matches.
//!
//! When more than one entry matches, the conversation moves to
//! `AwaitingChoice` and the user gets a numbered menu. The very next turn
//! from that conversation resolves the menu, successfully or not, and the
//! pending state is discarded either way. The menu is never re-shown.
//!
//! Pending state lives only inside [`ConversationRegistry`]. Turns for the
//! same conversation are serialized on a per-conversation lock; different
//! conversations never contend beyond the brief map lookup.

use crate::matcher::{MatchCandidate, RankedCandidates};
use crate::store::{EntryId, PatternStore};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::num::IntErrorKind;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

pub const MENU_HEADER: &str = "I found multiple possible matches:";
pub const MENU_PROMPT: &str =
    "Please specify which question you'd like me to answer (enter a number):";
pub const INVALID_INPUT: &str = "Invalid input. Please enter a number.";
pub const INVALID_CHOICE: &str = "Invalid choice. Please enter a valid number.";

/// Opaque key separating independent chat sessions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ConversationId(String);

impl ConversationId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The single implicit session of the terminal driver.
    pub fn terminal() -> Self {
        Self::new("terminal")
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ConversationId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ConversationId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Dialog state of one conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DialogState {
    Idle,
    AwaitingChoice,
}

/// A menu waiting for the user's numeric answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingClarification {
    pub conversation: ConversationId,
    pub candidates: RankedCandidates,
}

/// One numbered line of a clarification menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuOption {
    /// 1-based key the user types
    pub key: usize,
    pub label: String,
    pub entry: EntryId,
}

/// Numbered list of candidate questions in rank order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClarifyMenu {
    pub options: Vec<MenuOption>,
}

impl ClarifyMenu {
    pub fn from_candidates(candidates: &RankedCandidates, store: &PatternStore) -> Self {
        let options = candidates
            .iter()
            .enumerate()
            .map(|(i, c)| MenuOption {
                key: i + 1,
                label: store.question(c.id).unwrap_or_default().to_string(),
                entry: c.id,
            })
            .collect();
        Self { options }
    }

    /// Header, one line per option, then the prompt.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.options.len() + 2);
        lines.push(MENU_HEADER.to_string());
        for opt in &self.options {
            lines.push(format!("{}. {}", opt.key, opt.label));
        }
        lines.push(MENU_PROMPT.to_string());
        lines
    }
}

/// How the user's answer to a menu was interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChoiceOutcome {
    /// A listed option was picked
    Selected { key: usize, candidate: MatchCandidate },
    /// A number, but not one on the menu
    OutOfRange { input: String },
    /// Not a number at all
    NotANumber { input: String },
}

impl ChoiceOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Selected { .. })
    }
}

/// Interpret `input` as a 1-based menu selection.
pub fn parse_choice(input: &str, candidates: &RankedCandidates) -> ChoiceOutcome {
    let trimmed = input.trim();
    match trimmed.parse::<i64>() {
        Ok(n) => usize::try_from(n)
            .ok()
            .and_then(|key| candidates.at_choice(key).map(|c| (key, *c)))
            .map(|(key, candidate)| ChoiceOutcome::Selected { key, candidate })
            .unwrap_or_else(|| ChoiceOutcome::OutOfRange {
                input: trimmed.to_string(),
            }),
        Err(e) if matches!(e.kind(), IntErrorKind::PosOverflow | IntErrorKind::NegOverflow) => {
            ChoiceOutcome::OutOfRange {
                input: trimmed.to_string(),
            }
        }
        Err(_) => ChoiceOutcome::NotANumber {
            input: trimmed.to_string(),
        },
    }
}

type Slot = Arc<Mutex<Option<PendingClarification>>>;

/// Access to one conversation's pending state while its lock is held.
pub struct Conversation<'a> {
    id: &'a ConversationId,
    state: &'a mut Option<PendingClarification>,
}

impl Conversation<'_> {
    pub fn id(&self) -> &ConversationId {
        self.id
    }

    pub fn state(&self) -> DialogState {
        if self.state.is_some() {
            DialogState::AwaitingChoice
        } else {
            DialogState::Idle
        }
    }

    /// Remove and return the pending menu, leaving the conversation idle.
    pub fn take_pending(&mut self) -> Option<PendingClarification> {
        self.state.take()
    }

    /// Park `candidates` until the next turn.
    pub fn await_choice(&mut self, candidates: RankedCandidates) {
        *self.state = Some(PendingClarification {
            conversation: self.id.clone(),
            candidates,
        });
    }
}

/// conversation id → pending clarification
#[derive(Debug, Default)]
pub struct ConversationRegistry {
    slots: Mutex<HashMap<ConversationId, Slot>>,
}

impl ConversationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` with exclusive access to one conversation.
    ///
    /// Concurrent calls for the same id run one after another; calls for
    /// different ids run in parallel.
    pub fn with_conversation<R>(
        &self,
        id: &ConversationId,
        f: impl FnOnce(&mut Conversation<'_>) -> R,
    ) -> R {
        let slot = self.slot(id);
        let result = {
            let mut guard = lock(&slot);
            let mut conversation = Conversation {
                id,
                state: &mut *guard,
            };
            f(&mut conversation)
        };
        self.release(id, slot);
        result
    }

    pub fn state(&self, id: &ConversationId) -> DialogState {
        let slot = lock(&self.slots).get(id).cloned();
        match slot {
            Some(slot) if lock(&slot).is_some() => DialogState::AwaitingChoice,
            _ => DialogState::Idle,
        }
    }

    pub fn is_pending(&self, id: &ConversationId) -> bool {
        self.state(id) == DialogState::AwaitingChoice
    }

    /// Number of conversations currently tracked (pending or mid-turn).
    pub fn tracked(&self) -> usize {
        lock(&self.slots).len()
    }

    fn slot(&self, id: &ConversationId) -> Slot {
        lock(&self.slots).entry(id.clone()).or_default().clone()
    }

    /// Drop an idle slot once no other turn holds a handle to it.
    fn release(&self, id: &ConversationId, slot: Slot) {
        let mut slots = lock(&self.slots);
        // map + our handle; new handles are only cloned under `slots`
        if Arc::strong_count(&slot) == 2 && lock(&slot).is_none() {
            slots.remove(id);
        }
    }
}

/// The guarded data is consistent between operations, so a panic elsewhere
/// does not invalidate it.
fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}
