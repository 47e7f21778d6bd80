//! The FAQ service: one turn in, one reply out.
//!
//! Both drivers (terminal and Discord) go through [`FaqService::handle_turn`];
//! neither keeps dialog state of its own.

use crate::annotator::{Annotator, LexiconAnnotator};
use crate::clarify::{
    parse_choice, ChoiceOutcome, ClarifyMenu, ConversationId, ConversationRegistry,
    PendingClarification, INVALID_CHOICE, INVALID_INPUT,
};
use crate::config::FaqConfig;
use crate::error::FaqError;
use crate::fallback::{FallbackClassifier, FallbackRule};
use crate::greetings::{self, GREETING_REPLY};
use crate::matcher::{match_utterance, MatchCandidate};
use crate::store::{EntryId, PatternStore};
use crate::utterance::Utterance;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

/// What produced a reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TurnKind {
    /// Exactly one entry matched
    Answer { entry: EntryId, errors: u32 },
    /// Several entries matched; a menu was shown
    Clarify { candidates: Vec<MatchCandidate> },
    /// The turn answered a pending menu
    Choice { outcome: ChoiceOutcome },
    /// Nothing matched
    Fallback { rule: FallbackRule },
}

/// Reply for one turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnResponse {
    pub lines: Vec<String>,
    /// The driver should end this session after delivering the reply
    pub terminate: bool,
    pub kind: TurnKind,
}

impl TurnResponse {
    fn single(text: impl Into<String>, kind: TurnKind) -> Self {
        Self {
            lines: vec![text.into()],
            terminate: false,
            kind,
        }
    }

    /// Lines joined with newlines.
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

pub struct FaqService {
    store: PatternStore,
    registry: ConversationRegistry,
    fallback: FallbackClassifier,
    greet_first: bool,
}

impl FaqService {
    pub fn new(store: PatternStore, fallback: FallbackClassifier) -> Self {
        Self {
            store,
            registry: ConversationRegistry::new(),
            fallback,
            greet_first: false,
        }
    }

    /// Answer greetings before matching (only when no menu is pending).
    pub fn with_greet_first(mut self, greet_first: bool) -> Self {
        self.greet_first = greet_first;
        self
    }

    /// Load the data files and build the service with the built-in annotator.
    pub fn from_config(config: &FaqConfig) -> Result<Self, FaqError> {
        let annotator = LexiconAnnotator::with_defaults(config.lexicon.entities.clone());
        Self::from_config_with(config, Arc::new(annotator))
    }

    /// Same as [`from_config`](Self::from_config) with a caller-supplied annotator.
    pub fn from_config_with(
        config: &FaqConfig,
        annotator: Arc<dyn Annotator>,
    ) -> Result<Self, FaqError> {
        let store = PatternStore::load(&config.data.sources())?;
        let fallback =
            FallbackClassifier::new(annotator, config.subject.clone(), config.links.clone())
                .with_questions_file(config.data.questions.clone());
        info!(
            entries = store.len(),
            subject = %config.subject.display_name,
            greet_first = config.dialog.greet_first,
            "FAQ service ready"
        );
        Ok(Self::new(store, fallback).with_greet_first(config.dialog.greet_first))
    }

    pub fn store(&self) -> &PatternStore {
        &self.store
    }

    pub fn registry(&self) -> &ConversationRegistry {
        &self.registry
    }

    /// Process one utterance from `conversation`.
    pub fn handle_turn(&self, conversation: &ConversationId, raw: &str) -> TurnResponse {
        let utterance = Utterance::new(raw);

        self.registry.with_conversation(conversation, |conv| {
            if let Some(pending) = conv.take_pending() {
                return self.resolve_choice(&pending, &utterance);
            }

            if self.greet_first && greetings::is_greeting(&utterance.normalized) {
                return TurnResponse::single(
                    GREETING_REPLY,
                    TurnKind::Fallback {
                        rule: FallbackRule::Greeting,
                    },
                );
            }

            let candidates = match_utterance(&utterance.normalized, self.store.entries());
            match candidates.best().copied() {
                None => {
                    let reply = self.fallback.classify(&utterance);
                    TurnResponse {
                        lines: vec![reply.text],
                        terminate: reply.terminate,
                        kind: TurnKind::Fallback { rule: reply.rule },
                    }
                }
                Some(best) if candidates.len() == 1 => TurnResponse::single(
                    self.answer(best.id),
                    TurnKind::Answer {
                        entry: best.id,
                        errors: best.errors,
                    },
                ),
                Some(_) => {
                    let menu = ClarifyMenu::from_candidates(&candidates, &self.store);
                    debug!(conversation = %conv.id(), options = menu.options.len(), "awaiting choice");
                    let kind = TurnKind::Clarify {
                        candidates: candidates.iter().copied().collect(),
                    };
                    conv.await_choice(candidates);
                    TurnResponse {
                        lines: menu.lines(),
                        terminate: false,
                        kind,
                    }
                }
            }
        })
    }

    fn resolve_choice(&self, pending: &PendingClarification, utterance: &Utterance) -> TurnResponse {
        let outcome = parse_choice(&utterance.normalized, &pending.candidates);
        debug!(conversation = %pending.conversation, ?outcome, "resolved pending choice");

        let text = match &outcome {
            ChoiceOutcome::Selected { candidate, .. } => self.answer(candidate.id).to_string(),
            ChoiceOutcome::OutOfRange { .. } => INVALID_CHOICE.to_string(),
            ChoiceOutcome::NotANumber { .. } => INVALID_INPUT.to_string(),
        };
        TurnResponse::single(text, TurnKind::Choice { outcome })
    }

    fn answer(&self, id: EntryId) -> &str {
        // ids only ever come from this store
        self.store.answer(id).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotator::LexiconAnnotator;
    use crate::config::{LinkConfig, SubjectConfig};

    fn service(patterns: &[&str]) -> FaqService {
        let n = patterns.len();
        let store = PatternStore::from_lines(
            (0..n).map(|i| format!("Question {}?", i)).collect(),
            (0..n).map(|i| format!("Answer {}", i)).collect(),
            patterns.iter().map(|p| p.to_string()).collect(),
        )
        .unwrap();
        let fallback = FallbackClassifier::new(
            Arc::new(LexiconAnnotator::default()),
            SubjectConfig::default(),
            LinkConfig::default(),
        );
        FaqService::new(store, fallback)
    }

    #[test]
    fn test_single_match_answers() {
        let svc = service(&["when was (he )?born", "where"]);
        let resp = svc.handle_turn(&ConversationId::terminal(), "When was he born?");
        assert_eq!(resp.lines, vec!["Answer 0"]);
        assert_eq!(resp.kind, TurnKind::Answer { entry: 0, errors: 0 });
        assert!(!resp.terminate);
    }

    #[test]
    fn test_menu_then_choice() {
        let svc = service(&["tell me", "tell"]);
        let id = ConversationId::terminal();

        let menu = svc.handle_turn(&id, "tell me more");
        assert_eq!(menu.lines.len(), 4);
        assert!(svc.registry().is_pending(&id));

        let answer = svc.handle_turn(&id, "2");
        assert_eq!(answer.text(), "Answer 1");
        assert!(!svc.registry().is_pending(&id));
    }

    #[test]
    fn test_greet_first_only_when_idle() {
        let svc = service(&["hi there", "hi"]).with_greet_first(true);
        let id = ConversationId::terminal();

        let resp = svc.handle_turn(&id, "hi there");
        assert_eq!(resp.text(), GREETING_REPLY);
        assert!(!svc.registry().is_pending(&id));
    }
}
