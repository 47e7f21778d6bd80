//! Fallback replies for utterances no pattern matched.
//!
//! The rules form a strict decision list evaluated in order; the first rule
//! that produces a reply wins and later rules never run:
//!
//! 1. `Navigation`  - "get to X" → map search link for X
//! 2. `NamedEntity` - person / creative work → subject redirect or encyclopedia link
//! 3. `Greeting`    - greeting word → greeting reply
//! 4. `Farewell`    - farewell word or phrase → farewell reply, ends the session
//! 5. `SpeechAct`   - organization / place / question / statement / unknown
//!
//! Annotations are computed at most once per utterance and only when a rule
//! needs them. If the annotator fails, entity rules stay silent and the
//! speech-act rule answers with the generic "don't understand" reply.

use crate::annotator::{Annotation, Annotator, EntityLabel, PosTag, WH_WORDS};
use crate::config::{LinkConfig, SubjectConfig};
use crate::greetings::{self, FAREWELL_REPLY, GREETING_REPLY};
use crate::utterance::Utterance;
use serde::{Deserialize, Serialize};
use std::cell::OnceCell;
use std::sync::Arc;
use tracing::{debug, warn};

const NAVIGATION_TRIGGER: &str = "get to ";

/// Lemmas treated as imperatives even when tagged otherwise.
pub const COMMAND_LEMMAS: &[&str] = &["give", "tell", "go", "make", "drive"];

pub const ORGANIZATION_REPLY: &str = "Sorry, I don't know. I don't work for that organization.";
pub const PLACE_REPLY: &str = "Sorry, I don't know. I've never been to that place.";
pub const QUESTION_REPLY: &str = "Sorry, I don't know the answer to that.";
pub const UNKNOWN_REPLY: &str = "Sorry, I don't understand your request.";

/// One entry of the fallback decision list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackRule {
    Navigation,
    NamedEntity,
    Greeting,
    Farewell,
    SpeechAct,
}

pub const DEFAULT_RULES: [FallbackRule; 5] = [
    FallbackRule::Navigation,
    FallbackRule::NamedEntity,
    FallbackRule::Greeting,
    FallbackRule::Farewell,
    FallbackRule::SpeechAct,
];

/// Coarse speech act of an utterance nobody could answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeechAct {
    Organization,
    Place,
    Question,
    Statement,
    Unknown,
}

impl SpeechAct {
    pub fn classify(annotation: &Annotation, utterance: &Utterance) -> Self {
        if annotation.has_entity(EntityLabel::Organization) {
            return SpeechAct::Organization;
        }
        if annotation.has_entity(EntityLabel::Place) {
            return SpeechAct::Place;
        }

        let starts_with_wh = annotation
            .tokens
            .first()
            .is_some_and(|t| t.pos == PosTag::WhWord || WH_WORDS.contains(&t.text.as_str()));
        if starts_with_wh || utterance.had_question_mark() || annotation.has_pos(PosTag::Aux) {
            return SpeechAct::Question;
        }

        if annotation.has_pos(PosTag::Verb) || annotation.has_lemma(COMMAND_LEMMAS) {
            return SpeechAct::Statement;
        }
        SpeechAct::Unknown
    }
}

/// Reply produced by the fallback list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FallbackReply {
    pub rule: FallbackRule,
    pub text: String,
    /// The driver should end the session after delivering `text`
    pub terminate: bool,
}

impl FallbackReply {
    fn new(rule: FallbackRule, text: impl Into<String>) -> Self {
        Self {
            rule,
            text: text.into(),
            terminate: false,
        }
    }
}

/// Per-utterance state shared by the rules.
pub struct FallbackInput<'a> {
    utterance: &'a Utterance,
    annotator: &'a dyn Annotator,
    annotation: OnceCell<Option<Annotation>>,
}

impl<'a> FallbackInput<'a> {
    pub fn new(utterance: &'a Utterance, annotator: &'a dyn Annotator) -> Self {
        Self {
            utterance,
            annotator,
            annotation: OnceCell::new(),
        }
    }

    pub fn utterance(&self) -> &Utterance {
        self.utterance
    }

    /// Annotation of the normalized text, `None` if the annotator failed.
    pub fn annotation(&self) -> Option<&Annotation> {
        self.annotation
            .get_or_init(|| match self.annotator.annotate(&self.utterance.normalized) {
                Ok(annotation) => Some(annotation),
                Err(e) => {
                    warn!("annotator failed, entity rules disabled for this turn: {}", e);
                    None
                }
            })
            .as_ref()
    }
}

/// Ordered rule table plus what the rules need to phrase replies.
pub struct FallbackClassifier {
    annotator: Arc<dyn Annotator>,
    rules: Vec<FallbackRule>,
    subject: SubjectConfig,
    links: LinkConfig,
    questions_file: String,
}

impl FallbackClassifier {
    pub fn new(annotator: Arc<dyn Annotator>, subject: SubjectConfig, links: LinkConfig) -> Self {
        Self {
            annotator,
            rules: DEFAULT_RULES.to_vec(),
            subject,
            links,
            questions_file: "questions.txt".to_string(),
        }
    }

    /// Replace the rule order.
    pub fn with_rules(mut self, rules: Vec<FallbackRule>) -> Self {
        self.rules = rules;
        self
    }

    /// File name mentioned in the subject redirect.
    pub fn with_questions_file(mut self, name: impl Into<String>) -> Self {
        self.questions_file = name.into();
        self
    }

    /// Run the decision list; the first rule that fires answers.
    pub fn classify(&self, utterance: &Utterance) -> FallbackReply {
        let input = FallbackInput::new(utterance, self.annotator.as_ref());
        for rule in &self.rules {
            if let Some(reply) = self.evaluate(*rule, &input) {
                debug!(rule = ?reply.rule, "fallback rule fired");
                return reply;
            }
        }
        FallbackReply::new(FallbackRule::SpeechAct, UNKNOWN_REPLY)
    }

    /// Evaluate one rule in isolation.
    pub fn evaluate(&self, rule: FallbackRule, input: &FallbackInput<'_>) -> Option<FallbackReply> {
        match rule {
            FallbackRule::Navigation => self.navigation(input.utterance()),
            FallbackRule::NamedEntity => self.named_entity(input),
            FallbackRule::Greeting => greetings::is_greeting(&input.utterance().normalized)
                .then(|| FallbackReply::new(rule, GREETING_REPLY)),
            FallbackRule::Farewell => {
                greetings::is_farewell(&input.utterance().normalized).then(|| FallbackReply {
                    rule,
                    text: FAREWELL_REPLY.to_string(),
                    terminate: true,
                })
            }
            FallbackRule::SpeechAct => Some(self.speech_act(input)),
        }
    }

    fn navigation(&self, utterance: &Utterance) -> Option<FallbackReply> {
        let target = navigation_target(&utterance.display_text())?;
        let link = fill_template(&self.links.map_search, &urlencoding::encode(&target));
        Some(FallbackReply::new(
            FallbackRule::Navigation,
            format!(
                "Sorry, I don't know, but you could try Google Maps. Here's a link: {}",
                link
            ),
        ))
    }

    fn named_entity(&self, input: &FallbackInput<'_>) -> Option<FallbackReply> {
        let entity = input
            .annotation()?
            .first_entity(&[EntityLabel::Person, EntityLabel::CreativeWork])?;

        if entity.text == self.subject.name {
            return Some(FallbackReply::new(
                FallbackRule::NamedEntity,
                format!(
                    "This is a FAQ Bot about {}, please ask the questions in {} to have them answered",
                    self.subject.display_name, self.questions_file
                ),
            ));
        }

        let article = entity.text.replace(' ', "_");
        let link = fill_template(&self.links.encyclopedia, &urlencoding::encode(&article));
        Some(FallbackReply::new(
            FallbackRule::NamedEntity,
            format!(
                "Sorry, I don't know, but maybe you could try Wikipedia. Here's a link: {}",
                link
            ),
        ))
    }

    fn speech_act(&self, input: &FallbackInput<'_>) -> FallbackReply {
        let act = match input.annotation() {
            Some(annotation) => SpeechAct::classify(annotation, input.utterance()),
            None => SpeechAct::Unknown,
        };
        let text = match act {
            SpeechAct::Organization => ORGANIZATION_REPLY.to_string(),
            SpeechAct::Place => PLACE_REPLY.to_string(),
            SpeechAct::Question => QUESTION_REPLY.to_string(),
            SpeechAct::Statement => format!(
                "I see. Is there something you'd like to know about {}?",
                self.subject.display_name
            ),
            SpeechAct::Unknown => UNKNOWN_REPLY.to_string(),
        };
        FallbackReply::new(FallbackRule::SpeechAct, text)
    }
}

/// Text after "get to ", case preserved. `None` when the phrase is absent
/// or nothing follows it.
///
/// The trigger has to start a word, so "forget to" never reads as a
/// navigation request the way a bare substring search would.
pub fn navigation_target(text: &str) -> Option<String> {
    // ASCII lowercasing keeps byte offsets valid for slicing `text`
    let lower = text.to_ascii_lowercase();
    let idx = lower
        .match_indices(NAVIGATION_TRIGGER)
        .map(|(i, _)| i)
        .find(|&i| i == 0 || lower[..i].ends_with(char::is_whitespace))?;
    let target = text[idx + NAVIGATION_TRIGGER.len()..].trim();
    (!target.is_empty()).then(|| target.to_string())
}

fn fill_template(template: &str, value: &str) -> String {
    if template.contains("{}") {
        template.replacen("{}", value, 1)
    } else {
        format!("{}{}", template, value)
    }
}
