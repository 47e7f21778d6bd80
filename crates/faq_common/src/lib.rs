//! Shared core of the FAQ desk: pattern store, matcher, clarification
//! dialog, fallback rules and the turn service used by every driver.

pub mod annotator;
pub mod clarify;
pub mod config;
pub mod error;
pub mod fallback;
pub mod greetings;
pub mod logging;
pub mod matcher;
pub mod service;
pub mod store;
pub mod utterance;

pub use annotator::{Annotation, Annotator, EntityLabel, LexiconAnnotator};
pub use clarify::{ConversationId, ConversationRegistry, DialogState};
pub use config::FaqConfig;
pub use error::{AnnotatorError, ConfigError, DataLoadError, FaqError};
pub use fallback::{FallbackClassifier, FallbackRule};
pub use matcher::{match_utterance, MatchCandidate, RankedCandidates};
pub use service::{FaqService, TurnKind, TurnResponse};
pub use store::{DataSources, FaqEntry, PatternStore};
pub use utterance::{normalize, Utterance};

/// Crate version, shown in driver banners and `--version`
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
