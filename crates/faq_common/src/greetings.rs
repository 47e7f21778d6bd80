//! Greetings, farewells and the session banner.

use crate::annotator::tokenize;

pub const GREETING_REPLY: &str = "Hello! How can I assist you today?";
pub const FAREWELL_REPLY: &str = "Goodbye!";

const GREETING_TOKENS: &[&str] = &["hello", "hi", "hey"];
const FAREWELL_TOKENS: &[&str] = &["bye", "goodbye"];
const FAREWELL_PHRASES: &[&str] = &["see you later"];

/// Any word of the utterance is a greeting ("hi", "hey there", "oh hello").
pub fn is_greeting(utterance: &str) -> bool {
    tokenize(&utterance.to_lowercase())
        .iter()
        .any(|w| GREETING_TOKENS.contains(&w.as_str()))
}

/// A farewell word or phrase appears anywhere in the utterance.
pub fn is_farewell(utterance: &str) -> bool {
    let words = tokenize(&utterance.to_lowercase());
    if words.iter().any(|w| FAREWELL_TOKENS.contains(&w.as_str())) {
        return true;
    }
    let joined = words.join(" ");
    FAREWELL_PHRASES.iter().any(|p| contains_phrase(&joined, p))
}

/// Opening line of an interactive session.
pub fn session_banner(display_name: &str) -> String {
    format!(
        "Hello! I know stuff about {}. When you're done, just say 'goodbye.'",
        display_name
    )
}

/// `phrase` occurs in `text` on word boundaries.
fn contains_phrase(text: &str, phrase: &str) -> bool {
    text.match_indices(phrase).any(|(idx, _)| {
        let before_ok = idx == 0 || text[..idx].ends_with(' ');
        let after = &text[idx + phrase.len()..];
        let after_ok = after.is_empty() || after.starts_with(' ');
        before_ok && after_ok
    })
}
