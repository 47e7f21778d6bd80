//! Utterance normalization.

/// One line of user input for a single turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Utterance {
    /// Trimmed input as typed, case and punctuation preserved
    pub raw: String,
    /// Lowercased, trimmed, with `.` and `?` removed
    pub normalized: String,
}

impl Utterance {
    pub fn new(raw: &str) -> Self {
        Self {
            raw: raw.trim().to_string(),
            normalized: normalize(raw),
        }
    }

    /// Input with `.` and `?` removed but original casing kept.
    ///
    /// Used where the reply echoes user text back (link targets).
    pub fn display_text(&self) -> String {
        strip_punctuation(&self.raw).trim().to_string()
    }

    pub fn had_question_mark(&self) -> bool {
        self.raw.contains('?')
    }

    pub fn is_empty(&self) -> bool {
        self.normalized.is_empty()
    }
}

/// Lowercase, trim, and drop periods and question marks.
///
/// Idempotent, so drivers that already normalized can pass text through.
pub fn normalize(input: &str) -> String {
    strip_punctuation(&input.to_lowercase()).trim().to_string()
}

fn strip_punctuation(input: &str) -> String {
    input.chars().filter(|c| *c != '.' && *c != '?').collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("  When was he BORN??? "), "when was he born");
        assert_eq!(normalize("Mr. Ali."), "mr ali");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let once = normalize(" What's his record?. ");
        assert_eq!(normalize(&once), once);
    }

    #[test]
    fn test_trailing_punctuation_does_not_leave_space() {
        assert_eq!(normalize("who is he ?"), "who is he");
    }

    #[test]
    fn test_display_text_keeps_case() {
        let u = Utterance::new("How do I get to Louisville?");
        assert_eq!(u.display_text(), "How do I get to Louisville");
        assert_eq!(u.normalized, "how do i get to louisville");
        assert!(u.had_question_mark());
    }
}
