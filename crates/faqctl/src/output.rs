//! Output formatting for the terminal driver.

use faq_common::clarify::{MENU_HEADER, MENU_PROMPT};
use faq_common::{PatternStore, TurnKind};
use owo_colors::OwoColorize;
use std::io::IsTerminal;

/// Color only on a real terminal, and never with NO_COLOR set or TERM=dumb.
pub fn should_use_color() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if !std::io::stdout().is_terminal() {
        return false;
    }
    !matches!(std::env::var("TERM").as_deref(), Ok("dumb"))
}

pub fn banner(text: &str, color: bool) -> String {
    if color {
        text.bold().to_string()
    } else {
        text.to_string()
    }
}

/// One line of a reply, colored by what produced it.
pub fn reply_line(text: &str, kind: &TurnKind, color: bool) -> String {
    if !color {
        return text.to_string();
    }
    match kind {
        TurnKind::Answer { .. } => text.bright_green().to_string(),
        TurnKind::Clarify { .. } if text == MENU_HEADER || text == MENU_PROMPT => {
            text.yellow().to_string()
        }
        TurnKind::Clarify { .. } => text.to_string(),
        TurnKind::Choice { outcome } if outcome.is_success() => text.bright_green().to_string(),
        TurnKind::Choice { .. } => text.bright_red().to_string(),
        TurnKind::Fallback { .. } => text.cyan().to_string(),
    }
}

/// Summary printed by `faqctl check`.
pub fn check_report(store: &PatternStore, color: bool) -> String {
    let fuzzy = store.entries().iter().filter(|e| e.reports_errors()).count();
    let status = if color {
        "[OK]".bright_green().to_string()
    } else {
        "[OK]".to_string()
    };
    format!(
        "{} {} entries loaded, {} with error counts",
        status,
        store.len(),
        fuzzy
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use faq_common::FallbackRule;

    #[test]
    fn test_plain_output_is_unchanged() {
        let kind = TurnKind::Fallback {
            rule: FallbackRule::Greeting,
        };
        assert_eq!(reply_line("hello", &kind, false), "hello");
        assert_eq!(banner("hi", false), "hi");
    }

    #[test]
    fn test_colored_output_has_ansi() {
        let kind = TurnKind::Answer {
            entry: 0,
            errors: 0,
        };
        assert!(reply_line("1942", &kind, true).contains("\x1b["));
    }

    #[test]
    fn test_check_report() {
        let store = PatternStore::from_lines(
            vec!["q1".into(), "q2".into()],
            vec!["a1".into(), "a2".into()],
            vec!["(?P<fuzzy_errors>\\d)? q1".into(), "q2".into()],
        )
        .unwrap();
        assert_eq!(
            check_report(&store, false),
            "[OK] 2 entries loaded, 1 with error counts"
        );
    }
}
