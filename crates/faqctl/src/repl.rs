//! REPL - interactive terminal session
//!
//! One implicit conversation per process. Input and output are generic so
//! the loop can be driven from a `Cursor` in tests.

use crate::output;
use faq_common::greetings::{session_banner, FAREWELL_REPLY};
use faq_common::{ConversationId, FaqService};
use std::io::{self, BufRead, Write};
use tracing::{debug, warn};

pub const PROMPT: &str = ">>> ";

/// Why the loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// The service answered with a farewell
    Farewell,
    /// Input closed
    Eof,
}

/// Run the chat loop until a farewell or end of input. A read error ends the
/// session and is returned to the caller.
pub fn run_repl(
    service: &FaqService,
    subject: &str,
    input: impl BufRead,
    mut out: impl Write,
    color: bool,
) -> io::Result<SessionEnd> {
    let conversation = ConversationId::terminal();

    writeln!(out, "{}", output::banner(&session_banner(subject), color))?;
    let mut lines = input.lines();

    loop {
        write!(out, "{}", PROMPT)?;
        out.flush()?;

        let line = match lines.next() {
            Some(Ok(line)) => line,
            Some(Err(e)) => {
                warn!("error reading input: {}", e);
                return Err(e);
            }
            None => {
                writeln!(out)?;
                writeln!(out, "{}", FAREWELL_REPLY)?;
                debug!("input closed");
                return Ok(SessionEnd::Eof);
            }
        };

        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let response = service.handle_turn(&conversation, line);
        for text in &response.lines {
            writeln!(out, "{}", output::reply_line(text, &response.kind, color))?;
        }
        writeln!(out)?;

        if response.terminate {
            return Ok(SessionEnd::Farewell);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use faq_common::config::{LinkConfig, SubjectConfig};
    use faq_common::{FallbackClassifier, LexiconAnnotator, PatternStore};
    use std::io::Cursor;
    use std::sync::Arc;

    fn service() -> FaqService {
        let store = PatternStore::from_lines(
            vec![
                "When was he born?".into(),
                "What were his most famous fights?".into(),
                "How many fights did he win?".into(),
            ],
            vec![
                "1942".into(),
                "The Rumble in the Jungle.".into(),
                "56".into(),
            ],
            vec![
                "when was (he )?born".into(),
                "tell me about his fights".into(),
                "tell me about".into(),
            ],
        )
        .unwrap();
        let fallback = FallbackClassifier::new(
            Arc::new(LexiconAnnotator::default()),
            SubjectConfig::default(),
            LinkConfig::default(),
        );
        FaqService::new(store, fallback)
    }

    fn run(input: &str) -> (String, SessionEnd) {
        let svc = service();
        let mut out = Vec::new();
        let end = run_repl(&svc, "Muhammad Ali", Cursor::new(input), &mut out, false).unwrap();
        (String::from_utf8(out).unwrap(), end)
    }

    #[test]
    fn test_banner_and_answer() {
        let (out, end) = run("When was he born?\n");
        assert!(out.starts_with(
            "Hello! I know stuff about Muhammad Ali. When you're done, just say 'goodbye.'\n>>> "
        ));
        assert!(out.contains(">>> 1942\n\n"));
        assert_eq!(end, SessionEnd::Eof);
        assert!(out.ends_with("Goodbye!\n"));
    }

    #[test]
    fn test_menu_then_choice() {
        let (out, _) = run("tell me about his fights\n2\n");
        assert!(out.contains("I found multiple possible matches:\n"));
        assert!(out.contains("1. What were his most famous fights?\n"));
        assert!(out.contains("2. How many fights did he win?\n"));
        assert!(out.contains(">>> 56\n"));
    }

    #[test]
    fn test_farewell_stops_loop() {
        let (out, end) = run("goodbye\nwhen was he born\n");
        assert_eq!(end, SessionEnd::Farewell);
        assert!(!out.contains("1942"));
        assert_eq!(out.matches("Goodbye!").count(), 1);
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        let (out, _) = run("\n   \nwhen was he born\n");
        assert_eq!(out.matches("1942").count(), 1);
        assert_eq!(out.matches(PROMPT).count(), 4);
    }

    /// Reader that fails on every call, like stdin bound to a directory.
    struct BrokenInput;

    impl io::Read for BrokenInput {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "is a directory"))
        }
    }

    impl BufRead for BrokenInput {
        fn fill_buf(&mut self) -> io::Result<&[u8]> {
            Err(io::Error::new(io::ErrorKind::Other, "is a directory"))
        }

        fn consume(&mut self, _amt: usize) {}
    }

    #[test]
    fn test_read_error_ends_session() {
        let svc = service();
        let mut out = Vec::new();
        let err = run_repl(&svc, "Muhammad Ali", BrokenInput, &mut out, false).unwrap_err();
        assert_eq!(err.to_string(), "is a directory");

        let out = String::from_utf8(out).unwrap();
        assert_eq!(out.matches(PROMPT).count(), 1);
        assert!(!out.contains("Goodbye!"));
    }
}
