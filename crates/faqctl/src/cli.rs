//! CLI - Command-line argument parsing
//!
//! Keeps argument parsing separate from execution logic.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// FAQ desk terminal client
#[derive(Parser, Debug)]
#[command(name = "faqctl")]
#[command(about = "FAQ desk - answers questions from a pattern file", long_about = None)]
#[command(version = faq_common::VERSION)]
#[command(disable_help_subcommand = true)]
pub struct Cli {
    /// Config file (overrides $FAQ_CONFIG and the user config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding questions.txt, answers.txt and fuzzy_regex.txt
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Subcommand (if not provided, starts an interactive chat)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Interactive chat session
    Chat,

    /// Answer a single question and exit
    Ask {
        /// The question, as one or more words
        #[arg(required = true, num_args = 1..)]
        words: Vec<String>,

        /// Output the turn as JSON
        #[arg(long)]
        json: bool,
    },

    /// Load the data files and report problems
    Check,
}

impl Cli {
    /// Subcommand with the chat default applied.
    pub fn command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Chat)
    }
}
