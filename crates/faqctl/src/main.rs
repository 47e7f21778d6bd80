//! faqctl - terminal driver for the FAQ desk
//!
//! Without a subcommand it starts an interactive chat; `ask` answers one
//! question and `check` validates the data files.

use anyhow::{Context, Result};
use clap::Parser;
use faq_common::{logging, ConversationId, FaqConfig, FaqError, FaqService, PatternStore};
use faqctl::cli::{Cli, Commands};
use faqctl::{output, repl};
use std::io;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output_error(&e);
            let code = e
                .downcast_ref::<FaqError>()
                .map(FaqError::code)
                .unwrap_or(1);
            ExitCode::from(u8::try_from(code).unwrap_or(1))
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli)?;
    logging::init(&config.log.level);

    match cli.command() {
        Commands::Chat => chat(&config),
        Commands::Ask { words, json } => ask(&config, &words.join(" "), json),
        Commands::Check => check(&config),
    }
}

/// Config file plus command-line overrides.
fn load_config(cli: &Cli) -> Result<FaqConfig> {
    let mut config = FaqConfig::load(cli.config.as_deref()).map_err(FaqError::from)?;
    if let Some(dir) = &cli.data_dir {
        config.data.dir = dir.clone();
    }
    if let Some(level) = &cli.log_level {
        config.log.level = level.clone();
    }
    Ok(config)
}

fn chat(config: &FaqConfig) -> Result<()> {
    let service = FaqService::from_config(config)?;
    let stdin = io::stdin();
    repl::run_repl(
        &service,
        &config.subject.display_name,
        stdin.lock(),
        io::stdout(),
        output::should_use_color(),
    )
    .context("terminal session failed")?;
    Ok(())
}

fn ask(config: &FaqConfig, question: &str, json: bool) -> Result<()> {
    let service = FaqService::from_config(config)?;
    let response = service.handle_turn(&ConversationId::terminal(), question);

    if json {
        let rendered =
            serde_json::to_string_pretty(&response).context("failed to serialize reply")?;
        println!("{}", rendered);
    } else {
        let color = output::should_use_color();
        for line in &response.lines {
            println!("{}", output::reply_line(line, &response.kind, color));
        }
    }
    Ok(())
}

fn check(config: &FaqConfig) -> Result<()> {
    let store = PatternStore::load(&config.data.sources()).map_err(FaqError::from)?;
    println!("{}", output::check_report(&store, output::should_use_color()));
    Ok(())
}

fn output_error(err: &anyhow::Error) {
    eprintln!();
    eprintln!("[ERROR] {:#}", err);
    eprintln!();
}
