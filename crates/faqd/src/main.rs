//! faqd - FAQ desk Discord bot
//!
//! Answers questions in guild channels and direct messages.

use anyhow::Result;
use clap::Parser;
use faq_common::{logging, FaqConfig, FaqError};
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "faqd")]
#[command(about = "FAQ desk - Discord bot", long_about = None)]
#[command(version = faq_common::VERSION)]
struct Args {
    /// Config file (overrides $FAQ_CONFIG and the user config dir)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory holding the data files
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// File holding the bot token
    #[arg(long)]
    token_file: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = FaqConfig::load(args.config.as_deref()).map_err(FaqError::from)?;
    if let Some(dir) = args.data_dir {
        config.data.dir = dir;
    }
    if let Some(file) = args.token_file {
        config.discord.token_file = file;
    }
    if let Some(level) = args.log_level {
        config.log.level = level;
    }

    logging::init(&config.log.level);
    info!("faqd v{} starting", faq_common::VERSION);

    tokio::select! {
        result = faqd::run(&config) => {
            if let Err(e) = &result {
                error!("faqd stopped: {:#}", e);
            }
            result
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutting down gracefully");
            Ok(())
        }
    }
}
