//! Bot token lookup: environment variable first, then the token file.

use faq_common::config::DiscordConfig;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("no bot token: set ${env} or create {}", file.display())]
    Missing { env: String, file: PathBuf },

    #[error("failed to read token file {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("bot token from {origin} is empty")]
    Empty { origin: String },
}

/// Resolve the token from the process environment and `config`.
pub fn load_token(config: &DiscordConfig) -> Result<String, TokenError> {
    resolve_token(std::env::var(&config.token_env).ok(), config)
}

/// Resolve the token given the value of the configured variable.
pub fn resolve_token(
    env_value: Option<String>,
    config: &DiscordConfig,
) -> Result<String, TokenError> {
    if let Some(value) = env_value {
        debug!(var = %config.token_env, "using bot token from environment");
        return non_empty(value, format!("${}", config.token_env));
    }
    read_token_file(&config.token_file).map_err(|e| match e {
        TokenError::Unreadable { source, .. } if source.kind() == io::ErrorKind::NotFound => {
            TokenError::Missing {
                env: config.token_env.clone(),
                file: config.token_file.clone(),
            }
        }
        other => other,
    })
}

fn read_token_file(path: &Path) -> Result<String, TokenError> {
    let raw = fs::read_to_string(path).map_err(|source| TokenError::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), "using bot token from file");
    non_empty(raw, path.display().to_string())
}

fn non_empty(raw: String, origin: String) -> Result<String, TokenError> {
    let token = raw.trim();
    if token.is_empty() {
        return Err(TokenError::Empty { origin });
    }
    Ok(token.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn config_in(dir: &Path) -> DiscordConfig {
        DiscordConfig {
            token_env: "FAQD_TEST_TOKEN".to_string(),
            token_file: dir.join("bot_token.txt"),
        }
    }

    #[test]
    fn test_env_wins_over_file() {
        let dir = TempDir::new().unwrap();
        let config = config_in(dir.path());
        fs::write(&config.token_file, "from-file\n").unwrap();

        let token = resolve_token(Some("  from-env ".to_string()), &config).unwrap();
        assert_eq!(token, "from-env");
    }

    #[test]
    fn test_file_is_trimmed() {
        let dir = TempDir::new().unwrap();
        let config = config_in(dir.path());
        fs::write(&config.token_file, "abc.def.ghi\r\n").unwrap();

        assert_eq!(resolve_token(None, &config).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn test_missing_everywhere() {
        let dir = TempDir::new().unwrap();
        let config = config_in(dir.path());

        let err = resolve_token(None, &config).unwrap_err();
        assert!(matches!(err, TokenError::Missing { .. }));
        assert!(err.to_string().contains("$FAQD_TEST_TOKEN"));
    }

    #[test]
    fn test_empty_token_is_error() {
        let dir = TempDir::new().unwrap();
        let config = config_in(dir.path());
        fs::write(&config.token_file, "   \n").unwrap();

        assert!(matches!(
            resolve_token(None, &config),
            Err(TokenError::Empty { .. })
        ));
        assert!(matches!(
            resolve_token(Some(String::new()), &config),
            Err(TokenError::Empty { .. })
        ));
    }
}
