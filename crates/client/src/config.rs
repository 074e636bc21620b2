//! Client configuration loaded from the environment.
use std::env;
use std::path::PathBuf;

use war_runtime::SessionConfig;

/// Everything the headless client needs to run a game.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub session: SessionConfig,
    /// Stop after this many rounds even if the game is not over.
    pub round_limit: Option<u32>,
    /// Directory for the log file. Logs go to stderr only when unset.
    pub log_dir: Option<PathBuf>,
    /// Pretty-print the final JSON summary.
    pub pretty: bool,
}

impl ClientConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Session settings come from [`SessionConfig::from_env`]. Client-specific
    /// variables:
    /// - `WAR_ROUND_LIMIT` - Maximum rounds to request (default: until game over)
    /// - `WAR_LOG_DIR` - Directory for `war.log` (default: stderr only)
    /// - `WAR_PRETTY` - Pretty-print the JSON summary (default: true)
    pub fn from_env() -> Self {
        let mut config = Self {
            session: SessionConfig::from_env(),
            ..Self::default()
        };

        config.round_limit = read_env::<u32>("WAR_ROUND_LIMIT").filter(|limit| *limit > 0);
        config.log_dir = env::var_os("WAR_LOG_DIR").map(PathBuf::from);
        if let Some(pretty) = read_env::<bool>("WAR_PRETTY") {
            config.pretty = pretty;
        }

        config
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            session: SessionConfig::default(),
            round_limit: None,
            log_dir: None,
            pretty: true,
        }
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
