// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon configuration: fixed state-dir paths overridable by environment,
//! with an optional `wrangler.toml` for the same fields (env takes
//! precedence over the file, the file over the built-in default — the
//! same precedence order the hook uses for port/URL, spec §4.C.3).

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not determine a state directory (set WRANGLER_STATE_DIR or $HOME)")]
    NoStateDir,
    #[error("invalid wrangler.toml at {path}: {source}")]
    TomlParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("io error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Fields the optional `wrangler.toml` may supply. Every field is also
/// settable (and overridden) by an environment variable — see [`Config::load`].
#[derive(Debug, Clone, Default, serde::Deserialize)]
#[serde(default, rename_all = "snake_case")]
struct FileConfig {
    port: Option<u16>,
    tmux_prefix: Option<String>,
    admin_chat_id: Option<String>,
    webhook_secret: Option<String>,
    bot_token: Option<String>,
    sandbox_cmd: Option<String>,
    agent_cmd: Option<String>,
}

/// Resolve the root state directory: `WRANGLER_STATE_DIR` env var, else
/// `$XDG_STATE_HOME/wrangler`, else `~/.local/state/wrangler` (via the
/// `dirs` crate — the same resolution order the teacher daemon uses for
/// its own state dir).
fn state_dir() -> Result<PathBuf, ConfigError> {
    if let Ok(dir) = std::env::var("WRANGLER_STATE_DIR") {
        return Ok(PathBuf::from(dir));
    }
    dirs::state_dir()
        .or_else(dirs::data_local_dir)
        .map(|d| d.join("wrangler"))
        .ok_or(ConfigError::NoStateDir)
}

/// The daemon's resolved configuration. Set once at startup, read-only
/// thereafter (spec §5 "Shared resources").
#[derive(Debug, Clone)]
pub struct Config {
    /// Root of the session-coordination filesystem (spec §3, §6).
    pub sessions_root: PathBuf,
    /// Node-root persisted files: `last_chat_id`, `last_active`, `port`.
    pub node_root: PathBuf,
    /// HTTP port the boundary server listens on.
    pub port: u16,
    /// Prefix prepended to every worker's short name to form the full
    /// multiplexer session name (spec §3 "namespace isolation per node").
    pub tmux_prefix: String,
    /// Pre-set admin chat id, if configured; otherwise learned from the
    /// first inbound message (spec §3, §4.E).
    pub admin_chat_id: Option<String>,
    /// Shared-secret header value the webhook must present, if configured
    /// (spec §6).
    pub webhook_secret: Option<String>,
    /// Chat-transport bot token (Telegram bot API token).
    pub bot_token: Option<String>,
    /// Command used to run the agent inside a sandbox (container runner),
    /// if configured; falls back to the direct `agent_cmd`.
    pub sandbox_cmd: Option<String>,
    /// Command used to launch the agent directly inside a worker session.
    pub agent_cmd: String,
    /// Externally reachable base URL the hook should POST responses to
    /// (stamped into each session's `BRIDGE_URL` env var, spec §4.A).
    pub bridge_url: Option<String>,
}

impl Config {
    /// Load configuration: defaults, then an optional `wrangler.toml`
    /// under the state dir, then environment variables (highest
    /// precedence), matching the teacher's layered `Config::load`.
    pub fn load() -> Result<Self, ConfigError> {
        let state_dir = state_dir()?;
        let file = Self::load_file(&state_dir.join("wrangler.toml"))?;

        let port = env_u16("WRANGLER_PORT")
            .or(file.port)
            .unwrap_or(8088);
        let tmux_prefix = std::env::var("WRANGLER_TMUX_PREFIX")
            .ok()
            .or(file.tmux_prefix)
            .unwrap_or_else(|| "wrangler-".to_string());
        let admin_chat_id = std::env::var("WRANGLER_ADMIN_CHAT_ID")
            .ok()
            .or(file.admin_chat_id);
        let webhook_secret = std::env::var("WRANGLER_WEBHOOK_SECRET")
            .ok()
            .or(file.webhook_secret);
        let bot_token = std::env::var("WRANGLER_BOT_TOKEN").ok().or(file.bot_token);
        let sandbox_cmd = std::env::var("WRANGLER_SANDBOX_CMD")
            .ok()
            .or(file.sandbox_cmd);
        let agent_cmd = std::env::var("WRANGLER_AGENT_CMD")
            .ok()
            .or(file.agent_cmd)
            .unwrap_or_else(|| "claude".to_string());
        let bridge_url = std::env::var("WRANGLER_BRIDGE_URL").ok();

        Ok(Self {
            sessions_root: state_dir.join("sessions"),
            node_root: state_dir,
            port,
            tmux_prefix,
            admin_chat_id,
            webhook_secret,
            bot_token,
            sandbox_cmd,
            agent_cmd,
            bridge_url,
        })
    }

    fn load_file(path: &PathBuf) -> Result<FileConfig, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(contents) => toml::from_str(&contents).map_err(|source| ConfigError::TomlParse {
                path: path.clone(),
                source,
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(FileConfig::default()),
            Err(source) => Err(ConfigError::Io {
                path: path.clone(),
                source,
            }),
        }
    }

    /// Effective command used to spawn the agent inside a new worker
    /// session: the sandbox runner if configured, otherwise the direct
    /// command (spec §4.G.dispatch `hire`: "direct or via sandbox runner").
    pub fn launch_cmd(&self) -> &str {
        self.sandbox_cmd.as_deref().unwrap_or(&self.agent_cmd)
    }

    /// Redacted summary for `/settings` (spec §4.G.dispatch): presence,
    /// not values, for anything secret.
    pub fn settings_summary(&self) -> String {
        format!(
            "admin_chat_id: {}\nprefix: {}\nport: {}\nsandbox: {}\nwebhook_secret: {}",
            if self.admin_chat_id.is_some() { "set" } else { "unset" },
            self.tmux_prefix,
            self.port,
            if self.sandbox_cmd.is_some() { "enabled" } else { "disabled" },
            if self.webhook_secret.is_some() { "set" } else { "unset" },
        )
    }
}

fn env_u16(key: &str) -> Option<u16> {
    std::env::var(key).ok().and_then(|s| s.parse().ok())
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
