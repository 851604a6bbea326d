// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! wrangler-hook - the stop-event hook installed into an agent's settings.
//!
//! Runs inside the agent's own process tree, not the bridge's (spec §4.C,
//! §9 "filesystem as IPC between unrelated processes"). Reads a small
//! stop-event payload on stdin, extracts the agent's latest reply from its
//! transcript, and POSTs it to the bridge. Every failure mode here is a
//! silent no-op by design: a hook that panics or prints noise into the
//! agent's own terminal is worse than a hook that misses one reply.

mod client;
mod config;
mod fallback;
mod session;
mod stability;
mod stdin;
mod transcript;

use std::path::Path;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use wrangler_adapters::CoordFs;

#[tokio::main]
async fn main() {
    setup_logging();

    let Some(full_session) = session::current_session_name() else {
        info!("not running inside a tmux session, exiting silently");
        return;
    };

    let config = config::HookConfig::load();
    let Some(worker) = session::worker_name(&full_session, &config.tmux_prefix) else {
        info!(session = %full_session, "session not prefixed for this bridge, exiting silently");
        return;
    };

    let coordfs = CoordFs::new(config.sessions_dir.as_str());
    if coordfs.get_chat_id(&worker).await.is_none() {
        info!(%worker, "worker has no chat_id, not chat-attached, exiting silently");
        return;
    }

    let event = match stdin::read_from(std::io::stdin()) {
        Ok(event) => event,
        Err(e) => {
            warn!(error = %e, "could not parse stop-event payload on stdin");
            coordfs.clear_pending(&worker).await.ok();
            return;
        }
    };

    let text = extract_reply(&event.transcript_path, &full_session);

    if !text.is_empty() {
        if let Err(e) = client::post_response(&config.bridge_url, &worker, &text).await {
            warn!(%worker, error = %e, "failed to post response to bridge");
        }
    } else {
        info!(%worker, "extraction produced nothing, nothing to send");
    }

    coordfs.clear_pending(&worker).await.ok();
}

/// Transcript extraction with the stability guard (spec §4.C.5), falling
/// back to a pane-capture heuristic (spec §4.C.6) when that comes up
/// empty.
fn extract_reply(transcript_path: &Path, full_session: &str) -> String {
    let extracted =
        stability::poll_for_stable_extraction(transcript_path, transcript::extract_latest_reply);
    if !extracted.is_empty() {
        return extracted;
    }

    session::capture_last_lines(full_session, 500)
        .as_deref()
        .and_then(fallback::extract_from_pane)
        .unwrap_or_default()
}

/// `WRANGLER_LOG` filter, falling back to `info` — same layered setup as
/// the daemon (spec's ambient logging stack).
fn setup_logging() {
    let filter = EnvFilter::try_from_env("WRANGLER_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .init();
}
