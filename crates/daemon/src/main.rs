// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! wranglerd - the chat-to-terminal bridge daemon.
//!
//! Owns the HTTP boundary server and the live worker registry; mediates
//! between a chat transport and a pool of tmux-hosted coding-agent workers
//! (spec §1-§6).

use anyhow::Context;
use std::sync::Arc;
use tokio::signal::unix::{signal, SignalKind};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use wrangler_adapters::{TelegramChat, TmuxAdapter};
use wrangler_core::SystemClock;

use wrangler_daemon::config::Config;
use wrangler_daemon::server;
use wrangler_daemon::service::Service;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    setup_logging();

    let config = Config::load().context("loading configuration")?;
    info!(port = config.port, prefix = %config.tmux_prefix, "starting wranglerd");

    let bot_token = config
        .bot_token
        .clone()
        .context("WRANGLER_BOT_TOKEN must be set")?;
    let chat = TelegramChat::new(bot_token);
    let mux = TmuxAdapter::new(
        config.tmux_prefix.clone(),
        config.port,
        config.sessions_root.display().to_string(),
        config.bridge_url.clone(),
    );
    let clock = SystemClock;

    let service = Arc::new(Service::new(config, mux, chat, clock));
    service.node_fs.ensure_root().await.ok();
    service.load_persisted_state().await;
    service.node_fs.save_port(service.config.port).await.ok();

    let app = server::router(Arc::clone(&service));
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], service.config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!(%addr, "listening");

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    let serve = axum::serve(listener, app);
    tokio::select! {
        result = serve => {
            result.context("server error")?;
        }
        _ = sigterm.recv() => {
            info!("received SIGTERM, shutting down");
        }
        _ = sigint.recv() => {
            info!("received SIGINT, shutting down");
        }
    }

    for chat_id in service.known_chat_ids() {
        let _ = service.chat.send_text(&chat_id, "Bridge going offline.", None).await;
    }

    info!("wranglerd stopped");
    Ok(())
}

/// `WRANGLER_LOG` filter, falling back to `info` (spec's ambient logging
/// stack, matching the teacher's `EnvFilter`-based setup).
fn setup_logging() {
    let filter = EnvFilter::try_from_env("WRANGLER_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .init();
}
