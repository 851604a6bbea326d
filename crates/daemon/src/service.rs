// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wires together everything the boundary server needs: the registry,
//! coordination filesystem, admin gate, concurrency primitives, and the
//! adapters. One `Service` per process; `Arc`-shared across request
//! handlers (spec §5 "Shared resources").

use std::sync::Arc;
use wrangler_adapters::{ChatTransport, CoordFs, MultiplexerAdapter, NodeFs};
use wrangler_core::{ChatId, Clock};
use wrangler_routing::RoutingConfig;

use crate::admin::AdminGate;
use crate::concurrency::{LockMap, TypingLoops};
use crate::config::Config;
use crate::media_security::AllowedRoots;
use crate::registry::Registry;

/// Reserved slash commands that belong to the interactive agent, not the
/// bridge (spec §4.G.2). User-facing strings and this exact list are
/// configuration, not an invariant (spec §9 open question) — kept here so
/// operators can see and adjust them in one place.
const BLOCKED_COMMANDS: &[&str] = &["compact", "clear", "init", "review", "bug", "login", "logout"];

pub struct Service<M: MultiplexerAdapter, C: ChatTransport, Clk: Clock> {
    pub config: Config,
    pub registry: Registry<M>,
    pub coordfs: CoordFs,
    pub node_fs: NodeFs,
    pub admin: AdminGate,
    pub locks: LockMap,
    pub typing: TypingLoops<C>,
    pub chat: C,
    pub clock: Clk,
    pub routing_cfg: RoutingConfig,
    pub allowed_roots: AllowedRoots,
}

impl<M: MultiplexerAdapter, C: ChatTransport, Clk: Clock> Service<M, C, Clk> {
    pub fn new(config: Config, mux: M, chat: C, clock: Clk) -> Self {
        let coordfs = CoordFs::new(config.sessions_root.clone());
        let node_fs = NodeFs::new(config.node_root.clone());
        let registry = Registry::new(mux, config.tmux_prefix.clone(), node_fs.clone());
        let admin = AdminGate::new(
            config.admin_chat_id.as_deref().map(ChatId::new),
            node_fs.clone(),
        );
        let allowed_roots = AllowedRoots::new(&config.sessions_root);
        let routing_cfg = RoutingConfig {
            bot_username: None,
            blocked_commands: BLOCKED_COMMANDS.iter().map(|s| s.to_string()).collect(),
        };
        Self {
            locks: LockMap::new(),
            typing: TypingLoops::new(chat.clone()),
            registry,
            coordfs,
            node_fs,
            admin,
            chat,
            clock,
            routing_cfg,
            allowed_roots,
            config,
        }
    }

    /// Startup adoption: re-validate persisted focus/admin against live
    /// state (spec §3 "adopted on startup by scanning prefixed sessions").
    /// The scan itself is implicit — `Registry::list` always queries the
    /// multiplexer live, so there is no separate adoption pass to run
    /// beyond re-validating the two persisted pointers.
    pub async fn load_persisted_state(&self) {
        self.admin.load_persisted().await;
        self.registry.load_persisted_focus().await;
    }

    /// Every chat id this process has seen, for `/notify` fan-out and the
    /// shutdown "offline" notice (spec §4.I, §4.J). The only durable
    /// record of "chats seen" is the admin id — by design, exactly one
    /// chat drives the system (spec non-goals: "No multi-tenant access").
    pub fn known_chat_ids(&self) -> Vec<ChatId> {
        self.admin.current().into_iter().collect()
    }
}

pub type Arced<M, C, Clk> = Arc<Service<M, C, Clk>>;
