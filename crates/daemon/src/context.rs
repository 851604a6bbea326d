// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Glue implementing the routing engine's and response pipeline's
//! read-only context traits against the daemon's live registry and
//! coordination filesystem — the only place those traits touch real I/O.

use async_trait::async_trait;
use wrangler_adapters::{CoordFs, MultiplexerAdapter};
use wrangler_core::{Clock, ChatId};
use wrangler_routing::{ChatIdLookup, RoutingContext, WorkerSummary};

use crate::config::Config;
use crate::registry::Registry;

/// Borrowed view the daemon hands to [`wrangler_routing::route`] for one
/// inbound event. Cheap to construct per-request.
pub struct DaemonRoutingContext<'a, M: MultiplexerAdapter, C: Clock> {
    pub registry: &'a Registry<M>,
    pub coordfs: &'a CoordFs,
    pub clock: &'a C,
    pub config: &'a Config,
}

#[async_trait]
impl<'a, M: MultiplexerAdapter, C: Clock> RoutingContext for DaemonRoutingContext<'a, M, C> {
    async fn workers(&self) -> Vec<WorkerSummary> {
        self.registry
            .list()
            .await
            .into_iter()
            .map(|w| WorkerSummary {
                name: w.id.as_str().to_string(),
                status: w.status,
            })
            .collect()
    }

    async fn focused(&self) -> Option<String> {
        self.registry.focused().map(|w| w.as_str().to_string())
    }

    async fn foreground_cmd(&self, name: &str) -> Option<String> {
        self.registry.foreground_cmd(name).await.ok()
    }

    async fn pending_age_secs(&self, name: &str) -> Option<u64> {
        self.coordfs.pending_age_secs(name, self.clock).await
    }

    async fn settings_summary(&self) -> String {
        self.config.settings_summary()
    }
}

/// Resolves a worker's `chat_id` file for the response pipeline (spec
/// §4.B, §4.H.2).
pub struct DaemonChatIdLookup<'a> {
    pub coordfs: &'a CoordFs,
}

#[async_trait]
impl<'a> ChatIdLookup for DaemonChatIdLookup<'a> {
    async fn chat_id_for(&self, worker: &str) -> Option<ChatId> {
        self.coordfs.get_chat_id(worker).await.map(ChatId::new)
    }
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;
