// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! The routing engine (spec §4.G) and response pipeline (spec §4.H).
//!
//! Both are deliberately adapter-free: they consume a small read-only
//! context trait the caller (`wrangler-daemon`) implements against its live
//! registry/coordination filesystem, and produce `wrangler_core::Effect`
//! values. That keeps the parsing and formatting logic — the part with
//! the most branches and edge cases in the whole system — testable with
//! plain fakes, the same shape as `wrangler-adapters`' own fake adapters.

pub mod engine;
pub mod pipeline;

pub use engine::{
    route, BuiltinCommand, InboundAttachment, InboundEvent, ReplyTo, RoutingConfig,
    RoutingContext, WorkerSummary,
};
pub use pipeline::{ingest_response, ChatIdLookup, PipelineError};
