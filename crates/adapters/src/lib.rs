// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Adapters for the external collaborators named in spec §4: the
//! multiplexer (A), the coordination filesystem (B), and the chat
//! transport (D). Everything here is I/O; the routing engine and response
//! pipeline in `wrangler-routing` depend only on the trait boundaries.

pub mod chat;
pub mod coordfs;
pub mod mux;

pub use chat::{Attachment, ChatError, ChatTransport, TelegramChat};
pub use coordfs::{CoordFs, CoordFsError, NodeFs};
pub use mux::{MultiplexerAdapter, MuxError, NoOpMultiplexer, TmuxAdapter};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use chat::{ChatCall, FakeChatTransport};
#[cfg(any(test, feature = "test-support"))]
pub use mux::{FakeMultiplexer, MuxCall};
