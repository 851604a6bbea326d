// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn strips_configured_prefix() {
    assert_eq!(
        worker_name("wrangler-alice", "wrangler-"),
        Some("alice".to_string())
    );
}

#[test]
fn unprefixed_session_yields_none() {
    assert_eq!(worker_name("bash", "wrangler-"), None);
}

#[test]
fn bare_prefix_with_no_name_yields_none() {
    assert_eq!(worker_name("wrangler-", "wrangler-"), None);
}
