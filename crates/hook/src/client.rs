// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Delivers the extracted reply to the bridge's response-ingest endpoint
//! (spec §4.C.7).

use serde::Serialize;
use std::time::Duration;

const TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Serialize)]
struct ResponseIngestBody<'a> {
    worker: &'a str,
    text: &'a str,
}

/// POST `{ worker, text }` to `<bridge_url>/response`. Best-effort: a
/// failure here is logged by the caller and never panics the hook — the
/// worst outcome is a missed chat message, not a broken agent session.
pub async fn post_response(
    bridge_url: &str,
    worker: &str,
    text: &str,
) -> Result<(), reqwest::Error> {
    let client = reqwest::Client::builder().timeout(TIMEOUT).build()?;
    client
        .post(format!("{bridge_url}/response"))
        .json(&ResponseIngestBody { worker, text })
        .send()
        .await?
        .error_for_status()?;
    Ok(())
}
