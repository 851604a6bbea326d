// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The stop-event payload the agent delivers on stdin: a small JSON object
//! pointing at the transcript file (spec §4.C). Fields beyond
//! `transcript_path` are accepted but unused.

use serde::Deserialize;
use std::io::Read;
use std::path::PathBuf;

#[derive(Debug, Deserialize)]
pub struct StopEvent {
    pub transcript_path: PathBuf,
}

pub fn read_from(mut reader: impl Read) -> anyhow::Result<StopEvent> {
    let mut buf = String::new();
    reader.read_to_string(&mut buf)?;
    Ok(serde_json::from_str(&buf)?)
}

#[cfg(test)]
#[path = "stdin_tests.rs"]
mod tests;
