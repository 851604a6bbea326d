// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! No-op multiplexer for minimal/disabled deployments.

use super::{MultiplexerAdapter, MuxError};
use async_trait::async_trait;
use std::path::Path;

#[derive(Clone, Copy, Debug, Default)]
pub struct NoOpMultiplexer;

impl NoOpMultiplexer {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl MultiplexerAdapter for NoOpMultiplexer {
    async fn list(&self) -> Result<Vec<String>, MuxError> {
        Ok(Vec::new())
    }

    async fn exists(&self, _name: &str) -> Result<bool, MuxError> {
        Ok(false)
    }

    async fn create(&self, _name: &str, _cwd: &Path, _agent_cmd: &str) -> Result<(), MuxError> {
        Ok(())
    }

    async fn send_literal(&self, _name: &str, _text: &str) -> Result<(), MuxError> {
        Ok(())
    }

    async fn send_enter(&self, _name: &str) -> Result<(), MuxError> {
        Ok(())
    }

    async fn send_keys(&self, _name: &str, _keys: &[&str]) -> Result<(), MuxError> {
        Ok(())
    }

    async fn capture_pane(&self, _name: &str, _lines: u32) -> Result<String, MuxError> {
        Ok(String::new())
    }

    async fn foreground_cmd(&self, _name: &str) -> Result<String, MuxError> {
        Ok(String::new())
    }

    async fn kill(&self, _name: &str) -> Result<(), MuxError> {
        Ok(())
    }
}
