// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared error taxonomy (spec §7). Each component maps its own
//! lower-level errors into these kinds at its boundary; the boundary
//! server maps `BridgeError` to HTTP status codes.

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BridgeError {
    #[error("not admin")]
    NotAdmin,
    #[error("unknown worker: {0}")]
    UnknownWorker(String),
    #[error("invalid name: {0}")]
    NameInvalid(String),
    #[error("reserved name: {0}")]
    NameReserved(String),
    #[error("worker already exists: {0}")]
    AlreadyExists(String),
    #[error("no focused worker")]
    NoFocus,
    #[error("transport failure: {0}")]
    TransportFailure(String),
    #[error("hook extraction produced no text")]
    HookExtractionEmpty,
    #[error("rejected media: {0}")]
    SizeOrTypeRejected(String),
    #[error("webhook secret mismatch")]
    WebhookSecretMismatch,
}
