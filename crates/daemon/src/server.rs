// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The boundary HTTP server (spec §6): three POST endpoints plus a health
//! check, all operating on a shared [`Service`]. This is the only module
//! that deserializes wire payloads; everything past the handler boundary
//! is plain `wrangler_core`/`wrangler_routing` types.

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use subtle::ConstantTimeEq;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use wrangler_adapters::{ChatTransport, MultiplexerAdapter};
use wrangler_core::{ChatId, Clock, MessageId};
use wrangler_routing::{route, InboundAttachment, InboundEvent, ReplyTo};

use crate::context::{DaemonChatIdLookup, DaemonRoutingContext};
use crate::executor;
use crate::service::Arced;

/// Telegram's webhook body, trimmed to the fields the bridge actually uses
/// (spec §6 "inbound chat event"). Deliberately not the full `teloxide`
/// `Update` type: webhook ingress here is a thin, intentionally narrow
/// translation layer, not a general Bot API client.
#[derive(Debug, Deserialize)]
struct WebhookUpdate {
    message: Option<WebhookMessage>,
}

#[derive(Debug, Deserialize)]
struct WebhookMessage {
    message_id: i64,
    chat: WebhookChat,
    text: Option<String>,
    #[serde(default)]
    photo: Vec<WebhookPhotoSize>,
    document: Option<WebhookDocument>,
    reply_to_message: Option<Box<WebhookMessage>>,
}

#[derive(Debug, Deserialize)]
struct WebhookChat {
    id: i64,
}

#[derive(Debug, Deserialize)]
struct WebhookPhotoSize {
    file_id: String,
    #[serde(default)]
    file_size: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct WebhookDocument {
    file_id: String,
    file_name: Option<String>,
    mime_type: Option<String>,
    file_size: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct ResponseIngestBody {
    worker: String,
    text: String,
}

#[derive(Debug, Deserialize)]
struct NotifyBody {
    text: String,
}

/// Build the router. Routes mirror spec §6's three POST endpoints plus a
/// plain health GET used by process supervisors.
pub fn router<M, C, Clk>(service: Arced<M, C, Clk>) -> Router
where
    M: MultiplexerAdapter,
    C: ChatTransport,
    Clk: Clock,
{
    Router::new()
        .route("/", get(health))
        .route("/", post(webhook))
        .route("/response", post(response_ingest))
        .route("/notify", post(notify))
        .layer(TraceLayer::new_for_http())
        .layer(RequestBodyLimitLayer::new(25 * 1024 * 1024))
        .with_state(service)
}

async fn health() -> &'static str {
    "ok"
}

/// Inbound chat webhook (spec §4.E admin gate, §4.G routing). Non-admin
/// senders are admitted into silence: 200 OK, no effects run.
async fn webhook<M, C, Clk>(
    State(service): State<Arced<M, C, Clk>>,
    headers: HeaderMap,
    Json(update): Json<WebhookUpdate>,
) -> StatusCode
where
    M: MultiplexerAdapter,
    C: ChatTransport,
    Clk: Clock,
{
    if !webhook_secret_ok(&service.config.webhook_secret, &headers) {
        return StatusCode::FORBIDDEN;
    }

    let Some(message) = update.message else {
        return StatusCode::OK;
    };
    let chat_id = ChatId::new(message.chat.id.to_string());

    if !service.admin.admit(&chat_id).await {
        return StatusCode::OK;
    }

    let event = InboundEvent {
        chat_id: chat_id.clone(),
        message_id: Some(MessageId::new(message.message_id.to_string())),
        text: message.text.clone(),
        attachments: attachments_of(&message),
        reply_to: message.reply_to_message.as_deref().and_then(|m| {
            m.text.clone().map(|text| ReplyTo { text })
        }),
    };

    let ctx = DaemonRoutingContext {
        registry: &service.registry,
        coordfs: &service.coordfs,
        clock: &service.clock,
        config: &service.config,
    };
    let effects = route(&ctx, &service.routing_cfg, event).await;
    for effect in effects {
        executor::execute(&service, effect).await;
    }
    StatusCode::OK
}

fn attachments_of(message: &WebhookMessage) -> Vec<InboundAttachment> {
    if let Some(doc) = &message.document {
        return vec![InboundAttachment {
            file_id: doc.file_id.clone(),
            filename: doc.file_name.clone(),
            mime: doc.mime_type.clone(),
            size: doc.file_size,
        }];
    }
    // Telegram sends one `PhotoSize` per resolution; the last is the
    // largest (spec: forward what the manager actually attached).
    if let Some(largest) = message.photo.last() {
        return vec![InboundAttachment {
            file_id: largest.file_id.clone(),
            filename: None,
            mime: Some("image/jpeg".to_string()),
            size: largest.file_size,
        }];
    }
    Vec::new()
}

/// The hook's delivery of a worker's transcript (spec §4.C, §4.H). The hook
/// runs inside the agent's own process tree and has no chat credentials of
/// its own — it POSTs the extracted text here and the bridge does the rest.
async fn response_ingest<M, C, Clk>(
    State(service): State<Arced<M, C, Clk>>,
    Json(body): Json<ResponseIngestBody>,
) -> StatusCode
where
    M: MultiplexerAdapter,
    C: ChatTransport,
    Clk: Clock,
{
    // spec §4.H.1 / §6: empty session or text fields are a 400, not a
    // silent no-op — that's distinct from "extraction produced nothing",
    // which the hook itself already short-circuits on before ever POSTing.
    if body.worker.trim().is_empty() || body.text.trim().is_empty() {
        return StatusCode::BAD_REQUEST;
    }

    let lookup = DaemonChatIdLookup { coordfs: &service.coordfs };
    match wrangler_routing::ingest_response(&lookup, &body.worker, &body.text).await {
        Ok(effects) => {
            for effect in effects {
                executor::execute(&service, effect).await;
            }
            StatusCode::OK
        }
        Err(wrangler_routing::PipelineError::Empty) => StatusCode::BAD_REQUEST,
        Err(wrangler_routing::PipelineError::NoChatId(_)) => StatusCode::NOT_FOUND,
    }
}

/// Operator/system fan-out notice (spec §4.J "offline notice" and general
/// broadcast use): sent to every chat id the admin gate has ever seen,
/// which in this single-tenant bridge is exactly the admin chat.
async fn notify<M, C, Clk>(
    State(service): State<Arced<M, C, Clk>>,
    Json(body): Json<NotifyBody>,
) -> StatusCode
where
    M: MultiplexerAdapter,
    C: ChatTransport,
    Clk: Clock,
{
    for chat_id in service.known_chat_ids() {
        let _ = service.chat.send_text(&chat_id, &body.text, None).await;
    }
    StatusCode::OK
}

fn webhook_secret_ok(configured: &Option<String>, headers: &HeaderMap) -> bool {
    let Some(expected) = configured else { return true };
    let Some(provided) = headers
        .get("x-bridge-webhook-secret")
        .and_then(|v| v.to_str().ok())
    else {
        return false;
    };
    provided.as_bytes().ct_eq(expected.as_bytes()).into()
}

#[cfg(test)]
#[path = "server_tests.rs"]
mod tests;
