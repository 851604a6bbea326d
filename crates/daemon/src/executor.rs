// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Executes [`Effect`]s produced by the routing engine and response
//! pipeline against real adapters. This is the only place in the daemon
//! that calls into the multiplexer or chat transport directly (spec §4.G
//! doc comment on `Effect`: "the daemon's executor is the only thing that
//! touches real adapters").

use std::path::PathBuf;
use std::time::Duration;
use wrangler_adapters::{ChatTransport, MultiplexerAdapter};
use wrangler_core::{Clock, Effect, Worker};

use crate::media_security;
use crate::service::Service;

/// Static bridge commands always offered, regardless of the worker set
/// (spec §6 command surface).
const STATIC_COMMANDS: &[(&str, &str)] = &[
    ("hire", "Create a new worker"),
    ("end", "End a worker"),
    ("team", "List workers"),
    ("focus", "Focus a worker"),
    ("progress", "Show the focused worker's status"),
    ("pause", "Pause the focused worker"),
    ("relaunch", "Relaunch the focused worker's agent"),
    ("settings", "Show redacted configuration"),
    ("learn", "Ask the focused worker to share learnings"),
];

/// How long to wait before checking whether a send was accepted (spec
/// §4.G send semantics).
const ACCEPT_CHECK_DELAY: Duration = Duration::from_millis(150);

/// How long to wait between Ctrl-C/Escape and checking for a shell prompt
/// during relaunch, and how many times to check (spec §4.C.5's bounded
/// poll idiom, reused here per SPEC_FULL's relaunch note).
const RELAUNCH_POLL_INTERVAL: Duration = Duration::from_millis(200);
const RELAUNCH_POLL_ATTEMPTS: u32 = 15;
const SHELL_NAMES: &[&str] = &["bash", "zsh", "sh", "fish", "dash"];

pub async fn execute<M, C, Clk>(service: &Service<M, C, Clk>, effect: Effect)
where
    M: MultiplexerAdapter,
    C: ChatTransport,
    Clk: Clock,
{
    let span = tracing::info_span!("effect", name = effect.name());
    let _enter = span.enter();

    if let Err(e) = execute_inner(service, effect).await {
        tracing::warn!(error = %e, "effect execution failed");
    }
}

async fn execute_inner<M, C, Clk>(
    service: &Service<M, C, Clk>,
    effect: Effect,
) -> Result<(), String>
where
    M: MultiplexerAdapter,
    C: ChatTransport,
    Clk: Clock,
{
    match effect {
        Effect::SendToWorker {
            worker,
            text,
            chat_id,
            set_focus,
            message_id,
        } => {
            send_message(service, worker.as_str(), &text).await?;
            service.registry.clear_paused(worker.as_str());
            service
                .coordfs
                .set_pending(worker.as_str(), service.clock.now_unix())
                .await
                .map_err(|e| e.to_string())?;
            service
                .coordfs
                .set_chat_id(worker.as_str(), chat_id.as_str())
                .await
                .map_err(|e| e.to_string())?;
            service.typing.start(worker.as_str(), chat_id.clone());
            if set_focus {
                service.registry.set_focus(Some(worker.clone())).await;
            }
            maybe_react(service, worker.as_str(), &text, &chat_id, message_id.as_ref()).await;
            Ok(())
        }

        Effect::SendKeys { worker, keys } => {
            let _guard = service.locks.lock(worker.as_str()).await;
            let keys: Vec<&str> = keys.iter().map(String::as_str).collect();
            service
                .registry
                .mux()
                .send_keys(worker.as_str(), &keys)
                .await
                .map_err(|e| e.to_string())?;
            // The routing engine's only use of this effect today is
            // `/pause` sending Escape — mark the worker paused so `/team`
            // and `/progress` reflect it until the next send clears it.
            service.registry.mark_paused(worker.as_str());
            Ok(())
        }

        Effect::CreateWorker { worker, cwd } => create_worker(service, worker.as_str(), cwd).await,

        Effect::EndWorker { worker } => {
            service.registry.mux().kill(worker.as_str()).await.ok();
            service
                .coordfs
                .remove_worker_dir(worker.as_str())
                .await
                .map_err(|e| e.to_string())?;
            service.locks.forget(worker.as_str());
            service.typing.stop(worker.as_str());
            service.registry.forget(worker.as_str());
            Ok(())
        }

        Effect::RelaunchWorker { worker } => relaunch_worker(service, worker.as_str()).await,

        Effect::SetFocus { worker } => {
            service.registry.set_focus(worker).await;
            Ok(())
        }

        Effect::RefreshCommandList => refresh_command_list(service).await,

        Effect::ReplyText { chat_id, text, reply_to } => service
            .chat
            .send_text(&chat_id, &text, reply_to.as_ref())
            .await
            .map(|_| ())
            .map_err(|e| e.to_string()),

        Effect::ReplyHtmlChunks { chat_id, chunks } => {
            let mut reply_to = None;
            for chunk in &chunks {
                let sent = service
                    .chat
                    .send_html(&chat_id, chunk, reply_to.as_ref())
                    .await
                    .map_err(|e| e.to_string())?;
                reply_to = Some(sent);
            }
            Ok(())
        }

        Effect::SendImage { chat_id, path, caption } => {
            if let Err(e) = media_security::validate_image_path(&path, &service.allowed_roots) {
                notify_media_failure(service, &chat_id, &e.to_string()).await;
                return Ok(());
            }
            if let Err(e) = media_security::check_size_cap(&path).await {
                notify_media_failure(service, &chat_id, &e.to_string()).await;
                return Ok(());
            }
            if let Err(e) = service.chat.send_photo(&chat_id, &path, caption.as_deref()).await {
                notify_media_failure(service, &chat_id, &e.to_string()).await;
            }
            Ok(())
        }

        Effect::SendFile { chat_id, path, caption } => {
            if let Err(e) = media_security::validate_document_path(&path) {
                notify_media_failure(service, &chat_id, &e.to_string()).await;
                return Ok(());
            }
            if let Err(e) = media_security::check_size_cap(&path).await {
                notify_media_failure(service, &chat_id, &e.to_string()).await;
                return Ok(());
            }
            if let Err(e) = service.chat.send_document(&chat_id, &path, caption.as_deref()).await {
                notify_media_failure(service, &chat_id, &e.to_string()).await;
            }
            Ok(())
        }

        Effect::DownloadAttachment {
            worker,
            file_id,
            suggested_name,
            mime,
            size,
        } => {
            download_attachment(service, worker.as_str(), &file_id, suggested_name, mime, size)
                .await
        }

        Effect::SetReaction { chat_id, message_id, emoji } => {
            // Opportunistic: omit silently if the transport rejects it
            // (spec §9 open question).
            let _ = service.chat.set_reaction(&chat_id, &message_id, &emoji).await;
            Ok(())
        }

        Effect::StartTyping { worker, chat_id } => {
            service.typing.start(worker.as_str(), chat_id);
            Ok(())
        }

        Effect::StopTyping { worker } => {
            service.typing.stop(worker.as_str());
            service
                .coordfs
                .clear_pending(worker.as_str())
                .await
                .map_err(|e| e.to_string())
        }
    }
}

/// The semantic "send literal, then submit" wrapper (spec §4.G, §9): both
/// sub-actions happen while the per-worker lock is held, which is what
/// makes the pair atomic from the perspective of any concurrent sender.
async fn send_message<M: MultiplexerAdapter>(
    service: &Service<M, impl ChatTransport, impl Clock>,
    worker: &str,
    text: &str,
) -> Result<(), String> {
    let _guard = service.locks.lock(worker).await;
    service
        .registry
        .mux()
        .send_literal(worker, text)
        .await
        .map_err(|e| e.to_string())?;
    service
        .registry
        .mux()
        .send_enter(worker)
        .await
        .map_err(|e| e.to_string())
}

/// Detect whether the agent accepted the input by comparing the pane
/// before and after a short delay; if nothing changed, retry the send
/// once — otherwise mark receipt with a 👀 reaction (spec §4.G: "If the
/// agent has not yet accepted input... retries once; otherwise marks with
/// a 👀 reaction to confirm receipt").
async fn maybe_react<M: MultiplexerAdapter>(
    service: &Service<M, impl ChatTransport, impl Clock>,
    worker: &str,
    text: &str,
    chat_id: &wrangler_core::ChatId,
    message_id: Option<&wrangler_core::MessageId>,
) {
    let before = service.registry.mux().capture_pane(worker, 5).await.ok();
    tokio::time::sleep(ACCEPT_CHECK_DELAY).await;
    let after = service.registry.mux().capture_pane(worker, 5).await.ok();

    if before.is_some() && before == after {
        tracing::debug!(worker, "input not yet accepted, retrying send once");
        let _ = send_message(service, worker, text).await;
        return;
    }

    let Some(message_id) = message_id else { return };
    // Best-effort; callers already treat reaction failure as silent.
    let _ = service.chat.set_reaction(chat_id, message_id, "👀").await;
}

async fn create_worker<M, C, Clk>(
    service: &Service<M, C, Clk>,
    worker: &str,
    cwd: Option<PathBuf>,
) -> Result<(), String>
where
    M: MultiplexerAdapter,
    C: ChatTransport,
    Clk: Clock,
{
    let cwd = cwd.unwrap_or_else(|| {
        std::env::current_dir().unwrap_or_else(|_| PathBuf::from("/"))
    });
    service
        .registry
        .mux()
        .create(worker, &cwd, service.config.launch_cmd())
        .await
        .map_err(|e| e.to_string())?;
    service
        .coordfs
        .ensure_worker_dir(worker)
        .await
        .map_err(|e| e.to_string())?;

    if service.config.sandbox_cmd.is_none() {
        // Direct path: the agent may print an initial confirmation prompt
        // (trust-this-folder, etc.) that needs one Enter to accept.
        tokio::time::sleep(Duration::from_millis(800)).await;
        let _ = service.registry.mux().send_enter(worker).await;
    }
    Ok(())
}

async fn relaunch_worker<M, C, Clk>(service: &Service<M, C, Clk>, worker: &str) -> Result<(), String>
where
    M: MultiplexerAdapter,
    C: ChatTransport,
    Clk: Clock,
{
    {
        let _guard = service.locks.lock(worker).await;
        let _ = service
            .registry
            .mux()
            .send_keys(worker, &["C-c"])
            .await;
        let _ = service.registry.mux().send_keys(worker, &["Escape"]).await;
    }

    for _ in 0..RELAUNCH_POLL_ATTEMPTS {
        if let Ok(cmd) = service.registry.mux().foreground_cmd(worker).await {
            if SHELL_NAMES.contains(&cmd.trim()) {
                break;
            }
        }
        tokio::time::sleep(RELAUNCH_POLL_INTERVAL).await;
    }

    service.registry.clear_paused(worker);
    send_message(service, worker, service.config.launch_cmd()).await
}

async fn refresh_command_list<M, C, Clk>(service: &Service<M, C, Clk>) -> Result<(), String>
where
    M: MultiplexerAdapter,
    C: ChatTransport,
    Clk: Clock,
{
    let workers: Vec<Worker> = service.registry.list().await;
    let mut commands: Vec<(String, String)> = STATIC_COMMANDS
        .iter()
        .map(|(name, desc)| (name.to_string(), desc.to_string()))
        .collect();
    for w in workers {
        commands.push((w.id.as_str().to_string(), format!("Talk to {}", w.id.as_str())));
    }
    // A transport lacking this capability treats it as a no-op (spec:
    // "omit silently", same rule already given for reactions).
    let _ = service.chat.register_commands(&commands).await;
    Ok(())
}

async fn download_attachment<M, C, Clk>(
    service: &Service<M, C, Clk>,
    worker: &str,
    file_id: &str,
    suggested_name: Option<String>,
    mime: Option<String>,
    size: Option<u64>,
) -> Result<(), String>
where
    M: MultiplexerAdapter,
    C: ChatTransport,
    Clk: Clock,
{
    service
        .coordfs
        .ensure_inbox(worker)
        .await
        .map_err(|e| e.to_string())?;
    let filename = suggested_name.unwrap_or_else(|| file_id.to_string());
    let dest = service.coordfs.inbox_path(worker).join(sanitize_filename(&filename));

    service
        .chat
        .download_file(file_id, &dest)
        .await
        .map_err(|e| e.to_string())?;

    if let Err(e) = media_security::check_size_cap(&dest).await {
        let _ = tokio::fs::remove_file(&dest).await;
        return Err(e.to_string());
    }

    // Prefer the transport-reported MIME/size (spec §4.G rule 1: the
    // forwarded text names the authoritative filename/size/MIME/path);
    // fall back to what's observable from the downloaded file only when
    // the transport didn't supply one.
    let size = match size {
        Some(size) => size,
        None => tokio::fs::metadata(&dest).await.map(|m| m.len()).unwrap_or(0),
    };
    let mime = mime.or_else(|| mime_guess_from_ext(&dest).map(str::to_string));
    let text = format!(
        "Received attachment: {} ({} bytes{}).\nSaved at: {}",
        dest.file_name().map(|n| n.to_string_lossy().to_string()).unwrap_or_default(),
        size,
        mime.map(|m| format!(", {m}")).unwrap_or_default(),
        dest.display(),
    );
    send_message(service, worker, &text).await
}

fn sanitize_filename(name: &str) -> String {
    let base = std::path::Path::new(name)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "attachment".to_string());
    if base.is_empty() {
        "attachment".to_string()
    } else {
        base
    }
}

fn mime_guess_from_ext(path: &std::path::Path) -> Option<&'static str> {
    match path.extension()?.to_str()?.to_lowercase().as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "pdf" => Some("application/pdf"),
        "txt" => Some("text/plain"),
        _ => None,
    }
}

async fn notify_media_failure<M, C, Clk>(
    service: &Service<M, C, Clk>,
    chat_id: &wrangler_core::ChatId,
    message: &str,
) where
    M: MultiplexerAdapter,
    C: ChatTransport,
    Clk: Clock,
{
    tracing::warn!(%chat_id, error = message, "media send rejected");
    let _ = service.chat.send_text(chat_id, &format!("Could not send attachment: {message}"), None).await;
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod tests;
