// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The routing engine (spec §4.G): parses one inbound chat event into zero
//! or more [`Effect`]s. Parsing follows the fixed precedence order in
//! spec §4.G — first match wins — so a single `match`-free cascade of
//! early returns mirrors that order directly rather than re-deriving it
//! from a priority table.

use async_trait::async_trait;
use wrangler_core::{is_reserved, validate_name, ChatId, Effect, MessageId, WorkerId, WorkerStatus};

/// An inbound attachment as described by the webhook payload (spec §6).
#[derive(Debug, Clone)]
pub struct InboundAttachment {
    pub file_id: String,
    pub filename: Option<String>,
    pub mime: Option<String>,
    pub size: Option<u64>,
}

/// The message this event is a reply to, if any (spec §6 `reply_to`).
#[derive(Debug, Clone)]
pub struct ReplyTo {
    pub text: String,
}

/// One inbound chat event, already past the admin gate (spec §4.E runs
/// before this — every event reaching [`route`] is from the admin chat).
#[derive(Debug, Clone)]
pub struct InboundEvent {
    pub chat_id: ChatId,
    pub message_id: Option<MessageId>,
    pub text: Option<String>,
    pub attachments: Vec<InboundAttachment>,
    pub reply_to: Option<ReplyTo>,
}

/// A worker as the routing engine needs to see it: name plus derived
/// status (spec §4.F — the registry is a live view, never cached here).
#[derive(Debug, Clone)]
pub struct WorkerSummary {
    pub name: String,
    pub status: WorkerStatus,
}

/// Read-only view of live state the routing engine needs but does not own
/// (spec §4.F worker registry, §4.I focused-worker pointer). The daemon
/// implements this against its registry; tests implement it against a
/// fixed fixture.
#[async_trait]
pub trait RoutingContext: Send + Sync {
    /// All known workers with their current status, in no particular
    /// order (the engine sorts where the spec requires it, e.g. `team`).
    async fn workers(&self) -> Vec<WorkerSummary>;

    /// The currently focused worker, if any.
    async fn focused(&self) -> Option<String>;

    /// Whether a worker named `name` currently exists.
    async fn exists(&self, name: &str) -> bool {
        self.workers().await.iter().any(|w| w.name == name)
    }

    /// The program currently holding `name`'s pane foreground (spec
    /// `/progress`, `/relaunch`). `None` if the worker doesn't exist.
    async fn foreground_cmd(&self, name: &str) -> Option<String>;

    /// Seconds since `name`'s pending stamp was set, or `None` if it has
    /// none (or it has expired past the TTL — spec §3).
    async fn pending_age_secs(&self, name: &str) -> Option<u64>;

    /// Redacted configuration summary for `/settings` (spec
    /// §4.G.dispatch): admin id presence, prefix, port, sandbox flags.
    async fn settings_summary(&self) -> String;
}

/// User-facing strings and the reserved-command policy are configuration,
/// not invariants (spec §9 open question) — callers supply them here
/// rather than the engine hard-coding English copy.
#[derive(Debug, Clone)]
pub struct RoutingConfig {
    /// The bot's own username, stripped from `/cmd@botname` (spec §4.G.2).
    pub bot_username: Option<String>,
    /// Slash commands that belong to the interactive agent, not the
    /// bridge, and must be rejected with a fixed notice (spec §4.G.2).
    pub blocked_commands: Vec<String>,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            bot_username: None,
            blocked_commands: Vec::new(),
        }
    }
}

/// The bridge's own slash commands (spec §6 command surface), dispatched
/// by [`route`] rather than forwarded to a worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinCommand {
    Hire,
    End,
    Team,
    Focus,
    Progress,
    Pause,
    Relaunch,
    Settings,
    Learn,
}

impl BuiltinCommand {
    fn from_head(head: &str) -> Option<Self> {
        Some(match head {
            "hire" => Self::Hire,
            "end" => Self::End,
            "team" => Self::Team,
            "focus" => Self::Focus,
            "progress" => Self::Progress,
            "pause" => Self::Pause,
            "relaunch" => Self::Relaunch,
            "settings" => Self::Settings,
            "learn" => Self::Learn,
            _ => return None,
        })
    }
}

/// Marker bot "own response" frame prefix (spec §4.G.5a): the bridge's own
/// replies are formatted `<b>worker:</b>\n...`, so replying to one of them
/// routes back to that worker without touching focus.
const OWN_FRAME_PREFIX: &str = "<b>";
const OWN_FRAME_SUFFIX: &str = ":</b>";

/// Route one inbound event to zero or more effects (spec §4.G).
pub async fn route(
    ctx: &impl RoutingContext,
    cfg: &RoutingConfig,
    event: InboundEvent,
) -> Vec<Effect> {
    // 1. Media attachment present.
    if !event.attachments.is_empty() {
        return route_attachment(ctx, &event).await;
    }

    if let Some(text) = event.text.as_deref() {
        let trimmed = text.trim();

        // 2. Slash command.
        if let Some(rest) = trimmed.strip_prefix('/') {
            return route_slash(ctx, cfg, &event, rest).await;
        }

        // 3. @all broadcast.
        if let Some(rest) = trimmed.strip_prefix("@all ") {
            return route_broadcast(ctx, &event, rest).await;
        }

        // 4. @name one-off.
        if let Some(space_idx) = trimmed.find(' ') {
            if let Some(name) = trimmed[..space_idx].strip_prefix('@') {
                let rest = &trimmed[space_idx + 1..];
                if ctx.exists(name).await {
                    return vec![send_one_off(&event, name, rest)];
                }
            }
        }

        // 5. Reply-to present.
        if let Some(reply) = &event.reply_to {
            return route_reply(ctx, &event, reply, trimmed).await;
        }

        // 6 / 7. Plain text.
        return route_plain(ctx, &event, trimmed).await;
    }

    // No text, no attachments, no reply: nothing to do.
    Vec::new()
}

async fn route_attachment(ctx: &impl RoutingContext, event: &InboundEvent) -> Vec<Effect> {
    let target = match &event.reply_to {
        Some(reply) if reply.text.starts_with(OWN_FRAME_PREFIX) => frame_worker(&reply.text),
        _ => None,
    };
    let target = match target {
        Some(w) => Some(w),
        None => ctx.focused().await,
    };

    let Some(worker) = target else {
        return vec![Effect::ReplyText {
            chat_id: event.chat_id.clone(),
            text: "No focused worker. Focus one first with /focus <name>.".to_string(),
            reply_to: event.message_id.clone(),
        }];
    };

    event
        .attachments
        .iter()
        .map(|a| Effect::DownloadAttachment {
            worker: WorkerId::new(worker.clone()),
            file_id: a.file_id.clone(),
            suggested_name: a.filename.clone(),
            mime: a.mime.clone(),
            size: a.size,
        })
        .collect()
}

async fn route_slash(
    ctx: &impl RoutingContext,
    cfg: &RoutingConfig,
    event: &InboundEvent,
    rest: &str,
) -> Vec<Effect> {
    let mut parts = rest.splitn(2, char::is_whitespace);
    let mut head = parts.next().unwrap_or("").to_string();
    let tail = parts.next().unwrap_or("").trim().to_string();

    // Strip a trailing @botname suffix, e.g. "/hire@mybot".
    if let Some(at_idx) = head.find('@') {
        head.truncate(at_idx);
    }
    let head_lower = head.to_lowercase();

    if cfg
        .blocked_commands
        .iter()
        .any(|b| b.eq_ignore_ascii_case(&head_lower))
    {
        return vec![Effect::ReplyText {
            chat_id: event.chat_id.clone(),
            text: format!("/{head} is not available here."),
            reply_to: event.message_id.clone(),
        }];
    }

    if let Some(cmd) = BuiltinCommand::from_head(&head_lower) {
        return dispatch_builtin(ctx, event, cmd, &tail).await;
    }

    if ctx.exists(&head_lower).await {
        return if tail.is_empty() {
            vec![
                Effect::SetFocus {
                    worker: Some(WorkerId::new(head_lower.clone())),
                },
                Effect::ReplyText {
                    chat_id: event.chat_id.clone(),
                    text: format!("Focused on {head_lower}."),
                    reply_to: event.message_id.clone(),
                },
            ]
        } else {
            vec![
                send_one_off(event, &head_lower, &tail),
                Effect::SetFocus {
                    worker: Some(WorkerId::new(head_lower)),
                },
            ]
        };
    }

    // Pass-through: forward verbatim (including the leading slash) to the
    // focused worker.
    match ctx.focused().await {
        Some(focused) => vec![send_to(event, &focused, &format!("/{rest}"), false)],
        None => vec![no_focus_hint(event)],
    }
}

async fn dispatch_builtin(
    ctx: &impl RoutingContext,
    event: &InboundEvent,
    cmd: BuiltinCommand,
    tail: &str,
) -> Vec<Effect> {
    match cmd {
        BuiltinCommand::Hire => hire(ctx, event, tail).await,
        BuiltinCommand::End => end(ctx, event, tail).await,
        BuiltinCommand::Team => team(ctx, event).await,
        BuiltinCommand::Focus => focus(ctx, event, tail).await,
        BuiltinCommand::Progress => progress(ctx, event).await,
        BuiltinCommand::Pause => pause(ctx, event).await,
        BuiltinCommand::Relaunch => relaunch(ctx, event).await,
        BuiltinCommand::Settings => settings(ctx, event).await,
        BuiltinCommand::Learn => learn(ctx, event, tail).await,
    }
}

async fn hire(ctx: &impl RoutingContext, event: &InboundEvent, tail: &str) -> Vec<Effect> {
    let mut words = tail.split_whitespace();
    let Some(candidate) = words.next() else {
        return vec![reply(event, "Usage: /hire <name> [cwd]")];
    };
    let cwd = words.next().map(std::path::PathBuf::from);

    let name = match validate_name(candidate) {
        Ok(name) => name,
        Err(e) => return vec![reply(event, &e.to_string())],
    };
    if ctx.exists(&name).await {
        return vec![reply(event, &format!("Worker '{name}' already exists."))];
    }

    vec![
        Effect::CreateWorker {
            worker: WorkerId::new(name.clone()),
            cwd,
        },
        Effect::SetFocus {
            worker: Some(WorkerId::new(name.clone())),
        },
        Effect::RefreshCommandList,
        reply(
            event,
            &format!(
                "Worker '{name}' added and focused. Send messages here to talk to it. \
                 To have it attach a file or image in its reply, it can include \
                 [[image:/abs/path|caption]] or [[file:/abs/path|caption]] in its text."
            ),
        ),
    ]
}

async fn end(ctx: &impl RoutingContext, event: &InboundEvent, tail: &str) -> Vec<Effect> {
    let name = tail.trim();
    if name.is_empty() {
        return vec![reply(event, "Usage: /end <name>")];
    }
    if !ctx.exists(name).await {
        return vec![reply(event, &format!("No such worker: {name}"))];
    }

    let mut effects = vec![Effect::EndWorker {
        worker: WorkerId::new(name.to_string()),
    }];
    if ctx.focused().await.as_deref() == Some(name) {
        effects.push(Effect::SetFocus { worker: None });
    }
    effects.push(Effect::RefreshCommandList);
    effects.push(reply(event, &format!("Worker '{name}' ended.")));
    effects
}

async fn team(ctx: &impl RoutingContext, event: &InboundEvent) -> Vec<Effect> {
    let mut workers = ctx.workers().await;
    workers.sort_by(|a, b| a.name.cmp(&b.name));
    let focused = ctx.focused().await;

    if workers.is_empty() {
        return vec![reply(event, "No workers yet. /hire <name> to add one.")];
    }

    let mut lines = Vec::new();
    for w in &workers {
        let marker = if focused.as_deref() == Some(w.name.as_str()) {
            "* "
        } else {
            "  "
        };
        let status = match w.status {
            WorkerStatus::Running => " (running)",
            WorkerStatus::Paused => " (paused)",
            WorkerStatus::Idle => "",
        };
        lines.push(format!("{marker}{}{status}", w.name));
    }
    vec![reply(event, &lines.join("\n"))]
}

async fn focus(ctx: &impl RoutingContext, event: &InboundEvent, tail: &str) -> Vec<Effect> {
    let name = tail.trim();
    if name.is_empty() {
        return vec![reply(event, "Usage: /focus <name>")];
    }
    if !ctx.exists(name).await {
        return vec![reply(event, &format!("No such worker: {name}"))];
    }
    vec![
        Effect::SetFocus {
            worker: Some(WorkerId::new(name.to_string())),
        },
        reply(event, &format!("Focused on {name}.")),
    ]
}

async fn progress(ctx: &impl RoutingContext, event: &InboundEvent) -> Vec<Effect> {
    let Some(focused) = ctx.focused().await else {
        return vec![no_focus_hint(event)];
    };
    let cmd = ctx
        .foreground_cmd(&focused)
        .await
        .unwrap_or_else(|| "unknown".to_string());
    let age = ctx
        .pending_age_secs(&focused)
        .await
        .map(wrangler_core::format_elapsed)
        .unwrap_or_else(|| "idle".to_string());
    vec![reply(
        event,
        &format!("{focused}: running {cmd}, pending for {age}"),
    )]
}

async fn pause(ctx: &impl RoutingContext, event: &InboundEvent) -> Vec<Effect> {
    let Some(focused) = ctx.focused().await else {
        return vec![no_focus_hint(event)];
    };
    vec![
        Effect::SendKeys {
            worker: WorkerId::new(focused.clone()),
            keys: vec!["Escape".to_string()],
        },
        Effect::StopTyping {
            worker: WorkerId::new(focused.clone()),
        },
        reply(event, &format!("Paused {focused}.")),
    ]
}

async fn relaunch(ctx: &impl RoutingContext, event: &InboundEvent) -> Vec<Effect> {
    let Some(focused) = ctx.focused().await else {
        return vec![no_focus_hint(event)];
    };
    vec![
        Effect::RelaunchWorker {
            worker: WorkerId::new(focused.clone()),
        },
        reply(event, &format!("Relaunching {focused}.")),
    ]
}

async fn settings(ctx: &impl RoutingContext, event: &InboundEvent) -> Vec<Effect> {
    vec![reply(event, &ctx.settings_summary().await)]
}

async fn learn(ctx: &impl RoutingContext, event: &InboundEvent, topic: &str) -> Vec<Effect> {
    let Some(focused) = ctx.focused().await else {
        return vec![no_focus_hint(event)];
    };
    let prompt = if topic.is_empty() {
        "Please share what you've learned this session: notable gotchas, \
         useful commands, or anything a future worker should know."
            .to_string()
    } else {
        format!(
            "Please share what you've learned about \"{topic}\": notable gotchas, \
             useful commands, or anything a future worker should know."
        )
    };
    vec![send_to(event, &focused, &prompt, false)]
}

async fn route_broadcast(
    ctx: &impl RoutingContext,
    event: &InboundEvent,
    rest: &str,
) -> Vec<Effect> {
    let mut workers: Vec<String> = ctx.workers().await.into_iter().map(|w| w.name).collect();
    workers.sort();

    if workers.is_empty() {
        return vec![reply(event, "No workers to broadcast to.")];
    }

    let mut effects: Vec<Effect> = workers
        .iter()
        .map(|name| send_one_off(event, name, rest))
        .collect();
    effects.push(reply(
        event,
        &format!("Sent to: {}", workers.join(", ")),
    ));
    effects
}

async fn route_reply(
    ctx: &impl RoutingContext,
    event: &InboundEvent,
    reply_to: &ReplyTo,
    text: &str,
) -> Vec<Effect> {
    let target = if reply_to.text.starts_with(OWN_FRAME_PREFIX) {
        frame_worker(&reply_to.text)
    } else {
        None
    };
    let target = match target {
        Some(w) => Some(w),
        None => ctx.focused().await,
    };

    let Some(worker) = target else {
        return vec![no_focus_hint(event)];
    };

    let payload = format!(
        "Manager reply: {text}\nContext (your previous message): {}",
        reply_to.text
    );
    vec![send_to(event, &worker, &payload, false)]
}

async fn route_plain(ctx: &impl RoutingContext, event: &InboundEvent, text: &str) -> Vec<Effect> {
    match ctx.focused().await {
        Some(focused) => vec![send_to(event, &focused, text, false)],
        None => vec![no_focus_hint(event)],
    }
}

/// Parse the worker name out of the bridge's own response frame
/// (`"<b>worker:</b>\n..."`, spec §4.G.5a).
fn frame_worker(text: &str) -> Option<String> {
    let rest = text.strip_prefix(OWN_FRAME_PREFIX)?;
    let end = rest.find(OWN_FRAME_SUFFIX)?;
    let name = &rest[..end];
    if name.is_empty() || is_reserved(name) {
        None
    } else {
        Some(name.to_string())
    }
}

fn send_to(event: &InboundEvent, worker: &str, text: &str, set_focus: bool) -> Effect {
    Effect::SendToWorker {
        worker: WorkerId::new(worker.to_string()),
        text: text.to_string(),
        chat_id: event.chat_id.clone(),
        set_focus,
        message_id: event.message_id.clone(),
    }
}

/// A one-off send (broadcast, `@name`, slash pass-through-to-named-worker)
/// never changes focus by itself (spec §4.G.3, .4).
fn send_one_off(event: &InboundEvent, worker: &str, text: &str) -> Effect {
    send_to(event, worker, text, false)
}

fn reply(event: &InboundEvent, text: &str) -> Effect {
    Effect::ReplyText {
        chat_id: event.chat_id.clone(),
        text: text.to_string(),
        reply_to: event.message_id.clone(),
    }
}

fn no_focus_hint(event: &InboundEvent) -> Effect {
    reply(event, "No focused worker. Try /hire <name> to get started.")
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
