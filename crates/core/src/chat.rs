// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Chat-transport identifiers: the admin's identity and addressable messages.

crate::define_id! {
    /// A chat identity, as assigned by the chat transport (e.g. a Telegram
    /// chat id rendered as a string). Transport-agnostic at this layer —
    /// the concrete transport adapter owns parsing/formatting its native id
    /// type into this wrapper.
    pub struct ChatId;
}

crate::define_id! {
    /// A transport message identifier, used for reaction placement and
    /// reply-chaining (spec §4.H.7 — "subsequent pieces chain via
    /// reply-to-message-id").
    pub struct MessageId;
}
