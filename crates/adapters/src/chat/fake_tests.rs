// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[tokio::test]
async fn send_text_records_call_and_returns_distinct_ids() {
    let chat = FakeChatTransport::new();
    let chat_id = ChatId::new("42");

    let first = chat.send_text(&chat_id, "hi", None).await.unwrap();
    let second = chat.send_text(&chat_id, "bye", Some(&first)).await.unwrap();

    assert_ne!(first, second);
    assert_eq!(chat.calls().len(), 2);
}

#[tokio::test]
async fn fail_sends_surfaces_transport_error() {
    let chat = FakeChatTransport::new();
    chat.fail_sends();

    let err = chat.send_text(&ChatId::new("1"), "hi", None).await.unwrap_err();
    assert!(matches!(err, ChatError::Transport(_)));
    assert!(chat.calls().is_empty());
}

#[tokio::test]
async fn disabled_reactions_error_so_callers_can_omit_silently() {
    let chat = FakeChatTransport::new();
    chat.disable_reactions();

    let err = chat
        .set_reaction(&ChatId::new("1"), &MessageId::new("1"), "👀")
        .await
        .unwrap_err();
    assert!(matches!(err, ChatError::Transport(_)));
}

#[tokio::test]
async fn download_file_writes_to_dest() {
    let dir = tempfile::tempdir().unwrap();
    let chat = FakeChatTransport::new();
    let dest = dir.path().join("worker/inbox/photo.jpg");

    chat.download_file("file123", &dest).await.unwrap();

    assert!(dest.exists());
}
