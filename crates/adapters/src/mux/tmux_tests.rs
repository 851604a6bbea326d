// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serial_test::serial;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::LazyLock;

/// Random prefix for this test run to avoid conflicts with parallel test runs.
static TEST_PREFIX: LazyLock<String> = LazyLock::new(|| {
    use std::time::{SystemTime, UNIX_EPOCH};
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .subsec_nanos();
    format!("wt{:04x}-", nanos & 0xFFFF)
});

static NAME_COUNTER: AtomicU64 = AtomicU64::new(0);

fn unique_name(suffix: &str) -> String {
    let id = NAME_COUNTER.fetch_add(1, Ordering::SeqCst);
    format!("{suffix}-{id}")
}

fn tmux_available() -> bool {
    std::process::Command::new("tmux")
        .arg("-V")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

macro_rules! fail_if_no_tmux {
    () => {
        if !tmux_available() {
            panic!("tmux is required but not available");
        }
    };
}

fn adapter() -> TmuxAdapter {
    TmuxAdapter::new(TEST_PREFIX.clone(), 9000, "/tmp".to_string(), None)
}

#[tokio::test]
#[serial(tmux)]
async fn create_makes_session_discoverable_by_exists_and_list() {
    fail_if_no_tmux!();
    let adapter = adapter();
    let name = unique_name("create");

    adapter
        .create(&name, Path::new("/tmp"), "sleep 60")
        .await
        .unwrap();

    assert!(adapter.exists(&name).await.unwrap());
    assert!(adapter.list().await.unwrap().contains(&name));

    let _ = adapter.kill(&name).await;
}

#[tokio::test]
#[serial(tmux)]
async fn create_twice_is_already_exists() {
    fail_if_no_tmux!();
    let adapter = adapter();
    let name = unique_name("dup");

    adapter
        .create(&name, Path::new("/tmp"), "sleep 60")
        .await
        .unwrap();

    let err = adapter
        .create(&name, Path::new("/tmp"), "sleep 60")
        .await
        .unwrap_err();
    assert!(matches!(err, MuxError::AlreadyExists(_)));

    let _ = adapter.kill(&name).await;
}

#[tokio::test]
#[serial(tmux)]
async fn create_rejects_missing_cwd() {
    fail_if_no_tmux!();
    let adapter = adapter();
    let name = unique_name("badcwd");

    let err = adapter
        .create(&name, Path::new("/does/not/exist"), "sleep 60")
        .await
        .unwrap_err();
    assert!(matches!(err, MuxError::SpawnFailed(_)));
}

#[tokio::test]
#[serial(tmux)]
async fn send_literal_then_enter_executes_command() {
    fail_if_no_tmux!();
    let adapter = adapter();
    let name = unique_name("send");

    adapter
        .create(&name, Path::new("/tmp"), "sh")
        .await
        .unwrap();
    tokio::time::sleep(tokio::time::Duration::from_millis(200)).await;

    adapter
        .send_literal(&name, "echo hello_from_test")
        .await
        .unwrap();
    adapter.send_enter(&name).await.unwrap();
    tokio::time::sleep(tokio::time::Duration::from_millis(300)).await;

    let pane = adapter.capture_pane(&name, 50).await.unwrap();
    assert!(pane.contains("hello_from_test"));

    let _ = adapter.kill(&name).await;
}

#[tokio::test]
#[serial(tmux)]
async fn kill_removes_session() {
    fail_if_no_tmux!();
    let adapter = adapter();
    let name = unique_name("kill");

    adapter
        .create(&name, Path::new("/tmp"), "sleep 60")
        .await
        .unwrap();
    assert!(adapter.exists(&name).await.unwrap());

    adapter.kill(&name).await.unwrap();
    assert!(!adapter.exists(&name).await.unwrap());
}

#[tokio::test]
#[serial(tmux)]
async fn operations_on_missing_session_are_not_found() {
    fail_if_no_tmux!();
    let adapter = adapter();
    let name = unique_name("missing");

    assert!(!adapter.exists(&name).await.unwrap());
    assert!(matches!(
        adapter.send_literal(&name, "x").await,
        Err(MuxError::NotFound(_))
    ));
    assert!(matches!(
        adapter.capture_pane(&name, 10).await,
        Err(MuxError::NotFound(_))
    ));
}

#[tokio::test]
#[serial(tmux)]
async fn list_only_returns_names_under_this_prefix() {
    fail_if_no_tmux!();
    let adapter = adapter();
    let other_prefix = TmuxAdapter::new("other-prefix-".to_string(), 9000, "/tmp".to_string(), None);
    let name = unique_name("scoped");

    adapter
        .create(&name, Path::new("/tmp"), "sleep 60")
        .await
        .unwrap();

    assert!(other_prefix.list().await.unwrap().iter().all(|n| n != &name));
    assert!(adapter.list().await.unwrap().contains(&name));

    let _ = adapter.kill(&name).await;
}
