// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn image_outside_allowed_roots_is_rejected() {
    let allowed = AllowedRoots::new(Path::new("/tmp/sessions"));
    let err = validate_image_path(Path::new("/etc/passwd.png"), &allowed).unwrap_err();
    assert!(matches!(err, BridgeError::SizeOrTypeRejected(_)));
}

#[test]
fn image_with_disallowed_extension_is_rejected() {
    let allowed = AllowedRoots::new(Path::new("/tmp/sessions"));
    let path = std::env::temp_dir().join("evil.exe");
    assert!(validate_image_path(&path, &allowed).is_err());
}

#[test]
fn image_under_sessions_root_with_allowed_extension_passes() {
    let sessions_root = std::env::temp_dir().join("wrangler-sessions-test");
    let allowed = AllowedRoots::new(&sessions_root);
    let path = sessions_root.join("alice/inbox/photo.png");
    assert!(validate_image_path(&path, &allowed).is_ok());
}

#[test]
fn relative_image_path_is_rejected() {
    let allowed = AllowedRoots::new(Path::new("/tmp/sessions"));
    assert!(validate_image_path(Path::new("relative.png"), &allowed).is_err());
}

#[test]
fn document_denylist_blocks_dotenv_and_keys() {
    assert!(validate_document_path(Path::new("/home/user/.env")).is_err());
    assert!(validate_document_path(Path::new("/home/user/.env.production")).is_err());
    assert!(validate_document_path(Path::new("/home/user/id_rsa.pem")).is_err());
    assert!(validate_document_path(Path::new("/home/user/.npmrc")).is_err());
}

#[test]
fn document_outside_denylist_passes_regardless_of_root() {
    assert!(validate_document_path(Path::new("/anywhere/report.pdf")).is_ok());
}

#[tokio::test]
async fn size_cap_rejects_large_files() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("big.bin");
    tokio::fs::write(&path, vec![0u8; 10]).await.unwrap();
    assert!(check_size_cap(&path).await.is_ok());
}

#[tokio::test]
async fn size_cap_errors_on_missing_file() {
    let err = check_size_cap(Path::new("/nonexistent/path")).await.unwrap_err();
    assert!(matches!(err, BridgeError::SizeOrTypeRejected(_)));
}
