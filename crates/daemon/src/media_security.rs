// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Media security constraints enforced at send time (spec §6): path
//! allowlisting, extension allow/deny lists, and the size cap. This is
//! where `SizeOrTypeRejected` (spec §7) actually gets raised — the
//! response pipeline only parses tag syntax, it doesn't know about paths
//! on disk.

use std::path::{Path, PathBuf};
use wrangler_core::BridgeError;

/// Images may only be sent with one of these extensions (spec §6).
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "bmp"];

/// Documents with a filename matching one of these patterns are refused
/// regardless of where they live (spec §6: "subject to file-name and
/// extension denylist").
const DOCUMENT_DENYLIST_SUFFIXES: &[&str] = &[".npmrc", ".pem", ".key"];
const DOCUMENT_DENYLIST_PREFIXES: &[&str] = &[".env"];

/// 20 MB (spec §6, §5).
pub const MAX_FILE_SIZE_BYTES: u64 = 20 * 1024 * 1024;

/// Roots a path is allowed to live under for an out-of-band media send
/// (spec §6: "volatile temp root, sessions root, or process cwd").
#[derive(Debug, Clone)]
pub struct AllowedRoots {
    pub roots: Vec<PathBuf>,
}

impl AllowedRoots {
    pub fn new(sessions_root: &Path) -> Self {
        Self {
            roots: vec![
                std::env::temp_dir(),
                sessions_root.to_path_buf(),
                std::env::current_dir().unwrap_or_else(|_| PathBuf::from("/")),
            ],
        }
    }

    fn contains(&self, path: &Path) -> bool {
        self.roots.iter().any(|root| path.starts_with(root))
    }
}

fn extension_lower(path: &Path) -> Option<String> {
    path.extension().map(|e| e.to_string_lossy().to_lowercase())
}

fn filename_lower(path: &Path) -> String {
    path.file_name().map(|n| n.to_string_lossy().to_lowercase()).unwrap_or_default()
}

/// Validate an image path before sending (spec §6): must be absolute,
/// under an allowed root, and have an allowlisted image extension.
pub fn validate_image_path(path: &Path, allowed: &AllowedRoots) -> Result<(), BridgeError> {
    if !path.is_absolute() {
        return Err(BridgeError::SizeOrTypeRejected(format!(
            "image path must be absolute: {}",
            path.display()
        )));
    }
    if !allowed.contains(path) {
        return Err(BridgeError::SizeOrTypeRejected(format!(
            "image path outside allowed roots: {}",
            path.display()
        )));
    }
    match extension_lower(path) {
        Some(ext) if IMAGE_EXTENSIONS.contains(&ext.as_str()) => Ok(()),
        _ => Err(BridgeError::SizeOrTypeRejected(format!(
            "unsupported image extension: {}",
            path.display()
        ))),
    }
}

/// Validate a document path before sending (spec §6): freer on location
/// than images, but subject to a filename/extension denylist.
pub fn validate_document_path(path: &Path) -> Result<(), BridgeError> {
    if !path.is_absolute() {
        return Err(BridgeError::SizeOrTypeRejected(format!(
            "file path must be absolute: {}",
            path.display()
        )));
    }
    let name = filename_lower(path);
    if DOCUMENT_DENYLIST_PREFIXES.iter().any(|p| name.starts_with(p))
        || DOCUMENT_DENYLIST_SUFFIXES.iter().any(|s| name.ends_with(s))
    {
        return Err(BridgeError::SizeOrTypeRejected(format!(
            "file type denied: {}",
            path.display()
        )));
    }
    Ok(())
}

/// Check the 20 MB size cap against a path already known to exist.
pub async fn check_size_cap(path: &Path) -> Result<(), BridgeError> {
    let meta = tokio::fs::metadata(path)
        .await
        .map_err(|e| BridgeError::SizeOrTypeRejected(format!("{}: {e}", path.display())))?;
    if meta.len() > MAX_FILE_SIZE_BYTES {
        return Err(BridgeError::SizeOrTypeRejected(format!(
            "{} exceeds the 20MB limit ({} bytes)",
            path.display(),
            meta.len()
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "media_security_tests.rs"]
mod tests;
