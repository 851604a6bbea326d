// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Stability guard (spec §4.C.5): the stop event can fire before the
//! transcript is fully flushed to disk, so the hook polls briefly rather
//! than trusting the first read.

use std::path::Path;
use std::time::Duration;

const POLL_INTERVAL: Duration = Duration::from_millis(50);
/// 2s budget at 50ms granularity.
const MAX_ATTEMPTS: u32 = 40;

/// Poll `path` until two consecutive reads yield the same non-empty
/// extraction at the same file size, or the attempt budget runs out — in
/// which case the last extraction produced is returned as-is, empty or not.
pub fn poll_for_stable_extraction(path: &Path, extract: impl Fn(&str) -> String) -> String {
    poll_with(
        || {
            let size = std::fs::metadata(path).ok()?.len();
            let contents = std::fs::read_to_string(path).ok()?;
            Some((size, contents))
        },
        extract,
        std::thread::sleep,
    )
}

fn poll_with(
    mut read_raw: impl FnMut() -> Option<(u64, String)>,
    extract: impl Fn(&str) -> String,
    mut sleep: impl FnMut(Duration),
) -> String {
    let mut last: Option<(String, u64)> = None;
    let mut final_extraction = String::new();

    for attempt in 0..MAX_ATTEMPTS {
        if let Some((size, contents)) = read_raw() {
            let extracted = extract(&contents);
            final_extraction = extracted.clone();
            if !extracted.is_empty() && last.as_ref() == Some(&(extracted.clone(), size)) {
                return extracted;
            }
            if !extracted.is_empty() {
                last = Some((extracted, size));
            }
        }
        if attempt + 1 < MAX_ATTEMPTS {
            sleep(POLL_INTERVAL);
        }
    }
    final_extraction
}

#[cfg(test)]
#[path = "stability_tests.rs"]
mod tests;
