// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn reads_transcript_path_from_json() {
    let input = r#"{"transcript_path":"/tmp/transcript.jsonl","session_id":"abc","hook_event_name":"Stop"}"#;
    let event = read_from(input.as_bytes()).unwrap();
    assert_eq!(event.transcript_path, PathBuf::from("/tmp/transcript.jsonl"));
}

#[test]
fn malformed_json_is_an_error() {
    let input = b"not json";
    assert!(read_from(&input[..]).is_err());
}
