//! Domain-specific assertion macros for snitch harnesses.
//!
//! These dig into the raw JSON a fake webhook captured and fail with the
//! payload that was actually posted, so a formatting regression shows the
//! whole message, not just a boolean.

// ---------------------------------------------------------------------------
// Payload assertions
// ---------------------------------------------------------------------------

/// Assert that a captured payload is an attachment post carrying the given
/// record text, indented by the two-space prefix the formatter applies.
///
/// ```rust
/// assert_attachment_text!(payloads[0], "ERROR boom\n at handler.rs:42\n");
/// ```
#[macro_export]
macro_rules! assert_attachment_text {
    ($payload:expr, $record:expr) => {{
        let payload: &serde_json::Value = &$payload;
        let expected = format!("  {}", $record);
        match payload["attachments"][0]["text"].as_str() {
            Some(actual) if actual == expected => {}
            Some(actual) => panic!(
                "assert_attachment_text! failed:\n  expected: {:?}\n  actual:   {:?}",
                expected, actual
            ),
            None => panic!(
                "assert_attachment_text! failed: no attachments[0].text in payload:\n  {}",
                payload
            ),
        }
    }};
}

/// Assert that a captured payload is a plain post whose `text` wraps the
/// record in a fenced code block with the given syntax hint.
///
/// ```rust
/// assert_plain_text!(payloads[0], "log", "ERROR boom\n");
/// ```
#[macro_export]
macro_rules! assert_plain_text {
    ($payload:expr, $syntax:expr, $record:expr) => {{
        let payload: &serde_json::Value = &$payload;
        let expected_tail = format!("```{}\n{}\n```", $syntax, $record);
        match payload["text"].as_str() {
            Some(actual) if actual.ends_with(&expected_tail) => {
                assert!(
                    payload.get("attachments").is_none(),
                    "assert_plain_text! failed: plain payload also has attachments:\n  {}",
                    payload
                );
            }
            Some(actual) => panic!(
                "assert_plain_text! failed:\n  expected suffix: {:?}\n  actual text:     {:?}",
                expected_tail, actual
            ),
            None => panic!(
                "assert_plain_text! failed: no text in payload:\n  {}",
                payload
            ),
        }
    }};
}

/// Assert that the set of delivered attachment texts matches the expected
/// records regardless of arrival order.
///
/// ```rust
/// assert_delivered_records!(payloads, &["ERROR one\n", "ERROR two\n"]);
/// ```
#[macro_export]
macro_rules! assert_delivered_records {
    ($payloads:expr, $records:expr) => {{
        let payloads: &[serde_json::Value] = &$payloads;
        let mut actual: Vec<String> = payloads
            .iter()
            .map(|p| match p["attachments"][0]["text"].as_str() {
                Some(text) => text.to_string(),
                None => panic!(
                    "assert_delivered_records! failed: payload without attachment text:\n  {}",
                    p
                ),
            })
            .collect();
        let mut expected: Vec<String> =
            $records.iter().map(|r| format!("  {}", r)).collect();
        actual.sort();
        expected.sort();
        if actual != expected {
            panic!(
                "assert_delivered_records! failed:\n  expected (sorted): {:#?}\n  actual (sorted):   {:#?}",
                expected, actual
            );
        }
    }};
}
