//! Integration property tests for content-sanitize.
//!
//! These tests check cross-module invariants of the public entry points
//! against generated input.

use content_sanitize::{sanitize_text, sanitize_url, ContentSanitizer};
use futures::executor::block_on;
use proptest::prelude::*;
use serde_json::{json, Value};

// Strategy: text with markup characters sprinkled in
fn arb_markup_text() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z0-9 <>/=\"'&;!-]{0,80}").unwrap()
}

// Strategy: words that look like a script payload
fn arb_payload_word() -> impl Strategy<Value = String> {
    prop::string::string_regex("[A-Z][a-zA-Z]{3,12}").unwrap()
}

// Strategy: arbitrary block-like JSON values, mostly of unknown type
fn arb_block() -> impl Strategy<Value = Value> {
    let unknown = ("[a-zA-Z]{1,10}", "[a-z0-9]{1,6}", arb_markup_text())
        .prop_map(|(kind, key, payload)| json!({ "_type": kind, "_key": key, "html": payload }));
    let text = ("[a-z0-9]{1,6}", arb_markup_text()).prop_map(|(key, text)| {
        json!({
            "_type": "block",
            "_key": key,
            "children": [{ "_type": "span", "text": text, "marks": [] }],
            "markDefs": []
        })
    });
    let junk = prop_oneof![
        Just(Value::Null),
        any::<i64>().prop_map(Value::from),
        arb_markup_text().prop_map(Value::from),
    ];
    prop_oneof![unknown, text, junk]
}

proptest! {
    /// Sync text output is stable once it holds no characters needing escapes.
    #[test]
    fn proptest_sync_text_idempotent_without_entities(
        input in prop::string::string_regex("[a-zA-Z0-9 <>/=!.-]{0,40}").unwrap()
    ) {
        let once = sanitize_text(&input);
        prop_assume!(!once.contains('&'));
        prop_assert_eq!(sanitize_text(&once), once);
    }

    /// Script bodies never survive sync or engine-backed text sanitization.
    #[test]
    fn proptest_script_payload_never_survives(
        prefix in "[a-z ]{0,20}",
        word in arb_payload_word(),
        suffix in "[a-z ]{0,20}",
    ) {
        let input = format!("{}<script>{}()</script>{}", prefix, word, suffix);

        let sync = sanitize_text(&input);
        prop_assert!(!sync.contains("<script"));
        prop_assert!(!sync.contains(&word));

        let sanitizer = ContentSanitizer::new();
        let engine = block_on(sanitizer.text(&input));
        prop_assert!(!engine.contains("<script"));
        prop_assert!(!engine.contains(&word));
    }

    /// Engine-backed text output never carries a raw angle bracket.
    #[test]
    fn proptest_text_output_has_no_raw_markup(input in arb_markup_text()) {
        for sanitizer in [ContentSanitizer::new(), ContentSanitizer::new().without_engine()] {
            let output = block_on(sanitizer.text(&input));
            prop_assert!(!output.contains('<'));
            prop_assert!(!output.contains('>'));
        }
    }

    /// A sanitized URL is either rejected or passes the sync checks again
    /// unchanged, and the engine round-trip agrees with the sync result.
    #[test]
    fn proptest_sanitized_urls_are_fixed_points(
        input in prop::string::string_regex("[a-zA-Z:/#?=&.@+<> -]{0,40}").unwrap()
    ) {
        let once = sanitize_url(&input);
        prop_assert_eq!(sanitize_url(&once), once.clone());

        let async_once = block_on(ContentSanitizer::new().url(&input));
        if !async_once.is_empty() {
            prop_assert_eq!(&async_once, &once);
            prop_assert_eq!(sanitize_url(&async_once), async_once);
        }
    }

    /// Documents keep their length and block order, and unknown blocks keep only type and key.
    #[test]
    fn proptest_document_shape_is_preserved(blocks in prop::collection::vec(arb_block(), 0..8)) {
        let input = Value::Array(blocks.clone());
        let output = block_on(ContentSanitizer::new().document_value(&input));
        let output = output.as_array().expect("document output is an array");

        prop_assert_eq!(output.len(), blocks.len());
        for (before, after) in blocks.iter().zip(output) {
            let kind = before.get("_type").and_then(Value::as_str).unwrap_or("unknown");
            prop_assert_eq!(after["_type"].as_str(), Some(kind));
            if kind != "block" {
                let fields = after.as_object().map(|o| o.len()).unwrap_or_default();
                prop_assert!(fields <= 2);
                prop_assert!(after.get("html").is_none());
            }
        }
    }

    /// Linked-data output contains only keys from the input that pass the key pattern.
    #[test]
    fn proptest_linked_data_keys_are_filtered(
        entries in prop::collection::btree_map("[a-zA-Z@ <]{1,8}", arb_markup_text(), 0..8)
    ) {
        let input = Value::Object(
            entries.iter().map(|(k, v)| (k.clone(), Value::from(v.clone()))).collect()
        );
        let output = block_on(ContentSanitizer::new().keyed_data(&input));

        for key in output.keys() {
            prop_assert!(entries.contains_key(key));
            prop_assert!(!key.contains(' ') && !key.contains('<'));
            let handler_like = key.len() > 2
                && key[..2].eq_ignore_ascii_case("on")
                && key[2..].chars().all(|c| c.is_ascii_alphabetic());
            prop_assert!(!handler_like);
        }
    }
}
