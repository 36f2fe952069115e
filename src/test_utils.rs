//! Shared proptest strategies.

use proptest::prelude::*;

/// Non-empty text with no markup or entity characters, up to `max` chars.
///
/// Includes kana so multi-byte input is exercised.
pub fn arb_plain_text(max: usize) -> impl Strategy<Value = String> {
    prop::string::string_regex(&format!("[a-zA-Z0-9 .,!?ぁ-ん]{{1,{}}}", max.max(1)))
        .expect("plain-text pattern must compile")
}

/// Absolute https URLs on arbitrary hosts with simple paths.
pub fn arb_https_url() -> impl Strategy<Value = String> {
    ("[a-z]{1,12}", "[a-z0-9/_-]{0,24}")
        .prop_map(|(host, path)| format!("https://{}.example/{}", host, path))
}

/// Protocols that must always be rejected, in mixed case.
pub fn arb_denied_protocol() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["javascript", "data", "vbscript", "file", "blob"]).prop_flat_map(
        |scheme| {
            prop::collection::vec(any::<bool>(), scheme.len()).prop_map(move |upper| {
                scheme
                    .chars()
                    .zip(upper)
                    .map(|(c, up)| if up { c.to_ascii_uppercase() } else { c })
                    .collect::<String>()
                    + ":"
            })
        },
    )
}
