//! Linked data embedding walkthrough.
//!
//! This example shows how editor-supplied structured data reaches a
//! `<script type="application/ld+json">` element:
//! 1. Sanitize keys and string values recursively
//! 2. Serialize so the payload cannot close the script element
//! 3. Narrow the policy from a JSON configuration
//!
//! Run with: `cargo run --example linked_data_embed`

use content_sanitize::linked_data::to_script_json;
use content_sanitize::{ContentSanitizer, PolicyConfig};
use futures::executor::block_on;
use serde_json::json;

fn main() {
    println!("=== Linked Data Embedding Example ===\n");

    let sanitizer = ContentSanitizer::new();

    println!("--- Scenario 1: Organization Markup ---");
    let raw = json!({
        "@context": "https://schema.org",
        "@type": "BuddhistTemple",
        "name": "Temple </script><script>alert(1)</script>",
        "url": "https://temple.example.org",
        "sameAs": ["https://example.org/temple", "javascript:alert(1)"],
        "onload": "alert(1)",
        "bad key": "dropped",
        "address": {
            "@type": "PostalAddress",
            "streetAddress": "<b>1-2-3</b> Higashiyama",
            "addressLocality": "Kyoto"
        }
    });

    let data = block_on(sanitizer.keyed_data(&raw));
    println!("Kept keys: {:?}", data.keys().collect::<Vec<_>>());

    let script = to_script_json(&data);
    println!("<script type=\"application/ld+json\">{}</script>", script);
    println!("Contains '</script': {}", script.contains("</script"));

    println!("\n--- Scenario 2: Narrowed Policy ---");
    let config = r#"{
        "allowed_uri_pattern": "^https:",
        "trusted_image_hosts": ["cdn.sanity.io"]
    }"#;
    let policy = match PolicyConfig::from_json_str(config).and_then(|c| c.build()) {
        Ok(policy) => policy,
        Err(e) => {
            eprintln!("Policy rejected: {}", e);
            return;
        }
    };
    let strict = ContentSanitizer::new().with_policy(policy);
    for url in ["https://example.org", "/access", "mailto:office@temple.example.org"] {
        println!("{:?} -> {:?}", url, block_on(strict.url(url)));
    }

    println!("\n--- Scenario 3: Loosening Is Refused ---");
    let loose = r#"{ "allowed_tags": ["p", "iframe"], "denied_protocols": [] }"#;
    match PolicyConfig::from_json_str(loose).and_then(|c| c.build()) {
        Ok(_) => println!("Unexpected success"),
        Err(e) => println!("Policy rejected (expected): {}", e),
    }

    println!("\n=== Example Complete ===");
}
