//! Structured document sanitization walkthrough.
//!
//! This example follows one CMS document through the pipeline:
//! 1. Parse the raw JSON into typed blocks
//! 2. Sanitize every block, span and mark definition
//! 3. Render the clean result as plain text and an excerpt
//! 4. Compare the engine-backed and fallback paths
//!
//! Run with: `cargo run --example document_flow`

use content_sanitize::document::{excerpt, to_plain_text, Block, CdnConfig};
use content_sanitize::{selftest, ContentSanitizer};
use futures::executor::block_on;
use serde_json::json;

fn main() {
    println!("=== Document Sanitization Example ===\n");

    let sanitizer = ContentSanitizer::new();
    match sanitizer.engine() {
        Ok(engine) => println!("Engine backend: {}", engine.backend()),
        Err(e) => println!("No engine, primitives only: {}", e),
    }

    let raw = json!([
        {
            "_type": "block",
            "_key": "intro",
            "style": "normal",
            "children": [
                { "_type": "span", "text": "Obon service ", "marks": [] },
                { "_type": "span", "text": "<b>this Sunday</b>", "marks": ["strong"] },
                { "_type": "span", "text": ", details ", "marks": [] },
                { "_type": "span", "text": "here", "marks": ["lnk"] },
                { "_type": "span", "text": " and ", "marks": [] },
                { "_type": "span", "text": "there", "marks": ["evil"] }
            ],
            "markDefs": [
                { "_key": "lnk", "_type": "link", "href": "/events/obon", "blank": true },
                { "_key": "evil", "_type": "link", "href": "javascript:alert(document.cookie)" }
            ]
        },
        {
            "_type": "image",
            "_key": "lanterns",
            "asset": { "_ref": "image-0b5e1d-1200x800-jpg" },
            "alt": "Lanterns <img src=x onerror=alert(1)>",
            "caption": "Floating lanterns on the river"
        },
        {
            "_type": "customEmbed",
            "_key": "widget",
            "html": "<script>fetch('//evil.example')</script>"
        }
    ]);

    println!("\n--- Scenario 1: Typed Document ---");
    let blocks: Vec<Block> = match serde_json::from_value(raw.clone()) {
        Ok(blocks) => blocks,
        Err(e) => {
            eprintln!("Document is not a list of blocks: {}", e);
            return;
        }
    };
    println!("Parsed {} blocks", blocks.len());

    let clean = block_on(sanitizer.document(blocks));
    let cdn = CdnConfig::new("temple", "production");

    for block in &clean {
        match block {
            Block::Text(text) => {
                println!("Text block {:?}", text.key);
                for span in &text.children {
                    println!("  span {:?} marks={:?}", span.text, span.marks);
                }
                for def in &text.mark_defs {
                    println!("  mark def {:?} -> {:?}", def.key, def.href);
                }
            }
            Block::Image(image) => {
                println!("Image block {:?}", image.key);
                println!("  alt: {:?}", image.alt);
                println!("  url: {}", image.image_url(&cdn));
            }
            Block::Unknown(unknown) => {
                println!("Unknown block reduced to {:?}", unknown);
            }
        }
    }

    println!("\n--- Scenario 2: Plain Text and Excerpt ---");
    let text = to_plain_text(&clean);
    println!("Plain text: {:?}", text);
    println!("Excerpt: {:?}", excerpt(&text, 24));

    println!("\n--- Scenario 3: Untyped JSON, With and Without Engine ---");
    for (name, sanitizer) in [
        ("engine", ContentSanitizer::new()),
        ("fallback", ContentSanitizer::new().without_engine()),
    ] {
        let output = block_on(sanitizer.document_value(&raw));
        println!("{}: {}", name, output);
    }

    println!("\n--- Scenario 4: Self-Test ---");
    let report = block_on(selftest::run(&sanitizer));
    println!("{} checks, all passed: {}", report.len(), report.all_passed());
    for failure in report.failures() {
        eprintln!("  FAILED {}: {}", failure.name(), failure.detail());
    }

    println!("\n=== Example Complete ===");
}
