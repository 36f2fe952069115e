//! Structured rich-text document sanitization.
//!
//! A document is an ordered list of [`Block`]s. Text blocks carry inline
//! [`Span`]s and out-of-band [`MarkDef`]s; image blocks carry an asset
//! reference plus alt text and caption. Every string a renderer might print
//! goes through [`ContentSanitizer::text`], every link target through
//! [`ContentSanitizer::url`], and blocks of unrecognised type are reduced
//! to their type and key. Span text is stripped the same way but not
//! trimmed, since spans are concatenated.
//!
//! Sibling blocks, the spans and mark definitions of one block, and the
//! text fields of one image are sanitized as jointly awaited futures.
//! Output order always matches input order.

mod asset;
mod model;
mod plain_text;

pub use asset::CdnConfig;
pub use model::{
    AssetRef, Block, ImageBlock, MarkDef, Span, TextBlock, UnknownBlock, IMAGE_BLOCK_TYPE,
    LINK_MARK_TYPE, TEXT_BLOCK_TYPE,
};
pub use plain_text::{excerpt, to_plain_text};

use std::collections::BTreeSet;

use futures::future::join_all;
use serde_json::Value;

use crate::{
    logging, ContentSanitizer, ImageUrlSanitizer, MarkSanitizer, SanitizationError,
    SanitizationErrorKind, Sanitizer, Tainted,
};

impl ContentSanitizer {
    /// Sanitizes a parsed document, block by block.
    ///
    /// # Examples
    ///
    /// ```
    /// use content_sanitize::ContentSanitizer;
    /// use content_sanitize::document::Block;
    /// use futures::executor::block_on;
    /// use serde_json::json;
    ///
    /// let blocks: Vec<Block> = serde_json::from_value(json!([
    ///     { "_type": "block", "_key": "a", "children": [
    ///         { "_type": "span", "text": "<b>Obon</b> service" }
    ///     ]},
    ///     { "_type": "embed", "_key": "b", "html": "<iframe src=x>" }
    /// ])).unwrap();
    ///
    /// let clean = block_on(ContentSanitizer::new().document(blocks));
    /// assert_eq!(clean.len(), 2);
    /// let Block::Text(text) = &clean[0] else { panic!() };
    /// assert_eq!(text.children[0].text, "Obon service");
    /// assert_eq!(
    ///     serde_json::to_value(&clean[1]).unwrap(),
    ///     json!({ "_type": "embed", "_key": "b" })
    /// );
    /// ```
    pub async fn document(&self, blocks: Vec<Block>) -> Vec<Block> {
        join_all(blocks.into_iter().map(|block| self.block(block))).await
    }

    /// Sanitizes a document given as raw JSON.
    ///
    /// Anything other than an array yields an empty array.
    pub async fn document_value(&self, input: &Value) -> Value {
        let Some(items) = input.as_array() else {
            logging::policy_violation(
                "document",
                &SanitizationError::new(
                    SanitizationErrorKind::MalformedInput,
                    "document is not an array of blocks",
                ),
            );
            return Value::Array(Vec::new());
        };

        let blocks = items.iter().cloned().map(Block::from_value).collect();
        let cleaned = self.document(blocks).await;

        serde_json::to_value(cleaned).unwrap_or_else(|e| {
            logging::policy_violation(
                "document",
                &SanitizationError::new(
                    SanitizationErrorKind::MalformedInput,
                    format!("sanitized document failed to serialize: {}", e),
                ),
            );
            Value::Array(Vec::new())
        })
    }

    async fn block(&self, block: Block) -> Block {
        match block {
            Block::Text(text) => Block::Text(self.text_block(text).await),
            Block::Image(image) => Block::Image(self.image_block(image).await),
            Block::Unknown(unknown) => Block::Unknown(unknown),
        }
    }

    async fn text_block(&self, block: TextBlock) -> TextBlock {
        let TextBlock {
            kind,
            key,
            children,
            mark_defs,
            rest,
        } = block;

        let def_keys: Vec<Option<String>> = mark_defs.iter().map(|d| d.key.clone()).collect();
        let (mut children, defs) = futures::join!(
            join_all(children.into_iter().map(|span| self.span(span))),
            join_all(mark_defs.into_iter().map(|def| self.mark_def(def))),
        );

        let mut dropped = BTreeSet::new();
        let mut mark_defs = Vec::with_capacity(defs.len());
        for (key, def) in def_keys.into_iter().zip(defs) {
            match def {
                Some(def) => mark_defs.push(def),
                None => dropped.extend(key),
            }
        }

        if !dropped.is_empty() {
            for span in &mut children {
                span.marks.retain(|mark| !dropped.contains(mark));
            }
        }

        TextBlock {
            kind,
            key,
            children,
            mark_defs,
            rest,
        }
    }

    async fn span(&self, span: Span) -> Span {
        let marks = MarkSanitizer::with_policy(self.policy());
        let text = self.span_text(&span.text).await;

        Span {
            kind: span.kind,
            key: span.key,
            text,
            marks: span
                .marks
                .into_iter()
                .filter_map(|mark| match marks.sanitize(Tainted::new(mark)) {
                    Ok(verified) => Some(verified.into_inner()),
                    Err(e) => {
                        logging::policy_violation("span", &e);
                        None
                    }
                })
                .collect(),
        }
    }

    /// Rebuilds a mark definition from its safe fields only.
    ///
    /// Returns `None` for a link whose target was rejected.
    async fn mark_def(&self, def: MarkDef) -> Option<MarkDef> {
        let minimal = MarkDef {
            key: def.key,
            kind: def.kind,
            href: None,
            title: None,
            blank: None,
        };
        if !minimal.is_link() {
            return Some(minimal);
        }

        let (href, title) = futures::join!(
            self.url(def.href.as_deref().unwrap_or_default()),
            self.optional_text(def.title),
        );
        if href.is_empty() {
            logging::policy_violation(
                "mark_def",
                &SanitizationError::new(
                    SanitizationErrorKind::DisallowedUri,
                    "link definition dropped: target rejected",
                ),
            );
            return None;
        }

        Some(MarkDef {
            href: Some(href),
            title,
            blank: def.blank,
            ..minimal
        })
    }

    async fn image_block(&self, block: ImageBlock) -> ImageBlock {
        let ImageBlock {
            kind,
            key,
            mut asset,
            alt,
            caption,
            hotspot,
            crop,
        } = block;

        let (alt, caption, hotspot, crop) = futures::join!(
            self.optional_text(alt),
            self.optional_text(caption),
            self.geometry(hotspot),
            self.geometry(crop),
        );

        if let Some(url) = asset.url.take() {
            let checked = ImageUrlSanitizer::with_policy(self.policy())
                .sanitize(Tainted::new(url))
                .map(|verified| verified.into_inner());
            match checked {
                Ok(url) => asset.url = Some(url),
                Err(e) => logging::policy_violation("image", &e),
            }
        }

        ImageBlock {
            kind,
            key,
            asset,
            alt,
            caption,
            hotspot,
            crop,
        }
    }

    async fn optional_text(&self, input: Option<String>) -> Option<String> {
        match input {
            Some(text) => Some(self.text(&text).await),
            None => None,
        }
    }

    /// Hotspot and crop are plain objects of numbers; anything else is dropped.
    async fn geometry(&self, input: Option<Value>) -> Option<Value> {
        match input {
            Some(value @ Value::Object(_)) => Some(Value::Object(self.keyed_data(&value).await)),
            _ => None,
        }
    }
}
