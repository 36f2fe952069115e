//! Rich-text document model.
//!
//! Parsing is total: [`Block::from_value`] maps any JSON value to a block,
//! and anything that is not a well-formed text or image block becomes an
//! [`UnknownBlock`] that keeps only its type and key.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Block type of paragraphs, headings and quotes.
pub const TEXT_BLOCK_TYPE: &str = "block";
/// Block type of embedded images.
pub const IMAGE_BLOCK_TYPE: &str = "image";
/// The only mark definition type that carries a URL.
pub const LINK_MARK_TYPE: &str = "link";

/// One structural unit of a rich-text document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Block {
    /// Paragraph, heading or quote
    Text(TextBlock),
    /// Embedded image
    Image(ImageBlock),
    /// Anything else; only type and key survive
    Unknown(UnknownBlock),
}

impl Block {
    /// Classifies a raw JSON value as a block.
    ///
    /// # Examples
    ///
    /// ```
    /// use content_sanitize::document::Block;
    /// use serde_json::json;
    ///
    /// let block = Block::from_value(json!({
    ///     "_type": "customEmbed",
    ///     "_key": "k1",
    ///     "dangerousHtml": "<script>alert(1)</script>"
    /// }));
    ///
    /// assert!(matches!(block, Block::Unknown(_)));
    /// assert_eq!(
    ///     serde_json::to_value(&block).unwrap(),
    ///     json!({ "_type": "customEmbed", "_key": "k1" })
    /// );
    /// ```
    pub fn from_value(value: Value) -> Block {
        let stub = UnknownBlock::from_value(&value);
        let is_text = stub.kind == TEXT_BLOCK_TYPE;
        let is_image =
            stub.kind == IMAGE_BLOCK_TYPE && value.get("asset").is_some_and(Value::is_object);

        if is_text {
            serde_json::from_value(value)
                .map(Block::Text)
                .unwrap_or(Block::Unknown(stub))
        } else if is_image {
            serde_json::from_value(value)
                .map(Block::Image)
                .unwrap_or(Block::Unknown(stub))
        } else {
            Block::Unknown(stub)
        }
    }

    /// The block's `_type`.
    pub fn kind(&self) -> &str {
        match self {
            Block::Text(b) => &b.kind,
            Block::Image(b) => &b.kind,
            Block::Unknown(b) => &b.kind,
        }
    }

    /// The block's `_key`, if any.
    pub fn key(&self) -> Option<&str> {
        match self {
            Block::Text(b) => b.key.as_deref(),
            Block::Image(b) => b.key.as_deref(),
            Block::Unknown(b) => b.key.as_deref(),
        }
    }
}

impl<'de> Deserialize<'de> for Block {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Value::deserialize(deserializer).map(Block::from_value)
    }
}

/// A paragraph, heading or quote.
///
/// Fields other than children and mark definitions (`style`, `listItem`,
/// `level`, ...) are structural metadata and pass through in `rest`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextBlock {
    /// Always `"block"`
    #[serde(rename = "_type")]
    pub kind: String,
    /// Block key
    #[serde(
        rename = "_key",
        default,
        deserialize_with = "lenient::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub key: Option<String>,
    /// Inline spans
    #[serde(default)]
    pub children: Vec<Span>,
    /// Out-of-band mark data referenced by span marks
    #[serde(rename = "markDefs", default)]
    pub mark_defs: Vec<MarkDef>,
    /// Remaining structural fields
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

/// An inline run of text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Span {
    /// Usually `"span"`
    #[serde(rename = "_type", default = "span_kind", deserialize_with = "lenient::string")]
    pub kind: String,
    /// Span key
    #[serde(
        rename = "_key",
        default,
        deserialize_with = "lenient::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub key: Option<String>,
    /// Text content; non-string values read as empty
    #[serde(default, deserialize_with = "lenient::string")]
    pub text: String,
    /// Decorators and mark-definition keys; non-strings are ignored
    #[serde(default, deserialize_with = "lenient::strings")]
    pub marks: Vec<String>,
}

fn span_kind() -> String {
    "span".to_string()
}

/// Out-of-band data for a mark, such as a link target.
///
/// Only the fields below are read; anything else on the definition is
/// discarded during parsing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkDef {
    /// Key referenced from span marks
    #[serde(
        rename = "_key",
        default,
        deserialize_with = "lenient::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub key: Option<String>,
    /// Definition type, e.g. `"link"`
    #[serde(rename = "_type", default, deserialize_with = "lenient::string")]
    pub kind: String,
    /// Link target
    #[serde(
        default,
        deserialize_with = "lenient::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub href: Option<String>,
    /// Link title
    #[serde(
        default,
        deserialize_with = "lenient::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub title: Option<String>,
    /// Open in a new tab
    #[serde(
        default,
        deserialize_with = "lenient::opt_bool",
        skip_serializing_if = "Option::is_none"
    )]
    pub blank: Option<bool>,
}

impl MarkDef {
    /// Whether this definition carries a URL.
    pub fn is_link(&self) -> bool {
        self.kind == LINK_MARK_TYPE
    }
}

/// An embedded image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageBlock {
    /// Always `"image"`
    #[serde(rename = "_type")]
    pub kind: String,
    /// Block key
    #[serde(
        rename = "_key",
        default,
        deserialize_with = "lenient::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub key: Option<String>,
    /// Reference to the binary asset
    pub asset: AssetRef,
    /// Alternative text
    #[serde(
        default,
        deserialize_with = "lenient::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub alt: Option<String>,
    /// Caption shown under the image
    #[serde(
        default,
        deserialize_with = "lenient::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub caption: Option<String>,
    /// Focal point, passed through as linked data
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hotspot: Option<Value>,
    /// Crop rectangle, passed through as linked data
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crop: Option<Value>,
}

/// Reference to an image asset, resolved to a URL downstream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRef {
    /// Opaque asset reference, e.g. `image-<id>-<WxH>-<ext>`
    #[serde(
        rename = "_ref",
        default,
        deserialize_with = "lenient::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub reference: Option<String>,
    /// Reference type, usually `"reference"`
    #[serde(
        rename = "_type",
        default,
        deserialize_with = "lenient::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub kind: Option<String>,
    /// Already-resolved URL, when the query dereferenced the asset
    #[serde(
        default,
        deserialize_with = "lenient::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub url: Option<String>,
}

/// A block of unrecognised type, reduced to its type and key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnknownBlock {
    /// Original `_type`, or `"unknown"` if it was missing
    #[serde(rename = "_type")]
    pub kind: String,
    /// Original `_key`, if it was a string
    #[serde(rename = "_key", skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

impl UnknownBlock {
    /// Takes the type and key of any value, ignoring everything else.
    pub fn from_value(value: &Value) -> Self {
        Self {
            kind: value
                .get("_type")
                .and_then(Value::as_str)
                .unwrap_or("unknown")
                .to_string(),
            key: value.get("_key").and_then(Value::as_str).map(str::to_owned),
        }
    }
}

/// Deserializers that read wrongly-typed fields as empty instead of failing.
mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::String(s) => s,
            _ => String::new(),
        })
    }

    pub fn opt_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::Null => None,
            Value::String(s) => Some(s),
            _ => Some(String::new()),
        })
    }

    pub fn strings<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::Array(items) => items
                .into_iter()
                .filter_map(|v| match v {
                    Value::String(s) => Some(s),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        })
    }

    pub fn opt_bool<'de, D: Deserializer<'de>>(d: D) -> Result<Option<bool>, D::Error> {
        Ok(Value::deserialize(d)?.as_bool())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn text_block_parses_with_rest_fields() {
        let block = Block::from_value(json!({
            "_type": "block",
            "_key": "b1",
            "style": "h2",
            "children": [{ "_type": "span", "text": "Obon", "marks": ["strong"] }],
            "markDefs": []
        }));

        let Block::Text(text) = block else {
            panic!("expected text block");
        };
        assert_eq!(text.key.as_deref(), Some("b1"));
        assert_eq!(text.children[0].text, "Obon");
        assert_eq!(text.rest.get("style"), Some(&json!("h2")));
    }

    #[test]
    fn span_with_wrong_types_reads_as_empty() {
        let block = Block::from_value(json!({
            "_type": "block",
            "children": [{ "_type": "span", "text": 42, "marks": ["em", 7, null] }]
        }));

        let Block::Text(text) = block else {
            panic!("expected text block");
        };
        assert_eq!(text.children[0].text, "");
        assert_eq!(text.children[0].marks, vec!["em".to_string()]);
        assert!(text.mark_defs.is_empty());
    }

    #[test]
    fn malformed_text_block_collapses() {
        let block = Block::from_value(json!({
            "_type": "block",
            "_key": "b2",
            "children": "<script>alert(1)</script>"
        }));
        assert_eq!(
            block,
            Block::Unknown(UnknownBlock {
                kind: "block".to_string(),
                key: Some("b2".to_string())
            })
        );
    }

    #[test]
    fn image_without_asset_collapses() {
        let block = Block::from_value(json!({ "_type": "image", "_key": "i1", "alt": "x" }));
        assert!(matches!(block, Block::Unknown(_)));
    }

    #[test]
    fn image_block_parses() {
        let block = Block::from_value(json!({
            "_type": "image",
            "_key": "i1",
            "asset": { "_type": "reference", "_ref": "image-abc-800x600-jpg" },
            "alt": "Main hall",
            "link": "javascript:alert(1)"
        }));

        let Block::Image(image) = block else {
            panic!("expected image block");
        };
        assert_eq!(image.asset.reference.as_deref(), Some("image-abc-800x600-jpg"));
        assert_eq!(image.alt.as_deref(), Some("Main hall"));
        let value = serde_json::to_value(&image).unwrap();
        assert!(value.get("link").is_none());
    }

    #[test]
    fn non_object_collapses_to_unknown() {
        let block = Block::from_value(json!("just a string"));
        assert_eq!(block.kind(), "unknown");
        assert_eq!(block.key(), None);
    }

    #[test]
    fn mark_def_ignores_extra_fields() {
        let def: MarkDef = serde_json::from_value(json!({
            "_key": "m1",
            "_type": "link",
            "href": "/x",
            "onclick": "alert(1)"
        }))
        .unwrap();
        assert!(def.is_link());
        let value = serde_json::to_value(&def).unwrap();
        assert_eq!(value, json!({ "_key": "m1", "_type": "link", "href": "/x" }));
    }

    #[test]
    fn block_deserializes_through_from_value() {
        let blocks: Vec<Block> = serde_json::from_value(json!([
            { "_type": "block", "children": [] },
            { "_type": "youtube", "_key": "y1", "url": "https://example.com" }
        ]))
        .unwrap();
        assert!(matches!(blocks[0], Block::Text(_)));
        assert_eq!(blocks[1].kind(), "youtube");
    }
}
