//! Keyed structured data (JSON-LD) sanitization.
//!
//! Walks an arbitrary JSON object, dropping keys outside the key pattern
//! and sanitizing every string value as plain text. Numbers and booleans
//! pass through; `null` members of objects are dropped. Arrays keep their
//! length, including `null` elements.

use futures::future::{join_all, BoxFuture, FutureExt};
use serde_json::{Map, Value};

use crate::{
    logging, ContentSanitizer, KeySanitizer, SanitizationError, SanitizationErrorKind, Sanitizer,
    Tainted,
};

impl ContentSanitizer {
    /// Sanitizes a linked-data object for embedding in the page.
    ///
    /// Anything other than a JSON object yields an empty map.
    ///
    /// # Examples
    ///
    /// ```
    /// use content_sanitize::ContentSanitizer;
    /// use futures::executor::block_on;
    /// use serde_json::json;
    ///
    /// let data = json!({
    ///     "@context": "https://schema.org",
    ///     "@type": "Event",
    ///     "name": "<script>alert(1)</script>Obon",
    ///     "bad key": "dropped",
    ///     "capacity": 120
    /// });
    ///
    /// let clean = block_on(ContentSanitizer::new().keyed_data(&data));
    /// assert_eq!(clean["name"], "Obon");
    /// assert_eq!(clean["capacity"], 120);
    /// assert!(!clean.contains_key("bad key"));
    /// ```
    pub async fn keyed_data(&self, input: &Value) -> Map<String, Value> {
        match input {
            Value::Object(map) => self.object(map).await,
            _ => {
                logging::policy_violation(
                    "keyed_data",
                    &SanitizationError::new(
                        SanitizationErrorKind::MalformedInput,
                        "linked data is not an object",
                    ),
                );
                Map::new()
            }
        }
    }

    fn object<'a>(&'a self, map: &'a Map<String, Value>) -> BoxFuture<'a, Map<String, Value>> {
        async move {
            let keys = KeySanitizer::with_policy(self.policy());
            let members = map.iter().filter_map(|(key, value)| {
                match keys.sanitize(Tainted::new(key.clone())) {
                    Ok(key) => Some(async move {
                        let value = self.member(value).await?;
                        Some((key.into_inner(), value))
                    }),
                    Err(e) => {
                        logging::policy_violation("keyed_data", &e);
                        None
                    }
                }
            });

            join_all(members).await.into_iter().flatten().collect()
        }
        .boxed()
    }

    /// Object member; `None` drops the member.
    async fn member(&self, value: &Value) -> Option<Value> {
        match value {
            Value::Null => None,
            other => Some(self.element(other).await),
        }
    }

    fn element<'a>(&'a self, value: &'a Value) -> BoxFuture<'a, Value> {
        async move {
            match value {
                Value::String(s) => Value::String(self.text(s).await),
                Value::Object(map) => Value::Object(self.object(map).await),
                Value::Array(items) => {
                    Value::Array(join_all(items.iter().map(|item| self.element(item))).await)
                }
                scalar => scalar.clone(),
            }
        }
        .boxed()
    }
}

/// Serialises sanitized linked data for a `<script type="application/ld+json">` element.
///
/// `<`, `>` and `&` are written as JSON unicode escapes so the payload can
/// never close the script element or open a comment; U+2028 and U+2029 are
/// escaped for older JavaScript parsers.
///
/// # Examples
///
/// ```
/// use content_sanitize::linked_data::to_script_json;
/// use serde_json::{json, Map, Value};
///
/// let mut data = Map::new();
/// data.insert("name".to_string(), json!("</script>"));
///
/// let script = to_script_json(&data);
/// assert_eq!(script, r#"{"name":"\u003c/script\u003e"}"#);
/// let back: Value = serde_json::from_str(&script).unwrap();
/// assert_eq!(back["name"], "</script>");
/// ```
pub fn to_script_json(data: &Map<String, Value>) -> String {
    // Serialising a map of JSON values cannot fail.
    let json = Value::Object(data.clone()).to_string();

    let mut out = String::with_capacity(json.len());
    for c in json.chars() {
        match c {
            '<' => out.push_str("\\u003c"),
            '>' => out.push_str("\\u003e"),
            '&' => out.push_str("\\u0026"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use serde_json::json;

    fn sanitize(input: Value) -> Map<String, Value> {
        block_on(ContentSanitizer::new().without_engine().keyed_data(&input))
    }

    #[test]
    fn non_object_yields_empty_map() {
        for input in [json!(null), json!([1, 2]), json!("x"), json!(true)] {
            assert!(sanitize(input).is_empty());
        }
    }

    #[test]
    fn invalid_and_handler_keys_are_dropped() {
        let output = sanitize(json!({
            "name": "ok",
            "bad key": "x",
            "onload": "alert(1)",
            "</script>": "x"
        }));
        assert_eq!(output.len(), 1);
        assert_eq!(output["name"], "ok");
    }

    #[test]
    fn null_members_dropped_but_null_elements_kept() {
        let output = sanitize(json!({ "a": null, "b": [null, 1, "x"] }));
        assert!(!output.contains_key("a"));
        assert_eq!(output["b"], json!([null, 1, "x"]));
    }

    #[test]
    fn nested_structures_are_sanitized() {
        let output = sanitize(json!({
            "@type": "Event",
            "location": {
                "@type": "Place",
                "name": "<b>Hondo</b>",
                "geo": { "latitude": 35.0, "longitude": 135.7 }
            },
            "performer": [{ "name": "<i>Rev.</i> Sato", "on click": "x" }],
            "isAccessibleForFree": true
        }));

        assert_eq!(output["location"]["name"], "Hondo");
        assert_eq!(output["location"]["geo"]["latitude"], 35.0);
        assert_eq!(output["performer"][0], json!({ "name": "Rev. Sato" }));
        assert_eq!(output["isAccessibleForFree"], true);
    }

    #[test]
    fn script_json_escapes_markup_characters() {
        let mut data = Map::new();
        data.insert("a".to_string(), json!("x & y <!-- \u{2028}"));
        let script = to_script_json(&data);
        assert!(!script.contains('<'));
        assert!(!script.contains('&'));
        assert!(script.contains("\\u2028"));
        let back: Value = serde_json::from_str(&script).unwrap();
        assert_eq!(back["a"], "x & y <!-- \u{2028}");
    }
}
