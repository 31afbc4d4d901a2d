#![deny(missing_docs)]

//! # Preprocessing
//!
//! Transformations applied to a captured request or response before its snippets are
//! rendered: making JSON readable, dropping noisy headers, hiding volatile link targets,
//! or replacing arbitrary patterns.
//!
//! ```
//! use restdocs_core::preprocess::{modify_response_to, pretty_print, remove_headers};
//!
//! let handler = modify_response_to(vec![pretty_print(), remove_headers(&["Date"])])
//!     .and_document("index")?;
//! # Ok::<(), restdocs_core::AppError>(())
//! ```

use crate::document::RestDocumentationHandler;
use crate::error::AppResult;
use crate::operation::HttpHeaders;
use regex::bytes::Regex;
use std::borrow::Cow;
use serde_json::Value;

/// A transformation of one HTTP message (headers and body).
pub trait OperationPreprocessor {
    /// Rewrites the message in place.
    ///
    /// # Arguments
    ///
    /// * `headers` - The message headers.
    /// * `body` - The raw body.
    fn preprocess(&self, headers: &mut HttpHeaders, body: &mut Vec<u8>) -> AppResult<()>;
}

/// Runs preprocessors in order and keeps `Content-Length` in sync with the body.
pub(crate) fn apply_all(
    preprocessors: &[Box<dyn OperationPreprocessor>],
    headers: &mut HttpHeaders,
    body: &mut Vec<u8>,
) -> AppResult<()> {
    if preprocessors.is_empty() {
        return Ok(());
    }
    let original_len = body.len();
    for preprocessor in preprocessors {
        preprocessor.preprocess(headers, body)?;
    }
    if body.len() != original_len && headers.contains("Content-Length") {
        headers.set("Content-Length", body.len().to_string());
    }
    Ok(())
}

fn is_json(headers: &HttpHeaders, body: &[u8]) -> bool {
    match headers.get("Content-Type") {
        Some(ct) => {
            let media = ct.split(';').next().unwrap_or_default().trim().to_ascii_lowercase();
            media == "application/json" || media.ends_with("+json")
        }
        None => serde_json::from_slice::<Value>(body).is_ok(),
    }
}

struct PrettyPrinting;

impl OperationPreprocessor for PrettyPrinting {
    fn preprocess(&self, headers: &mut HttpHeaders, body: &mut Vec<u8>) -> AppResult<()> {
        if body.is_empty() || !is_json(headers, body) {
            return Ok(());
        }
        match serde_json::from_slice::<Value>(body) {
            Ok(value) => *body = serde_json::to_vec_pretty(&value)?,
            Err(e) => log::warn!("Skipping pretty printing of malformed JSON body: {}", e),
        }
        Ok(())
    }
}

/// Pretty prints JSON bodies; other content is left untouched.
pub fn pretty_print() -> Box<dyn OperationPreprocessor> {
    Box::new(PrettyPrinting)
}

struct HeaderRemoving {
    names: Vec<String>,
}

impl OperationPreprocessor for HeaderRemoving {
    fn preprocess(&self, headers: &mut HttpHeaders, _body: &mut Vec<u8>) -> AppResult<()> {
        for name in &self.names {
            headers.remove(name);
        }
        Ok(())
    }
}

/// Removes the named headers (case-insensitive).
pub fn remove_headers(names: &[&str]) -> Box<dyn OperationPreprocessor> {
    Box::new(HeaderRemoving {
        names: names.iter().map(|n| n.to_string()).collect(),
    })
}

struct LinkMasking {
    mask: String,
}

impl LinkMasking {
    fn mask_target(&self, target: &mut Value) {
        if let Some(href) = target.get_mut("href") {
            *href = Value::String(self.mask.clone());
        }
    }
}

impl OperationPreprocessor for LinkMasking {
    fn preprocess(&self, headers: &mut HttpHeaders, body: &mut Vec<u8>) -> AppResult<()> {
        if body.is_empty() || !is_json(headers, body) {
            return Ok(());
        }
        let Ok(mut payload) = serde_json::from_slice::<Value>(body) else {
            return Ok(());
        };

        let mut changed = false;
        if let Some(map) = payload.get_mut("_links").and_then(Value::as_object_mut) {
            for value in map.values_mut() {
                match value {
                    Value::Array(items) => items.iter_mut().for_each(|t| self.mask_target(t)),
                    other => self.mask_target(other),
                }
            }
            changed = true;
        }
        if let Some(items) = payload.get_mut("links").and_then(Value::as_array_mut) {
            items.iter_mut().for_each(|t| self.mask_target(t));
            changed = true;
        }

        if changed {
            *body = serde_json::to_vec(&payload)?;
        }
        Ok(())
    }
}

/// Replaces every link `href` in HAL or Atom payloads with `...`.
pub fn mask_links() -> Box<dyn OperationPreprocessor> {
    mask_links_with("...")
}

/// Replaces every link `href` in HAL or Atom payloads with `mask`.
pub fn mask_links_with(mask: &str) -> Box<dyn OperationPreprocessor> {
    Box::new(LinkMasking {
        mask: mask.to_string(),
    })
}

struct PatternReplacing {
    pattern: Regex,
    replacement: String,
}

impl OperationPreprocessor for PatternReplacing {
    fn preprocess(&self, _headers: &mut HttpHeaders, body: &mut Vec<u8>) -> AppResult<()> {
        let replaced = match self.pattern.replace_all(body, self.replacement.as_bytes()) {
            Cow::Owned(replaced) => replaced,
            Cow::Borrowed(_) => return Ok(()),
        };
        *body = replaced;
        Ok(())
    }
}

/// Replaces every match of `pattern` in the body with `replacement` (`$1` style groups allowed).
pub fn replace_pattern(
    pattern: &str,
    replacement: &str,
) -> AppResult<Box<dyn OperationPreprocessor>> {
    Ok(Box::new(PatternReplacing {
        pattern: Regex::new(pattern)?,
        replacement: replacement.to_string(),
    }))
}

/// Collects request and response preprocessors before documenting.
#[derive(Default)]
pub struct PreprocessingBuilder {
    request: Vec<Box<dyn OperationPreprocessor>>,
    response: Vec<Box<dyn OperationPreprocessor>>,
}

/// Starts a documentation handler that rewrites the request first.
pub fn modify_request_to(
    preprocessors: Vec<Box<dyn OperationPreprocessor>>,
) -> PreprocessingBuilder {
    PreprocessingBuilder::default().and_modify_request_to(preprocessors)
}

/// Starts a documentation handler that rewrites the response first.
pub fn modify_response_to(
    preprocessors: Vec<Box<dyn OperationPreprocessor>>,
) -> PreprocessingBuilder {
    PreprocessingBuilder::default().and_modify_response_to(preprocessors)
}

impl PreprocessingBuilder {
    /// Adds request preprocessors.
    pub fn and_modify_request_to(
        mut self,
        preprocessors: Vec<Box<dyn OperationPreprocessor>>,
    ) -> Self {
        self.request.extend(preprocessors);
        self
    }

    /// Adds response preprocessors.
    pub fn and_modify_response_to(
        mut self,
        preprocessors: Vec<Box<dyn OperationPreprocessor>>,
    ) -> Self {
        self.response.extend(preprocessors);
        self
    }

    /// Finishes the chain with the identifier the snippets are filed under.
    pub fn and_document(
        self,
        identifier: impl Into<String>,
    ) -> AppResult<RestDocumentationHandler> {
        let handler = crate::document::document(identifier)?;
        Ok(handler.with_preprocessors(self.request, self.response))
    }
}

impl std::fmt::Debug for PreprocessingBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreprocessingBuilder")
            .field("request", &self.request.len())
            .field("response", &self.response.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use pretty_assertions::assert_eq;

    fn json_headers() -> HttpHeaders {
        let mut headers = HttpHeaders::new();
        headers.add("Content-Type", "application/hal+json");
        headers
    }

    #[test]
    fn test_pretty_print_json() {
        let mut headers = json_headers();
        headers.add("Content-Length", "13");
        let mut body = br#"{"a":{"b":1}}"#.to_vec();
        apply_all(&[pretty_print()], &mut headers, &mut body).unwrap();
        let text = String::from_utf8(body).unwrap();
        assert_eq!(text, "{\n  \"a\": {\n    \"b\": 1\n  }\n}");
        assert_eq!(headers.get("Content-Length"), Some(text.len().to_string().as_str()));
    }

    #[test]
    fn test_pretty_print_ignores_other_content() {
        let mut headers = HttpHeaders::new();
        headers.add("Content-Type", "text/plain");
        let mut body = br#"{"a":1}"#.to_vec();
        pretty_print().preprocess(&mut headers, &mut body).unwrap();
        assert_eq!(body, br#"{"a":1}"#.to_vec());
    }

    #[test]
    fn test_remove_headers() {
        let mut headers = json_headers();
        headers.add("Date", "today");
        headers.add("X-Request-Id", "42");
        remove_headers(&["date", "X-REQUEST-ID"])
            .preprocess(&mut headers, &mut Vec::new())
            .unwrap();
        assert_eq!(headers.names().collect::<Vec<_>>(), vec!["Content-Type"]);
    }

    #[test]
    fn test_mask_links() {
        let mut headers = json_headers();
        let mut body = br#"{"_links":{"self":{"href":"http://localhost:8080/"},"n":[{"href":"/1"}]},"links":[{"rel":"a","href":"http://a"}]}"#.to_vec();
        mask_links().preprocess(&mut headers, &mut body).unwrap();
        let value: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["_links"]["self"]["href"], "...");
        assert_eq!(value["_links"]["n"][0]["href"], "...");
        assert_eq!(value["links"][0]["href"], "...");
        assert_eq!(value["links"][0]["rel"], "a");
    }

    #[test]
    fn test_replace_pattern() {
        let mut body = b"id=7f3a-11 created".to_vec();
        replace_pattern(r"id=([0-9a-f-]+)", "id=<uuid>")
            .unwrap()
            .preprocess(&mut HttpHeaders::new(), &mut body)
            .unwrap();
        assert_eq!(body, b"id=<uuid> created".to_vec());
    }

    #[test]
    fn test_replace_pattern_keeps_binary_body() {
        let png = vec![0x89, b'P', b'N', b'G', 0xFF, 0xFE, 0x00, 0x01];
        let mut headers = HttpHeaders::new();
        headers.add("Content-Length", "8");
        let mut body = png.clone();
        apply_all(
            &[replace_pattern("no-such-text", "x").unwrap()],
            &mut headers,
            &mut body,
        )
        .unwrap();
        assert_eq!(body, png);
        assert_eq!(headers.get("Content-Length"), Some("8"));
    }

    #[test]
    fn test_replace_pattern_in_non_utf8_body() {
        let mut body = vec![0xFF, b'i', b'd', b'=', b'4', b'2', 0xFE];
        replace_pattern(r"id=\d+", "id=<n>")
            .unwrap()
            .preprocess(&mut HttpHeaders::new(), &mut body)
            .unwrap();
        assert_eq!(body, [&[0xFF][..], &b"id=<n>"[..], &[0xFE][..]].concat());
    }

    #[test]
    fn test_mask_links_with_custom_mask() {
        let mut headers = json_headers();
        let mut body = br#"{"_links":{"self":{"href":"http://localhost:8080/notes/7"}}}"#.to_vec();
        mask_links_with("<masked>")
            .preprocess(&mut headers, &mut body)
            .unwrap();
        assert_eq!(
            String::from_utf8(body).unwrap(),
            r#"{"_links":{"self":{"href":"<masked>"}}}"#
        );
    }

    #[test]
    fn test_invalid_pattern() {
        let err = replace_pattern("(", "x").err().unwrap();
        assert!(matches!(err, AppError::Pattern(_)));
    }
}
