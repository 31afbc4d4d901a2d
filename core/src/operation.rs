#![deny(missing_docs)]

//! # Operation Model
//!
//! Framework-neutral representation of one HTTP exchange captured during a test.
//!
//! Snippets and preprocessors only ever see these types, so any web framework can feed
//! the documentation pipeline by converting its test request/response into an `Operation`.

use crate::config::UriConfig;
use crate::error::{AppError, AppResult};
use indexmap::IndexMap;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC};
use std::borrow::Cow;
use url::Url;

/// Characters escaped when expanding URI template variables (RFC 3986 unreserved are kept).
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Ordered multi-map of HTTP headers.
///
/// Lookups are case-insensitive; the name is stored as first inserted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpHeaders {
    entries: IndexMap<String, Vec<String>>,
}

impl HttpHeaders {
    /// Creates an empty header map.
    pub fn new() -> Self {
        Self::default()
    }

    fn key_of(&self, name: &str) -> Option<String> {
        self.entries
            .keys()
            .find(|k| k.eq_ignore_ascii_case(name))
            .cloned()
    }

    /// Appends a value, keeping any existing values for the same header.
    pub fn add(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let key = self.key_of(&name).unwrap_or(name);
        self.entries.entry(key).or_default().push(value.into());
    }

    /// Replaces all values of a header with a single value.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        match self.key_of(&name) {
            Some(key) => {
                self.entries.insert(key, vec![value.into()]);
            }
            None => {
                self.entries.insert(name, vec![value.into()]);
            }
        }
    }

    /// Returns the first value of a header.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.get_all(name).first().map(String::as_str)
    }

    /// Returns every value of a header.
    pub fn get_all(&self, name: &str) -> &[String] {
        self.entries
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_slice())
            .unwrap_or(&[])
    }

    /// Whether the header is present.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.keys().any(|k| k.eq_ignore_ascii_case(name))
    }

    /// Removes a header, returning whether it was present.
    pub fn remove(&mut self, name: &str) -> bool {
        match self.key_of(name) {
            Some(key) => self.entries.shift_remove(&key).is_some(),
            None => false,
        }
    }

    /// Header names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Every `(name, value)` pair, one per value.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .flat_map(|(k, vs)| vs.iter().map(move |v| (k.as_str(), v.as_str())))
    }

    /// Whether no header is present.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Ordered request parameters (query string and form body).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Parameters {
    entries: IndexMap<String, Vec<String>>,
}

impl Parameters {
    /// Creates an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses an `application/x-www-form-urlencoded` string.
    pub fn parse(encoded: &str) -> Self {
        let mut params = Self::new();
        for (name, value) in url::form_urlencoded::parse(encoded.as_bytes()) {
            params.add(name, value);
        }
        params
    }

    /// Appends a value for a parameter.
    pub fn add(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries
            .entry(name.into())
            .or_default()
            .push(value.into());
    }

    /// Merges another parameter set into this one.
    pub fn extend(&mut self, other: &Parameters) {
        for (name, values) in &other.entries {
            for value in values {
                self.add(name.clone(), value.clone());
            }
        }
    }

    /// Returns every value of a parameter.
    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.entries.get(name).map(Vec::as_slice)
    }

    /// Parameter names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Whether the parameter set is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Encodes the parameters as a query string (without the leading `?`).
    pub fn to_query_string(&self) -> String {
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        for (name, values) in &self.entries {
            for value in values {
                serializer.append_pair(name, value);
            }
        }
        serializer.finish()
    }
}

/// The request half of a captured exchange.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationRequest {
    /// Upper-case HTTP method.
    pub method: String,
    /// Absolute request URI.
    pub uri: Url,
    /// Request headers.
    pub headers: HttpHeaders,
    /// Raw request body.
    pub body: Vec<u8>,
    /// Query parameters, plus form parameters for urlencoded bodies.
    pub parameters: Parameters,
    /// The URI template the request was built from (e.g. `/notes/{id}`).
    pub uri_template: Option<String>,
}

impl OperationRequest {
    /// Creates a request, deriving its parameters from the URI and body.
    pub fn new(method: &str, uri: Url, headers: HttpHeaders, body: Vec<u8>) -> Self {
        let mut parameters = uri.query().map(Parameters::parse).unwrap_or_default();
        if is_form_content(headers.get("Content-Type")) {
            parameters.extend(&Parameters::parse(&String::from_utf8_lossy(&body)));
        }
        Self {
            method: method.to_ascii_uppercase(),
            uri,
            headers,
            body,
            parameters,
            uri_template: None,
        }
    }

    /// The body as text, replacing invalid UTF-8.
    pub fn body_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    /// Path plus optional query, as it appears on the request line.
    pub fn path_and_query(&self) -> String {
        match self.uri.query() {
            Some(q) if !q.is_empty() => format!("{}?{}", self.uri.path(), q),
            _ => self.uri.path().to_string(),
        }
    }

    /// `host[:port]`, omitting the scheme's default port.
    pub fn host_header(&self) -> String {
        let host = self.uri.host_str().unwrap_or("localhost");
        match self.uri.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        }
    }
}

/// The response half of a captured exchange.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers.
    pub headers: HttpHeaders,
    /// Raw response body.
    pub body: Vec<u8>,
}

impl OperationResponse {
    /// Creates a response.
    pub fn new(status: u16, headers: HttpHeaders, body: Vec<u8>) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// The body as text, replacing invalid UTF-8.
    pub fn body_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}

/// One documented exchange.
#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    /// The documentation identifier the snippets are filed under.
    pub name: String,
    /// The captured request.
    pub request: OperationRequest,
    /// The captured response.
    pub response: OperationResponse,
}

impl Operation {
    /// Creates an operation.
    pub fn new(
        name: impl Into<String>,
        request: OperationRequest,
        response: OperationResponse,
    ) -> Self {
        Self {
            name: name.into(),
            request,
            response,
        }
    }
}

fn is_form_content(content_type: Option<&str>) -> bool {
    content_type
        .map(|ct| {
            ct.split(';')
                .next()
                .unwrap_or_default()
                .trim()
                .eq_ignore_ascii_case("application/x-www-form-urlencoded")
        })
        .unwrap_or(false)
}

/// Fluent builder for a test request.
///
/// Relative URIs are resolved against the configured [`UriConfig`], and URIs given as
/// templates (`/notes/{id}`) keep the template for the path-parameters snippet.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    method: String,
    uri: String,
    variables: Vec<String>,
    headers: HttpHeaders,
    body: Vec<u8>,
    params: Vec<(String, String)>,
}

/// Starts a request with an arbitrary method.
pub fn request(method: &str, uri: impl Into<String>) -> RequestBuilder {
    RequestBuilder {
        method: method.to_ascii_uppercase(),
        uri: uri.into(),
        variables: Vec::new(),
        headers: HttpHeaders::new(),
        body: Vec::new(),
        params: Vec::new(),
    }
}

/// Starts a `GET` request.
pub fn get(uri: impl Into<String>) -> RequestBuilder {
    request("GET", uri)
}

/// Starts a `POST` request.
pub fn post(uri: impl Into<String>) -> RequestBuilder {
    request("POST", uri)
}

/// Starts a `PUT` request.
pub fn put(uri: impl Into<String>) -> RequestBuilder {
    request("PUT", uri)
}

/// Starts a `PATCH` request.
pub fn patch(uri: impl Into<String>) -> RequestBuilder {
    request("PATCH", uri)
}

/// Starts a `DELETE` request.
pub fn delete(uri: impl Into<String>) -> RequestBuilder {
    request("DELETE", uri)
}

impl RequestBuilder {
    /// Supplies the values for `{..}` placeholders in the URI, in order.
    pub fn path_variables<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.variables = values.into_iter().map(Into::into).collect();
        self
    }

    /// Appends a header.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.add(name, value);
        self
    }

    /// Sets the `Content-Type` header.
    pub fn content_type(mut self, value: impl Into<String>) -> Self {
        self.headers.set("Content-Type", value);
        self
    }

    /// Sets the raw body.
    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// Serializes a JSON body and sets `Content-Type: application/json`.
    pub fn json<T: serde::Serialize>(self, value: &T) -> AppResult<Self> {
        let body = serde_json::to_vec(value)?;
        Ok(self.content_type("application/json").body(body))
    }

    /// Appends a query parameter.
    pub fn param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((name.into(), value.into()));
        self
    }

    /// Resolves the URI and produces the request.
    pub fn build(&self, defaults: &UriConfig) -> AppResult<OperationRequest> {
        let template = has_placeholders(&self.uri).then(|| self.uri.clone());
        let expanded = expand_template(&self.uri, &self.variables)?;
        let mut uri = match Url::parse(&expanded) {
            Ok(url) => url,
            Err(url::ParseError::RelativeUrlWithoutBase) => defaults
                .base_url()?
                .join(&expanded)
                .map_err(|e| AppError::General(format!("Invalid URI '{}': {}", expanded, e)))?,
            Err(e) => {
                return Err(AppError::General(format!(
                    "Invalid URI '{}': {}",
                    expanded, e
                )))
            }
        };
        if !self.params.is_empty() {
            let mut pairs = uri.query_pairs_mut();
            for (name, value) in &self.params {
                pairs.append_pair(name, value);
            }
        }
        let mut request =
            OperationRequest::new(&self.method, uri, self.headers.clone(), self.body.clone());
        request.uri_template = template.map(|t| template_path(&t));
        Ok(request)
    }
}

fn has_placeholders(uri: &str) -> bool {
    uri.contains('{') && uri.contains('}')
}

/// Strips scheme, authority and query from a template, keeping the path.
fn template_path(template: &str) -> String {
    let without_query = template.split('?').next().unwrap_or(template);
    match without_query.find("://") {
        Some(idx) => {
            let rest = &without_query[idx + 3..];
            rest.find('/')
                .map(|p| rest[p..].to_string())
                .unwrap_or_else(|| "/".to_string())
        }
        None => without_query.to_string(),
    }
}

fn expand_template(template: &str, values: &[String]) -> AppResult<String> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    let mut values = values.iter();
    while let Some(start) = rest.find('{') {
        let end = rest[start..].find('}').map(|e| start + e).ok_or_else(|| {
            AppError::General(format!("Unclosed '{{' in URI template '{}'", template))
        })?;
        let name = &rest[start + 1..end];
        let value = values.next().ok_or_else(|| {
            AppError::General(format!(
                "No value supplied for URI variable '{}' in '{}'",
                name, template
            ))
        })?;
        out.push_str(&rest[..start]);
        out.push_str(&percent_encoding::utf8_percent_encode(value, PATH_SEGMENT).to_string());
        rest = &rest[end + 1..];
    }
    out.push_str(rest);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headers_are_case_insensitive() {
        let mut headers = HttpHeaders::new();
        headers.add("Content-Type", "application/json");
        headers.add("accept", "text/plain");
        headers.add("Accept", "application/json");

        assert_eq!(headers.get("content-type"), Some("application/json"));
        assert_eq!(headers.get_all("ACCEPT").len(), 2);
        assert_eq!(headers.names().collect::<Vec<_>>(), vec!["Content-Type", "accept"]);

        assert!(headers.remove("CONTENT-TYPE"));
        assert!(!headers.contains("Content-Type"));
        assert!(!headers.remove("Content-Type"));
    }

    #[test]
    fn test_set_replaces_values() {
        let mut headers = HttpHeaders::new();
        headers.add("X-A", "1");
        headers.add("X-A", "2");
        headers.set("x-a", "3");
        assert_eq!(headers.iter().collect::<Vec<_>>(), vec![("X-A", "3")]);
    }

    #[test]
    fn test_parameters_from_query_and_form_body() {
        let mut headers = HttpHeaders::new();
        headers.add("Content-Type", "application/x-www-form-urlencoded; charset=UTF-8");
        let uri = Url::parse("http://localhost:8080/notes?page=2").unwrap();
        let request = OperationRequest::new("post", uri, headers, b"title=Hello+World".to_vec());

        assert_eq!(request.method, "POST");
        assert_eq!(
            request.parameters.names().collect::<Vec<_>>(),
            vec!["page", "title"]
        );
        assert_eq!(
            request.parameters.get("title"),
            Some(&["Hello World".to_string()][..])
        );
    }

    #[test]
    fn test_builder_resolves_relative_uri() {
        let request = get("/notes")
            .param("page", "2")
            .header("Accept", "application/json")
            .build(&UriConfig::default())
            .unwrap();

        assert_eq!(request.uri.as_str(), "http://localhost:8080/notes?page=2");
        assert_eq!(request.path_and_query(), "/notes?page=2");
        assert_eq!(request.host_header(), "localhost:8080");
        assert_eq!(request.uri_template, None);
    }

    #[test]
    fn test_builder_expands_template() {
        let request = get("/notes/{id}/tags/{tag}")
            .path_variables(["7", "a b"])
            .build(&UriConfig::default())
            .unwrap();

        assert_eq!(request.uri.path(), "/notes/7/tags/a%20b");
        assert_eq!(
            request.uri_template.as_deref(),
            Some("/notes/{id}/tags/{tag}")
        );
    }

    #[test]
    fn test_builder_missing_variable_fails() {
        let result = get("/notes/{id}").build(&UriConfig::default());
        assert!(matches!(result, Err(AppError::General(_))));
    }

    #[test]
    fn test_host_header_omits_default_port() {
        let uri = Url::parse("https://api.example.com/").unwrap();
        let request = OperationRequest::new("GET", uri, HttpHeaders::new(), Vec::new());
        assert_eq!(request.host_header(), "api.example.com");
    }

    #[test]
    fn test_template_path_strips_authority() {
        assert_eq!(
            template_path("http://localhost:8080/notes/{id}?x=1"),
            "/notes/{id}"
        );
        assert_eq!(template_path("/notes/{id}"), "/notes/{id}");
    }
}
