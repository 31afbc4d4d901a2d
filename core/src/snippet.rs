#![deny(missing_docs)]

//! # Snippets
//!
//! A snippet renders one aspect of a documented [`Operation`] (the curl command, the raw
//! HTTP response, a table of query parameters, ...) into a small markup fragment.
//!
//! Descriptor based snippets also verify the documentation against the captured exchange:
//! anything present but undocumented, or documented but absent, fails rendering.

use crate::config::RestDocsConfig;
use crate::descriptor::{require_description, Described};
use crate::error::{AppError, AppResult};
use crate::operation::Operation;
use crate::templates::TemplateFormat;
use std::fs;
use std::path::{Path, PathBuf};

/// Curl command snippet.
pub mod curl;

/// Request and response field tables.
pub mod fields;

/// Request and response header tables.
pub mod headers;

/// Raw HTTP request/response listings.
pub mod http;

/// Hypermedia link table.
pub mod links;

/// Query and path parameter tables.
pub mod parameters;

pub use curl::{curl_request, CurlRequestSnippet};
pub use fields::{request_fields, response_fields, FieldsSnippet};
pub use headers::{request_headers, response_headers, HeadersSnippet};
pub use http::{http_request, http_response, HttpRequestSnippet, HttpResponseSnippet};
pub use links::{links, LinksSnippet};
pub use parameters::{
    path_parameters, request_parameters, PathParametersSnippet, RequestParametersSnippet,
};

/// A renderable piece of documentation.
pub trait Snippet {
    /// File stem of the generated snippet (e.g. `http-request`).
    fn name(&self) -> &str;

    /// Renders the snippet for an operation.
    ///
    /// # Arguments
    ///
    /// * `operation` - The (already preprocessed) exchange.
    /// * `config` - Global settings; the template format comes from here.
    fn render(&self, operation: &Operation, config: &RestDocsConfig) -> AppResult<String>;
}

/// Resolves a default snippet by its name.
pub fn default_snippet(name: &str) -> AppResult<Box<dyn Snippet>> {
    match name {
        "curl-request" => Ok(Box::new(curl_request())),
        "http-request" => Ok(Box::new(http_request())),
        "http-response" => Ok(Box::new(http_response())),
        other => Err(AppError::Config(format!(
            "Unknown default snippet '{}' (expected curl-request, http-request or http-response)",
            other
        ))),
    }
}

/// Writes rendered snippets below the output directory.
///
/// Layout: `<output_dir>/<operation name>/<snippet name>.<extension>`.
pub struct SnippetWriter<'a> {
    output_dir: &'a Path,
    format: &'a dyn TemplateFormat,
}

impl<'a> SnippetWriter<'a> {
    /// Creates a writer for the configured output directory and format.
    pub fn new(config: &'a RestDocsConfig) -> Self {
        Self {
            output_dir: &config.output_dir,
            format: config.template_format.format(),
        }
    }

    /// The file a snippet of an operation is written to.
    pub fn path_for(&self, operation_name: &str, snippet_name: &str) -> PathBuf {
        self.output_dir
            .join(operation_name)
            .join(format!("{}.{}", snippet_name, self.format.file_extension()))
    }

    /// Writes one rendered snippet, creating directories as needed.
    pub fn write(
        &self,
        operation_name: &str,
        snippet_name: &str,
        content: &str,
    ) -> AppResult<PathBuf> {
        let path = self.path_for(operation_name, snippet_name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                AppError::General(format!("Failed to create snippet dir {:?}: {}", parent, e))
            })?;
        }
        fs::write(&path, content)
            .map_err(|e| AppError::General(format!("Failed to write snippet {:?}: {}", path, e)))?;
        log::debug!("Wrote snippet {:?}", path);
        Ok(path)
    }
}

/// Compares documented identities with the ones found in the operation.
///
/// # Arguments
///
/// * `kind` - Plural noun used in the message (e.g. `Parameters`).
/// * `location` - Where the elements were looked for (`request`, `response`).
/// * `descriptors` - What the test documented.
/// * `actual` - What the exchange contained.
/// * `allow_undocumented` - Skip the "present but undocumented" check (used for headers).
/// * `case_insensitive` - Compare identities ignoring ASCII case.
pub(crate) fn verify_documented<D: Described>(
    kind: &str,
    location: &str,
    descriptors: &[D],
    actual: &[String],
    allow_undocumented: bool,
    case_insensitive: bool,
) -> AppResult<()> {
    let same = |a: &str, b: &str| {
        if case_insensitive {
            a.eq_ignore_ascii_case(b)
        } else {
            a == b
        }
    };

    let undocumented: Vec<&str> = if allow_undocumented {
        Vec::new()
    } else {
        actual
            .iter()
            .filter(|a| !descriptors.iter().any(|d| same(d.key(), a.as_str())))
            .map(String::as_str)
            .collect()
    };

    let missing: Vec<&str> = descriptors
        .iter()
        .filter(|d| !d.is_optional())
        .filter(|d| !actual.iter().any(|a| same(d.key(), a.as_str())))
        .map(|d| d.key())
        .collect();

    let mut problems = Vec::new();
    if !undocumented.is_empty() {
        problems.push(format!(
            "{} with the following names were not documented: {:?}",
            kind, undocumented
        ));
    }
    if !missing.is_empty() {
        problems.push(format!(
            "{} with the following names were not found in the {}: {:?}",
            kind, location, missing
        ));
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(AppError::Snippet(problems.join(". ")))
    }
}

/// Whether a body carries no content (empty or only whitespace).
pub(crate) fn is_blank(body: &[u8]) -> bool {
    body.iter().all(u8::is_ascii_whitespace)
}

/// Builds `[name, description]` rows in declaration order.
pub(crate) fn descriptor_rows<D: Described>(
    descriptors: &[D],
    config: &RestDocsConfig,
) -> AppResult<Vec<Vec<String>>> {
    descriptors
        .iter()
        .map(|d| {
            let description = require_description(d, config.require_descriptions)?;
            Ok(vec![d.key().to_string(), description])
        })
        .collect()
}
