//! Table documenting the hypermedia links of a response.
//!
//! Links are read from HAL (`{"_links": {"self": {"href": ".."}}}`) or Atom style
//! (`{"links": [{"rel": "self", "href": ".."}]}`) JSON payloads.

use crate::config::RestDocsConfig;
use crate::descriptor::LinkDescriptor;
use crate::error::{AppError, AppResult};
use crate::operation::Operation;
use crate::snippet::{descriptor_rows, is_blank, verify_documented, Snippet};
use indexmap::IndexMap;
use serde_json::Value;

/// Link relations mapped to their hrefs, in payload order.
pub type Links = IndexMap<String, Vec<String>>;

/// Extracts HAL `_links`.
pub fn extract_hal_links(payload: &Value) -> Links {
    let mut links = Links::new();
    if let Some(map) = payload.get("_links").and_then(Value::as_object) {
        for (rel, value) in map {
            let targets: Vec<&Value> = match value {
                Value::Array(items) => items.iter().collect(),
                other => vec![other],
            };
            let hrefs = targets
                .into_iter()
                .filter_map(|t| t.get("href").and_then(Value::as_str))
                .map(str::to_string)
                .collect();
            links.insert(rel.clone(), hrefs);
        }
    }
    links
}

/// Extracts Atom style `links`.
pub fn extract_atom_links(payload: &Value) -> Links {
    let mut links = Links::new();
    if let Some(items) = payload.get("links").and_then(Value::as_array) {
        for item in items {
            if let Some(rel) = item.get("rel").and_then(Value::as_str) {
                let entry = links.entry(rel.to_string()).or_default();
                if let Some(href) = item.get("href").and_then(Value::as_str) {
                    entry.push(href.to_string());
                }
            }
        }
    }
    links
}

/// Extracts links in whichever format the payload uses.
pub fn extract_links(payload: &Value) -> Links {
    if payload.get("_links").is_some() {
        extract_hal_links(payload)
    } else {
        extract_atom_links(payload)
    }
}

/// The `links` snippet.
#[derive(Debug, Clone)]
pub struct LinksSnippet {
    descriptors: Vec<LinkDescriptor>,
}

/// Documents the links found in the response payload.
pub fn links(descriptors: Vec<LinkDescriptor>) -> LinksSnippet {
    LinksSnippet { descriptors }
}

impl Snippet for LinksSnippet {
    fn name(&self) -> &str {
        "links"
    }

    fn render(&self, operation: &Operation, config: &RestDocsConfig) -> AppResult<String> {
        let body = &operation.response.body;
        let payload: Value = if is_blank(body) {
            Value::Null
        } else {
            serde_json::from_slice(body).map_err(|e| {
                AppError::Snippet(format!(
                    "Cannot extract links from a response that is not JSON: {}",
                    e
                ))
            })?
        };

        let actual: Vec<String> = extract_links(&payload).into_keys().collect();
        verify_documented("Links", "response", &self.descriptors, &actual, false, false)?;

        let rows = descriptor_rows(&self.descriptors, config)?;
        Ok(config
            .template_format
            .format()
            .table(None, &["Relation", "Description"], &rows))
    }
}
