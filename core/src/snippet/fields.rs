//! Tables documenting the fields of JSON request and response payloads.
//!
//! Field paths address values inside the payload: `author.name` is the `name` key of the
//! `author` object and `notes[].title` is the `title` of every element of `notes`. A
//! leading `[]` addresses the elements of a top-level array.

use crate::config::RestDocsConfig;
use crate::descriptor::{require_description, Described, FieldDescriptor, JsonFieldType};
use crate::error::{AppError, AppResult};
use crate::operation::Operation;
use crate::snippet::{is_blank, Snippet};
use indexmap::IndexSet;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Key(String),
    Elements,
}

fn parse_path(path: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    for part in path.split('.') {
        let mut key = part;
        let mut arrays = 0;
        while let Some(stripped) = key.strip_suffix("[]") {
            key = stripped;
            arrays += 1;
        }
        if !key.is_empty() {
            segments.push(Segment::Key(key.to_string()));
        }
        for _ in 0..arrays {
            segments.push(Segment::Elements);
        }
    }
    segments
}

/// Every value addressed by `path`.
pub(crate) fn find_values<'a>(root: &'a Value, path: &str) -> Vec<&'a Value> {
    let mut current = vec![root];
    for segment in parse_path(path) {
        current = current
            .into_iter()
            .flat_map(|value| match (&segment, value) {
                (Segment::Key(key), Value::Object(map)) => map.get(key).into_iter().collect(),
                (Segment::Elements, Value::Array(items)) => items.iter().collect(),
                _ => Vec::new(),
            })
            .collect();
    }
    current
}

/// The type shared by every value at `path`, `Varies` when they differ.
pub(crate) fn resolve_type(root: &Value, path: &str) -> Option<JsonFieldType> {
    let mut types = find_values(root, path).into_iter().map(JsonFieldType::of);
    let first = types.next()?;
    if types.all(|t| t == first) {
        Some(first)
    } else {
        Some(JsonFieldType::Varies)
    }
}

/// Paths of every leaf value: scalars, empty objects and arrays without nested structure.
pub(crate) fn leaf_paths(root: &Value) -> Vec<String> {
    let mut leaves = IndexSet::new();
    collect_leaves(root, "", &mut leaves);
    leaves.into_iter().collect()
}

fn collect_leaves(value: &Value, prefix: &str, leaves: &mut IndexSet<String>) {
    match value {
        Value::Object(map) if !map.is_empty() => {
            for (key, child) in map {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{}.{}", prefix, key)
                };
                collect_leaves(child, &path, leaves);
            }
        }
        Value::Array(items) if items.iter().any(|i| i.is_object() || i.is_array()) => {
            let path = format!("{}[]", prefix);
            for item in items {
                collect_leaves(item, &path, leaves);
            }
        }
        _ if !prefix.is_empty() => {
            leaves.insert(prefix.to_string());
        }
        _ => {}
    }
}

fn covers(documented: &str, leaf: &str) -> bool {
    let documented = documented.trim_end_matches("[]");
    leaf == documented
        || leaf
            .strip_prefix(documented)
            .map(|rest| rest.starts_with('.') || rest.starts_with("[]"))
            .unwrap_or(false)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Request,
    Response,
}

/// The `request-fields` and `response-fields` snippets.
#[derive(Debug, Clone)]
pub struct FieldsSnippet {
    side: Side,
    descriptors: Vec<FieldDescriptor>,
}

/// Documents the fields of the request payload.
pub fn request_fields(descriptors: Vec<FieldDescriptor>) -> FieldsSnippet {
    FieldsSnippet {
        side: Side::Request,
        descriptors,
    }
}

/// Documents the fields of the response payload.
pub fn response_fields(descriptors: Vec<FieldDescriptor>) -> FieldsSnippet {
    FieldsSnippet {
        side: Side::Response,
        descriptors,
    }
}

impl FieldsSnippet {
    fn location(&self) -> &'static str {
        match self.side {
            Side::Request => "request",
            Side::Response => "response",
        }
    }

    fn payload(&self, operation: &Operation) -> AppResult<Value> {
        let body = match self.side {
            Side::Request => &operation.request.body,
            Side::Response => &operation.response.body,
        };
        if is_blank(body) {
            return Ok(Value::Null);
        }
        serde_json::from_slice(body).map_err(|e| {
            AppError::Snippet(format!(
                "Cannot document fields of the {} payload as it is not JSON: {}",
                self.location(),
                e
            ))
        })
    }

    fn verify(&self, payload: &Value) -> AppResult<()> {
        let undocumented: Vec<String> = leaf_paths(payload)
            .into_iter()
            .filter(|leaf| !self.descriptors.iter().any(|d| covers(d.path(), leaf)))
            .collect();

        let missing: Vec<&str> = self
            .descriptors
            .iter()
            .filter(|d| !d.is_optional())
            .filter(|d| find_values(payload, d.path()).is_empty())
            .map(|d| d.path())
            .collect();

        let mut problems = Vec::new();
        if !undocumented.is_empty() {
            problems.push(format!(
                "Fields with the following paths were not documented: {:?}",
                undocumented
            ));
        }
        if !missing.is_empty() {
            problems.push(format!(
                "Fields with the following paths were not found in the {} payload: {:?}",
                self.location(),
                missing
            ));
        }
        if problems.is_empty() {
            Ok(())
        } else {
            Err(AppError::Snippet(problems.join(". ")))
        }
    }

    fn field_type(
        &self,
        descriptor: &FieldDescriptor,
        payload: &Value,
    ) -> AppResult<JsonFieldType> {
        let actual = resolve_type(payload, descriptor.path());
        match (descriptor.declared_type(), actual) {
            (Some(declared), Some(actual))
                if declared != actual
                    && declared != JsonFieldType::Varies
                    && actual != JsonFieldType::Null =>
            {
                Err(AppError::Snippet(format!(
                    "The documented type of the field '{}' is {} but the actual type is {}",
                    descriptor.path(),
                    declared,
                    actual
                )))
            }
            (Some(declared), _) => Ok(declared),
            (None, Some(actual)) => Ok(actual),
            (None, None) => Err(AppError::Snippet(format!(
                "Cannot determine the type of the field '{}' as it is not present in the payload. \
                 Declare it with field_type(..)",
                descriptor.path()
            ))),
        }
    }
}

impl Snippet for FieldsSnippet {
    fn name(&self) -> &str {
        match self.side {
            Side::Request => "request-fields",
            Side::Response => "response-fields",
        }
    }

    fn render(&self, operation: &Operation, config: &RestDocsConfig) -> AppResult<String> {
        let payload = self.payload(operation)?;
        self.verify(&payload)?;

        let mut rows = Vec::new();
        for descriptor in self.descriptors.iter().filter(|d| !d.is_ignored()) {
            let field_type = self.field_type(descriptor, &payload)?;
            let description = require_description(descriptor, config.require_descriptions)?;
            rows.push(vec![
                descriptor.key().to_string(),
                format!("`{}`", field_type),
                description,
            ]);
        }

        Ok(config
            .template_format
            .format()
            .table(None, &["Path", "Type", "Description"], &rows))
    }
}
