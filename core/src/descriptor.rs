#![deny(missing_docs)]

//! # Descriptors
//!
//! Value objects that pair the identity of a documented request/response element with a
//! human-written description.
//!
//! Every descriptor is created through a named factory that rejects empty identities,
//! then refined by consuming, chainable setters:
//!
//! ```
//! use restdocs_core::descriptor::parameter_with_name;
//!
//! let page = parameter_with_name("page")?.description("The page to retrieve");
//! # Ok::<(), restdocs_core::AppError>(())
//! ```
//!
//! Reading the identity and description back is reserved to the snippets that render them.

use crate::error::{AppError, AppResult};
use serde::Serialize;
use std::fmt;

fn validate_identity(kind: &str, value: String) -> AppResult<String> {
    if value.trim().is_empty() {
        return Err(AppError::InvalidDescriptor(format!(
            "{} must not be empty",
            kind
        )));
    }
    Ok(value)
}

/// Read access used by descriptor tables.
pub(crate) trait Described {
    /// The identity shown in the first column.
    fn key(&self) -> &str;
    /// The description, if one was given.
    fn described(&self) -> Option<&str>;
    /// Whether the element may be absent from the operation.
    fn is_optional(&self) -> bool;
}

/// Checks the description policy for one descriptor.
pub(crate) fn require_description<D: Described>(
    descriptor: &D,
    required: bool,
) -> AppResult<String> {
    match descriptor.described() {
        Some(text) => Ok(text.to_string()),
        None if required => Err(AppError::MissingDescription(descriptor.key().to_string())),
        None => Ok(String::new()),
    }
}

/// A descriptor of a request parameter (query string, form body, or path variable).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterDescriptor {
    name: String,
    description: Option<String>,
    optional: bool,
}

/// Creates a descriptor for the parameter with the given name.
///
/// Fails with [`AppError::InvalidDescriptor`] when `name` is empty.
pub fn parameter_with_name(name: impl Into<String>) -> AppResult<ParameterDescriptor> {
    Ok(ParameterDescriptor {
        name: validate_identity("Parameter name", name.into())?,
        description: None,
        optional: false,
    })
}

impl ParameterDescriptor {
    /// Specifies the description of the parameter.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Marks the parameter as optional.
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn description_text(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

impl Described for ParameterDescriptor {
    fn key(&self) -> &str {
        self.name()
    }

    fn described(&self) -> Option<&str> {
        self.description_text()
    }

    fn is_optional(&self) -> bool {
        self.optional
    }
}

/// A descriptor of an HTTP header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderDescriptor {
    name: String,
    description: Option<String>,
    optional: bool,
}

/// Creates a descriptor for the header with the given name.
pub fn header_with_name(name: impl Into<String>) -> AppResult<HeaderDescriptor> {
    Ok(HeaderDescriptor {
        name: validate_identity("Header name", name.into())?,
        description: None,
        optional: false,
    })
}

impl HeaderDescriptor {
    /// Specifies the description of the header.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Marks the header as optional.
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }
}

impl Described for HeaderDescriptor {
    fn key(&self) -> &str {
        &self.name
    }

    fn described(&self) -> Option<&str> {
        self.description.as_deref()
    }

    fn is_optional(&self) -> bool {
        self.optional
    }
}

/// JSON value kinds reported in field tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum JsonFieldType {
    /// A JSON object.
    Object,
    /// A JSON array.
    Array,
    /// A JSON string.
    String,
    /// A JSON number.
    Number,
    /// `true` or `false`.
    Boolean,
    /// `null`.
    Null,
    /// Different kinds at the same path (e.g. across array elements).
    Varies,
}

impl JsonFieldType {
    /// The kind of a single JSON value.
    pub fn of(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Object(_) => JsonFieldType::Object,
            serde_json::Value::Array(_) => JsonFieldType::Array,
            serde_json::Value::String(_) => JsonFieldType::String,
            serde_json::Value::Number(_) => JsonFieldType::Number,
            serde_json::Value::Bool(_) => JsonFieldType::Boolean,
            serde_json::Value::Null => JsonFieldType::Null,
        }
    }
}

impl fmt::Display for JsonFieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            JsonFieldType::Object => "Object",
            JsonFieldType::Array => "Array",
            JsonFieldType::String => "String",
            JsonFieldType::Number => "Number",
            JsonFieldType::Boolean => "Boolean",
            JsonFieldType::Null => "Null",
            JsonFieldType::Varies => "Varies",
        };
        write!(f, "{}", label)
    }
}

/// A descriptor of a field in a JSON payload.
///
/// Paths use `.` between keys and `[]` for "every element of this array",
/// e.g. `notes[].title`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    path: String,
    description: Option<String>,
    field_type: Option<JsonFieldType>,
    optional: bool,
    ignored: bool,
}

/// Creates a descriptor for the field at the given path.
pub fn field_with_path(path: impl Into<String>) -> AppResult<FieldDescriptor> {
    Ok(FieldDescriptor {
        path: validate_identity("Field path", path.into())?,
        description: None,
        field_type: None,
        optional: false,
        ignored: false,
    })
}

impl FieldDescriptor {
    /// Specifies the description of the field.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Declares the field's type instead of resolving it from the payload.
    pub fn field_type(mut self, field_type: JsonFieldType) -> Self {
        self.field_type = Some(field_type);
        self
    }

    /// Marks the field as optional.
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Accepts the field as documented without rendering it.
    pub fn ignored(mut self) -> Self {
        self.ignored = true;
        self
    }

    pub(crate) fn path(&self) -> &str {
        &self.path
    }

    pub(crate) fn declared_type(&self) -> Option<JsonFieldType> {
        self.field_type
    }

    pub(crate) fn is_ignored(&self) -> bool {
        self.ignored
    }
}

impl Described for FieldDescriptor {
    fn key(&self) -> &str {
        &self.path
    }

    fn described(&self) -> Option<&str> {
        self.description.as_deref()
    }

    fn is_optional(&self) -> bool {
        self.optional
    }
}

/// A descriptor of a hypermedia link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkDescriptor {
    rel: String,
    description: Option<String>,
    optional: bool,
}

/// Creates a descriptor for the link with the given relation.
pub fn link_with_rel(rel: impl Into<String>) -> AppResult<LinkDescriptor> {
    Ok(LinkDescriptor {
        rel: validate_identity("Link rel", rel.into())?,
        description: None,
        optional: false,
    })
}

impl LinkDescriptor {
    /// Specifies the description of the link.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Marks the link as optional.
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }
}

impl Described for LinkDescriptor {
    fn key(&self) -> &str {
        &self.rel
    }

    fn described(&self) -> Option<&str> {
        self.description.as_deref()
    }

    fn is_optional(&self) -> bool {
        self.optional
    }
}
