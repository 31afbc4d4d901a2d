#![deny(missing_docs)]

//! # RestDocs Core
//!
//! Documents HTTP APIs from the exchanges captured while their tests run.
//!
//! A test performs a request against the application, describes the parts of the
//! exchange worth documenting (parameters, headers, payload fields, links) and hands the
//! captured [`Operation`] to a documentation handler, which renders Asciidoctor or
//! Markdown snippets into the configured output directory.

/// Shared error types.
pub mod error;

/// Output location, markup and URI defaults.
pub mod config;

/// Captured request/response model.
pub mod operation;

/// Descriptors of documented request/response elements.
pub mod descriptor;

/// Markup dialects.
pub mod templates;

/// Snippet rendering and output.
pub mod snippet;

/// Request/response preprocessing.
pub mod preprocess;

/// Documentation handlers.
pub mod document;

/// Actix Web test integration.
#[cfg(feature = "actix")]
pub mod actix;

pub use config::{RestDocsConfig, UriConfig};
pub use descriptor::{
    field_with_path, header_with_name, link_with_rel, parameter_with_name, FieldDescriptor,
    HeaderDescriptor, JsonFieldType, LinkDescriptor, ParameterDescriptor,
};
pub use document::{document, RestDocumentationHandler};
pub use error::{AppError, AppResult};
pub use operation::{HttpHeaders, Operation, OperationRequest, OperationResponse, Parameters};
pub use preprocess::{modify_request_to, modify_response_to, OperationPreprocessor};
pub use snippet::{Snippet, SnippetWriter};
pub use templates::{Asciidoctor, Markdown, TemplateFormat, TemplateFormatKind};
