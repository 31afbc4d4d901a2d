#![deny(missing_docs)]

//! # Documentation Handler
//!
//! Turns a captured [`Operation`] into snippet files.
//!
//! A handler is created per documented call with the identifier its snippets are filed
//! under. When it handles an operation it:
//! 1. applies the request/response preprocessors to a copy of the operation,
//! 2. renders the configured default snippets followed by the handler's own snippets,
//! 3. writes each one to `<output_dir>/<identifier>/<snippet>.<ext>`.
//!
//! Identifiers may contain `{step}`, replaced by a 1-based count of handled operations.

use crate::config::RestDocsConfig;
use crate::error::{AppError, AppResult};
use crate::operation::Operation;
use crate::preprocess::{apply_all, OperationPreprocessor};
use crate::snippet::{default_snippet, Snippet, SnippetWriter};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

static STEP: AtomicUsize = AtomicUsize::new(0);

/// Documents operations under an identifier.
pub struct RestDocumentationHandler {
    identifier: String,
    snippets: Vec<Box<dyn Snippet>>,
    request_preprocessors: Vec<Box<dyn OperationPreprocessor>>,
    response_preprocessors: Vec<Box<dyn OperationPreprocessor>>,
}

/// Creates a handler filing snippets under `identifier`.
///
/// Fails with [`AppError::InvalidDescriptor`] for an empty identifier or one that would
/// escape the output directory.
pub fn document(identifier: impl Into<String>) -> AppResult<RestDocumentationHandler> {
    let identifier = identifier.into();
    if identifier.trim().is_empty() {
        return Err(AppError::InvalidDescriptor(
            "Documentation identifier must not be empty".to_string(),
        ));
    }
    if identifier.starts_with('/') || identifier.split('/').any(|part| part == "..") {
        return Err(AppError::InvalidDescriptor(format!(
            "Documentation identifier '{}' must be a relative path",
            identifier
        )));
    }
    Ok(RestDocumentationHandler {
        identifier,
        snippets: Vec::new(),
        request_preprocessors: Vec::new(),
        response_preprocessors: Vec::new(),
    })
}

impl RestDocumentationHandler {
    /// Adds a snippet rendered after the default ones.
    pub fn snippet(mut self, snippet: impl Snippet + 'static) -> Self {
        self.snippets.push(Box::new(snippet));
        self
    }

    /// Adds several snippets.
    pub fn snippets(mut self, snippets: Vec<Box<dyn Snippet>>) -> Self {
        self.snippets.extend(snippets);
        self
    }

    pub(crate) fn with_preprocessors(
        mut self,
        request: Vec<Box<dyn OperationPreprocessor>>,
        response: Vec<Box<dyn OperationPreprocessor>>,
    ) -> Self {
        self.request_preprocessors = request;
        self.response_preprocessors = response;
        self
    }

    /// The identifier as given, placeholders unresolved.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    fn resolve_identifier(&self) -> String {
        if self.identifier.contains("{step}") {
            let step = STEP.fetch_add(1, Ordering::SeqCst) + 1;
            self.identifier.replace("{step}", &step.to_string())
        } else {
            self.identifier.clone()
        }
    }

    /// Applies the preprocessors to a copy of `operation` and renames it.
    pub fn prepare(&self, operation: &Operation) -> AppResult<Operation> {
        let mut prepared = operation.clone();
        prepared.name = self.resolve_identifier();
        apply_all(
            &self.request_preprocessors,
            &mut prepared.request.headers,
            &mut prepared.request.body,
        )?;
        apply_all(
            &self.response_preprocessors,
            &mut prepared.response.headers,
            &mut prepared.response.body,
        )?;
        Ok(prepared)
    }

    /// Renders every snippet for `operation` without writing anything.
    ///
    /// Returns `(snippet name, content)` pairs in rendering order.
    pub fn render(
        &self,
        operation: &Operation,
        config: &RestDocsConfig,
    ) -> AppResult<Vec<(String, String)>> {
        let defaults = config
            .default_snippets
            .iter()
            .map(|name| default_snippet(name))
            .collect::<AppResult<Vec<_>>>()?;

        defaults
            .iter()
            .chain(self.snippets.iter())
            .map(|snippet| {
                let content = snippet.render(operation, config)?;
                Ok((snippet.name().to_string(), content))
            })
            .collect()
    }

    /// Documents an operation, returning the files written.
    ///
    /// Nothing is written when any snippet fails to render.
    pub fn handle(
        &self,
        operation: &Operation,
        config: &RestDocsConfig,
    ) -> AppResult<Vec<PathBuf>> {
        let prepared = self.prepare(operation)?;
        let rendered = self.render(&prepared, config)?;

        let writer = SnippetWriter::new(config);
        let paths = rendered
            .iter()
            .map(|(name, content)| writer.write(&prepared.name, name, content))
            .collect::<AppResult<Vec<_>>>()?;

        log::info!(
            "Documented '{}' ({} snippets) in {:?}",
            prepared.name,
            paths.len(),
            config.output_dir.join(&prepared.name)
        );
        Ok(paths)
    }
}

impl std::fmt::Debug for RestDocumentationHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.snippets.iter().map(|s| s.name()).collect();
        f.debug_struct("RestDocumentationHandler")
            .field("identifier", &self.identifier)
            .field("snippets", &names)
            .field("request_preprocessors", &self.request_preprocessors.len())
            .field("response_preprocessors", &self.response_preprocessors.len())
            .finish()
    }
}
