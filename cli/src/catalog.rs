#![deny(missing_docs)]

//! # Snippet Catalog
//!
//! Discovers generated snippets below a snippets directory.
//!
//! Snippets live at `<dir>/<identifier>/<snippet>.<ext>`, where the identifier may itself
//! contain `/` (e.g. `notes/get`).

use crate::error::{CliError, CliResult};
use restdocs_core::TemplateFormatKind;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// One generated snippet file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnippetFile {
    /// Snippet name (file stem), e.g. `http-request`.
    pub name: String,
    /// Path relative to the snippets directory.
    pub relative_path: PathBuf,
}

/// Snippets grouped by documentation identifier, identifiers sorted.
pub type Catalog = BTreeMap<String, Vec<SnippetFile>>;

/// Scans `dir` for snippets of the given format.
pub fn scan(dir: &Path, format: TemplateFormatKind) -> CliResult<Catalog> {
    if !dir.is_dir() {
        return Err(CliError::General(format!(
            "Snippets directory not found: {:?}",
            dir
        )));
    }
    let extension = format.format().file_extension();
    let mut catalog = Catalog::new();

    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry?;
        let path = entry.path();
        if !entry.file_type().is_file()
            || path.extension().and_then(|e| e.to_str()) != Some(extension)
        {
            continue;
        }

        let relative = path
            .strip_prefix(dir)
            .map_err(|e| CliError::General(format!("Unexpected path {:?}: {}", path, e)))?;
        let Some(parent) = relative.parent().filter(|p| !p.as_os_str().is_empty()) else {
            log::warn!("Ignoring {:?}: snippets must live in an identifier directory", path);
            continue;
        };
        let identifier = parent
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join("/");
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        catalog.entry(identifier).or_default().push(SnippetFile {
            name,
            relative_path: relative.to_path_buf(),
        });
    }

    log::debug!("Found {} documented operations in {:?}", catalog.len(), dir);
    Ok(catalog)
}
