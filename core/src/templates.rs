#![deny(missing_docs)]

//! # Template Formats
//!
//! The markup dialects snippets are rendered in.
//!
//! Snippets describe *what* to render (a code block, a table of descriptors) and the
//! `TemplateFormat` decides *how* it looks on disk. Implementations exist for
//! Asciidoctor and Markdown.

use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A strategy trait for decoupling snippet content from its markup.
pub trait TemplateFormat {
    /// Short identifier (`asciidoctor`, `markdown`).
    fn id(&self) -> &'static str;

    /// File extension of generated snippets, without the dot.
    fn file_extension(&self) -> &'static str;

    /// Renders a listing block.
    ///
    /// # Arguments
    ///
    /// * `language` - Source language hint (e.g. `bash`, `http`).
    /// * `content` - Verbatim content of the block.
    fn code_block(&self, language: &str, content: &str) -> String;

    /// Renders a table.
    ///
    /// # Arguments
    ///
    /// * `title` - Optional caption (e.g. the URI template of a path-parameters table).
    /// * `headers` - Column headings.
    /// * `rows` - Cell values; the first column is rendered as code.
    fn table(&self, title: Option<&str>, headers: &[&str], rows: &[Vec<String>]) -> String;
}

/// Asciidoctor markup (`.adoc`).
pub struct Asciidoctor;

/// Markdown markup (`.md`).
pub struct Markdown;

impl TemplateFormat for Asciidoctor {
    fn id(&self) -> &'static str {
        "asciidoctor"
    }

    fn file_extension(&self) -> &'static str {
        "adoc"
    }

    fn code_block(&self, language: &str, content: &str) -> String {
        format!(
            "[source,{},options=\"nowrap\"]\n----\n{}\n----\n",
            language,
            content.trim_end_matches('\n')
        )
    }

    fn table(&self, title: Option<&str>, headers: &[&str], rows: &[Vec<String>]) -> String {
        let mut code = String::new();
        if let Some(title) = title {
            code.push_str(&format!(".+{}+\n", title));
        }
        code.push_str("|===\n");
        code.push_str(&format!("|{}\n", headers.join("|")));
        for row in rows {
            code.push('\n');
            for (i, cell) in row.iter().enumerate() {
                let cell = cell.replace('|', "\\|");
                if i == 0 {
                    code.push_str(&format!("|`+{}+`\n", cell));
                } else {
                    code.push_str(&format!("|{}\n", cell));
                }
            }
        }
        code.push('\n');
        code.push_str("|===\n");
        code
    }
}

impl TemplateFormat for Markdown {
    fn id(&self) -> &'static str {
        "markdown"
    }

    fn file_extension(&self) -> &'static str {
        "md"
    }

    fn code_block(&self, language: &str, content: &str) -> String {
        format!("```{}\n{}\n```\n", language, content.trim_end_matches('\n'))
    }

    fn table(&self, title: Option<&str>, headers: &[&str], rows: &[Vec<String>]) -> String {
        let mut code = String::new();
        if let Some(title) = title {
            code.push_str(&format!("`{}`\n\n", title));
        }
        code.push_str(&format!("{}\n", markdown_row(headers.iter().copied())));
        code.push_str(&format!(
            "{}\n",
            markdown_row(headers.iter().map(|_| "---"))
        ));
        for row in rows {
            let cells: Vec<String> = row
                .iter()
                .enumerate()
                .map(|(i, cell)| {
                    let cell = cell.replace('|', "\\|").replace('\n', " ");
                    if i == 0 {
                        format!("`{}`", cell)
                    } else {
                        cell
                    }
                })
                .collect();
            code.push_str(&format!(
                "{}\n",
                markdown_row(cells.iter().map(String::as_str))
            ));
        }
        code
    }
}

fn markdown_row<'a>(cells: impl Iterator<Item = &'a str>) -> String {
    let cells: Vec<&str> = cells.collect();
    format!("| {} |", cells.join(" | "))
}

/// Serializable selector for the built-in template formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateFormatKind {
    /// See [`Asciidoctor`].
    Asciidoctor,
    /// See [`Markdown`].
    Markdown,
}

impl TemplateFormatKind {
    /// The format implementation.
    pub fn format(self) -> &'static dyn TemplateFormat {
        match self {
            TemplateFormatKind::Asciidoctor => &Asciidoctor,
            TemplateFormatKind::Markdown => &Markdown,
        }
    }
}

impl FromStr for TemplateFormatKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asciidoctor" | "adoc" => Ok(TemplateFormatKind::Asciidoctor),
            "markdown" | "md" => Ok(TemplateFormatKind::Markdown),
            other => Err(AppError::Config(format!(
                "Unknown template format '{}' (expected asciidoctor or markdown)",
                other
            ))),
        }
    }
}

impl fmt::Display for TemplateFormatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format().id())
    }
}
