#![deny(missing_docs)]

//! # Assemble Command
//!
//! Writes an index document that pulls in every generated snippet, one section per
//! documented operation.
//!
//! Asciidoctor output uses `include::` directives relative to a `:snippets:` attribute;
//! Markdown has no include mechanism, so snippet contents are inlined.

use crate::catalog::{scan, Catalog};
use crate::error::CliResult;
use restdocs_core::TemplateFormatKind;
use std::fs;
use std::path::{Path, PathBuf};

/// Arguments for the assemble command.
#[derive(clap::Args, Debug, Clone)]
pub struct AssembleArgs {
    /// Directory the snippets were generated into.
    #[clap(long, env = "RESTDOCS_OUTPUT_DIR", default_value = "target/generated-snippets")]
    pub snippets_dir: PathBuf,

    /// Output path of the index document.
    #[clap(long, default_value = "target/docs/index.adoc")]
    pub output: PathBuf,

    /// Markup of the snippets and of the index (`asciidoctor` or `markdown`).
    #[clap(long, env = "RESTDOCS_TEMPLATE_FORMAT", default_value = "asciidoctor")]
    pub format: TemplateFormatKind,

    /// Title of the index document.
    #[clap(long, default_value = "API Documentation")]
    pub title: String,
}

/// Renders the index document for a catalog.
pub fn render_index(
    catalog: &Catalog,
    snippets_dir: &Path,
    format: TemplateFormatKind,
    title: &str,
) -> CliResult<String> {
    let mut doc = String::new();
    match format {
        TemplateFormatKind::Asciidoctor => {
            doc.push_str(&format!("= {}\n", title));
            doc.push_str(&format!(":snippets: {}\n", snippets_dir.display()));
            for (identifier, snippets) in catalog {
                doc.push_str(&format!("\n== {}\n", identifier));
                for snippet in snippets {
                    doc.push_str(&format!("\n=== {}\n\n", snippet.name));
                    let include = snippet.relative_path.to_string_lossy().replace('\\', "/");
                    doc.push_str(&format!("include::{{snippets}}/{}[]\n", include));
                }
            }
        }
        TemplateFormatKind::Markdown => {
            doc.push_str(&format!("# {}\n", title));
            for (identifier, snippets) in catalog {
                doc.push_str(&format!("\n## {}\n", identifier));
                for snippet in snippets {
                    doc.push_str(&format!("\n### {}\n\n", snippet.name));
                    let content = fs::read_to_string(snippets_dir.join(&snippet.relative_path))?;
                    doc.push_str(&content);
                }
            }
        }
    }
    Ok(doc)
}

/// Executes the assemble command.
pub fn execute(args: &AssembleArgs) -> CliResult<()> {
    let catalog = scan(&args.snippets_dir, args.format)?;
    if catalog.is_empty() {
        log::warn!("No {} snippets found in {:?}", args.format, args.snippets_dir);
    }

    let doc = render_index(&catalog, &args.snippets_dir, args.format, &args.title)?;

    if let Some(parent) = args.output.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&args.output, doc)?;

    log::info!(
        "Assembled {} documented operations into {:?}",
        catalog.len(),
        args.output
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write_snippet(dir: &Path, file: &str, content: &str) {
        let path = dir.join(file);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_execute_asciidoctor_index() {
        let dir = tempdir().unwrap();
        let snippets = dir.path().join("snippets");
        write_snippet(&snippets, "index/curl-request.adoc", "curl");
        write_snippet(&snippets, "index/http-response.adoc", "response");

        let output = dir.path().join("docs/index.adoc");
        let args = AssembleArgs {
            snippets_dir: snippets.clone(),
            output: output.clone(),
            format: TemplateFormatKind::Asciidoctor,
            title: "Notes API".to_string(),
        };
        execute(&args).unwrap();

        let doc = fs::read_to_string(output).unwrap();
        let expected = format!(
            "= Notes API\n:snippets: {}\n\n== index\n\n=== curl-request\n\n\
include::{{snippets}}/index/curl-request.adoc[]\n\n=== http-response\n\n\
include::{{snippets}}/index/http-response.adoc[]\n",
            snippets.display()
        );
        assert_eq!(doc, expected);
    }

    #[test]
    fn test_markdown_index_inlines_content() {
        let dir = tempdir().unwrap();
        write_snippet(dir.path(), "notes/get/http-request.md", "```http\nGET / HTTP/1.1\n```\n");

        let catalog = scan(dir.path(), TemplateFormatKind::Markdown).unwrap();
        let doc = render_index(&catalog, dir.path(), TemplateFormatKind::Markdown, "API").unwrap();
        assert_eq!(
            doc,
            "# API\n\n## notes/get\n\n### http-request\n\n```http\nGET / HTTP/1.1\n```\n"
        );
    }
}
