//! Tables documenting query/form parameters and URI template variables.

use crate::config::RestDocsConfig;
use crate::descriptor::ParameterDescriptor;
use crate::error::{AppError, AppResult};
use crate::operation::Operation;
use crate::snippet::{descriptor_rows, verify_documented, Snippet};

const HEADERS: [&str; 2] = ["Parameter", "Description"];

/// The `request-parameters` snippet.
#[derive(Debug, Clone)]
pub struct RequestParametersSnippet {
    descriptors: Vec<ParameterDescriptor>,
}

/// Documents the request's query string and form parameters.
pub fn request_parameters(descriptors: Vec<ParameterDescriptor>) -> RequestParametersSnippet {
    RequestParametersSnippet { descriptors }
}

impl Snippet for RequestParametersSnippet {
    fn name(&self) -> &str {
        "request-parameters"
    }

    fn render(&self, operation: &Operation, config: &RestDocsConfig) -> AppResult<String> {
        let actual: Vec<String> = operation
            .request
            .parameters
            .names()
            .map(str::to_string)
            .collect();
        verify_documented(
            "Request parameters",
            "request",
            &self.descriptors,
            &actual,
            false,
            false,
        )?;

        let rows = descriptor_rows(&self.descriptors, config)?;
        Ok(config.template_format.format().table(None, &HEADERS, &rows))
    }
}

/// The `path-parameters` snippet.
#[derive(Debug, Clone)]
pub struct PathParametersSnippet {
    descriptors: Vec<ParameterDescriptor>,
}

/// Documents the variables of the request's URI template.
pub fn path_parameters(descriptors: Vec<ParameterDescriptor>) -> PathParametersSnippet {
    PathParametersSnippet { descriptors }
}

/// Variable names of a URI template, in order (`/a/{x}/{y}` -> `x`, `y`).
pub(crate) fn template_variables(template: &str) -> Vec<String> {
    let mut names = Vec::new();
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        match rest[start..].find('}') {
            Some(end) => {
                let name = rest[start + 1..start + end].trim();
                // `{name:regex}` style variables document the name only
                let name = name.split(':').next().unwrap_or(name);
                if !name.is_empty() {
                    names.push(name.to_string());
                }
                rest = &rest[start + end + 1..];
            }
            None => break,
        }
    }
    names
}

impl Snippet for PathParametersSnippet {
    fn name(&self) -> &str {
        "path-parameters"
    }

    fn render(&self, operation: &Operation, config: &RestDocsConfig) -> AppResult<String> {
        let template = operation.request.uri_template.as_deref().ok_or_else(|| {
            AppError::Snippet(
                "URI template not found. Build the request from a template such as \
                 get(\"/notes/{id}\") to document its path parameters"
                    .to_string(),
            )
        })?;

        let actual = template_variables(template);
        verify_documented("Path parameters", "request", &self.descriptors, &actual, false, false)?;

        let rows = descriptor_rows(&self.descriptors, config)?;
        Ok(config
            .template_format
            .format()
            .table(Some(template), &HEADERS, &rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::parameter_with_name;
    use crate::operation::{get, HttpHeaders, OperationResponse, RequestBuilder};
    use pretty_assertions::assert_eq;

    fn operation(builder: RequestBuilder) -> Operation {
        let request = builder.build(&RestDocsConfig::default().uri).unwrap();
        Operation::new(
            "params",
            request,
            OperationResponse::new(200, HttpHeaders::new(), Vec::new()),
        )
    }

    #[test]
    fn test_documented_query_parameter() {
        let snippet = request_parameters(vec![parameter_with_name("page")
            .unwrap()
            .description("The page to retrieve")]);
        let rendered = snippet
            .render(&operation(get("/").param("page", "2")), &RestDocsConfig::default())
            .unwrap();
        assert_eq!(
            rendered,
            "|===\n|Parameter|Description\n\n|`+page+`\n|The page to retrieve\n\n|===\n"
        );
    }

    #[test]
    fn test_undocumented_parameter_fails() {
        let snippet = request_parameters(vec![parameter_with_name("page")
            .unwrap()
            .description("The page to retrieve")]);
        let err = snippet
            .render(
                &operation(get("/").param("page", "2").param("per_page", "10")),
                &RestDocsConfig::default(),
            )
            .unwrap_err();
        assert!(matches!(err, AppError::Snippet(ref msg) if msg.contains("[\"per_page\"]")));
    }

    #[test]
    fn test_optional_parameter_may_be_absent() {
        let snippet = request_parameters(vec![
            parameter_with_name("page").unwrap().description("Page"),
            parameter_with_name("sort").unwrap().description("Order").optional(),
        ]);
        let rendered = snippet
            .render(&operation(get("/").param("page", "1")), &RestDocsConfig::default())
            .unwrap();
        assert!(rendered.contains("|`+sort+`\n|Order\n"));
    }

    #[test]
    fn test_missing_description_when_required() {
        let snippet = request_parameters(vec![parameter_with_name("page").unwrap()]);
        let config = RestDocsConfig::default().require_descriptions(true);
        let err = snippet
            .render(&operation(get("/").param("page", "1")), &config)
            .unwrap_err();
        assert!(matches!(err, AppError::MissingDescription(ref name) if name == "page"));
    }

    #[test]
    fn test_path_parameters() {
        let snippet = path_parameters(vec![
            parameter_with_name("id").unwrap().description("The note's id"),
        ]);
        let rendered = snippet
            .render(
                &operation(get("/notes/{id}").path_variables(["1"])),
                &RestDocsConfig::default(),
            )
            .unwrap();
        assert!(rendered.starts_with(".+/notes/{id}+\n|===\n"));
        assert!(rendered.contains("|`+id+`\n|The note's id\n"));
    }

    #[test]
    fn test_path_parameters_need_template() {
        let snippet = path_parameters(vec![parameter_with_name("id").unwrap()]);
        let err = snippet
            .render(&operation(get("/notes/1")), &RestDocsConfig::default())
            .unwrap_err();
        assert!(matches!(err, AppError::Snippet(_)));
    }

    #[test]
    fn test_template_variables() {
        assert_eq!(
            template_variables("/a/{x}/b/{ y }/{id:[0-9]+}"),
            vec!["x", "y", "id"]
        );
        assert!(template_variables("/plain").is_empty());
    }
}
