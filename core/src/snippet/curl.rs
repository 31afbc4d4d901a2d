//! Renders the request as a copy-pasteable curl command.

use crate::config::RestDocsConfig;
use crate::error::AppResult;
use crate::operation::Operation;
use crate::snippet::Snippet;

/// The `curl-request` snippet.
#[derive(Debug, Clone, Default)]
pub struct CurlRequestSnippet;

/// Documents the request as a curl command.
pub fn curl_request() -> CurlRequestSnippet {
    CurlRequestSnippet
}

/// Single-quotes an argument for a POSIX shell.
fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "'\\''"))
}

impl Snippet for CurlRequestSnippet {
    fn name(&self) -> &str {
        "curl-request"
    }

    fn render(&self, operation: &Operation, config: &RestDocsConfig) -> AppResult<String> {
        let request = &operation.request;
        let mut command = format!("$ curl {} -i", shell_quote(request.uri.as_str()));

        if request.method != "GET" {
            command.push_str(&format!(" -X {}", request.method));
        }
        for (name, value) in request.headers.iter() {
            if name.eq_ignore_ascii_case("Host") || name.eq_ignore_ascii_case("Content-Length") {
                continue;
            }
            command.push_str(&format!(" -H {}", shell_quote(&format!("{}: {}", name, value))));
        }
        if !request.body.is_empty() {
            command.push_str(&format!(" -d {}", shell_quote(&request.body_text())));
        }

        Ok(config.template_format.format().code_block("bash", &command))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operation::{get, put, OperationResponse};
    use crate::operation::HttpHeaders;
    use pretty_assertions::assert_eq;

    fn render(builder: crate::operation::RequestBuilder) -> String {
        let config = RestDocsConfig::default();
        let request = builder.build(&config.uri).unwrap();
        let operation = Operation::new(
            "curl",
            request,
            OperationResponse::new(200, HttpHeaders::new(), Vec::new()),
        );
        curl_request().render(&operation, &config).unwrap()
    }

    #[test]
    fn test_get_omits_method() {
        let rendered = render(get("/").param("page", "2"));
        assert_eq!(
            rendered,
            "[source,bash,options=\"nowrap\"]\n----\n$ curl 'http://localhost:8080/?page=2' -i\n----\n"
        );
    }

    #[test]
    fn test_put_with_headers_and_quoted_body() {
        let rendered = render(
            put("/notes/1")
                .header("Host", "ignored")
                .content_type("text/plain")
                .body("it's done"),
        );
        assert!(rendered.contains(
            "$ curl 'http://localhost:8080/notes/1' -i -X PUT -H 'Content-Type: text/plain' -d 'it'\\''s done'"
        ));
        assert!(!rendered.contains("Host"));
    }
}
