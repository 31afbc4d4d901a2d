//! Renders the captured exchange as raw HTTP/1.1 messages.

use crate::config::RestDocsConfig;
use crate::error::AppResult;
use crate::operation::Operation;
use crate::snippet::Snippet;

/// The `http-request` snippet.
#[derive(Debug, Clone, Default)]
pub struct HttpRequestSnippet;

/// The `http-response` snippet.
#[derive(Debug, Clone, Default)]
pub struct HttpResponseSnippet;

/// Documents the request as an HTTP/1.1 message.
pub fn http_request() -> HttpRequestSnippet {
    HttpRequestSnippet
}

/// Documents the response as an HTTP/1.1 message.
pub fn http_response() -> HttpResponseSnippet {
    HttpResponseSnippet
}

impl Snippet for HttpRequestSnippet {
    fn name(&self) -> &str {
        "http-request"
    }

    fn render(&self, operation: &Operation, config: &RestDocsConfig) -> AppResult<String> {
        let request = &operation.request;
        let mut message = format!("{} {} HTTP/1.1\n", request.method, request.path_and_query());

        if !request.headers.contains("Host") {
            message.push_str(&format!("Host: {}\n", request.host_header()));
        }
        for (name, value) in request.headers.iter() {
            message.push_str(&format!("{}: {}\n", name, value));
        }

        if !request.body.is_empty() {
            message.push('\n');
            message.push_str(&request.body_text());
        }

        Ok(config.template_format.format().code_block("http", &message))
    }
}

impl Snippet for HttpResponseSnippet {
    fn name(&self) -> &str {
        "http-response"
    }

    fn render(&self, operation: &Operation, config: &RestDocsConfig) -> AppResult<String> {
        let response = &operation.response;
        let mut message = format!(
            "HTTP/1.1 {} {}\n",
            response.status,
            reason_phrase(response.status)
        );
        for (name, value) in response.headers.iter() {
            message.push_str(&format!("{}: {}\n", name, value));
        }

        if !response.body.is_empty() {
            message.push('\n');
            message.push_str(&response.body_text());
        }

        Ok(config.template_format.format().code_block("http", &message))
    }
}

/// Standard reason phrase for a status code.
pub fn reason_phrase(status: u16) -> &'static str {
    match status {
        100 => "Continue",
        101 => "Switching Protocols",
        200 => "OK",
        201 => "Created",
        202 => "Accepted",
        204 => "No Content",
        206 => "Partial Content",
        301 => "Moved Permanently",
        302 => "Found",
        303 => "See Other",
        304 => "Not Modified",
        307 => "Temporary Redirect",
        308 => "Permanent Redirect",
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        405 => "Method Not Allowed",
        406 => "Not Acceptable",
        409 => "Conflict",
        410 => "Gone",
        412 => "Precondition Failed",
        415 => "Unsupported Media Type",
        422 => "Unprocessable Entity",
        429 => "Too Many Requests",
        500 => "Internal Server Error",
        501 => "Not Implemented",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        504 => "Gateway Timeout",
        _ => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operation::{post, HttpHeaders, OperationResponse};
    use crate::templates::TemplateFormatKind;
    use pretty_assertions::assert_eq;

    fn operation() -> Operation {
        let config = RestDocsConfig::default();
        let request = post("/notes")
            .param("draft", "true")
            .content_type("application/json")
            .body(r#"{"title":"REST Docs"}"#)
            .build(&config.uri)
            .unwrap();
        let mut headers = HttpHeaders::new();
        headers.add("Location", "http://localhost:8080/notes/1");
        Operation::new("create-note", request, OperationResponse::new(201, headers, Vec::new()))
    }

    #[test]
    fn test_http_request() {
        let rendered = http_request()
            .render(&operation(), &RestDocsConfig::default())
            .unwrap();
        let expected = r#"[source,http,options="nowrap"]
----
POST /notes?draft=true HTTP/1.1
Host: localhost:8080
Content-Type: application/json

{"title":"REST Docs"}
----
"#;
        assert_eq!(rendered, expected);
    }

    #[test]
    fn test_http_response_markdown() {
        let config = RestDocsConfig::default().template_format(TemplateFormatKind::Markdown);
        let rendered = http_response().render(&operation(), &config).unwrap();
        let expected = "```http\nHTTP/1.1 201 Created\nLocation: http://localhost:8080/notes/1\n```\n";
        assert_eq!(rendered, expected);
    }

    #[test]
    fn test_unknown_reason() {
        assert_eq!(reason_phrase(299), "");
        assert_eq!(reason_phrase(404), "Not Found");
    }
}
