//! Tables documenting request and response headers.
//!
//! Unlike parameters, headers the test did not document are tolerated: servers and
//! frameworks add many (`Date`, `Content-Length`, ...) that are not worth describing.

use crate::config::RestDocsConfig;
use crate::descriptor::HeaderDescriptor;
use crate::error::AppResult;
use crate::operation::{HttpHeaders, Operation};
use crate::snippet::{descriptor_rows, verify_documented, Snippet};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Request,
    Response,
}

/// The `request-headers` and `response-headers` snippets.
#[derive(Debug, Clone)]
pub struct HeadersSnippet {
    side: Side,
    descriptors: Vec<HeaderDescriptor>,
}

/// Documents headers of the request.
pub fn request_headers(descriptors: Vec<HeaderDescriptor>) -> HeadersSnippet {
    HeadersSnippet {
        side: Side::Request,
        descriptors,
    }
}

/// Documents headers of the response.
pub fn response_headers(descriptors: Vec<HeaderDescriptor>) -> HeadersSnippet {
    HeadersSnippet {
        side: Side::Response,
        descriptors,
    }
}

impl HeadersSnippet {
    fn headers<'a>(&self, operation: &'a Operation) -> &'a HttpHeaders {
        match self.side {
            Side::Request => &operation.request.headers,
            Side::Response => &operation.response.headers,
        }
    }
}

impl Snippet for HeadersSnippet {
    fn name(&self) -> &str {
        match self.side {
            Side::Request => "request-headers",
            Side::Response => "response-headers",
        }
    }

    fn render(&self, operation: &Operation, config: &RestDocsConfig) -> AppResult<String> {
        let location = match self.side {
            Side::Request => "request",
            Side::Response => "response",
        };
        let actual: Vec<String> = self
            .headers(operation)
            .names()
            .map(str::to_string)
            .collect();
        verify_documented("Headers", location, &self.descriptors, &actual, true, true)?;

        let rows = descriptor_rows(&self.descriptors, config)?;
        Ok(config
            .template_format
            .format()
            .table(None, &["Name", "Description"], &rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::header_with_name;
    use crate::operation::{get, OperationResponse};

    fn operation() -> Operation {
        let request = get("/")
            .header("Authorization", "Basic dXNlcjpzZWNyZXQ=")
            .build(&RestDocsConfig::default().uri)
            .unwrap();
        let mut headers = HttpHeaders::new();
        headers.add("content-type", "application/hal+json");
        headers.add("Date", "Thu, 01 Jan 2026 00:00:00 GMT");
        Operation::new("headers", request, OperationResponse::new(200, headers, Vec::new()))
    }

    #[test]
    fn test_request_headers() {
        let snippet = request_headers(vec![header_with_name("Authorization")
            .unwrap()
            .description("Basic auth credentials")]);
        assert_eq!(snippet.name(), "request-headers");
        let rendered = snippet.render(&operation(), &RestDocsConfig::default()).unwrap();
        assert!(rendered.contains("|Name|Description\n"));
        assert!(rendered.contains("|`+Authorization+`\n|Basic auth credentials\n"));
    }

    #[test]
    fn test_response_headers_match_case_insensitively() {
        let snippet = response_headers(vec![header_with_name("Content-Type")
            .unwrap()
            .description("The Content-Type of the payload")]);
        assert!(snippet.render(&operation(), &RestDocsConfig::default()).is_ok());
    }

    #[test]
    fn test_missing_header_fails() {
        let snippet = response_headers(vec![
            header_with_name("ETag").unwrap().description("Entity tag"),
            header_with_name("Cache-Control").unwrap().optional(),
        ]);
        let err = snippet
            .render(&operation(), &RestDocsConfig::default())
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Snippet Error: Headers with the following names were not found in the response: [\"ETag\"]"
        );
    }
}
