#![deny(missing_docs)]

//! # Actix Web Integration
//!
//! Captures documented exchanges from an `actix-web` test service.
//!
//! ```no_run
//! use actix_web::{test, web, App, HttpResponse};
//! use restdocs_core::actix::perform;
//! use restdocs_core::operation::get;
//! use restdocs_core::preprocess::{modify_response_to, pretty_print};
//! use restdocs_core::RestDocsConfig;
//!
//! # async fn example() -> restdocs_core::AppResult<()> {
//! let config = RestDocsConfig::default();
//! let app = test::init_service(
//!     App::new().route("/", web::get().to(|| async { HttpResponse::Ok().body("{}") })),
//! )
//! .await;
//!
//! perform(&app, get("/"), &config)
//!     .await?
//!     .and_expect_status(200)?
//!     .and_do(&modify_response_to(vec![pretty_print()]).and_document("index")?, &config)?;
//! # Ok(())
//! # }
//! ```

use crate::config::RestDocsConfig;
use crate::document::RestDocumentationHandler;
use crate::error::{AppError, AppResult};
use crate::operation::{
    HttpHeaders, Operation, OperationRequest, OperationResponse, RequestBuilder,
};
use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::Method;
use actix_web::test::TestRequest;
use std::path::PathBuf;

/// The outcome of a performed request, ready for expectations and documentation.
#[derive(Debug, Clone)]
pub struct ResultActions {
    operation: Operation,
    documented: Vec<PathBuf>,
}

impl ResultActions {
    /// The captured exchange.
    pub fn operation(&self) -> &Operation {
        &self.operation
    }

    /// Files written by the `and_do` calls so far.
    pub fn documented(&self) -> &[PathBuf] {
        &self.documented
    }

    /// Fails unless the response has the given status.
    pub fn and_expect_status(self, status: u16) -> AppResult<Self> {
        let actual = self.operation.response.status;
        if actual != status {
            return Err(AppError::Expectation(format!(
                "Status expected:<{}> but was:<{}>",
                status, actual
            )));
        }
        Ok(self)
    }

    /// Fails unless the response has a header with the given value.
    pub fn and_expect_header(self, name: &str, value: &str) -> AppResult<Self> {
        let actual = self.operation.response.headers.get(name);
        if actual != Some(value) {
            return Err(AppError::Expectation(format!(
                "Response header '{}' expected:<{}> but was:<{}>",
                name,
                value,
                actual.unwrap_or("<absent>")
            )));
        }
        Ok(self)
    }

    /// Documents the exchange with a handler.
    pub fn and_do(
        mut self,
        handler: &RestDocumentationHandler,
        config: &RestDocsConfig,
    ) -> AppResult<Self> {
        let paths = handler.handle(&self.operation, config)?;
        self.documented.extend(paths);
        Ok(self)
    }
}

fn to_test_request(request: &OperationRequest) -> AppResult<TestRequest> {
    let method = Method::from_bytes(request.method.as_bytes())
        .map_err(|e| AppError::Capture(format!("Invalid method '{}': {}", request.method, e)))?;

    let mut test_request = TestRequest::default()
        .method(method)
        .uri(&request.path_and_query());
    for (name, value) in request.headers.iter() {
        test_request = test_request.append_header((name, value));
    }
    if !request.body.is_empty() {
        test_request = test_request.set_payload(request.body.clone());
    }
    Ok(test_request)
}

/// Sends a request to an actix test service and captures the exchange.
///
/// # Arguments
///
/// * `app` - A service from `actix_web::test::init_service`.
/// * `builder` - The request to send; relative URIs resolve against `config.uri`.
/// * `config` - Global settings.
pub async fn perform<S, B>(
    app: &S,
    builder: RequestBuilder,
    config: &RestDocsConfig,
) -> AppResult<ResultActions>
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let request = builder.build(&config.uri)?;
    let test_request = to_test_request(&request)?.to_request();

    let response = app
        .call(test_request)
        .await
        .map_err(|e| AppError::Capture(format!("Service call failed: {}", e)))?;

    let status = response.status().as_u16();
    let mut headers = HttpHeaders::new();
    for (name, value) in response.headers() {
        headers.add(name.as_str(), String::from_utf8_lossy(value.as_bytes()).into_owned());
    }
    let body = actix_web::body::to_bytes(response.into_body())
        .await
        .map_err(|e| {
            let e: Box<dyn std::error::Error> = e.into();
            AppError::Capture(format!("Failed to read response body: {}", e))
        })?;

    log::debug!("Captured {} {} -> {}", request.method, request.uri, status);

    Ok(ResultActions {
        operation: Operation::new(
            "unnamed",
            request,
            OperationResponse::new(status, headers, body.to_vec()),
        ),
        documented: Vec::new(),
    })
}
