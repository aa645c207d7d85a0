//! AWS Lambda handler for deal analysis
//!
//! Accepts an analysis request as JSON and returns the full deal analysis.
//! Supports Lambda Function URLs for direct HTTP access.

use aws_lambda_events::event::lambda_function_urls::{LambdaFunctionUrlRequest, LambdaFunctionUrlResponse};
use deal_analyzer::criteria::load_default_criteria;
use deal_analyzer::error::FieldViolation;
use deal_analyzer::request::parse_request;
use deal_analyzer::{validate_request, AnalysisRunner};
use http::header::{HeaderMap, HeaderValue, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
    ACCESS_CONTROL_ALLOW_ORIGIN, CONTENT_TYPE};
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use log::{info, warn};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    #[serde(skip_serializing_if = "no_violations")]
    violations: &'a [FieldViolation],
}

fn no_violations(violations: &&[FieldViolation]) -> bool {
    violations.is_empty()
}

fn cors_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(ACCESS_CONTROL_ALLOW_METHODS, HeaderValue::from_static("POST, OPTIONS"));
    headers.insert(ACCESS_CONTROL_ALLOW_HEADERS, HeaderValue::from_static("Content-Type"));
    headers
}

fn response(status_code: i64, body: Option<String>) -> LambdaFunctionUrlResponse {
    let mut headers = cors_headers();
    if body.is_some() {
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    }

    LambdaFunctionUrlResponse {
        status_code,
        headers,
        body,
        is_base64_encoded: false,
        cookies: Vec::new(),
    }
}

fn error_response(status_code: i64, message: &str, violations: &[FieldViolation]) -> Result<LambdaFunctionUrlResponse, Error> {
    let body = serde_json::to_string(&ErrorBody { error: message, violations })?;
    Ok(response(status_code, Some(body)))
}

/// Lambda handler function
async fn handler(
    runner: &AnalysisRunner,
    event: LambdaEvent<LambdaFunctionUrlRequest>,
) -> Result<LambdaFunctionUrlResponse, Error> {
    let start = std::time::Instant::now();
    let request = event.payload;

    // Handle CORS preflight
    let method = request.request_context.http.method.as_deref().unwrap_or("POST");
    if method.eq_ignore_ascii_case("OPTIONS") {
        return Ok(response(200, None));
    }
    if !method.eq_ignore_ascii_case("POST") {
        return error_response(405, &format!("Method not allowed: {}", method), &[]);
    }
    if request.is_base64_encoded {
        return error_response(415, "Binary bodies are not supported", &[]);
    }

    let body = request.body.as_deref().unwrap_or("{}");
    let analysis_request = match parse_request(body) {
        Ok(r) => r,
        Err(e) => return error_response(400, &format!("Invalid JSON: {}", e), &[]),
    };

    if let Err(e) = validate_request(&analysis_request) {
        warn!("rejected request: {}", e);
        return error_response(422, "Invalid analysis request", &e.violations);
    }

    let analysis = runner.run(&analysis_request);
    info!(
        "analyzed {} in {}us, meets criteria: {}",
        analysis.property_id,
        start.elapsed().as_micros(),
        analysis.meets_criteria
    );

    Ok(response(200, Some(serde_json::to_string(&analysis)?)))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();

    let mortgage_rate = std::env::var("MORTGAGE_RATE").ok().and_then(|v| v.parse().ok());
    let runner = AnalysisRunner::with_criteria(load_default_criteria()).with_mortgage_rate(mortgage_rate);

    run(service_fn(move |event| {
        let runner = runner.clone();
        async move { handler(&runner, event).await }
    }))
    .await
}
