// src/server/handlers.rs

use crate::gitlab::{CommitOutcome, CommitStatus, GitLabError};
use crate::parser::FormatHint;
use crate::server::AppState;
use crate::utils::truncate_chars;
use crate::validator::validate_test_code;
use crate::{generate_api_tests, AppError};
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{error, info};

type ApiResult<T> = Result<T, (StatusCode, Json<Value>)>;

fn error_body(status: StatusCode, detail: impl Into<String>) -> (StatusCode, Json<Value>) {
    (status, Json(json!({ "detail": detail.into() })))
}

#[derive(Debug, Deserialize)]
pub struct UiGenerationRequest {
    pub requirements: String,
}

#[derive(Debug, Deserialize)]
pub struct CommitRequest {
    pub test_code: String,
    pub repo_url: String,
    #[serde(default = "default_file_name")]
    pub file_name: String,
}

fn default_file_name() -> String {
    "generated_test.py".to_string()
}

pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "message": "TestOps Copilot backend is running",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

/// Free-text path: requirements in, generated UI test out. Infallible by
/// the text-generation contract (failures serve the fallback test).
pub async fn generate_ui(
    State(state): State<Arc<AppState>>,
    Json(request): Json<UiGenerationRequest>,
) -> Json<Value> {
    info!(
        requirements = truncate_chars(&request.requirements, 50),
        "UI test generation requested"
    );

    let tests = state.llm.generate_test(&request.requirements).await;
    let validation = validate_test_code(&tests);

    Json(json!({ "tests": tests, "validation": validation }))
}

/// Spec upload path: multipart field `openapi_spec` in, rendered API test
/// plus the parsed endpoint count out.
pub async fn generate_api(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> ApiResult<Json<Value>> {
    let mut upload: Option<(Option<String>, String)> = None;

    while let Some(field) = multipart.next_field().await.map_err(|err| {
        error_body(
            StatusCode::BAD_REQUEST,
            format!("malformed multipart request: {err}"),
        )
    })? {
        if field.name() != Some("openapi_spec") {
            continue;
        }

        let file_name = field.file_name().map(str::to_owned);
        let bytes = field.bytes().await.map_err(|err| {
            error_body(
                StatusCode::BAD_REQUEST,
                format!("could not read the uploaded file: {err}"),
            )
        })?;
        let content = String::from_utf8(bytes.to_vec()).map_err(|_| {
            error_body(
                StatusCode::BAD_REQUEST,
                "the uploaded file is not valid UTF-8 text",
            )
        })?;

        upload = Some((file_name, content));
        break;
    }

    let (file_name, content) = upload.ok_or_else(|| {
        error_body(StatusCode::BAD_REQUEST, "missing `openapi_spec` file field")
    })?;
    if content.is_empty() {
        return Err(error_body(StatusCode::BAD_REQUEST, "the uploaded file is empty"));
    }

    let hint = file_name
        .as_deref()
        .map(FormatHint::from_file_name)
        .unwrap_or(FormatHint::Unknown);
    info!(
        file = file_name.as_deref().unwrap_or("<unnamed>"),
        ?hint,
        "API test generation requested"
    );

    let generation =
        generate_api_tests(&content, hint, &state.templates).map_err(generation_error)?;
    let validation = validate_test_code(&generation.tests);

    Ok(Json(json!({
        "tests": generation.tests,
        "parsed_endpoints": generation.endpoints.len(),
        "validation": validation,
    })))
}

fn generation_error(err: AppError) -> (StatusCode, Json<Value>) {
    match err {
        AppError::ParserError(parser_err) => error_body(
            StatusCode::BAD_REQUEST,
            format!("invalid OpenAPI file: {parser_err}"),
        ),
        AppError::EmptySpecification => error_body(
            StatusCode::BAD_REQUEST,
            "the specification contains no endpoints to generate from",
        ),
        other => {
            error!(%other, "test generation failed");
            error_body(
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal error during test generation",
            )
        }
    }
}

/// Publish path. Simulated publishes answer 202 so clients can tell a dry
/// run from a real push; an unreachable remote is 503 and retriable.
pub async fn commit(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CommitRequest>,
) -> ApiResult<(StatusCode, Json<CommitOutcome>)> {
    info!(
        repo_url = %request.repo_url,
        file_name = %request.file_name,
        "commit requested"
    );

    match state
        .gitlab
        .commit_test(&request.test_code, &request.repo_url, &request.file_name)
        .await
    {
        Ok(outcome) => {
            let status = if outcome.status == CommitStatus::Simulated {
                StatusCode::ACCEPTED
            } else {
                StatusCode::OK
            };
            Ok((status, Json(outcome)))
        }
        Err(GitLabError::RemoteUnavailable(reason)) => {
            error!(%reason, "remote unavailable");
            Err((
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "detail": format!("GitLab unreachable or authentication failed: {reason}"),
                    "status": CommitStatus::Error,
                })),
            ))
        }
        Err(err) => {
            error!(%err, "commit failed");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "detail": format!("failed to commit the test: {err}"),
                    "status": CommitStatus::Error,
                })),
            ))
        }
    }
}
