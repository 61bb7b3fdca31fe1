pub mod cli;
pub mod generator;
pub mod gitlab;
pub mod llm;
pub mod parser;
pub mod server;
pub mod utils;
pub mod validator;

// Re-export frequently used items for easier access
pub use generator::{api_test_context, TemplateStore, API_TEST_TEMPLATE, UI_TEST_TEMPLATE};
pub use llm::LlmClient;
pub use parser::{parse_spec_file, ApiEndpoint, FormatHint};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Parser error: {0}")]
    ParserError(#[from] parser::ParserError),

    #[error("Render error: {0}")]
    RenderError(#[from] generator::RenderError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("the specification contains no endpoints to generate from")]
    EmptySpecification,

    #[error("server error: {0}")]
    ServerError(String),
}

pub type Result<T> = std::result::Result<T, AppError>;

/// Result of one spec-to-test run: the rendered test source and every
/// endpoint the spec declared, in sorted order.
pub struct ApiGeneration {
    pub tests: String,
    pub endpoints: Vec<ApiEndpoint>,
}

/// Generate an API test from specification text.
///
/// Loads and parses the document, builds the render context from the first
/// endpoint in sorted order and renders the API test template. Rendering is
/// fail-soft: template problems come back as a comment inside `tests`, never
/// as an error. A spec that parses to zero endpoints is the one
/// orchestration-level failure, since there is nothing to render from.
pub fn generate_api_tests(
    content: &str,
    hint: FormatHint,
    templates: &TemplateStore,
) -> Result<ApiGeneration> {
    let document = parser::load_document(content, hint)?;
    let endpoints = parser::parse_endpoints(&document)?;

    let first = match endpoints.first() {
        Some(endpoint) => endpoint,
        None => return Err(AppError::EmptySpecification),
    };

    let context = generator::api_test_context(first);
    let tests = templates.render_or_comment(generator::API_TEST_TEMPLATE, &context);

    Ok(ApiGeneration { tests, endpoints })
}
