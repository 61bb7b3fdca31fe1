// src/generator/templates.rs

use crate::parser::ApiEndpoint;
use crate::utils::python_title_case;
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::error;

/// Template identifier for single-endpoint API tests.
pub const API_TEST_TEMPLATE: &str = "api_test_template.j2";

/// Template identifier for UI test skeletons.
pub const UI_TEST_TEMPLATE: &str = "ui_test_template.j2";

/// Stand-in target host until per-environment profiles exist.
pub const DEFAULT_BASE_URL: &str = "https://api.example.com";

/// Stand-in expectation; the rendered test asserts this verbatim.
pub const DEFAULT_EXPECTED_STATUS: u16 = 200;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to load template `{name}`: {source}")]
    Load {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("unclosed placeholder in template `{name}`")]
    UnclosedPlaceholder { name: String },
}

/// Looks up templates by file name under one directory, fixed at startup.
///
/// Which file backs a template identifier is deployment configuration; the
/// code only ever refers to the exported constants.
#[derive(Debug, Clone)]
pub struct TemplateStore {
    dir: PathBuf,
}

impl TemplateStore {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        TemplateStore { dir: dir.into() }
    }

    /// Reads `TEMPLATE_DIR`, falling back to `./templates`.
    pub fn from_env() -> Self {
        let dir = std::env::var("TEMPLATE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("templates"));
        TemplateStore::new(dir)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Render a named template against a flat context object.
    ///
    /// `{{ key }}` placeholders are replaced by the context value: strings
    /// verbatim, numbers and booleans via their canonical form. Unknown keys
    /// render as empty text.
    pub fn render(&self, name: &str, context: &Value) -> Result<String, RenderError> {
        let template = fs::read_to_string(self.dir.join(name)).map_err(|source| {
            RenderError::Load {
                name: name.to_string(),
                source,
            }
        })?;

        substitute(name, &template, context)
    }

    /// The fail-soft boundary: rendering problems degrade into a one-line
    /// comment in the generated source instead of failing the request.
    pub fn render_or_comment(&self, name: &str, context: &Value) -> String {
        match self.render(name, context) {
            Ok(source) => source,
            Err(err) => {
                error!(template = name, %err, "template rendering failed");
                format!("# Test generation error: {err}")
            }
        }
    }
}

fn substitute(name: &str, template: &str, context: &Value) -> Result<String, RenderError> {
    let mut output = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        output.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let end = after
            .find("}}")
            .ok_or_else(|| RenderError::UnclosedPlaceholder {
                name: name.to_string(),
            })?;

        match context.get(after[..end].trim()) {
            Some(Value::String(text)) => output.push_str(text),
            Some(Value::Null) | None => {}
            Some(value) => output.push_str(&value.to_string()),
        }

        rest = &after[end + 2..];
    }

    output.push_str(rest);
    Ok(output)
}

/// Build the render context for the single-endpoint API test template.
pub fn api_test_context(endpoint: &ApiEndpoint) -> Value {
    let flat_path = endpoint
        .path
        .replace('/', "_")
        .replace('{', "")
        .replace('}', "");

    let operation_id = if endpoint.operation_id.is_empty() {
        "N/A".to_string()
    } else {
        endpoint.operation_id.clone()
    };

    json!({
        "story_name": format!("API Test for {}", endpoint.path),
        "ClassName": format!("Test{}{}", endpoint.method, python_title_case(&flat_path)),
        "test_title": format!("Verify {} {}", endpoint.method, endpoint.path),
        "method_name": format!("test_{}", endpoint.method.to_lowercase()),
        "operation_id": operation_id,
        "method": endpoint.method,
        "path": endpoint.path,
        "base_url": DEFAULT_BASE_URL,
        "expected_status_code": DEFAULT_EXPECTED_STATUS,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use uuid::Uuid;

    struct TempTemplates {
        dir: PathBuf,
    }

    impl TempTemplates {
        fn with(name: &str, body: &str) -> Self {
            let dir = std::env::temp_dir().join(format!("testops-templates-{}", Uuid::new_v4()));
            fs::create_dir_all(&dir).unwrap();
            fs::write(dir.join(name), body).unwrap();
            TempTemplates { dir }
        }

        fn store(&self) -> TemplateStore {
            TemplateStore::new(self.dir.as_path())
        }
    }

    impl Drop for TempTemplates {
        fn drop(&mut self) {
            let _ = fs::remove_dir_all(&self.dir);
        }
    }

    fn endpoint() -> ApiEndpoint {
        ApiEndpoint {
            path: "/api/v1/users".to_string(),
            full_path: "/api/v1/users".to_string(),
            method: "GET".to_string(),
            operation_id: "listUsers".to_string(),
            summary: String::new(),
            description: String::new(),
            parameters: Vec::new(),
            has_request_body: false,
            tags: Vec::new(),
            responses: Vec::new(),
        }
    }

    #[test]
    fn substitutes_placeholders_with_and_without_spaces() {
        let tpl = TempTemplates::with("t.j2", "class {{ClassName}}: # {{ title }}");
        let rendered = tpl
            .store()
            .render("t.j2", &json!({"ClassName": "TestX", "title": "hello"}))
            .unwrap();
        assert_eq!(rendered, "class TestX: # hello");
    }

    #[test]
    fn numbers_render_in_canonical_form() {
        let tpl = TempTemplates::with("t.j2", "assert status == {{ code }}");
        let rendered = tpl.store().render("t.j2", &json!({"code": 200})).unwrap();
        assert_eq!(rendered, "assert status == 200");
    }

    #[test]
    fn unknown_keys_render_empty() {
        let tpl = TempTemplates::with("t.j2", "a{{ missing }}b");
        let rendered = tpl.store().render("t.j2", &json!({})).unwrap();
        assert_eq!(rendered, "ab");
    }

    #[test]
    fn single_braces_pass_through() {
        let tpl = TempTemplates::with("t.j2", "url = f\"{BASE}{{ path }}\"");
        let rendered = tpl.store().render("t.j2", &json!({"path": "/x"})).unwrap();
        assert_eq!(rendered, "url = f\"{BASE}/x\"");
    }

    #[test]
    fn unclosed_placeholder_is_a_render_error() {
        let tpl = TempTemplates::with("t.j2", "broken {{ name");
        let err = tpl.store().render("t.j2", &json!({})).unwrap_err();
        assert!(matches!(err, RenderError::UnclosedPlaceholder { .. }));
    }

    #[test]
    fn missing_template_turns_into_inline_comment() {
        let store = TemplateStore::new("/nonexistent-template-dir");
        let rendered = store.render_or_comment("nope.j2", &json!({}));
        assert!(rendered.starts_with("# Test generation error:"));
        assert!(rendered.contains("nope.j2"));
        assert_eq!(rendered.lines().count(), 1);
    }

    #[test]
    fn api_context_carries_the_template_keys() {
        let context = api_test_context(&endpoint());
        assert_eq!(context["ClassName"], "TestGET_Api_V1_Users");
        assert_eq!(context["method_name"], "test_get");
        assert_eq!(context["story_name"], "API Test for /api/v1/users");
        assert_eq!(context["test_title"], "Verify GET /api/v1/users");
        assert_eq!(context["operation_id"], "listUsers");
        assert_eq!(context["base_url"], DEFAULT_BASE_URL);
        assert_eq!(context["expected_status_code"], 200);
    }

    #[test]
    fn class_name_keeps_braces_out() {
        let mut ep = endpoint();
        ep.path = "/api/v1/users/{id}".to_string();
        ep.operation_id = String::new();

        let context = api_test_context(&ep);
        assert_eq!(context["ClassName"], "TestGET_Api_V1_Users_Id");
        assert_eq!(context["operation_id"], "N/A");
    }
}
