// src/validator.rs

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

static TEST_FUNCTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"def (test_\w+)\s*\(").expect("test function pattern compiles"));

static DECORATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"@[\w.]+").expect("decorator pattern compiles"));

/// How far back (in chars) to look for decorators above a test function.
const DECORATOR_WINDOW: usize = 200;

/// Advisory findings over a piece of generated test code. `valid` reflects
/// errors only; warnings ride along in `messages` after them.
#[derive(Debug, Clone, Serialize)]
pub struct Validation {
    pub valid: bool,
    pub messages: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestFunction {
    pub name: String,
    pub decorators: Vec<String>,
    pub has_allure: bool,
}

/// Check generated code for the conventions the test suite relies on.
/// Purely advisory: no caller blocks on the result.
pub fn validate_test_code(code: &str) -> Validation {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    if !code.to_lowercase().contains("@allure") {
        errors.push("the code contains no Allure decorators".to_string());
    }
    if !code.contains("def test_") {
        errors.push("no test function found (names must start with `test_`)".to_string());
    }

    if !code.contains("import requests") && !code.contains("from requests") {
        warnings.push("no `requests` import found; the test may not call the API".to_string());
    }
    if !code.contains("assert") {
        warnings.push("the code contains no assert checks".to_string());
    }

    let valid = errors.is_empty();
    let mut messages = errors;
    messages.append(&mut warnings);

    Validation { valid, messages }
}

/// List `test_*` functions together with the decorators directly above
/// them. Decorators are collected from a fixed look-behind window, which is
/// more than enough for generated code.
pub fn extract_test_functions(code: &str) -> Vec<TestFunction> {
    let mut functions = Vec::new();

    for captures in TEST_FUNCTION.captures_iter(code) {
        let name = match captures.get(1) {
            Some(name) => name.as_str().to_string(),
            None => continue,
        };

        let start = captures.get(0).map_or(0, |m| m.start());
        let mut window_start = start.saturating_sub(DECORATOR_WINDOW);
        while !code.is_char_boundary(window_start) {
            window_start += 1;
        }

        let decorators: Vec<String> = DECORATOR
            .find_iter(&code[window_start..start])
            .map(|m| m.as_str().to_string())
            .collect();
        let has_allure = decorators
            .iter()
            .any(|decorator| decorator.starts_with("@allure"));

        functions.push(TestFunction {
            name,
            decorators,
            has_allure,
        });
    }

    functions
}

#[cfg(test)]
mod tests {
    use super::*;

    const GOOD_TEST: &str = r#"
import requests
import allure

@allure.feature("Users")
class TestUsers:
    @allure.title("List users")
    def test_get_users(self):
        response = requests.get("https://api.example.com/users")
        assert response.status_code == 200
"#;

    #[test]
    fn well_formed_code_passes() {
        let validation = validate_test_code(GOOD_TEST);
        assert!(validation.valid);
        assert!(validation.messages.is_empty());
    }

    #[test]
    fn missing_allure_is_an_error() {
        let validation = validate_test_code("def test_x():\n    assert True");
        assert!(!validation.valid);
        assert!(validation.messages[0].contains("Allure"));
    }

    #[test]
    fn missing_test_function_is_an_error() {
        let validation = validate_test_code("@allure.feature('x')\ndef helper():\n    pass");
        assert!(!validation.valid);
        assert!(validation
            .messages
            .iter()
            .any(|message| message.contains("test function")));
    }

    #[test]
    fn warnings_do_not_invalidate() {
        let code = "@allure.title('t')\ndef test_math():\n    assert 1 + 1 == 2";
        let validation = validate_test_code(code);
        assert!(validation.valid);
        // No requests import: warning only.
        assert_eq!(validation.messages.len(), 1);
        assert!(validation.messages[0].contains("requests"));
    }

    #[test]
    fn errors_precede_warnings() {
        let validation = validate_test_code("print('nothing here')");
        assert!(!validation.valid);
        assert_eq!(validation.messages.len(), 4);
        assert!(validation.messages[0].contains("Allure"));
        assert!(validation.messages[3].contains("assert"));
    }

    #[test]
    fn extracts_functions_with_their_decorators() {
        let functions = extract_test_functions(GOOD_TEST);
        assert_eq!(functions.len(), 1);
        assert_eq!(functions[0].name, "test_get_users");
        assert!(functions[0].has_allure);
        assert!(functions[0]
            .decorators
            .iter()
            .any(|decorator| decorator == "@allure.title"));
    }

    #[test]
    fn undecorated_function_has_no_allure() {
        let functions = extract_test_functions("def test_bare():\n    assert True");
        assert_eq!(functions.len(), 1);
        assert!(!functions[0].has_allure);
        assert!(functions[0].decorators.is_empty());
    }
}
