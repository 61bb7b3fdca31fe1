// src/generator/scenarios.rs

use crate::parser::ApiEndpoint;
use serde::Serialize;

/// A human-readable test scenario synthesized from one endpoint operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestScenario {
    pub title: String,
    pub description: String,
    pub test_steps: Vec<String>,
    pub expected_results: Vec<String>,
}

/// Guess a readable resource noun from a path template.
///
/// Deliberately naive: one trailing `s` is stripped ("statuses" becomes
/// "statuse") and every segment starting with "api" is dropped, prefix
/// segments like "apikeys" included. Good enough for scenario prose.
pub fn resource_name(path: &str) -> String {
    let before_params = path.split('{').next().unwrap_or(path);
    let segments: Vec<&str> = before_params
        .split('/')
        .filter(|segment| !segment.is_empty() && !segment.starts_with("api"))
        .collect();

    match segments.last() {
        Some(segment) => {
            let readable = segment.replace('-', " ").replace('_', " ");
            match readable.strip_suffix('s') {
                Some(singular) => singular.to_string(),
                None => readable,
            }
        }
        None => "resource".to_string(),
    }
}

/// One-sentence scenario for an endpoint, or `None` for combinations that
/// have no sensible canned wording (bodiless PUT, HEAD, OPTIONS).
pub fn scenario_sentence(endpoint: &ApiEndpoint) -> Option<String> {
    let resource = resource_name(&endpoint.path);
    let path = endpoint.path.as_str();
    let has_path_param = path.contains('{');

    let sentence = match endpoint.method.as_str() {
        "GET" if has_path_param => format!(
            "Test fetching {resource} by ID. Verify status code 200 and correct data in the response."
        ),
        "GET" => format!(
            "Test fetching the list of {resource}. Verify status code 200 and the response structure (an array of objects)."
        ),
        "POST" if endpoint.has_request_body => format!(
            "Test creating {resource} with a minimal set of required fields. Verify status code 201 and the presence of an ID in the response."
        ),
        "POST" => format!(
            "Test invoking the {path} operation without a body. Verify status code 200 or 201."
        ),
        "PUT" if endpoint.has_request_body => format!(
            "Test updating {resource} by ID. Verify status code 200 and that the changes are applied."
        ),
        "DELETE" if has_path_param => {
            format!("Test deleting {resource} by ID. Verify status code 204 or 200.")
        }
        "DELETE" => format!("Test bulk deletion of {resource}. Verify status code 204."),
        "PATCH" => format!(
            "Test partially updating {resource} by ID. Verify status code 200 and that the changes are applied."
        ),
        _ => return None,
    };

    Some(sentence)
}

/// Sentences for a whole endpoint list; silent endpoints are skipped.
pub fn scenario_sentences(endpoints: &[ApiEndpoint]) -> Vec<String> {
    endpoints.iter().filter_map(scenario_sentence).collect()
}

/// Full scenario record for an endpoint: title, description, numbered steps
/// and expected results. Unlike [`scenario_sentence`] this never skips.
pub fn detailed_scenario(endpoint: &ApiEndpoint) -> TestScenario {
    TestScenario {
        title: format!("{} {}", endpoint.method, endpoint.path),
        description: scenario_description(endpoint),
        test_steps: test_steps(endpoint),
        expected_results: expected_results(endpoint),
    }
}

pub fn detailed_scenarios(endpoints: &[ApiEndpoint]) -> Vec<TestScenario> {
    endpoints.iter().map(detailed_scenario).collect()
}

fn scenario_description(endpoint: &ApiEndpoint) -> String {
    let path = endpoint.path.as_str();
    match endpoint.method.as_str() {
        "GET" => format!("Fetch data from {path}"),
        "POST" => format!("Create a new resource via {path}"),
        "PUT" => format!("Fully update a resource via {path}"),
        "DELETE" => format!("Delete a resource via {path}"),
        "PATCH" => format!("Partially update a resource via {path}"),
        method => format!("Send a {method} request to {path}"),
    }
}

// Step numbers are fixed, so a scenario without parameters or body keeps the
// gap (1, 2, 5). Consumers treat the numbers as labels, not indexes.
fn test_steps(endpoint: &ApiEndpoint) -> Vec<String> {
    let mut steps = vec![
        "1. Prepare test data".to_string(),
        format!("2. Send a {} request to {}", endpoint.method, endpoint.path),
    ];

    if !endpoint.parameters.is_empty() {
        let names: Vec<&str> = endpoint
            .parameters
            .iter()
            .map(|parameter| parameter.name.as_str())
            .collect();
        steps.push(format!("3. Pass parameters: [{}]", names.join(", ")));
    }

    if endpoint.has_request_body {
        steps.push("4. Pass a request body with minimal data".to_string());
    }

    steps.push("5. Receive and verify the response".to_string());
    steps
}

fn expected_results(endpoint: &ApiEndpoint) -> Vec<String> {
    let status = match endpoint.method.as_str() {
        "GET" | "PUT" | "PATCH" => "200",
        "POST" => "201",
        "DELETE" => "204 or 200",
        _ => "2xx",
    };

    let mut results = vec![format!("Status code: {status}")];

    match endpoint.method.as_str() {
        "GET" if !endpoint.path.contains('{') => {
            results.push("The response body contains an array of records".to_string());
        }
        "POST" => {
            results.push("The response contains the ID of the created resource".to_string());
        }
        "DELETE" => {
            results.push("The resource is deleted".to_string());
        }
        _ => {}
    }

    results.push("The response structure matches the specification".to_string());
    results
}
