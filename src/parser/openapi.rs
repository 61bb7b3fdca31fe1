// src/parser/openapi.rs

use serde::Serialize;
use serde_json::{Map, Value};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, warn};

/// HTTP verbs recognized as operations inside a path item. Any other key
/// (`parameters`, `servers`, vendor extensions) is ignored.
const HTTP_METHODS: [&str; 7] = ["get", "post", "put", "delete", "patch", "head", "options"];

#[derive(Debug, Error)]
pub enum ParserError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[cfg(feature = "yaml")]
    #[error("YAML parsing error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("YAML support is not compiled in; rebuild with the `yaml` feature to read YAML specifications")]
    YamlUnavailable,

    #[error("could not determine the document format ({attempts})")]
    FormatUndetermined { attempts: String },

    #[error("the document root must be a mapping")]
    InvalidTopLevel,

    #[error("the document has neither an `openapi` nor a `swagger` field")]
    NotAnApiSpec,

    #[error("malformed operation node for {method} {path}")]
    InvalidOperationNode { path: String, method: String },
}

pub type Result<T> = std::result::Result<T, ParserError>;

/// Declared format of an uploaded specification, usually taken from the
/// file extension. `Unknown` triggers content auto-detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatHint {
    Json,
    Yaml,
    Unknown,
}

impl FormatHint {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        match path.as_ref().extension().and_then(|ext| ext.to_str()) {
            Some(ext) => Self::from_extension(ext),
            None => FormatHint::Unknown,
        }
    }

    pub fn from_file_name(name: &str) -> Self {
        Self::from_path(Path::new(name))
    }

    fn from_extension(extension: &str) -> Self {
        match extension.to_lowercase().as_str() {
            "json" => FormatHint::Json,
            "yaml" | "yml" => FormatHint::Yaml,
            _ => FormatHint::Unknown,
        }
    }
}

/// One endpoint operation extracted from a specification.
///
/// Duplicate `(path, method)` pairs are preserved exactly as declared, and
/// the final list is sorted by `(path, method)` so downstream consumers can
/// rely on a deterministic "first endpoint".
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiEndpoint {
    /// The path template as written in the spec (e.g. "/users/{id}")
    pub path: String,

    /// The path prefixed with the first declared server URL, when present
    pub full_path: String,

    /// HTTP method, uppercase
    pub method: String,

    pub operation_id: String,
    pub summary: String,
    pub description: String,

    pub parameters: Vec<ApiParameter>,

    /// Whether the operation declares a `requestBody` (presence only; the
    /// body schema is not inspected)
    pub has_request_body: bool,

    pub tags: Vec<String>,

    /// Status codes declared under `responses`, as spelled in the spec
    pub responses: Vec<String>,
}

/// One declared parameter of an endpoint operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiParameter {
    pub name: String,

    /// Where the parameter lives: path, query, header or cookie
    #[serde(rename = "in")]
    pub location: String,

    pub required: bool,

    /// `schema.type`, defaulting to "string" when undeclared
    #[serde(rename = "type")]
    pub param_type: String,

    pub description: String,
}

/// Parse a specification file; the extension decides the format hint.
pub fn parse_spec_file<P: AsRef<Path>>(path: P) -> Result<Vec<ApiEndpoint>> {
    let hint = FormatHint::from_path(&path);
    let mut file = File::open(path)?;
    let mut content = String::new();
    file.read_to_string(&mut content)?;

    parse_spec(&content, hint)
}

/// Parse specification text into the normalized endpoint list.
pub fn parse_spec(content: &str, hint: FormatHint) -> Result<Vec<ApiEndpoint>> {
    let document = load_document(content, hint)?;
    parse_endpoints(&document)
}

/// Turn raw JSON or YAML text into a document tree and check that it looks
/// like an OpenAPI specification at the top level.
pub fn load_document(content: &str, hint: FormatHint) -> Result<Value> {
    let document = match hint {
        FormatHint::Json => serde_json::from_str(content)?,
        FormatHint::Yaml => parse_yaml(content)?,
        FormatHint::Unknown => detect_and_parse(content)?,
    };

    let root = document.as_object().ok_or(ParserError::InvalidTopLevel)?;
    if !root.contains_key("openapi") && !root.contains_key("swagger") {
        return Err(ParserError::NotAnApiSpec);
    }

    if let Some(version) = root.get("openapi").and_then(Value::as_str) {
        debug!(version, "loaded OpenAPI document");
    } else if let Some(version) = root.get("swagger").and_then(Value::as_str) {
        debug!(version, "loaded Swagger document");
    }

    Ok(document)
}

/// Formats tried when no hint is available, in declaration order. JSON must
/// come first: JSON is a YAML subset, so the reverse order would misreport
/// broken JSON uploads as YAML errors.
fn detection_order() -> Vec<(&'static str, fn(&str) -> std::result::Result<Value, String>)> {
    let mut order: Vec<(&'static str, fn(&str) -> std::result::Result<Value, String>)> =
        Vec::new();
    order.push(("JSON", try_json));
    #[cfg(feature = "yaml")]
    order.push(("YAML", try_yaml));
    order
}

fn try_json(content: &str) -> std::result::Result<Value, String> {
    serde_json::from_str(content).map_err(|err| err.to_string())
}

#[cfg(feature = "yaml")]
fn try_yaml(content: &str) -> std::result::Result<Value, String> {
    serde_yaml::from_str(content).map_err(|err| err.to_string())
}

fn detect_and_parse(content: &str) -> Result<Value> {
    let mut attempts = Vec::new();
    for (format, parse) in detection_order() {
        match parse(content) {
            Ok(value) => {
                debug!(format, "auto-detected specification format");
                return Ok(value);
            }
            Err(reason) => attempts.push(format!("{format}: {reason}")),
        }
    }

    #[cfg(not(feature = "yaml"))]
    attempts.push("YAML: support not compiled in (enable the `yaml` feature)".to_string());

    Err(ParserError::FormatUndetermined {
        attempts: attempts.join("; "),
    })
}

#[cfg(feature = "yaml")]
fn parse_yaml(content: &str) -> Result<Value> {
    Ok(serde_yaml::from_str(content)?)
}

#[cfg(not(feature = "yaml"))]
fn parse_yaml(_content: &str) -> Result<Value> {
    Err(ParserError::YamlUnavailable)
}

/// Walk the `paths` object and collect every endpoint operation.
///
/// A spec without paths is valid and yields an empty list; only a
/// structurally broken operation node is an error.
pub fn parse_endpoints(document: &Value) -> Result<Vec<ApiEndpoint>> {
    let base_url = document
        .get("servers")
        .and_then(Value::as_array)
        .and_then(|servers| servers.first())
        .and_then(|server| server.get("url"))
        .and_then(Value::as_str)
        .unwrap_or("")
        .to_string();

    let paths = match document.get("paths").and_then(Value::as_object) {
        Some(paths) if !paths.is_empty() => paths,
        _ => {
            warn!("specification declares no paths; nothing to generate from");
            return Ok(Vec::new());
        }
    };

    let mut endpoints = Vec::new();
    for (path, path_item) in paths {
        let path_object = match path_item.as_object() {
            Some(object) => object,
            None => continue,
        };

        for (key, operation) in path_object {
            let method = key.to_lowercase();
            if !HTTP_METHODS.contains(&method.as_str()) {
                continue;
            }

            let operation = operation
                .as_object()
                .ok_or_else(|| ParserError::InvalidOperationNode {
                    path: path.clone(),
                    method: method.to_uppercase(),
                })?;

            endpoints.push(normalize_endpoint(path, &base_url, &method, operation));
        }
    }

    endpoints.sort_by(|a, b| a.path.cmp(&b.path).then_with(|| a.method.cmp(&b.method)));
    debug!(count = endpoints.len(), "parsed endpoint operations");

    Ok(endpoints)
}

/// All endpoint field defaulting lives here.
fn normalize_endpoint(
    path: &str,
    base_url: &str,
    method: &str,
    operation: &Map<String, Value>,
) -> ApiEndpoint {
    let parameters = operation
        .get("parameters")
        .and_then(Value::as_array)
        .map(|parameters| {
            parameters
                .iter()
                .filter_map(Value::as_object)
                .map(normalize_parameter)
                .collect()
        })
        .unwrap_or_default();

    let tags = operation
        .get("tags")
        .and_then(Value::as_array)
        .map(|tags| {
            tags.iter()
                .filter_map(Value::as_str)
                .map(String::from)
                .collect()
        })
        .unwrap_or_default();

    let responses = operation
        .get("responses")
        .and_then(Value::as_object)
        .map(|responses| responses.keys().cloned().collect())
        .unwrap_or_default();

    ApiEndpoint {
        path: path.to_string(),
        full_path: format!("{base_url}{path}"),
        method: method.to_uppercase(),
        operation_id: string_field(operation, "operationId"),
        summary: string_field(operation, "summary"),
        description: string_field(operation, "description"),
        parameters,
        has_request_body: operation.contains_key("requestBody"),
        tags,
        responses,
    }
}

fn normalize_parameter(parameter: &Map<String, Value>) -> ApiParameter {
    ApiParameter {
        name: string_field(parameter, "name"),
        location: string_field(parameter, "in"),
        required: parameter
            .get("required")
            .and_then(Value::as_bool)
            .unwrap_or(false),
        param_type: parameter
            .get("schema")
            .and_then(|schema| schema.get("type"))
            .and_then(Value::as_str)
            .unwrap_or("string")
            .to_string(),
        description: string_field(parameter, "description"),
    }
}

fn string_field(object: &Map<String, Value>, key: &str) -> String {
    object
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or("")
        .to_string()
}
