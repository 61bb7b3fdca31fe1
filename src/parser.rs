// Reading and interpreting OpenAPI/Swagger documents: format detection,
// top-level validation and endpoint normalization.

pub mod openapi;

pub use openapi::{
    load_document,
    parse_endpoints,
    parse_spec,
    parse_spec_file,
    ApiEndpoint,
    ApiParameter,
    FormatHint,
    ParserError,
    Result,
};
