use scapi_spec::ResolveError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodegenError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error("endpoint {endpoint} path parameter {param} is not declared in params")]
    UnknownPathParam { endpoint: String, param: String },

    /// Path and query parameters are rendered into the URL and must be
    /// primitives (query parameters may also be lists of primitives).
    #[error("endpoint {endpoint} parameter {param} cannot be sent in the URL: {found}")]
    NonScalarParam {
        endpoint: String,
        param: String,
        found: String,
    },

    /// Two declarations map to the same identifier in the generated code.
    #[error("generated name {name} is produced by both {first} and {second}")]
    NameCollision {
        name: String,
        first: String,
        second: String,
    },
}
