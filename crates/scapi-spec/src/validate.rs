// Structural and referential checks over a translated ApiSpec.

use crate::model::{ApiSpec, Endpoint, Type, TypeRef};
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;

/// Where a type reference was found; used in error messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefSite {
    Field { ty: String, field: String },
    ArrayElement { ty: String },
    Param { endpoint: String, param: String },
    Query { endpoint: String, param: String },
    Body { endpoint: String },
    Response { endpoint: String, code: u32 },
}

impl fmt::Display for RefSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RefSite::Field { ty, field } => write!(f, "field {} of type {}", field, ty),
            RefSite::ArrayElement { ty } => write!(f, "array element type of {}", ty),
            RefSite::Param { endpoint, param } => {
                write!(f, "endpoint {} param {}", endpoint, param)
            }
            RefSite::Query { endpoint, param } => {
                write!(f, "endpoint {} query {}", endpoint, param)
            }
            RefSite::Body { endpoint } => write!(f, "endpoint {} body", endpoint),
            RefSite::Response { endpoint, code } => {
                write!(f, "endpoint {} response {}", endpoint, code)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("API name cannot be empty")]
    EmptyName,

    #[error("API base URL cannot be empty")]
    EmptyBaseUrl,

    #[error("invalid API base URL {url}: {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("unresolved type reference: {name} in {site}")]
    UnresolvedType { name: String, site: RefSite },

    #[error("recursive type: {}", cycle.join(" -> "))]
    RecursiveType { cycle: Vec<String> },

    #[error("endpoint {endpoint} param {param} cannot be optional")]
    OptionalParam { endpoint: String, param: String },

    #[error("endpoint {endpoint} param {param} cannot be nullable")]
    NullableParam { endpoint: String, param: String },

    #[error("endpoint {endpoint} has no responses defined")]
    NoResponses { endpoint: String },

    #[error("endpoint {endpoint} has invalid response code: {code}")]
    InvalidResponseCode { endpoint: String, code: u32 },

    #[error("endpoint {endpoint} has duplicate response code: {code}")]
    DuplicateResponseCode { endpoint: String, code: u32 },

    #[error("endpoint {endpoint} path parameter {param} is not declared in params")]
    UndeclaredPathParam { endpoint: String, param: String },

    #[error("endpoint {endpoint} param {param} does not appear in path {path}")]
    ParamNotInPath {
        endpoint: String,
        param: String,
        path: String,
    },
}

type Result<T> = std::result::Result<T, ValidationError>;

impl ApiSpec {
    /// Run every check, stopping at the first violation.
    pub fn validate(&self) -> Result<()> {
        self.validate_header()?;
        self.validate_types()?;
        self.validate_endpoints()?;
        self.validate_paths()?;
        tracing::debug!(api = %self.name, "api definition is valid");
        Ok(())
    }

    pub fn validate_header(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if self.base_url.is_empty() {
            return Err(ValidationError::EmptyBaseUrl);
        }
        url::Url::parse(&self.base_url).map_err(|source| ValidationError::InvalidBaseUrl {
            url: self.base_url.clone(),
            source,
        })?;
        Ok(())
    }

    /// Every object field and array element must resolve, transitively.
    /// Recursive types are rejected.
    pub fn validate_types(&self) -> Result<()> {
        let mut walker = TypeWalker {
            api: self,
            done: HashSet::new(),
            stack: Vec::new(),
        };
        for (name, ty) in &self.types {
            if walker.done.contains(name.as_str()) {
                continue;
            }
            walker.stack.push(name.as_str());
            walker.walk_type(name, ty)?;
            walker.stack.pop();
            walker.done.insert(name.as_str());
        }
        Ok(())
    }

    pub fn validate_endpoints(&self) -> Result<()> {
        for endpoint in &self.endpoints {
            self.validate_endpoint(endpoint)?;
        }
        Ok(())
    }

    fn validate_endpoint(&self, endpoint: &Endpoint) -> Result<()> {
        let ep = || endpoint.name.clone();

        for (param, field) in endpoint.params() {
            if field.optional {
                return Err(ValidationError::OptionalParam {
                    endpoint: ep(),
                    param: param.clone(),
                });
            }
            if field.nullable {
                return Err(ValidationError::NullableParam {
                    endpoint: ep(),
                    param: param.clone(),
                });
            }
            self.check_ref(
                &field.type_ref,
                RefSite::Param {
                    endpoint: ep(),
                    param: param.clone(),
                },
            )?;
        }

        for (param, field) in endpoint.query() {
            self.check_ref(
                &field.type_ref,
                RefSite::Query {
                    endpoint: ep(),
                    param: param.clone(),
                },
            )?;
        }

        if let Some(body) = endpoint.body() {
            self.check_ref(body, RefSite::Body { endpoint: ep() })?;
        }

        if endpoint.responses.is_empty() {
            return Err(ValidationError::NoResponses { endpoint: ep() });
        }

        let mut seen = HashSet::new();
        for resp in &endpoint.responses {
            if !(100..=599).contains(&resp.code) {
                return Err(ValidationError::InvalidResponseCode {
                    endpoint: ep(),
                    code: resp.code,
                });
            }
            if !seen.insert(resp.code) {
                return Err(ValidationError::DuplicateResponseCode {
                    endpoint: ep(),
                    code: resp.code,
                });
            }
            if let Some(type_ref) = &resp.type_ref {
                self.check_ref(
                    type_ref,
                    RefSite::Response {
                        endpoint: ep(),
                        code: resp.code,
                    },
                )?;
            }
        }
        Ok(())
    }

    /// Path parameters and declared `params` must be the same set.
    pub fn validate_paths(&self) -> Result<()> {
        for endpoint in &self.endpoints {
            let declared: Vec<&str> = endpoint.params().map(|(name, _)| name.as_str()).collect();
            for param in endpoint.path.params() {
                if !declared.contains(&param) {
                    return Err(ValidationError::UndeclaredPathParam {
                        endpoint: endpoint.name.clone(),
                        param: param.to_string(),
                    });
                }
            }
            for param in declared {
                if !endpoint.path.params().any(|p| p == param) {
                    return Err(ValidationError::ParamNotInPath {
                        endpoint: endpoint.name.clone(),
                        param: param.to_string(),
                        path: endpoint.path.raw().to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    fn check_ref(&self, type_ref: &TypeRef, site: RefSite) -> Result<&Type> {
        self.resolve(type_ref)
            .ok_or_else(|| ValidationError::UnresolvedType {
                name: type_ref.name.clone(),
                site,
            })
    }
}

/// Depth-first walk over the type graph with a path stack for cycle
/// detection and a set of types already proven sound.
struct TypeWalker<'a> {
    api: &'a ApiSpec,
    done: HashSet<&'a str>,
    stack: Vec<&'a str>,
}

impl<'a> TypeWalker<'a> {
    fn walk_type(&mut self, name: &'a str, ty: &'a Type) -> Result<()> {
        match ty {
            Type::Primitive(_) => Ok(()),
            Type::Object(obj) => {
                for (field_name, field) in &obj.fields {
                    let site = RefSite::Field {
                        ty: name.to_string(),
                        field: field_name.clone(),
                    };
                    self.walk_ref(&field.type_ref, site)?;
                }
                Ok(())
            }
            Type::Array(arr) => self.walk_ref(
                &arr.element,
                RefSite::ArrayElement {
                    ty: name.to_string(),
                },
            ),
        }
    }

    fn walk_ref(&mut self, type_ref: &'a TypeRef, site: RefSite) -> Result<()> {
        let ty = self.api.check_ref(type_ref, site)?;
        let name = type_ref.name.as_str();
        if matches!(ty, Type::Primitive(_)) || self.done.contains(name) {
            return Ok(());
        }
        if let Some(pos) = self.stack.iter().position(|n| *n == name) {
            let mut cycle: Vec<String> = self.stack[pos..].iter().map(|s| s.to_string()).collect();
            cycle.push(name.to_string());
            return Err(ValidationError::RecursiveType { cycle });
        }
        self.stack.push(name);
        self.walk_type(name, ty)?;
        self.stack.pop();
        self.done.insert(name);
        Ok(())
    }
}
