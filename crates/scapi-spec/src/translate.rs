//! Lowering of the parsed AST into an [`ApiSpec`].
//!
//! Translation is purely structural: type references are copied by name
//! and only checked later by [`ApiSpec::validate`].

use crate::model::{
    ApiSpec, Cardinality, Endpoint, Field, HttpMethod, InputShape, ObjectType, Response, Type,
    TypeRef,
};
use crate::path::{PathError, PathTemplate};
use indexmap::IndexMap;
use scapi_ast::ast::{EndpointDecl, EndpointField, FieldDecl, HttpVerb, Spec, TypeExpr};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranslateError {
    #[error("type {name} collides with the built-in primitive of the same name")]
    PrimitiveCollision { name: String },

    #[error("type {name} is declared more than once")]
    DuplicateType { name: String },

    #[error("{owner} declares field {field} more than once")]
    DuplicateField { owner: String, field: String },

    #[error("endpoint {name} is declared more than once")]
    DuplicateEndpoint { name: String },

    #[error("endpoint {endpoint} has an invalid path template")]
    InvalidPath {
        endpoint: String,
        #[source]
        source: PathError,
    },
}

#[derive(Debug, Clone)]
pub struct Translator {
    base_url: String,
}

impl Default for Translator {
    fn default() -> Self {
        Self::new()
    }
}

impl Translator {
    pub fn new() -> Self {
        Self {
            base_url: ApiSpec::DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn translate(&self, spec: &Spec) -> Result<ApiSpec, TranslateError> {
        let mut types = IndexMap::new();
        for decl in spec.types() {
            let name = decl.name.text.clone();
            if types.contains_key(&name) {
                return Err(TranslateError::DuplicateType { name });
            }
            let fields = lower_fields(&format!("type {}", name), &decl.fields)?;
            types.insert(name, Type::Object(ObjectType { fields }));
        }

        let mut endpoints: Vec<Endpoint> = Vec::new();
        for decl in spec.endpoints() {
            if endpoints.iter().any(|e| e.name == decl.name.text) {
                return Err(TranslateError::DuplicateEndpoint {
                    name: decl.name.text.clone(),
                });
            }
            endpoints.push(lower_endpoint(decl)?);
        }

        let api = ApiSpec::new(spec.name.text.clone(), &self.base_url, types, endpoints)?;
        tracing::debug!(
            api = %api.name,
            types = api.types.len(),
            endpoints = api.endpoints.len(),
            "translated api definition"
        );
        Ok(api)
    }
}

/// Translate with the default base URL.
pub fn translate(spec: &Spec) -> Result<ApiSpec, TranslateError> {
    Translator::new().translate(spec)
}

fn lower_field(decl: &FieldDecl) -> Field {
    let cardinality = match &decl.ty {
        TypeExpr::Simple(_) => Cardinality::Single,
        TypeExpr::Array { .. } => Cardinality::Multiple,
    };
    Field {
        type_ref: TypeRef::new(decl.ty.base_name()),
        optional: decl.optional,
        nullable: decl.nullable,
        cardinality,
    }
}

fn lower_fields(
    owner: &str,
    decls: &[FieldDecl],
) -> Result<IndexMap<String, Field>, TranslateError> {
    let mut fields = IndexMap::with_capacity(decls.len());
    for decl in decls {
        if fields
            .insert(decl.name.text.clone(), lower_field(decl))
            .is_some()
        {
            return Err(TranslateError::DuplicateField {
                owner: owner.to_string(),
                field: decl.name.text.clone(),
            });
        }
    }
    Ok(fields)
}

fn lower_method(verb: HttpVerb) -> HttpMethod {
    match verb {
        HttpVerb::Get => HttpMethod::Get,
        HttpVerb::Post => HttpMethod::Post,
        HttpVerb::Put => HttpMethod::Put,
        HttpVerb::Delete => HttpMethod::Delete,
        HttpVerb::Patch => HttpMethod::Patch,
    }
}

fn lower_endpoint(decl: &EndpointDecl) -> Result<Endpoint, TranslateError> {
    let name = decl.name.text.clone();
    let path = PathTemplate::parse(&decl.path.text).map_err(|source| TranslateError::InvalidPath {
        endpoint: name.clone(),
        source,
    })?;

    let mut input: Option<InputShape> = None;
    let mut responses = Vec::new();
    for field in &decl.body {
        match field {
            EndpointField::Params { fields, .. } => {
                let owner = format!("endpoint {} params", name);
                let params = lower_fields(&owner, fields)?;
                input.get_or_insert_with(InputShape::default).params = params;
            }
            EndpointField::Query { fields, .. } => {
                let owner = format!("endpoint {} query", name);
                let query = lower_fields(&owner, fields)?;
                input.get_or_insert_with(InputShape::default).query = query;
            }
            EndpointField::Body {
                type_name,
                optional,
                ..
            } => {
                let shape = input.get_or_insert_with(InputShape::default);
                shape.body = Some(TypeRef::new(type_name.text.clone()));
                shape.body_optional = *optional;
            }
            EndpointField::Response {
                code, type_name, ..
            } => responses.push(Response::new(*code, type_name.text.clone())),
        }
    }

    Ok(Endpoint {
        name,
        method: lower_method(decl.method),
        path,
        input,
        responses,
    })
}
