//! Read-only type queries over a validated [`ApiSpec`].
//!
//! Code generators go through [`TypeResolver`] rather than the type table.
//! Every lookup is fallible: a spec that slipped past validation, or an
//! endpoint without a 2xx response, produces a [`ResolveError`].

use crate::model::{ApiSpec, Endpoint, ObjectType, PrimitiveKind, Response, Type, TypeKind, TypeRef};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("unresolved type reference: {name}")]
    Unresolved { name: String },

    #[error("type {name} is {found}, expected {expected}")]
    KindMismatch {
        name: String,
        expected: TypeKind,
        found: TypeKind,
    },

    #[error("endpoint {endpoint} has no success (2xx) response")]
    NoSuccessResponse { endpoint: String },
}

#[derive(Debug, Clone, Copy)]
pub struct TypeResolver<'a> {
    api: &'a ApiSpec,
}

impl<'a> TypeResolver<'a> {
    pub fn new(api: &'a ApiSpec) -> Self {
        Self { api }
    }

    pub fn resolve(&self, type_ref: &TypeRef) -> Result<&'a Type, ResolveError> {
        self.api
            .resolve(type_ref)
            .ok_or_else(|| ResolveError::Unresolved {
                name: type_ref.name.clone(),
            })
    }

    pub fn kind_of(&self, type_ref: &TypeRef) -> Result<TypeKind, ResolveError> {
        self.resolve(type_ref).map(Type::kind)
    }

    pub fn is_primitive(&self, type_ref: &TypeRef) -> bool {
        self.kind_of(type_ref) == Ok(TypeKind::Primitive)
    }

    pub fn is_object(&self, type_ref: &TypeRef) -> bool {
        self.kind_of(type_ref) == Ok(TypeKind::Object)
    }

    pub fn is_array(&self, type_ref: &TypeRef) -> bool {
        self.kind_of(type_ref) == Ok(TypeKind::Array)
    }

    pub fn primitive_of(&self, type_ref: &TypeRef) -> Result<PrimitiveKind, ResolveError> {
        match self.resolve(type_ref)? {
            Type::Primitive(kind) => Ok(*kind),
            other => Err(mismatch(type_ref, TypeKind::Primitive, other)),
        }
    }

    pub fn object_of(&self, type_ref: &TypeRef) -> Result<&'a ObjectType, ResolveError> {
        match self.resolve(type_ref)? {
            Type::Object(obj) => Ok(obj),
            other => Err(mismatch(type_ref, TypeKind::Object, other)),
        }
    }

    pub fn array_element(&self, type_ref: &TypeRef) -> Result<&'a TypeRef, ResolveError> {
        match self.resolve(type_ref)? {
            Type::Array(arr) => Ok(&arr.element),
            other => Err(mismatch(type_ref, TypeKind::Array, other)),
        }
    }

    /// Declared object types, in declaration order.
    pub fn objects(&self) -> impl Iterator<Item = (&'a str, &'a ObjectType)> {
        self.api.types.iter().filter_map(|(name, ty)| match ty {
            Type::Object(obj) => Some((name.as_str(), obj)),
            _ => None,
        })
    }

    /// First response in declared order with a code in [200, 300).
    pub fn success_response<'e>(
        &self,
        endpoint: &'e Endpoint,
    ) -> Result<&'e Response, ResolveError> {
        endpoint
            .responses
            .iter()
            .find(|r| r.is_success())
            .ok_or_else(|| ResolveError::NoSuccessResponse {
                endpoint: endpoint.name.clone(),
            })
    }
}

fn mismatch(type_ref: &TypeRef, expected: TypeKind, found: &Type) -> ResolveError {
    ResolveError::KindMismatch {
        name: type_ref.name.clone(),
        expected,
        found: found.kind(),
    }
}
