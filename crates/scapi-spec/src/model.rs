//! The semantic model produced by translation.
//!
//! Type references are by name and resolved lazily against
//! [`ApiSpec::types`]. All maps preserve insertion order so that anything
//! generated from the model is reproducible.

use crate::path::PathTemplate;
use crate::resolver::TypeResolver;
use crate::translate::TranslateError;
use indexmap::IndexMap;
use std::fmt;

#[cfg(feature = "serde")]
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum PrimitiveKind {
    String,
    Integer,
    Float,
    Boolean,
}

impl PrimitiveKind {
    pub const ALL: [PrimitiveKind; 4] = [
        PrimitiveKind::String,
        PrimitiveKind::Integer,
        PrimitiveKind::Float,
        PrimitiveKind::Boolean,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PrimitiveKind::String => "string",
            PrimitiveKind::Integer => "integer",
            PrimitiveKind::Float => "float",
            PrimitiveKind::Boolean => "boolean",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Name-based reference into the type table.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct TypeRef {
    pub name: String,
}

impl TypeRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum Cardinality {
    #[default]
    Single,
    Multiple,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Field {
    pub type_ref: TypeRef,
    /// May be absent from the payload.
    pub optional: bool,
    /// May be present with an explicit null.
    pub nullable: bool,
    pub cardinality: Cardinality,
}

impl Field {
    /// A required, non-null, single-valued field.
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_ref: TypeRef::new(type_name),
            optional: false,
            nullable: false,
            cardinality: Cardinality::Single,
        }
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn multiple(mut self) -> Self {
        self.cardinality = Cardinality::Multiple;
        self
    }

    pub fn is_multiple(&self) -> bool {
        self.cardinality == Cardinality::Multiple
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ObjectType {
    pub fields: IndexMap<String, Field>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ArrayType {
    pub element: TypeRef,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum Type {
    Primitive(PrimitiveKind),
    Object(ObjectType),
    Array(ArrayType),
}

impl Type {
    pub fn kind(&self) -> TypeKind {
        match self {
            Type::Primitive(_) => TypeKind::Primitive,
            Type::Object(_) => TypeKind::Object,
            Type::Array(_) => TypeKind::Array,
        }
    }

    pub fn object<I, K>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, Field)>,
        K: Into<String>,
    {
        Type::Object(ObjectType {
            fields: fields.into_iter().map(|(k, f)| (k.into(), f)).collect(),
        })
    }

    pub fn array(element: impl Into<String>) -> Self {
        Type::Array(ArrayType {
            element: TypeRef::new(element),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum TypeKind {
    Primitive,
    Object,
    Array,
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TypeKind::Primitive => "primitive",
            TypeKind::Object => "object",
            TypeKind::Array => "array",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Response {
    pub code: u32,
    /// `None` means an empty body.
    pub type_ref: Option<TypeRef>,
}

impl Response {
    pub fn new(code: u32, type_name: impl Into<String>) -> Self {
        Self {
            code,
            type_ref: Some(TypeRef::new(type_name)),
        }
    }

    pub fn empty(code: u32) -> Self {
        Self {
            code,
            type_ref: None,
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.code)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct InputShape {
    pub params: IndexMap<String, Field>,
    pub query: IndexMap<String, Field>,
    pub body: Option<TypeRef>,
    pub body_optional: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Endpoint {
    pub name: String,
    pub method: HttpMethod,
    pub path: PathTemplate,
    pub input: Option<InputShape>,
    pub responses: Vec<Response>,
}

impl Endpoint {
    pub fn params(&self) -> impl Iterator<Item = (&String, &Field)> {
        self.input.iter().flat_map(|i| i.params.iter())
    }

    pub fn query(&self) -> impl Iterator<Item = (&String, &Field)> {
        self.input.iter().flat_map(|i| i.query.iter())
    }

    pub fn body(&self) -> Option<&TypeRef> {
        self.input.as_ref().and_then(|i| i.body.as_ref())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ApiSpec {
    pub name: String,
    pub base_url: String,
    pub types: IndexMap<String, Type>,
    pub endpoints: Vec<Endpoint>,
}

impl ApiSpec {
    pub const DEFAULT_BASE_URL: &'static str = "localhost:8080";

    /// Build a spec from user types and endpoints.
    ///
    /// The four primitive names are seeded ahead of the user types; a user
    /// type with one of those names is a [`TranslateError::PrimitiveCollision`].
    /// A non-empty base URL is normalized to end in exactly one `/`.
    pub fn new(
        name: impl Into<String>,
        base_url: &str,
        user_types: IndexMap<String, Type>,
        endpoints: Vec<Endpoint>,
    ) -> Result<Self, TranslateError> {
        let mut types: IndexMap<String, Type> = PrimitiveKind::ALL
            .into_iter()
            .map(|p| (p.name().to_string(), Type::Primitive(p)))
            .collect();

        for (type_name, ty) in user_types {
            if types.contains_key(&type_name) {
                return Err(TranslateError::PrimitiveCollision { name: type_name });
            }
            types.insert(type_name, ty);
        }

        Ok(Self {
            name: name.into(),
            base_url: normalize_base_url(base_url),
            types,
            endpoints,
        })
    }

    pub fn resolve(&self, type_ref: &TypeRef) -> Option<&Type> {
        self.types.get(&type_ref.name)
    }

    pub fn resolver(&self) -> TypeResolver<'_> {
        TypeResolver::new(self)
    }

    /// Every response of every endpoint, in declaration order.
    pub fn responses(&self) -> impl Iterator<Item = &Response> {
        self.endpoints.iter().flat_map(|e| e.responses.iter())
    }

    pub fn endpoint(&self, name: &str) -> Option<&Endpoint> {
        self.endpoints.iter().find(|e| e.name == name)
    }
}

fn normalize_base_url(url: &str) -> String {
    if url.is_empty() {
        return String::new();
    }
    format!("{}/", url.trim_end_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_gets_single_trailing_slash() {
        assert_eq!(normalize_base_url("localhost:8080"), "localhost:8080/");
        assert_eq!(normalize_base_url("http://api.test//"), "http://api.test/");
        assert_eq!(normalize_base_url(""), "");
    }

    #[test]
    fn primitives_are_seeded_first() {
        let api = ApiSpec::new(
            "T",
            "localhost",
            IndexMap::from([("User".to_string(), Type::object([("id", Field::new("string"))]))]),
            vec![],
        )
        .unwrap();
        let names: Vec<_> = api.types.keys().map(String::as_str).collect();
        assert_eq!(names, ["string", "integer", "float", "boolean", "User"]);
    }

    #[test]
    fn success_range_is_half_open() {
        assert!(Response::empty(200).is_success());
        assert!(Response::empty(299).is_success());
        assert!(!Response::empty(300).is_success());
        assert!(!Response::empty(199).is_success());
    }
}
