pub mod span {
    use serde::Serialize;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
    pub struct Span {
        pub start: u32,
        pub end: u32,
    }
}

pub mod ast {
    use super::span::Span;
    use serde::Serialize;

    /// A whole API definition: `api Name` followed by its declarations.
    #[derive(Debug, Serialize)]
    pub struct Spec {
        pub name: Ident,
        pub declarations: Vec<Declaration>,
        pub span: Span,
    }

    impl Spec {
        pub fn types(&self) -> impl Iterator<Item = &TypeDecl> {
            self.declarations.iter().filter_map(|d| match d {
                Declaration::Type(t) => Some(t),
                Declaration::Endpoint(_) => None,
            })
        }

        pub fn endpoints(&self) -> impl Iterator<Item = &EndpointDecl> {
            self.declarations.iter().filter_map(|d| match d {
                Declaration::Endpoint(e) => Some(e),
                Declaration::Type(_) => None,
            })
        }
    }

    #[derive(Debug, Serialize)]
    pub enum Declaration {
        Type(TypeDecl),
        Endpoint(EndpointDecl),
    }

    #[derive(Debug, Serialize)]
    pub struct TypeDecl {
        pub name: Ident,
        pub fields: Vec<FieldDecl>,
        pub span: Span,
    }

    #[derive(Debug, Serialize)]
    pub struct FieldDecl {
        pub name: Ident,
        pub ty: TypeExpr,
        /// `name?: T` -- the field may be absent.
        pub optional: bool,
        /// `name: T?` -- the field may be present and null.
        pub nullable: bool,
        pub span: Span,
    }

    #[derive(Debug, Clone, Serialize)]
    pub struct Ident {
        pub text: String,
        pub span: Span,
    }

    #[derive(Debug, Clone, Serialize)]
    pub enum TypeExpr {
        Simple(Ident),
        Array { element: Box<TypeExpr>, span: Span },
    }

    impl TypeExpr {
        /// Name of the innermost named type (`[User]` -> `User`).
        pub fn base_name(&self) -> &str {
            match self {
                TypeExpr::Simple(id) => &id.text,
                TypeExpr::Array { element, .. } => element.base_name(),
            }
        }

        pub fn is_array(&self) -> bool {
            matches!(self, TypeExpr::Array { .. })
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
    pub enum HttpVerb {
        Get,
        Post,
        Put,
        Delete,
        Patch,
    }

    #[derive(Debug, Serialize)]
    pub struct PathLit {
        pub text: String,
        pub span: Span,
    }

    #[derive(Debug, Serialize)]
    pub struct EndpointDecl {
        pub name: Ident,
        pub method: HttpVerb,
        pub path: PathLit,
        pub body: Vec<EndpointField>,
        pub span: Span,
    }

    /// Blocks allowed inside an endpoint, in grammar order.
    #[derive(Debug, Serialize)]
    pub enum EndpointField {
        Params {
            fields: Vec<FieldDecl>,
            span: Span,
        },
        Query {
            fields: Vec<FieldDecl>,
            span: Span,
        },
        Body {
            type_name: Ident,
            optional: bool,
            span: Span,
        },
        Response {
            code: u32,
            type_name: Ident,
            span: Span,
        },
    }
}
