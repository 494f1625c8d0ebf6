#![deny(unused_must_use)]
#![warn(clippy::dbg_macro, clippy::todo, clippy::unimplemented)]
#![forbid(unsafe_code)]

mod formatter;
pub mod model;
pub mod path;
mod resolver;
mod summary;
mod translate;
mod validate;

pub use formatter::Formatter;
pub use model::{
    ApiSpec, ArrayType, Cardinality, Endpoint, Field, HttpMethod, InputShape, ObjectType,
    PrimitiveKind, Response, Type, TypeKind, TypeRef,
};
pub use path::{PathComponent, PathError, PathTemplate};
pub use resolver::{ResolveError, TypeResolver};
pub use translate::{translate, TranslateError, Translator};
pub use validate::{RefSite, ValidationError};
