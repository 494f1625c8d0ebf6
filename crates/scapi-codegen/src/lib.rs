//! Client and server scaffolding for validated API definitions.
//!
//! The framework (type mapping, URL parameter plans, response dispatch) is
//! shared; [`GoGenerator`] and [`TsGenerator`] supply the target syntax.

#![forbid(unsafe_code)]
#![deny(unused_must_use)]
#![warn(clippy::dbg_macro, clippy::todo, clippy::unimplemented)]

mod error;
mod generator;
mod golang;
mod mapping;
mod naming;
mod typescript;

pub use error::CodegenError;
pub use generator::{
    base_url, check_names, path_params, query_params, Generator, ResponsePlan, Scaffolding,
    Surface, UrlParam,
};
pub use golang::GoGenerator;
pub use mapping::{map_field, map_type, TypeSyntax};
pub use naming::{export_name, go_exported_name};
pub use scapi_spec::Formatter;
pub use typescript::TsGenerator;
