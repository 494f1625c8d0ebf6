use scapi_spec::{
    ApiSpec, Endpoint, Field, PathComponent, PrimitiveKind, ResolveError, Response, TypeResolver,
};
use tracing::debug;

use crate::naming::NameTable;
use crate::CodegenError;

/// Which part of the scaffolding to emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    Types,
    Server,
    Client,
}

impl Surface {
    pub fn as_str(self) -> &'static str {
        match self {
            Surface::Types => "types",
            Surface::Server => "server",
            Surface::Client => "client",
        }
    }
}

/// A code-generation backend.
///
/// Each surface method returns declarations only. [`Generator::generate_file`]
/// assembles a complete source file: the file header, the types, then the
/// requested surface.
pub trait Generator {
    fn generate_types(&self, api: &ApiSpec) -> Result<String, CodegenError>;
    fn generate_server(&self, api: &ApiSpec) -> Result<String, CodegenError>;
    fn generate_client(&self, api: &ApiSpec) -> Result<String, CodegenError>;

    /// Preamble for a complete file (package clause, imports, banner).
    fn file_header(&self, api: &ApiSpec, surface: Surface) -> String;

    fn generate_file(&self, api: &ApiSpec, surface: Surface) -> Result<String, CodegenError> {
        let mut out = self.file_header(api, surface);
        out.push_str(&self.generate_types(api)?);
        match surface {
            Surface::Types => {}
            Surface::Server => {
                out.push('\n');
                out.push_str(&self.generate_server(api)?);
            }
            Surface::Client => {
                out.push('\n');
                out.push_str(&self.generate_client(api)?);
            }
        }
        debug!(surface = surface.as_str(), bytes = out.len(), "generated file");
        Ok(out)
    }
}

/// Identifiers the backend emits on its own, independent of the API.
#[derive(Debug, Clone, Copy)]
pub struct Scaffolding<'s> {
    /// Top-level declarations (client class, error type, server interface).
    pub types: &'s [&'s str],
    /// Client members that endpoint methods must not shadow.
    pub members: &'s [&'s str],
}

/// Reject APIs whose declarations map onto the same generated identifier:
/// object types, input wrappers and scaffolding share one namespace, endpoint
/// methods and client members another. `ident` is the backend's mapping from
/// a declared name to its identifier.
pub fn check_names(
    api: &ApiSpec,
    scaffolding: Scaffolding<'_>,
    ident: impl Fn(&str) -> String,
) -> Result<(), CodegenError> {
    let mut types = NameTable::new();
    for name in scaffolding.types {
        types.claim(*name, "generated scaffolding")?;
    }
    for (name, _) in api.resolver().objects() {
        types.claim(ident(name), format!("type {name}"))?;
    }

    let mut members = NameTable::new();
    for name in scaffolding.members {
        members.claim(*name, "generated client member")?;
    }

    for endpoint in &api.endpoints {
        let base = ident(&endpoint.name);
        let owner = |what: &str| format!("{what} of endpoint {}", endpoint.name);
        members.claim(base.clone(), owner("method"))?;
        let Some(input) = &endpoint.input else {
            continue;
        };
        if !input.params.is_empty() {
            types.claim(format!("{base}Params"), owner("params wrapper"))?;
        }
        if !input.query.is_empty() {
            types.claim(format!("{base}Query"), owner("query wrapper"))?;
        }
        types.claim(format!("{base}Input"), owner("input wrapper"))?;
    }
    Ok(())
}

/// A parameter that is rendered into the URL.
#[derive(Debug, Clone, Copy)]
pub struct UrlParam<'a> {
    pub name: &'a str,
    pub field: &'a Field,
    pub kind: PrimitiveKind,
}

/// Path parameters in the order they appear in the path template.
pub fn path_params<'a>(
    resolver: &TypeResolver<'_>,
    endpoint: &'a Endpoint,
) -> Result<Vec<UrlParam<'a>>, CodegenError> {
    let mut out = Vec::new();
    for component in endpoint.path.components() {
        let PathComponent::Param(name) = component else {
            continue;
        };
        let field = endpoint
            .input
            .as_ref()
            .and_then(|input| input.params.get_key_value(name.as_str()));
        let Some((name, field)) = field else {
            return Err(CodegenError::UnknownPathParam {
                endpoint: endpoint.name.clone(),
                param: name.clone(),
            });
        };
        if field.is_multiple() {
            let found = "a list cannot be a path segment".to_string();
            return Err(non_scalar(endpoint, name, found));
        }
        let kind = scalar_kind(resolver, endpoint, name, field)?;
        out.push(UrlParam { name, field, kind });
    }
    Ok(out)
}

/// Query parameters in declaration order. Lists of primitives are allowed.
pub fn query_params<'a>(
    resolver: &TypeResolver<'_>,
    endpoint: &'a Endpoint,
) -> Result<Vec<UrlParam<'a>>, CodegenError> {
    let mut out = Vec::new();
    for (name, field) in endpoint.query() {
        let kind = scalar_kind(resolver, endpoint, name, field)?;
        out.push(UrlParam { name, field, kind });
    }
    Ok(out)
}

fn scalar_kind(
    resolver: &TypeResolver<'_>,
    endpoint: &Endpoint,
    name: &str,
    field: &Field,
) -> Result<PrimitiveKind, CodegenError> {
    match resolver.primitive_of(&field.type_ref) {
        Ok(kind) => Ok(kind),
        Err(ResolveError::KindMismatch { name: ty, found, .. }) => {
            let found = format!("{ty} has kind {found}, not primitive");
            Err(non_scalar(endpoint, name, found))
        }
        Err(err) => Err(err.into()),
    }
}

fn non_scalar(endpoint: &Endpoint, param: &str, found: String) -> CodegenError {
    CodegenError::NonScalarParam {
        endpoint: endpoint.name.clone(),
        param: param.to_string(),
        found,
    }
}

/// Status dispatch for a client method: the success case first, then every
/// other declared response in declaration order.
#[derive(Debug)]
pub struct ResponsePlan<'a> {
    pub success: &'a Response,
    pub failures: Vec<&'a Response>,
}

impl<'a> ResponsePlan<'a> {
    pub fn new(resolver: &TypeResolver<'_>, endpoint: &'a Endpoint) -> Result<Self, CodegenError> {
        let success = resolver.success_response(endpoint)?;
        let failures = endpoint
            .responses
            .iter()
            .filter(|r| r.code != success.code)
            .collect();
        Ok(Self { success, failures })
    }
}

/// Base URL without the trailing slash, ready to be joined with a path.
pub fn base_url(api: &ApiSpec) -> &str {
    api.base_url.trim_end_matches('/')
}
