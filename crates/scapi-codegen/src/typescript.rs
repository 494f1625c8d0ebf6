//! TypeScript backend: interfaces, a server interface and a `fetch`
//! based client class.

use scapi_spec::{
    ApiSpec, Endpoint, Field, Formatter, PathComponent, PrimitiveKind, Response, TypeResolver,
};

use crate::generator::{
    base_url, check_names, path_params, query_params, ResponsePlan, Scaffolding, Surface, UrlParam,
};
use crate::mapping::{map_field, map_type, TypeSyntax};
use crate::naming::{export_name, quote};
use crate::{CodegenError, Generator};

struct TsSyntax;

impl TypeSyntax for TsSyntax {
    fn primitive(&self, kind: PrimitiveKind) -> &'static str {
        match kind {
            PrimitiveKind::String => "string",
            PrimitiveKind::Integer | PrimitiveKind::Float => "number",
            PrimitiveKind::Boolean => "boolean",
        }
    }

    fn dynamic(&self) -> &'static str {
        "unknown"
    }

    fn list(&self, element: &str) -> String {
        if element.contains(' ') {
            format!("({element})[]")
        } else {
            format!("{element}[]")
        }
    }

    fn optional(&self, ty: &str) -> String {
        format!("{ty} | null")
    }
}

#[derive(Debug, Clone, Default)]
pub struct TsGenerator;

impl TsGenerator {
    pub fn new() -> Self {
        Self
    }

    fn check_names(&self, api: &ApiSpec) -> Result<(), CodegenError> {
        let server = format!("{}Server", export_name(&api.name));
        let client = format!("{}Client", export_name(&api.name));
        let types = ["HTTPError", "DEFAULT_BASE_URL", server.as_str(), client.as_str()];
        let scaffolding = Scaffolding {
            types: &types,
            members: &["baseURL", "constructor"],
        };
        check_names(api, scaffolding, str::to_string)
    }

    /// `name?: T` for optional fields, `T | null` for nullable ones.
    fn emit_interface<'f>(
        &self,
        f: &mut Formatter,
        resolver: &TypeResolver<'_>,
        name: &str,
        fields: impl Iterator<Item = (&'f String, &'f Field)>,
    ) {
        f.line(format!("export interface {name} {{"));
        f.indent();
        for (field_name, field) in fields {
            let ty = map_field(&TsSyntax, resolver, field, field.nullable);
            let marker = if field.optional { "?" } else { "" };
            f.line(format!("{}{marker}: {ty};", property_name(field_name)));
        }
        f.dedent();
        f.line("}");
    }

    fn emit_input(&self, f: &mut Formatter, resolver: &TypeResolver<'_>, endpoint: &Endpoint) {
        let Some(input) = &endpoint.input else {
            return;
        };
        let name = &endpoint.name;
        if !input.params.is_empty() {
            let params = format!("{name}Params");
            self.emit_interface(f, resolver, &params, input.params.iter());
            f.blank();
        }
        if !input.query.is_empty() {
            let query = format!("{name}Query");
            self.emit_interface(f, resolver, &query, input.query.iter());
            f.blank();
        }
        f.line(format!("export interface {name}Input {{"));
        f.indent();
        if !input.params.is_empty() {
            f.line(format!("params: {name}Params;"));
        }
        if !input.query.is_empty() {
            f.line(format!("query: {name}Query;"));
        }
        if let Some(body) = &input.body {
            let marker = if input.body_optional { "?" } else { "" };
            let ty = map_type(&TsSyntax, resolver, body, false);
            f.line(format!("body{marker}: {ty};"));
        }
        f.dedent();
        f.line("}");
        f.blank();
    }

    fn result_type(&self, resolver: &TypeResolver<'_>, success: &Response) -> String {
        match &success.type_ref {
            Some(ty) => map_type(&TsSyntax, resolver, ty, false),
            None => "void".to_string(),
        }
    }

    /// Append the method signature to the line under construction.
    fn write_signature(&self, f: &mut Formatter, endpoint: &Endpoint, result: &str) {
        let name = &endpoint.name;
        f.partial(format!("{name}("));
        if endpoint.input.is_some() {
            f.partial(format!("input: {name}Input, "));
        }
        f.partial(format!("signal?: AbortSignal): Promise<{result}>"));
    }

    fn emit_client_method(
        &self,
        f: &mut Formatter,
        resolver: &TypeResolver<'_>,
        endpoint: &Endpoint,
    ) -> Result<(), CodegenError> {
        let plan = ResponsePlan::new(resolver, endpoint)?;
        let path_params = path_params(resolver, endpoint)?;
        let query_params = query_params(resolver, endpoint)?;
        let result = self.result_type(resolver, plan.success);

        f.partial("async ");
        self.write_signature(f, endpoint, &result);
        f.partial(" {");
        f.flush();
        f.indent();

        let mut path = String::new();
        for component in endpoint.path.components() {
            match component {
                PathComponent::Literal(text) => path.push_str(&template_escape(text)),
                PathComponent::Param(name) => {
                    let expr = format!("input.params{}", property_access(name));
                    let value = stringify(lookup_kind(&path_params, name), &expr);
                    path.push_str(&format!("${{encodeURIComponent({value})}}"));
                }
            }
        }
        f.line(format!("let url = `${{this.baseURL}}{path}`;"));

        if !query_params.is_empty() {
            f.line("const query = new URLSearchParams();");
            for param in &query_params {
                emit_query_append(f, param);
            }
            f.line("const search = query.toString();");
            f.line("if (search) {");
            f.indent();
            f.line("url += `?${search}`;");
            f.dedent();
            f.line("}");
        }

        f.line("const response = await fetch(url, {");
        f.indent();
        f.line(format!("method: {},", quote(endpoint.method.as_str())));
        match &endpoint.input {
            Some(input) if input.body.is_some() && input.body_optional => {
                f.line("...(input.body === undefined");
                f.indent();
                f.line("? {}");
                f.line(": {");
                f.indent();
                f.line("headers: { \"Content-Type\": \"application/json\" },");
                f.line("body: JSON.stringify(input.body),");
                f.dedent();
                f.line("}),");
                f.dedent();
            }
            Some(input) if input.body.is_some() => {
                f.line("headers: { \"Content-Type\": \"application/json\" },");
                f.line("body: JSON.stringify(input.body),");
            }
            _ => {}
        }
        f.line("signal,");
        f.dedent();
        f.line("});");

        f.line("switch (response.status) {");
        f.indent();
        f.line(format!("case {}:", plan.success.code));
        f.indent();
        if plan.success.type_ref.is_some() {
            f.line(format!("return (await response.json()) as {result};"));
        } else {
            f.line("return;");
        }
        f.dedent();
        for response in &plan.failures {
            f.line(format!("case {}:", response.code));
            f.indent();
            match &response.type_ref {
                Some(ty) => f.line(format!(
                    "throw new HTTPError(response.status, (await response.json()) as {});",
                    map_type(&TsSyntax, resolver, ty, false)
                )),
                None => f.line("throw new HTTPError(response.status, undefined);"),
            }
            f.dedent();
        }
        f.line("default:");
        f.indent();
        f.line("throw new Error(`unexpected status code: ${response.status}`);");
        f.dedent();
        f.dedent();
        f.line("}");

        f.dedent();
        f.line("}");
        Ok(())
    }
}

fn lookup_kind(params: &[UrlParam<'_>], name: &str) -> PrimitiveKind {
    params
        .iter()
        .find(|p| p.name == name)
        .map_or(PrimitiveKind::String, |p| p.kind)
}

fn stringify(kind: PrimitiveKind, expr: &str) -> String {
    match kind {
        PrimitiveKind::String => expr.to_string(),
        PrimitiveKind::Integer | PrimitiveKind::Float | PrimitiveKind::Boolean => {
            format!("String({expr})")
        }
    }
}

fn emit_query_append(f: &mut Formatter, param: &UrlParam<'_>) {
    let key = quote(param.name);
    let expr = format!("input.query{}", property_access(param.name));
    let present = param.field.optional || param.field.nullable;
    if param.field.is_multiple() {
        let items = if present { format!("{expr} ?? []") } else { expr };
        f.line(format!("for (const v of {items}) {{"));
        f.indent();
        f.line(format!("query.append({key}, {});", stringify(param.kind, "v")));
        f.dedent();
        f.line("}");
    } else if present {
        f.line(format!("if ({expr} != null) {{"));
        f.indent();
        f.line(format!("query.append({key}, {});", stringify(param.kind, &expr)));
        f.dedent();
        f.line("}");
    } else {
        f.line(format!("query.append({key}, {});", stringify(param.kind, &expr)));
    }
}

fn is_plain_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

fn property_name(name: &str) -> String {
    if is_plain_identifier(name) {
        name.to_string()
    } else {
        quote(name)
    }
}

/// Member access suffix: `.name` or `["name"]`.
fn property_access(name: &str) -> String {
    if is_plain_identifier(name) {
        format!(".{name}")
    } else {
        format!("[{}]", quote(name))
    }
}

fn template_escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('`', "\\`").replace("${", "\\${")
}

impl Generator for TsGenerator {
    fn file_header(&self, api: &ApiSpec, _surface: Surface) -> String {
        format!("// Code generated by scapi from api {}. DO NOT EDIT.\n\n", api.name)
    }

    fn generate_types(&self, api: &ApiSpec) -> Result<String, CodegenError> {
        self.check_names(api)?;
        let resolver = api.resolver();
        let mut f = Formatter::new();
        for (name, object) in resolver.objects() {
            self.emit_interface(&mut f, &resolver, name, object.fields.iter());
            f.blank();
        }
        for endpoint in &api.endpoints {
            self.emit_input(&mut f, &resolver, endpoint);
        }
        Ok(f.finish())
    }

    fn generate_server(&self, api: &ApiSpec) -> Result<String, CodegenError> {
        self.check_names(api)?;
        let resolver = api.resolver();
        let mut f = Formatter::new();
        f.line(format!("export interface {}Server {{", export_name(&api.name)));
        f.indent();
        for endpoint in &api.endpoints {
            let plan = ResponsePlan::new(&resolver, endpoint)?;
            let result = self.result_type(&resolver, plan.success);
            self.write_signature(&mut f, endpoint, &result);
            f.partial(";");
            f.flush();
        }
        f.dedent();
        f.line("}");
        Ok(f.finish())
    }

    fn generate_client(&self, api: &ApiSpec) -> Result<String, CodegenError> {
        self.check_names(api)?;
        let resolver = api.resolver();
        let mut f = Formatter::new();
        f.line(format!("export const DEFAULT_BASE_URL = {};", quote(base_url(api))));
        f.blank();
        f.line("export class HTTPError extends Error {");
        f.indent();
        f.line("constructor(public readonly status: number, public readonly body: unknown) {");
        f.indent();
        f.line("super(`http error: status ${status}`);");
        f.dedent();
        f.line("}");
        f.dedent();
        f.line("}");
        f.blank();
        f.line(format!("export class {}Client {{", export_name(&api.name)));
        f.indent();
        f.line("constructor(private readonly baseURL: string = DEFAULT_BASE_URL) {}");
        for endpoint in &api.endpoints {
            f.blank();
            self.emit_client_method(&mut f, &resolver, endpoint)?;
        }
        f.dedent();
        f.line("}");
        Ok(f.finish())
    }
}
