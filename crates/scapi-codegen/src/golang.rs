//! Go backend: structs with `json` tags, a server interface and a
//! `net/http` client.

use scapi_spec::{ApiSpec, Endpoint, Field, Formatter, PrimitiveKind, Response, TypeResolver};

use crate::generator::{
    base_url, check_names, path_params, query_params, ResponsePlan, Scaffolding, Surface, UrlParam,
};
use crate::mapping::{map_field, map_type, TypeSyntax};
use crate::naming::{export_name, go_exported_name, quote, NameTable};
use crate::{CodegenError, Generator};

struct GoSyntax;

impl TypeSyntax for GoSyntax {
    fn primitive(&self, kind: PrimitiveKind) -> &'static str {
        match kind {
            PrimitiveKind::String => "string",
            PrimitiveKind::Integer => "int",
            PrimitiveKind::Float => "float64",
            PrimitiveKind::Boolean => "bool",
        }
    }

    fn dynamic(&self) -> &'static str {
        "any"
    }

    fn list(&self, element: &str) -> String {
        format!("[]{element}")
    }

    // Slices and interfaces already have a nil value.
    fn optional(&self, ty: &str) -> String {
        if ty.starts_with("[]") || ty == "any" {
            ty.to_string()
        } else {
            format!("*{ty}")
        }
    }

    fn named(&self, name: &str) -> String {
        export_name(name)
    }
}

/// Client members that endpoint methods would otherwise shadow.
const CLIENT_MEMBERS: &[&str] = &["BaseURL", "HTTPClient"];

#[derive(Debug, Clone)]
pub struct GoGenerator {
    package: String,
}

impl Default for GoGenerator {
    fn default() -> Self {
        Self {
            package: "main".to_string(),
        }
    }
}

impl GoGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_package(mut self, package: impl Into<String>) -> Self {
        self.package = package.into();
        self
    }

    fn check_names(&self, api: &ApiSpec) -> Result<(), CodegenError> {
        let server = format!("{}Server", export_name(&api.name));
        let types = ["Client", "NewClient", "HTTPError", "DefaultBaseURL", server.as_str()];
        let scaffolding = Scaffolding {
            types: &types,
            members: CLIENT_MEMBERS,
        };
        check_names(api, scaffolding, export_name)
    }

    fn imports(&self, api: &ApiSpec, surface: Surface) -> Vec<&'static str> {
        let has_endpoints = !api.endpoints.is_empty();
        let mut imports = Vec::new();
        match surface {
            Surface::Types => {}
            Surface::Server => {
                if has_endpoints {
                    imports.push("context");
                }
            }
            Surface::Client => {
                imports.extend(["fmt", "net/http"]);
                if has_endpoints {
                    imports.push("context");
                }
                let bodies: Vec<_> = api
                    .endpoints
                    .iter()
                    .filter_map(|e| e.input.as_ref())
                    .filter(|input| input.body.is_some())
                    .collect();
                if !bodies.is_empty() {
                    imports.push("bytes");
                }
                if bodies.iter().any(|input| input.body_optional) {
                    imports.push("io");
                }
                if !bodies.is_empty() || api.responses().any(|r| r.type_ref.is_some()) {
                    imports.push("encoding/json");
                }
                if api
                    .endpoints
                    .iter()
                    .any(|e| e.path.has_params() || e.query().next().is_some())
                {
                    imports.push("net/url");
                }
            }
        }
        imports.sort_unstable();
        imports
    }

    /// Field names are always exported so `encoding/json` sees them; the
    /// tag keeps the declared name on the wire.
    fn emit_struct<'f>(
        &self,
        f: &mut Formatter,
        resolver: &TypeResolver<'_>,
        name: &str,
        fields: impl Iterator<Item = (&'f String, &'f Field)>,
        tags: bool,
    ) -> Result<(), CodegenError> {
        let mut names = NameTable::new();
        f.line(format!("type {name} struct {{"));
        f.indent();
        for (field_name, field) in fields {
            let go_name = go_exported_name(field_name);
            names.claim(go_name.clone(), format!("field {field_name} of {name}"))?;
            let ty = map_field(&GoSyntax, resolver, field, field.optional || field.nullable);
            if tags {
                let omit = if field.optional { ",omitempty" } else { "" };
                f.line(format!("{go_name} {ty} `json:\"{field_name}{omit}\"`"));
            } else {
                f.line(format!("{go_name} {ty}"));
            }
        }
        f.dedent();
        f.line("}");
        Ok(())
    }

    fn emit_input(
        &self,
        f: &mut Formatter,
        resolver: &TypeResolver<'_>,
        endpoint: &Endpoint,
    ) -> Result<(), CodegenError> {
        let Some(input) = &endpoint.input else {
            return Ok(());
        };
        let name = export_name(&endpoint.name);
        if !input.params.is_empty() {
            let params = format!("{name}Params");
            self.emit_struct(f, resolver, &params, input.params.iter(), false)?;
            f.blank();
        }
        if !input.query.is_empty() {
            let query = format!("{name}Query");
            self.emit_struct(f, resolver, &query, input.query.iter(), false)?;
            f.blank();
        }
        f.line(format!("type {name}Input struct {{"));
        f.indent();
        if !input.params.is_empty() {
            f.line(format!("Params {name}Params"));
        }
        if !input.query.is_empty() {
            f.line(format!("Query {name}Query"));
        }
        if let Some(body) = &input.body {
            let ty = map_type(&GoSyntax, resolver, body, input.body_optional);
            f.line(format!("Body {ty}"));
        }
        f.dedent();
        f.line("}");
        f.blank();
        Ok(())
    }

    /// The Go type returned on success, `None` for a response without a body.
    /// Always nil-able so error paths can return `nil`.
    fn result_type(&self, resolver: &TypeResolver<'_>, success: &Response) -> Option<String> {
        success
            .type_ref
            .as_ref()
            .map(|ty| map_type(&GoSyntax, resolver, ty, true))
    }

    /// Append the method signature to the line under construction.
    fn write_signature(&self, f: &mut Formatter, endpoint: &Endpoint, result: Option<&str>) {
        let name = export_name(&endpoint.name);
        f.partial(format!("{name}(ctx context.Context"));
        if endpoint.input.is_some() {
            f.partial(format!(", input {name}Input"));
        }
        match result {
            Some(ty) => f.partial(format!(") ({ty}, error)")),
            None => f.partial(") error"),
        }
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
        let fail = if result.is_some() { "nil, " } else { "" };

        f.partial("func (c *Client) ");
        self.write_signature(f, endpoint, result.as_deref());
        f.partial(" {");
        f.flush();
        f.indent();

        if !query_params.is_empty() {
            f.line("query := url.Values{}");
            for param in &query_params {
                emit_query_add(f, param);
            }
        }

        if path_params.is_empty() {
            f.line(format!("path := {}", quote(endpoint.path.raw())));
        } else {
            let args: Vec<String> = path_params
                .iter()
                .map(|p| {
                    let expr = format!("input.Params.{}", go_exported_name(p.name));
                    format!("url.PathEscape({})", stringify(p.kind, &expr))
                })
                .collect();
            f.line(format!(
                "path := fmt.Sprintf({}, {})",
                quote(&endpoint.path.format_string()),
                args.join(", ")
            ));
        }
        f.line("reqURL := c.BaseURL + path");
        if !query_params.is_empty() {
            f.line("if len(query) > 0 {");
            f.indent();
            f.line("reqURL += \"?\" + query.Encode()");
            f.dedent();
            f.line("}");
        }

        let body = endpoint.input.as_ref().filter(|input| input.body.is_some());
        let body_arg = match body {
            Some(input) if input.body_optional => {
                f.line("var reqBody io.Reader");
                f.line("if input.Body != nil {");
                f.indent();
                f.line("payload, err := json.Marshal(input.Body)");
                return_on_err(f, fail);
                f.line("reqBody = bytes.NewReader(payload)");
                f.dedent();
                f.line("}");
                "reqBody"
            }
            Some(_) => {
                f.line("payload, err := json.Marshal(input.Body)");
                return_on_err(f, fail);
                "bytes.NewReader(payload)"
            }
            None => "nil",
        };
        f.line(format!(
            "req, err := http.NewRequestWithContext(ctx, {}, reqURL, {body_arg})",
            quote(endpoint.method.as_str())
        ));
        return_on_err(f, fail);
        match body {
            Some(input) if input.body_optional => {
                f.line("if reqBody != nil {");
                f.indent();
                f.line("req.Header.Set(\"Content-Type\", \"application/json\")");
                f.dedent();
                f.line("}");
            }
            Some(_) => f.line("req.Header.Set(\"Content-Type\", \"application/json\")"),
            None => {}
        }
        f.line("resp, err := c.HTTPClient.Do(req)");
        return_on_err(f, fail);
        f.line("defer resp.Body.Close()");

        f.line("switch resp.StatusCode {");
        f.line(format!("case {}:", plan.success.code));
        f.indent();
        match &result {
            Some(ty) => {
                let value = ty.strip_prefix('*');
                f.line(format!("var out {}", value.unwrap_or(ty)));
                decode_into(f, "out", fail);
                f.line(if value.is_some() {
                    "return &out, nil"
                } else {
                    "return out, nil"
                });
            }
            None => f.line("return nil"),
        }
        f.dedent();
        for response in &plan.failures {
            f.line(format!("case {}:", response.code));
            f.indent();
            match &response.type_ref {
                Some(ty) => {
                    f.line(format!("var body {}", map_type(&GoSyntax, resolver, ty, false)));
                    decode_into(f, "body", fail);
                    f.line(format!(
                        "return {fail}&HTTPError{{Code: resp.StatusCode, Body: body}}"
                    ));
                }
                None => f.line(format!("return {fail}&HTTPError{{Code: resp.StatusCode}}")),
            }
            f.dedent();
        }
        f.line("default:");
        f.indent();
        f.line(format!(
            "return {fail}fmt.Errorf(\"unexpected status code: %d\", resp.StatusCode)"
        ));
        f.dedent();
        f.line("}");

        f.dedent();
        f.line("}");
        Ok(())
    }
}

fn stringify(kind: PrimitiveKind, expr: &str) -> String {
    match kind {
        PrimitiveKind::String => expr.to_string(),
        PrimitiveKind::Integer => format!("fmt.Sprintf(\"%d\", {expr})"),
        PrimitiveKind::Float => format!("fmt.Sprintf(\"%g\", {expr})"),
        PrimitiveKind::Boolean => format!("fmt.Sprintf(\"%t\", {expr})"),
    }
}

fn emit_query_add(f: &mut Formatter, param: &UrlParam<'_>) {
    let key = quote(param.name);
    let expr = format!("input.Query.{}", go_exported_name(param.name));
    if param.field.is_multiple() {
        f.line(format!("for _, v := range {expr} {{"));
        f.indent();
        f.line(format!("query.Add({key}, {})", stringify(param.kind, "v")));
        f.dedent();
        f.line("}");
    } else if param.field.optional || param.field.nullable {
        f.line(format!("if {expr} != nil {{"));
        f.indent();
        let value = stringify(param.kind, &format!("*{expr}"));
        f.line(format!("query.Add({key}, {value})"));
        f.dedent();
        f.line("}");
    } else {
        f.line(format!("query.Add({key}, {})", stringify(param.kind, &expr)));
    }
}

fn return_on_err(f: &mut Formatter, fail: &str) {
    f.line("if err != nil {");
    f.indent();
    f.line(format!("return {fail}err"));
    f.dedent();
    f.line("}");
}

fn decode_into(f: &mut Formatter, var: &str, fail: &str) {
    f.line(format!(
        "if err := json.NewDecoder(resp.Body).Decode(&{var}); err != nil {{"
    ));
    f.indent();
    f.line(format!("return {fail}err"));
    f.dedent();
    f.line("}");
}

impl Generator for GoGenerator {
    fn file_header(&self, api: &ApiSpec, surface: Surface) -> String {
        let mut f = Formatter::new();
        f.line(format!("// Code generated by scapi from api {}. DO NOT EDIT.", api.name));
        f.blank();
        f.line(format!("package {}", self.package));
        f.blank();
        let imports = self.imports(api, surface);
        if !imports.is_empty() {
            f.line("import (");
            f.indent();
            for import in imports {
                f.line(quote(import));
            }
            f.dedent();
            f.line(")");
            f.blank();
        }
        f.finish()
    }

    fn generate_types(&self, api: &ApiSpec) -> Result<String, CodegenError> {
        self.check_names(api)?;
        let resolver = api.resolver();
        let mut f = Formatter::new();
        for (name, object) in resolver.objects() {
            let name = export_name(name);
            self.emit_struct(&mut f, &resolver, &name, object.fields.iter(), true)?;
            f.blank();
        }
        for endpoint in &api.endpoints {
            self.emit_input(&mut f, &resolver, endpoint)?;
        }
        Ok(f.finish())
    }

    fn generate_server(&self, api: &ApiSpec) -> Result<String, CodegenError> {
        self.check_names(api)?;
        let resolver = api.resolver();
        let mut f = Formatter::new();
        f.line(format!("type {}Server interface {{", export_name(&api.name)));
        f.indent();
        for endpoint in &api.endpoints {
            let plan = ResponsePlan::new(&resolver, endpoint)?;
            let result = self.result_type(&resolver, plan.success);
            self.write_signature(&mut f, endpoint, result.as_deref());
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
        f.line(format!("const DefaultBaseURL = {}", quote(base_url(api))));
        f.blank();
        f.line("// HTTPError carries a declared non-success response.");
        f.line("type HTTPError struct {");
        f.indent();
        f.line("Code int");
        f.line("Body any");
        f.dedent();
        f.line("}");
        f.blank();
        f.line("func (e *HTTPError) Error() string {");
        f.indent();
        f.line("return fmt.Sprintf(\"http error: status %d\", e.Code)");
        f.dedent();
        f.line("}");
        f.blank();
        f.line("type Client struct {");
        f.indent();
        f.line("BaseURL string");
        f.line("HTTPClient *http.Client");
        f.dedent();
        f.line("}");
        f.blank();
        f.line("func NewClient(baseURL string) *Client {");
        f.indent();
        f.line("return &Client{BaseURL: baseURL, HTTPClient: http.DefaultClient}");
        f.dedent();
        f.line("}");
        for endpoint in &api.endpoints {
            f.blank();
            self.emit_client_method(&mut f, &resolver, endpoint)?;
        }
        Ok(f.finish())
    }
}
