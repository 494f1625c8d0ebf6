use crate::formatter::Formatter;
use crate::model::{ApiSpec, Field, TypeRef};

impl ApiSpec {
    /// Human-readable outline of the API in declaration order.
    pub fn summary(&self) -> String {
        let mut f = Formatter::new();
        f.line(format!("API Specification: {}", self.name));
        f.indent();
        f.line(format!("Base URL: {}", self.base_url));
        f.line("Endpoints:");
        f.indent();
        for endpoint in &self.endpoints {
            f.line(format!("Endpoint: {}", endpoint.name));
            f.indent();
            f.line(format!("Method: {}", endpoint.method));
            f.line(format!("Path: {}", endpoint.path));
            if let Some(input) = &endpoint.input {
                f.line("Input:");
                f.indent();
                if !input.params.is_empty() {
                    f.line("Params:");
                    f.indent();
                    for (name, field) in &input.params {
                        f.line(format!("- {}: {}", name, self.describe_field(field)));
                    }
                    f.dedent();
                }
                if !input.query.is_empty() {
                    f.line("Query:");
                    f.indent();
                    for (name, field) in &input.query {
                        f.line(format!("- {}: {}", name, self.describe_field(field)));
                    }
                    f.dedent();
                }
                if let Some(body) = &input.body {
                    let marker = if input.body_optional { " (optional)" } else { "" };
                    f.line(format!("Body: {}{}", self.describe(body), marker));
                    if let Ok(obj) = self.resolver().object_of(body) {
                        f.indent();
                        for (name, field) in &obj.fields {
                            f.line(format!("- {}: {}", name, self.describe_field(field)));
                        }
                        f.dedent();
                    }
                }
                f.dedent();
            }
            f.line("Responses:");
            f.indent();
            for resp in &endpoint.responses {
                match &resp.type_ref {
                    Some(type_ref) => {
                        f.line(format!("- {}: {}", resp.code, self.describe(type_ref)))
                    }
                    None => f.line(format!("- {}: no body", resp.code)),
                }
            }
            f.dedent();
            f.dedent();
        }
        f.finish()
    }

    fn describe(&self, type_ref: &TypeRef) -> String {
        match self.resolve(type_ref) {
            Some(ty) => format!("{} ({})", type_ref.name, ty.kind()),
            None => format!("{} (unresolved)", type_ref.name),
        }
    }

    fn describe_field(&self, field: &Field) -> String {
        let mut text = self.describe(&field.type_ref);
        if field.is_multiple() {
            text = format!("[{}]", text);
        }
        if field.optional {
            text.push_str(" optional");
        }
        if field.nullable {
            text.push_str(" nullable");
        }
        text
    }
}
