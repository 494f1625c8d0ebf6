//! Target-independent type mapping.
//!
//! A backend describes its type spellings through [`TypeSyntax`]; the
//! walk over references, arrays and cardinality is shared.

use scapi_spec::{Field, PrimitiveKind, Type, TypeRef, TypeResolver};

/// Arrays nested deeper than this map to the dynamic type.
const MAX_DEPTH: usize = 32;

pub trait TypeSyntax {
    fn primitive(&self, kind: PrimitiveKind) -> &'static str;

    /// Spelling used for anything that cannot be resolved.
    fn dynamic(&self) -> &'static str;

    fn list(&self, element: &str) -> String;

    /// Wrap a type in the target's optional/nullable convention.
    fn optional(&self, ty: &str) -> String;

    fn named(&self, name: &str) -> String {
        name.to_string()
    }
}

pub fn map_type<S>(
    syntax: &S,
    resolver: &TypeResolver<'_>,
    type_ref: &TypeRef,
    optional: bool,
) -> String
where
    S: TypeSyntax + ?Sized,
{
    let ty = map_ref(syntax, resolver, type_ref, 0);
    if optional {
        syntax.optional(&ty)
    } else {
        ty
    }
}

/// Like [`map_type`], but a `Multiple` field becomes a list of its type.
pub fn map_field<S>(
    syntax: &S,
    resolver: &TypeResolver<'_>,
    field: &Field,
    optional: bool,
) -> String
where
    S: TypeSyntax + ?Sized,
{
    let mut ty = map_ref(syntax, resolver, &field.type_ref, 0);
    if field.is_multiple() {
        ty = syntax.list(&ty);
    }
    if optional {
        syntax.optional(&ty)
    } else {
        ty
    }
}

fn map_ref<S>(syntax: &S, resolver: &TypeResolver<'_>, type_ref: &TypeRef, depth: usize) -> String
where
    S: TypeSyntax + ?Sized,
{
    if depth > MAX_DEPTH {
        return syntax.dynamic().to_string();
    }
    match resolver.resolve(type_ref) {
        Ok(Type::Primitive(kind)) => syntax.primitive(*kind).to_string(),
        Ok(Type::Object(_)) => syntax.named(&type_ref.name),
        Ok(Type::Array(arr)) => syntax.list(&map_ref(syntax, resolver, &arr.element, depth + 1)),
        Err(_) => syntax.dynamic().to_string(),
    }
}
