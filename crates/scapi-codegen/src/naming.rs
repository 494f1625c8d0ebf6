use std::collections::HashMap;

use crate::CodegenError;

/// Exported-identifier form: first character upper-cased (`userId` -> `UserId`).
pub fn export_name(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Like [`export_name`], but always an exported Go identifier: names that
/// still do not start with an uppercase letter get an `X` prefix
/// (`_id` -> `X_id`).
pub fn go_exported_name(name: &str) -> String {
    let exported = export_name(name);
    if exported.chars().next().is_some_and(char::is_uppercase) {
        exported
    } else {
        format!("X{exported}")
    }
}

/// Escape text for a double-quoted string literal (Go and TypeScript agree
/// on these escapes).
pub fn quote(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Generated identifiers in one namespace, each with the declaration that
/// produced it.
#[derive(Debug, Default)]
pub struct NameTable {
    owners: HashMap<String, String>,
}

impl NameTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn claim(
        &mut self,
        name: impl Into<String>,
        owner: impl Into<String>,
    ) -> Result<(), CodegenError> {
        let name = name.into();
        let owner = owner.into();
        if let Some(first) = self.owners.get(&name) {
            return Err(CodegenError::NameCollision {
                name,
                first: first.clone(),
                second: owner,
            });
        }
        self.owners.insert(name, owner);
        Ok(())
    }
}
