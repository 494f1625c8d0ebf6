//! Route templates such as `/users/{id}/posts`.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("path {path}: unterminated '{{' at position {offset}")]
    Unterminated { path: String, offset: usize },
    #[error("path {path}: empty parameter name at position {offset}")]
    EmptyParam { path: String, offset: usize },
    #[error("path {path}: unmatched '}}' at position {offset}")]
    UnmatchedBrace { path: String, offset: usize },
    #[error("path {path}: parameter {name} appears more than once")]
    DuplicateParam { path: String, name: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum PathComponent {
    Literal(String),
    Param(String),
}

/// A parsed route pattern.
///
/// Both [`components`](Self::components) and
/// [`format_string`](Self::format_string) are derived from the same
/// component list, so parameters appear in the same order in each.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct PathTemplate {
    raw: String,
    components: Vec<PathComponent>,
}

impl PathTemplate {
    pub fn parse(raw: &str) -> Result<Self, PathError> {
        let mut components = Vec::new();
        let mut literal = String::new();
        let mut chars = raw.char_indices();

        while let Some((offset, c)) = chars.next() {
            match c {
                '{' => {
                    let mut name = String::new();
                    let mut closed = false;
                    for (_, n) in chars.by_ref() {
                        match n {
                            '}' => {
                                closed = true;
                                break;
                            }
                            '{' => break,
                            _ => name.push(n),
                        }
                    }
                    if !closed {
                        return Err(PathError::Unterminated {
                            path: raw.to_string(),
                            offset,
                        });
                    }
                    if name.is_empty() {
                        return Err(PathError::EmptyParam {
                            path: raw.to_string(),
                            offset,
                        });
                    }
                    if components
                        .iter()
                        .any(|p| matches!(p, PathComponent::Param(existing) if *existing == name))
                    {
                        return Err(PathError::DuplicateParam {
                            path: raw.to_string(),
                            name,
                        });
                    }
                    if !literal.is_empty() {
                        components.push(PathComponent::Literal(std::mem::take(&mut literal)));
                    }
                    components.push(PathComponent::Param(name));
                }
                '}' => {
                    return Err(PathError::UnmatchedBrace {
                        path: raw.to_string(),
                        offset,
                    })
                }
                _ => literal.push(c),
            }
        }
        if !literal.is_empty() {
            components.push(PathComponent::Literal(literal));
        }

        Ok(Self {
            raw: raw.to_string(),
            components,
        })
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn components(&self) -> &[PathComponent] {
        &self.components
    }

    /// Parameter names in order of appearance.
    pub fn params(&self) -> impl Iterator<Item = &str> {
        self.components.iter().filter_map(|c| match c {
            PathComponent::Param(name) => Some(name.as_str()),
            PathComponent::Literal(_) => None,
        })
    }

    pub fn has_params(&self) -> bool {
        self.params().next().is_some()
    }

    /// printf-style template with one `%s` per parameter; a literal `%`
    /// is doubled.
    pub fn format_string(&self) -> String {
        let mut out = String::with_capacity(self.raw.len());
        for c in &self.components {
            match c {
                PathComponent::Literal(text) => out.push_str(&text.replace('%', "%%")),
                PathComponent::Param(_) => out.push_str("%s"),
            }
        }
        out
    }
}

impl FromStr for PathTemplate {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for PathTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
