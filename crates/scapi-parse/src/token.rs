use scapi_ast::span::Span;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum TokKind {
    // trivia / eof / error
    Eof,
    /// A character outside the language alphabet.
    Error(char),
    // punctuation
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Colon,
    Question,
    // keywords
    KwApi,
    KwType,
    KwEndpoint,
    KwParams,
    KwQuery,
    KwBody,
    KwResponses,
    // HTTP verbs
    KwGet,
    KwPost,
    KwPut,
    KwDelete,
    KwPatch,
    // primitive type names
    KwString,
    KwInteger,
    KwBoolean,
    KwFloat,
    // idents / literals
    Ident(String),
    Number(String),
    Path(String),
}

impl TokKind {
    pub fn keyword(s: &str) -> Option<TokKind> {
        let kind = match s {
            "api" => TokKind::KwApi,
            "type" => TokKind::KwType,
            "endpoint" => TokKind::KwEndpoint,
            "params" => TokKind::KwParams,
            "query" => TokKind::KwQuery,
            "body" => TokKind::KwBody,
            "responses" => TokKind::KwResponses,
            "GET" => TokKind::KwGet,
            "POST" => TokKind::KwPost,
            "PUT" => TokKind::KwPut,
            "DELETE" => TokKind::KwDelete,
            "PATCH" => TokKind::KwPatch,
            "string" => TokKind::KwString,
            "integer" => TokKind::KwInteger,
            "boolean" => TokKind::KwBoolean,
            "float" => TokKind::KwFloat,
            _ => return None,
        };
        Some(kind)
    }

    /// Spelling of a primitive type keyword.
    pub fn primitive_name(&self) -> Option<&'static str> {
        match self {
            TokKind::KwString => Some("string"),
            TokKind::KwInteger => Some("integer"),
            TokKind::KwBoolean => Some("boolean"),
            TokKind::KwFloat => Some("float"),
            _ => None,
        }
    }
}

impl fmt::Display for TokKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TokKind::Eof => "EOF",
            TokKind::Error(c) => return write!(f, "ERROR({:?})", c),
            TokKind::LBrace => "'{'",
            TokKind::RBrace => "'}'",
            TokKind::LBracket => "'['",
            TokKind::RBracket => "']'",
            TokKind::Colon => "':'",
            TokKind::Question => "'?'",
            TokKind::KwApi => "'api'",
            TokKind::KwType => "'type'",
            TokKind::KwEndpoint => "'endpoint'",
            TokKind::KwParams => "'params'",
            TokKind::KwQuery => "'query'",
            TokKind::KwBody => "'body'",
            TokKind::KwResponses => "'responses'",
            TokKind::KwGet => "'GET'",
            TokKind::KwPost => "'POST'",
            TokKind::KwPut => "'PUT'",
            TokKind::KwDelete => "'DELETE'",
            TokKind::KwPatch => "'PATCH'",
            TokKind::KwString => "'string'",
            TokKind::KwInteger => "'integer'",
            TokKind::KwBoolean => "'boolean'",
            TokKind::KwFloat => "'float'",
            TokKind::Ident(s) => return write!(f, "IDENTIFIER({})", s),
            TokKind::Number(s) => return write!(f, "NUMBER({})", s),
            TokKind::Path(s) => return write!(f, "PATH({})", s),
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone)]
pub struct Tok {
    pub kind: TokKind,
    pub span: Span,
}
