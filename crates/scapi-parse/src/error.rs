use thiserror::Error;

/// Lexical and syntactic errors. Parsing stops at the first one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A character outside the language alphabet.
    #[error("unexpected character {ch:?} at position {offset}")]
    Lexical { ch: char, offset: u32 },

    #[error("unexpected token {found} at position {offset}, expected {expected}")]
    Unexpected {
        found: String,
        offset: u32,
        expected: String,
    },

    #[error("invalid response code {text} at position {offset}")]
    InvalidResponseCode { text: String, offset: u32 },
}

impl ParseError {
    pub fn offset(&self) -> u32 {
        match self {
            ParseError::Lexical { offset, .. }
            | ParseError::Unexpected { offset, .. }
            | ParseError::InvalidResponseCode { offset, .. } => *offset,
        }
    }
}
