#![forbid(unsafe_code)]
#![deny(unused_must_use)]
#![warn(clippy::dbg_macro, clippy::todo, clippy::unimplemented)]

mod error;
mod lexer;
mod parser;
mod token;

pub use error::ParseError;
pub use lexer::{tokenize, Lexer};
pub use parser::parse_str;
pub use token::{Tok, TokKind};
