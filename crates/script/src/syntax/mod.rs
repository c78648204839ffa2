//! Lexing and parsing of behavior scripts.

pub mod ast;
mod lexer;
mod parser;
mod token;

pub use lexer::tokenize;
pub use parser::{MAX_NESTING, parse};
pub use token::{Keyword, Punct, Token, TokenKind};
