//! wavec-lex - Lexical Analyzer (Lexer/Tokenizer)
//!
//! Transforms source text into a packed [`token::TokenStream`]: parallel
//! `kind`/`start` arrays rather than an enum of owned token values. A
//! token's text or parsed value is never stored - anything that needs it
//! (the parser building a literal, the printer rendering an identifier)
//! re-derives it on demand from the token's start offset via
//! [`token::token_length`], which re-scans the source the same way the
//! lexer itself scanned it the first time.

pub mod cursor;
pub mod lexer;
pub mod scan;
pub mod token;
pub mod unicode;

pub use cursor::{Cursor, CursorSnapshot};
pub use lexer::{lex, Lexer};
pub use token::{token_length, keyword_from_ident, TokenKind, TokenStream, MAX_KEYWORD_LENGTH};
