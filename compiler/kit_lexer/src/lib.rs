//! Kit Lexer - turns source text into the token stream the interpreter consumes.
//!
//! The interpreter core never looks at raw text. It only sees [`Token`]s, each
//! tagged with a [`TokenKind`]. This crate provides that protocol plus a
//! `logos`-based reference lexer:
//!
//! - whitespace separates tokens
//! - `-?[0-9]+` is an integer, `-?[0-9]+.[0-9]+` (optional exponent) a float
//! - `"..."` is a string literal (no escapes; the quotes are stripped)
//! - `\ ...` up to end of line and `( ... )` are comments
//! - any other run of non-whitespace is a word
//!
//! [`lex`] always terminates the stream with one `EndOfInput` token.

mod token;

use logos::Logos;

pub use token::{Token, TokenKind};

/// Input the lexer could not tokenize (in practice, an unterminated string).
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unrecognised input at byte {offset}: `{snippet}`")]
pub struct LexError {
    /// Byte offset of the offending input.
    pub offset: usize,
    /// The slice logos gave up on.
    pub snippet: String,
}

/// Raw token from logos, before lexeme extraction.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"\s+")]
enum RawToken {
    #[regex(r"\\([ \t][^\n]*)?", logos::skip, priority = 5)]
    #[regex(r"\([ \t\r\n][^)]*\)", logos::skip, priority = 5)]
    Comment,

    #[regex(r"-?[0-9]+", priority = 4)]
    Integer,

    #[regex(r"-?[0-9]+\.[0-9]+([eE][+-]?[0-9]+)?", priority = 4)]
    Float,

    #[regex(r#""[^"]*""#, priority = 4)]
    Str,

    #[regex(r#"[^\s"][^\s]*"#, priority = 1)]
    Word,
}

/// Tokenize `source`, appending a final `EndOfInput` token.
pub fn lex(source: &str) -> Result<Vec<Token>, LexError> {
    let mut tokens = Vec::new();
    let mut lexer = RawToken::lexer(source);

    while let Some(raw) = lexer.next() {
        let slice = lexer.slice();
        let Ok(raw) = raw else {
            return Err(LexError {
                offset: lexer.span().start,
                snippet: slice.to_string(),
            });
        };

        let token = match raw {
            RawToken::Integer => Token::integer(slice),
            RawToken::Float => Token::float(slice),
            RawToken::Str => Token::string(strip_quotes(slice)),
            RawToken::Word => Token::word(slice),
            // skipped by its callback
            RawToken::Comment => continue,
        };
        tokens.push(token);
    }

    tokens.push(Token::end_of_input());
    Ok(tokens)
}

fn strip_quotes(slice: &str) -> &str {
    slice
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(slice)
}
