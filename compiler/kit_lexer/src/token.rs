//! Token protocol shared by the lexer and the interpreter core.

use std::fmt;

/// Kind tag carried by every token.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// A name to be resolved against the dictionary.
    Word,
    /// Integer literal text, e.g. `-7`.
    Integer,
    /// Float literal text, e.g. `2.5`.
    Float,
    /// String literal content (quotes already removed).
    String,
    /// No more input.
    EndOfInput,
}

impl TokenKind {
    /// Short name used in diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            TokenKind::Word => "word",
            TokenKind::Integer => "integer",
            TokenKind::Float => "float",
            TokenKind::String => "string",
            TokenKind::EndOfInput => "end of input",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single token: kind plus its lexeme.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
}

impl Token {
    /// A token of `kind` carrying `text` verbatim.
    pub fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        Token {
            kind,
            text: text.into(),
        }
    }

    // Shorthands for building token streams by hand.

    pub fn word(text: impl Into<String>) -> Self {
        Token::new(TokenKind::Word, text)
    }

    pub fn integer(text: impl Into<String>) -> Self {
        Token::new(TokenKind::Integer, text)
    }

    pub fn float(text: impl Into<String>) -> Self {
        Token::new(TokenKind::Float, text)
    }

    pub fn string(text: impl Into<String>) -> Self {
        Token::new(TokenKind::String, text)
    }

    /// The marker closing every lexed stream.
    pub fn end_of_input() -> Self {
        Token::new(TokenKind::EndOfInput, String::new())
    }

    #[inline]
    pub fn is_end(&self) -> bool {
        self.kind == TokenKind::EndOfInput
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::String => write!(f, "\"{}\"", self.text),
            TokenKind::EndOfInput => f.write_str("<end of input>"),
            _ => f.write_str(&self.text),
        }
    }
}
