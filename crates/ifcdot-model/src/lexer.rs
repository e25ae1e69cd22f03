//! Lexer for ISO 10303-21 exchange files.
//!
//! Produces span-based tokens; text is sliced from the source only when the
//! parser needs it. Whitespace and block comments are dropped here.

use std::ops::Range;

use ifcdot_core::{Error, Result};
use logos::Logos;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    #[token("(")]
    ParenOpen,

    #[token(")")]
    ParenClose,

    #[token(",")]
    Comma,

    #[token("=")]
    Equals,

    #[token(";")]
    Semicolon,

    /// Unset attribute.
    #[token("$")]
    Dollar,

    /// Attribute derived in a subtype.
    #[token("*")]
    Star,

    /// `#123`
    #[regex(r"#[0-9]+")]
    EntityRef,

    /// Entity or type keyword. Hyphens allow `ISO-10303-21` in the envelope.
    #[regex(r"[A-Za-z_][A-Za-z0-9_\-]*")]
    Keyword,

    /// `'text'`, with `''` as an escaped quote.
    #[regex(r"'(?:[^']|'')*'")]
    String,

    #[regex(r#""[0-9A-Fa-f]*""#)]
    Binary,

    /// `.ELEMENT.`
    #[regex(r"\.[A-Za-z_][A-Za-z0-9_]*\.")]
    Enumeration,

    #[regex(r"[+\-]?[0-9]+")]
    Integer,

    #[regex(r"[+\-]?[0-9]+\.[0-9]*(?:[eE][+\-]?[0-9]+)?")]
    Real,

    #[regex(r"[ \t\r\n\f]+")]
    Whitespace,

    #[regex(r"/\*(?:[^*]|\*+[^*/])*\*+/")]
    Comment,
}

impl TokenKind {
    fn is_trivia(self) -> bool {
        matches!(self, Self::Whitespace | Self::Comment)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Range<usize>,
}

/// Tokenizes an exchange file. Fails on the first unrecognized character.
pub fn lex(source: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut lexer = TokenKind::lexer(source);

    while let Some(next) = lexer.next() {
        let span = lexer.span();
        match next {
            Ok(kind) if kind.is_trivia() => {}
            Ok(kind) => tokens.push(Token { kind, span }),
            Err(()) => {
                let snippet: String = source[span.start..].chars().take(16).collect();
                return Err(Error::parse(
                    span.start,
                    format!("unexpected input {:?}", snippet),
                ));
            }
        }
    }

    Ok(tokens)
}
