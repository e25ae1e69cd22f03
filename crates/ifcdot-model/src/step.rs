//! Exchange-file parser: token stream → raw entity instances.
//!
//! Only `#id = KEYWORD(...);` statements and the header's `FILE_SCHEMA` are
//! interpreted. Everything else (envelope, section markers, other header
//! entries) is skipped up to the next `;`.

use std::collections::HashSet;

use ifcdot_core::{Error, Result};
use tracing::debug;

use crate::lexer::{lex, Token, TokenKind};

/// An attribute value of an instance.
#[derive(Debug, Clone, PartialEq)]
pub enum Param {
    Ref(u64),
    Str(String),
    Binary(String),
    Enum(String),
    Int(i64),
    Real(f64),
    List(Vec<Param>),
    /// Typed value such as `IFCLABEL('x')`.
    Typed(String, Vec<Param>),
    Unset,
    Derived,
}

impl Param {
    pub fn as_ref_id(&self) -> Option<u64> {
        match self {
            Param::Ref(id) => Some(*id),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Param::Str(s) => Some(s),
            _ => None,
        }
    }
}

/// One `#id = KEYWORD(params);` statement.
#[derive(Debug, Clone, PartialEq)]
pub struct RawInstance {
    pub id: u64,
    /// Keyword as written (exchange files use upper case).
    pub keyword: String,
    pub params: Vec<Param>,
}

/// A parsed exchange file.
#[derive(Debug, Clone, Default)]
pub struct StepFile {
    /// First identifier of `FILE_SCHEMA`, e.g. `IFC4`.
    pub schema: Option<String>,
    /// Instances in file order.
    pub instances: Vec<RawInstance>,
}

/// Parse an exchange file.
pub fn parse(source: &str) -> Result<StepFile> {
    let tokens = lex(source)?;
    Parser::new(source, &tokens).parse_file()
}

struct Parser<'a> {
    source: &'a str,
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(source: &'a str, tokens: &'a [Token]) -> Self {
        Self {
            source,
            tokens,
            pos: 0,
        }
    }

    fn parse_file(mut self) -> Result<StepFile> {
        let mut file = StepFile::default();
        let mut seen = HashSet::new();
        let mut skipped = 0usize;

        while let Some(token) = self.peek() {
            match token.kind {
                TokenKind::EntityRef if self.peek_kind_at(1) == Some(TokenKind::Equals) => {
                    let offset = token.span.start;
                    match self.parse_instance()? {
                        Some(instance) => {
                            if !seen.insert(instance.id) {
                                return Err(Error::parse(
                                    offset,
                                    format!("duplicate instance #{}", instance.id),
                                ));
                            }
                            file.instances.push(instance);
                        }
                        None => skipped += 1,
                    }
                }
                TokenKind::Keyword if self.text(token).eq_ignore_ascii_case("FILE_SCHEMA") => {
                    self.bump();
                    self.expect(TokenKind::ParenOpen)?;
                    let params = self.parse_list()?;
                    file.schema = first_string(&params).map(str::to_string);
                    self.expect(TokenKind::Semicolon)?;
                }
                _ => self.skip_statement()?,
            }
        }

        if skipped > 0 {
            debug!("Skipped {} complex instances", skipped);
        }

        Ok(file)
    }

    /// Parses `#id = KEYWORD(...);`. Complex (multi-keyword) instances are
    /// consumed and yield `None`.
    fn parse_instance(&mut self) -> Result<Option<RawInstance>> {
        let id_token = self.bump_token()?;
        let id = parse_ref(self.text(&id_token), id_token.span.start)?;
        self.expect(TokenKind::Equals)?;

        let next = self.bump_token()?;
        match next.kind {
            TokenKind::Keyword => {
                let keyword = self.text(&next).to_string();
                self.expect(TokenKind::ParenOpen)?;
                let params = self.parse_list()?;
                self.expect(TokenKind::Semicolon)?;
                Ok(Some(RawInstance {
                    id,
                    keyword,
                    params,
                }))
            }
            TokenKind::ParenOpen => {
                self.skip_balanced()?;
                self.expect(TokenKind::Semicolon)?;
                Ok(None)
            }
            _ => Err(self.unexpected(&next, "entity keyword")),
        }
    }

    /// Parses list items after the opening parenthesis, consuming the closing one.
    fn parse_list(&mut self) -> Result<Vec<Param>> {
        let mut items = Vec::new();
        if self.peek_kind_at(0) == Some(TokenKind::ParenClose) {
            self.bump();
            return Ok(items);
        }

        loop {
            items.push(self.parse_param()?);
            let sep = self.bump_token()?;
            match sep.kind {
                TokenKind::Comma => continue,
                TokenKind::ParenClose => return Ok(items),
                _ => return Err(self.unexpected(&sep, "',' or ')'")),
            }
        }
    }

    fn parse_param(&mut self) -> Result<Param> {
        let token = self.bump_token()?;
        let text = self.text(&token);
        let offset = token.span.start;

        let param = match token.kind {
            TokenKind::EntityRef => Param::Ref(parse_ref(text, offset)?),
            TokenKind::String => Param::Str(decode_string(text)),
            TokenKind::Binary => Param::Binary(text.trim_matches('"').to_string()),
            TokenKind::Enumeration => Param::Enum(text.trim_matches('.').to_string()),
            TokenKind::Integer => Param::Int(
                text.parse()
                    .map_err(|_| Error::parse(offset, format!("integer out of range: {text}")))?,
            ),
            TokenKind::Real => Param::Real(
                text.parse()
                    .map_err(|_| Error::parse(offset, format!("invalid real: {text}")))?,
            ),
            TokenKind::Dollar => Param::Unset,
            TokenKind::Star => Param::Derived,
            TokenKind::ParenOpen => Param::List(self.parse_list()?),
            TokenKind::Keyword => {
                let name = text.to_string();
                self.expect(TokenKind::ParenOpen)?;
                Param::Typed(name, self.parse_list()?)
            }
            _ => return Err(self.unexpected(&token, "attribute value")),
        };

        Ok(param)
    }

    fn skip_statement(&mut self) -> Result<()> {
        let mut depth = 0usize;
        while let Some(token) = self.peek() {
            let kind = token.kind;
            self.bump();
            match kind {
                TokenKind::ParenOpen => depth += 1,
                TokenKind::ParenClose => depth = depth.saturating_sub(1),
                TokenKind::Semicolon if depth == 0 => return Ok(()),
                _ => {}
            }
        }
        Ok(())
    }

    /// Skips to the parenthesis closing an already-consumed opening one.
    fn skip_balanced(&mut self) -> Result<()> {
        let mut depth = 1usize;
        while depth > 0 {
            let token = self.bump_token()?;
            match token.kind {
                TokenKind::ParenOpen => depth += 1,
                TokenKind::ParenClose => depth -= 1,
                _ => {}
            }
        }
        Ok(())
    }

    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    fn peek_kind_at(&self, ahead: usize) -> Option<TokenKind> {
        self.tokens.get(self.pos + ahead).map(|t| t.kind)
    }

    fn bump(&mut self) {
        self.pos += 1;
    }

    fn bump_token(&mut self) -> Result<Token> {
        match self.tokens.get(self.pos) {
            Some(token) => {
                self.pos += 1;
                Ok(token.clone())
            }
            None => Err(Error::parse(self.source.len(), "unexpected end of file")),
        }
    }

    fn expect(&mut self, kind: TokenKind) -> Result<()> {
        let token = self.bump_token()?;
        if token.kind == kind {
            Ok(())
        } else {
            Err(self.unexpected(&token, &format!("{kind:?}")))
        }
    }

    fn text(&self, token: &Token) -> &'a str {
        &self.source[token.span.clone()]
    }

    fn unexpected(&self, token: &Token, expected: &str) -> Error {
        Error::parse(
            token.span.start,
            format!("expected {expected}, found {:?}", self.text(token)),
        )
    }
}

fn parse_ref(text: &str, offset: usize) -> Result<u64> {
    text[1..]
        .parse()
        .map_err(|_| Error::parse(offset, format!("invalid instance reference {text}")))
}

/// Strips the quotes and collapses `''` escapes.
fn decode_string(text: &str) -> String {
    text[1..text.len() - 1].replace("''", "'")
}

fn first_string(params: &[Param]) -> Option<&str> {
    params.iter().find_map(|p| match p {
        Param::List(items) => first_string(items),
        other => other.as_str(),
    })
}
