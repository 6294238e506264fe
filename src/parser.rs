use std::str::FromStr;

use tracing::debug;

use crate::config::ParserConfig;
use crate::error::ParseError;
use crate::instruction::ParsedInstruction;
use crate::mnemonic::{classify, Mnemonic};
use crate::operand::{Address, ArgSpec, Argument, FieldSpec, Fields, Index};
use crate::token::{tokenize, Token, TokenKind};

/// Stateless single-line parser. One value can be shared freely across
/// threads; nothing carries over between calls.
#[derive(Debug, Clone, Copy, Default)]
pub struct Parser {
    cfg: ParserConfig,
}

impl Parser {
    pub fn new(cfg: ParserConfig) -> Self {
        Self { cfg }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.cfg
    }

    pub fn parse_line(&self, line: &str) -> Result<ParsedInstruction, ParseError> {
        let mut tokens = tokenize(line, &self.cfg)?;
        if self.cfg.collapse_spaces {
            if tokens.last().is_some_and(|t| t.kind == TokenKind::Space) {
                tokens.pop();
            }
            if tokens.first().is_some_and(|t| t.kind == TokenKind::Space) {
                tokens.remove(0);
            }
        }
        let mut cur = Cursor {
            tokens: &tokens,
            pos: 0,
            line_len: line.chars().count(),
            collapse_spaces: self.cfg.collapse_spaces,
        };
        let ins = cur.instruction()?;
        debug!(line, %ins, "parsed");
        Ok(ins)
    }
}

/// Parses one line with the strict default configuration.
pub fn parse_line(line: &str) -> Result<ParsedInstruction, ParseError> {
    Parser::default().parse_line(line)
}

impl FromStr for ParsedInstruction {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_line(s)
    }
}

struct Cursor<'t> {
    tokens: &'t [Token],
    pos: usize,
    line_len: usize,
    collapse_spaces: bool,
}

impl<'t> Cursor<'t> {
    fn peek(&self) -> Option<&'t Token> {
        self.tokens.get(self.pos)
    }

    fn peek_nth(&self, n: usize) -> Option<&'t Token> {
        self.tokens.get(self.pos + n)
    }

    fn next_if(&mut self, pred: impl FnOnce(&TokenKind) -> bool) -> Option<&'t Token> {
        let tok = self.peek().filter(|t| pred(&t.kind))?;
        self.pos += 1;
        Some(tok)
    }

    /// Column of the next token, or one past the end of the line.
    fn column(&self) -> usize {
        self.peek().map_or(self.line_len + 1, |t| t.span.column())
    }

    fn found(&self) -> String {
        self.peek().map_or_else(|| "end of line".to_string(), |t| t.kind.to_string())
    }

    fn malformed(&self, expected: &'static str) -> ParseError {
        ParseError::MalformedOperand {
            column: self.column(),
            expected,
            found: self.found(),
        }
    }

    fn expect(&mut self, kind: TokenKind, expected: &'static str) -> Result<&'t Token, ParseError> {
        self.next_if(|k| *k == kind).ok_or_else(|| self.malformed(expected))
    }

    fn number(&mut self, expected: &'static str) -> Result<(&'t str, usize), ParseError> {
        match self.next_if(|k| matches!(k, TokenKind::Number(_))) {
            Some(Token {
                kind: TokenKind::Number(text),
                span,
            }) => Ok((text.as_str(), span.column())),
            _ => Err(self.malformed(expected)),
        }
    }

    fn instruction(&mut self) -> Result<ParsedInstruction, ParseError> {
        let (word, column) = match self.next_if(|k| matches!(k, TokenKind::Word(_))) {
            Some(Token {
                kind: TokenKind::Word(w),
                span,
            }) => (w.as_str(), span.column()),
            _ => return Err(self.malformed("mnemonic")),
        };
        let mnemonic = classify(word, column)?;

        let ins = match mnemonic {
            Mnemonic::OnlyName(op) => ParsedInstruction::only_name(op),
            Mnemonic::Field(op) => {
                let (address, index) = self.address_index()?;
                let fields = self.field_spec(&mnemonic)?;
                ParsedInstruction::field(op, address, index, fields)
            }
            Mnemonic::NonField(op) => {
                let (address, index) = self.address_index()?;
                ParsedInstruction::non_field(op, address, index)
            }
            Mnemonic::Arg(op) => {
                let (address, index) = self.address_index()?;
                let argument = self.arg_spec(&mnemonic)?;
                ParsedInstruction::arg(op, address, index, argument)
            }
        };

        if self.peek().is_some() {
            return Err(self.trailing(&mnemonic, self.found()));
        }
        Ok(ins)
    }

    fn trailing(&self, mnemonic: &Mnemonic, found: String) -> ParseError {
        ParseError::UnexpectedTrailingOperand {
            mnemonic: mnemonic.to_string(),
            found,
            column: self.column(),
        }
    }

    /// `<space><Address>,<Index>`
    fn address_index(&mut self) -> Result<(Address, Index), ParseError> {
        let sep = self.expect(TokenKind::Space, "space before operands")?;
        if !self.collapse_spaces && sep.span.end - sep.span.start > 1 {
            return Err(ParseError::MalformedOperand {
                column: sep.span.column(),
                expected: "single space before operands",
                found: format!("{} spaces", sep.span.end - sep.span.start),
            });
        }
        let (text, column) = self.number("address")?;
        let address = Address::parse(text, column)?;
        self.expect(TokenKind::Comma, "`,` between address and index")?;
        let (text, column) = self.number("index")?;
        let index = Index::parse(text, column)?;
        Ok((address, index))
    }

    /// Optional `(L:R)`. A `(n)` in this slot is the wrong kind of operand.
    fn field_spec(&mut self, mnemonic: &Mnemonic) -> Result<FieldSpec, ParseError> {
        if self.peek().map(|t| &t.kind) != Some(&TokenKind::LParen) {
            return Ok(FieldSpec::Default);
        }
        if matches!(
            (self.peek_nth(1).map(|t| &t.kind), self.peek_nth(2).map(|t| &t.kind)),
            (Some(TokenKind::Number(_)), Some(TokenKind::RParen))
        ) {
            return Err(self.trailing(mnemonic, "argument `(n)`".to_string()));
        }
        self.expect(TokenKind::LParen, "`(` opening field spec")?;
        let (left, left_column) = self.number("field start")?;
        self.expect(TokenKind::Colon, "`:` in field spec")?;
        let (right, right_column) = self.number("field end")?;
        self.expect(TokenKind::RParen, "`)` closing field spec")?;

        let fields = Fields::parse(left, left_column, right, right_column)?;
        if fields.is_reversed() {
            debug!(%mnemonic, %fields, "field spec with left > right");
        }
        Ok(FieldSpec::Explicit(fields))
    }

    /// Optional `(n)`. A `(L:R)` in this slot is the wrong kind of operand.
    fn arg_spec(&mut self, mnemonic: &Mnemonic) -> Result<ArgSpec, ParseError> {
        if self.peek().map(|t| &t.kind) != Some(&TokenKind::LParen) {
            return Ok(ArgSpec::Default);
        }
        if matches!(
            (self.peek_nth(1).map(|t| &t.kind), self.peek_nth(2).map(|t| &t.kind)),
            (Some(TokenKind::Number(_)), Some(TokenKind::Colon))
        ) {
            return Err(self.trailing(mnemonic, "field spec `(L:R)`".to_string()));
        }
        self.expect(TokenKind::LParen, "`(` opening argument")?;
        let (text, column) = self.number("argument")?;
        self.expect(TokenKind::RParen, "`)` closing argument")?;
        Ok(ArgSpec::Explicit(Argument::parse(text, column)?))
    }
}
