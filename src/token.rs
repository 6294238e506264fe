use std::fmt;

use tracing::trace;

use crate::config::ParserConfig;
use crate::error::ParseError;

/// Byte range of a token inside its line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    /// 1-based column of the first character. Every accepted character is
    /// ASCII, so byte offsets and character offsets agree.
    pub fn column(&self) -> usize {
        self.start + 1
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    Word(String),   // letter followed by letters/digits: `LD1N`, `HALT`
    Number(String), // digit run, kept as text until range-checked
    LParen,         // '('
    RParen,         // ')'
    Colon,          // ':'
    Comma,          // ','
    Space,          // one or more ' '
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Word(w) => write!(f, "`{w}`"),
            TokenKind::Number(n) => write!(f, "number `{n}`"),
            TokenKind::LParen => f.write_str("`(`"),
            TokenKind::RParen => f.write_str("`)`"),
            TokenKind::Colon => f.write_str("`:`"),
            TokenKind::Comma => f.write_str("`,`"),
            TokenKind::Space => f.write_str("space"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, start: usize, end: usize) -> Self {
        Self {
            kind,
            span: Span { start, end },
        }
    }
}

fn normalize(ch: char, cfg: &ParserConfig) -> char {
    if cfg.case_insensitive {
        ch.to_ascii_uppercase()
    } else {
        ch
    }
}

/// Splits one instruction line into tokens.
///
/// The accepted alphabet is `A-Z`, `0-9`, `(`, `)`, `:`, `,` and the space
/// character; anything else is a [`ParseError::Lex`].
pub fn tokenize(line: &str, cfg: &ParserConfig) -> Result<Vec<Token>, ParseError> {
    let mut iter = line.char_indices().peekable();
    let mut tokens = Vec::new();

    while let Some((start, raw)) = iter.next() {
        let kind = match normalize(raw, cfg) {
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            ':' => TokenKind::Colon,
            ',' => TokenKind::Comma,
            ' ' => {
                while iter.next_if(|&(_, c)| c == ' ').is_some() {}
                TokenKind::Space
            }
            ch @ 'A'..='Z' => {
                let mut word = String::from(ch);
                while let Some((_, c)) = iter.next_if(|&(_, c)| {
                    let c = normalize(c, cfg);
                    c.is_ascii_uppercase() || c.is_ascii_digit()
                }) {
                    word.push(normalize(c, cfg));
                }
                TokenKind::Word(word)
            }
            ch @ '0'..='9' => {
                let mut digits = String::from(ch);
                while let Some((_, c)) = iter.next_if(|&(_, c)| c.is_ascii_digit()) {
                    digits.push(c);
                }
                TokenKind::Number(digits)
            }
            _ => {
                return Err(ParseError::Lex {
                    ch: raw,
                    column: line[..start].chars().count() + 1,
                })
            }
        };
        let end = iter.peek().map_or(line.len(), |&(i, _)| i);
        tokens.push(Token::new(kind, start, end));
    }

    trace!(?tokens, "tokenized line");
    Ok(tokens)
}
