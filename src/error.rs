use serde::{Deserialize, Serialize};

use crate::operand::OperandKind;

/// Everything that can go wrong with a single instruction line.
///
/// Columns are 1-based character positions within the line.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("unrecognized character {ch:?} at column {column}")]
    Lex { ch: char, column: usize },
    #[error("unknown mnemonic `{mnemonic}` at column {column}")]
    UnknownMnemonic { mnemonic: String, column: usize },
    #[error("malformed operand at column {column}: expected {expected}, found {found}")]
    MalformedOperand {
        column: usize,
        expected: &'static str,
        found: String,
    },
    #[error("{operand} {value} at column {column} is out of range {min}..={max}")]
    OperandRange {
        operand: OperandKind,
        value: String,
        min: u32,
        max: u32,
        column: usize,
    },
    #[error("unexpected {found} after `{mnemonic}` at column {column}")]
    UnexpectedTrailingOperand {
        mnemonic: String,
        found: String,
        column: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Lex,
    UnknownMnemonic,
    MalformedOperand,
    OperandRange,
    UnexpectedTrailingOperand,
}

impl ParseError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ParseError::Lex { .. } => ErrorKind::Lex,
            ParseError::UnknownMnemonic { .. } => ErrorKind::UnknownMnemonic,
            ParseError::MalformedOperand { .. } => ErrorKind::MalformedOperand,
            ParseError::OperandRange { .. } => ErrorKind::OperandRange,
            ParseError::UnexpectedTrailingOperand { .. } => ErrorKind::UnexpectedTrailingOperand,
        }
    }

    pub fn column(&self) -> usize {
        match self {
            ParseError::Lex { column, .. }
            | ParseError::UnknownMnemonic { column, .. }
            | ParseError::MalformedOperand { column, .. }
            | ParseError::OperandRange { column, .. }
            | ParseError::UnexpectedTrailingOperand { column, .. } => *column,
        }
    }
}

/// A [`ParseError`] pinned to its 1-based line number in a larger text.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("line {line}: {source}")]
pub struct LineError {
    pub line: usize,
    #[source]
    pub source: ParseError,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_position() {
        let e = ParseError::OperandRange {
            operand: OperandKind::Address,
            value: "4000".into(),
            min: 0,
            max: 3999,
            column: 5,
        };
        assert_eq!(e.to_string(), "address 4000 at column 5 is out of range 0..=3999");
        assert_eq!(e.kind(), ErrorKind::OperandRange);

        let le = LineError { line: 7, source: e };
        assert!(le.to_string().starts_with("line 7: address 4000"));
    }
}
