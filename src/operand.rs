use std::fmt;

use num_traits::PrimInt;
use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// Which operand a diagnostic is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperandKind {
    Address,
    Index,
    Fields,
    Argument,
}

impl fmt::Display for OperandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OperandKind::Address => "address",
            OperandKind::Index => "index",
            OperandKind::Fields => "field",
            OperandKind::Argument => "argument",
        })
    }
}

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("{operand} {value} is out of range {min}..={max}")]
pub struct OutOfRange {
    pub operand: OperandKind,
    pub value: u32,
    pub min: u32,
    pub max: u32,
}

/// Decimal literal of any unsigned width; `None` when it overflows `T`.
fn literal<T: PrimInt>(text: &str) -> Option<T> {
    T::from_str_radix(text, 10).ok()
}

fn range_error(operand: OperandKind, text: &str, min: u32, max: u32, column: usize) -> ParseError {
    ParseError::OperandRange {
        operand,
        value: text.to_string(),
        min,
        max,
        column,
    }
}

/// Memory location, `0..=3999`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Address(u16);

impl Address {
    pub const MIN: u16 = 0;
    pub const MAX: u16 = 3999;

    pub fn new(value: u16) -> Option<Self> {
        (value <= Self::MAX).then_some(Self(value))
    }

    pub fn get(self) -> u16 {
        self.0
    }

    pub fn parse(text: &str, column: usize) -> Result<Self, ParseError> {
        literal::<u16>(text)
            .and_then(Self::new)
            .ok_or_else(|| range_error(OperandKind::Address, text, Self::MIN.into(), Self::MAX.into(), column))
    }
}

impl TryFrom<u32> for Address {
    type Error = OutOfRange;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        u16::try_from(value)
            .ok()
            .and_then(Self::new)
            .ok_or(OutOfRange {
                operand: OperandKind::Address,
                value,
                min: Self::MIN.into(),
                max: Self::MAX.into(),
            })
    }
}

impl From<Address> for u32 {
    fn from(a: Address) -> Self {
        a.0.into()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Index register selector, `1..=5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Index(u8);

impl Index {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(value: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&value).then_some(Self(value))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub fn parse(text: &str, column: usize) -> Result<Self, ParseError> {
        literal::<u8>(text)
            .and_then(Self::new)
            .ok_or_else(|| range_error(OperandKind::Index, text, Self::MIN.into(), Self::MAX.into(), column))
    }
}

impl TryFrom<u32> for Index {
    type Error = OutOfRange;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        u8::try_from(value)
            .ok()
            .and_then(Self::new)
            .ok_or(OutOfRange {
                operand: OperandKind::Index,
                value,
                min: Self::MIN.into(),
                max: Self::MAX.into(),
            })
    }
}

impl From<Index> for u32 {
    fn from(i: Index) -> Self {
        i.0.into()
    }
}

impl fmt::Display for Index {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Sub-word byte range `(L:R)`.
///
/// Only the shape is checked. `(5:0)` is accepted even though it selects
/// nothing meaningful; see [`Fields::is_reversed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fields {
    pub left: u32,
    pub right: u32,
}

impl Fields {
    pub fn new(left: u32, right: u32) -> Self {
        Self { left, right }
    }

    pub fn is_reversed(&self) -> bool {
        self.left > self.right
    }

    pub fn parse(left: &str, left_column: usize, right: &str, right_column: usize) -> Result<Self, ParseError> {
        let side = |text: &str, column| {
            literal::<u32>(text).ok_or_else(|| range_error(OperandKind::Fields, text, 0, u32::MAX, column))
        };
        Ok(Self::new(side(left, left_column)?, side(right, right_column)?))
    }
}

impl fmt::Display for Fields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}:{})", self.left, self.right)
    }
}

/// Parenthesised single integer `(n)` of the I/O-class mnemonics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Argument(pub u32);

impl Argument {
    pub fn get(self) -> u32 {
        self.0
    }

    pub fn parse(text: &str, column: usize) -> Result<Self, ParseError> {
        literal::<u32>(text)
            .map(Self)
            .ok_or_else(|| range_error(OperandKind::Argument, text, 0, u32::MAX, column))
    }
}

impl fmt::Display for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})", self.0)
    }
}

/// Optional trailing `(L:R)`. Omission is kept distinct from any value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldSpec {
    #[default]
    Default,
    Explicit(Fields),
}

impl FieldSpec {
    pub fn explicit(&self) -> Option<Fields> {
        match self {
            FieldSpec::Default => None,
            FieldSpec::Explicit(f) => Some(*f),
        }
    }
}

impl fmt::Display for FieldSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldSpec::Default => Ok(()),
            FieldSpec::Explicit(fields) => write!(f, "{fields}"),
        }
    }
}

/// Optional trailing `(n)`. Omission is kept distinct from any value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArgSpec {
    #[default]
    Default,
    Explicit(Argument),
}

impl ArgSpec {
    pub fn explicit(&self) -> Option<Argument> {
        match self {
            ArgSpec::Default => None,
            ArgSpec::Explicit(a) => Some(*a),
        }
    }
}

impl fmt::Display for ArgSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgSpec::Default => Ok(()),
            ArgSpec::Explicit(arg) => write!(f, "{arg}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operand {
    Address(Address),
    Index(Index),
    Fields(Fields),
    Argument(Argument),
}

impl Operand {
    pub fn kind(&self) -> OperandKind {
        match self {
            Operand::Address(_) => OperandKind::Address,
            Operand::Index(_) => OperandKind::Index,
            Operand::Fields(_) => OperandKind::Fields,
            Operand::Argument(_) => OperandKind::Argument,
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Address(a) => write!(f, "{a}"),
            Operand::Index(i) => write!(f, "{i}"),
            Operand::Fields(x) => write!(f, "{x}"),
            Operand::Argument(x) => write!(f, "{x}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_bounds() {
        assert_eq!(Address::parse("0", 1).unwrap().get(), 0);
        assert_eq!(Address::parse("3999", 1).unwrap().get(), 3999);
        assert_eq!(Address::parse("0042", 1).unwrap().get(), 42);
        let err = Address::parse("4000", 5).unwrap_err();
        assert_eq!(
            err,
            ParseError::OperandRange {
                operand: OperandKind::Address,
                value: "4000".into(),
                min: 0,
                max: 3999,
                column: 5,
            }
        );
        // wider than u16
        assert!(Address::parse("99999999", 1).is_err());
    }

    #[test]
    fn index_bounds() {
        assert!(Index::parse("0", 1).is_err());
        assert!(Index::parse("6", 1).is_err());
        assert!(Index::parse("300", 1).is_err());
        for i in 1..=5u8 {
            assert_eq!(Index::parse(&i.to_string(), 1).unwrap().get(), i);
        }
    }

    #[test]
    fn fields_accept_reversed_pairs() {
        let f = Fields::parse("5", 2, "0", 4).unwrap();
        assert!(f.is_reversed());
        assert_eq!(f.to_string(), "(5:0)");
        assert!(!Fields::new(0, 5).is_reversed());
    }

    #[test]
    fn overflowing_field_reports_its_column() {
        let err = Fields::parse("1", 2, "99999999999", 4).unwrap_err();
        assert_eq!(err.column(), 4);
    }

    #[test]
    fn serde_rejects_out_of_range() {
        assert!(serde_json::from_str::<Address>("4000").is_err());
        assert_eq!(serde_json::from_str::<Index>("3").unwrap().get(), 3);
        assert_eq!(serde_json::to_string(&Address::new(12).unwrap()).unwrap(), "12");
    }

    #[test]
    fn try_from_reports_bounds() {
        let err = Index::try_from(9u32).unwrap_err();
        assert_eq!(err.to_string(), "index 9 is out of range 1..=5");
    }

    #[test]
    fn default_specs_render_empty() {
        assert_eq!(FieldSpec::Default.to_string(), "");
        assert_eq!(ArgSpec::Explicit(Argument(7)).to_string(), "(7)");
    }
}
