//! The closed opcode table and the category classifier.
//!
//! Every mnemonic the grammar admits is a value of [`Mnemonic`]. Its
//! canonical spelling comes from `Display`, and [`table`] indexes the
//! whole set by that spelling so classification is a single hash lookup.

use std::collections::HashMap;
use std::fmt;

use bitflags::bitflags;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::error::ParseError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Register {
    A,
    X,
    I1,
    I2,
    I3,
    I4,
    I5,
}

impl Register {
    pub const ALL: [Register; 7] = [
        Register::A,
        Register::X,
        Register::I1,
        Register::I2,
        Register::I3,
        Register::I4,
        Register::I5,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Register::A => "A",
            Register::X => "X",
            Register::I1 => "1",
            Register::I2 => "2",
            Register::I3 => "3",
            Register::I4 => "4",
            Register::I5 => "5",
        }
    }

    /// Index register number, `None` for `A` and `X`.
    pub fn index_number(self) -> Option<u8> {
        match self {
            Register::A | Register::X => None,
            Register::I1 => Some(1),
            Register::I2 => Some(2),
            Register::I3 => Some(3),
            Register::I4 => Some(4),
            Register::I5 => Some(5),
        }
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What `ST` writes out: a register, the jump register or zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StoreSource {
    Register(Register),
    J,
    Z,
}

impl fmt::Display for StoreSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreSource::Register(r) => write!(f, "{r}"),
            StoreSource::J => f.write_str("J"),
            StoreSource::Z => f.write_str("Z"),
        }
    }
}

/// Sign test applied to a register by the `J<reg><cond>` jumps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RegisterCondition {
    Negative,
    Zero,
    Positive,
    NonNegative,
    NonZero,
    NonPositive,
}

impl RegisterCondition {
    pub const ALL: [RegisterCondition; 6] = [
        RegisterCondition::Negative,
        RegisterCondition::Zero,
        RegisterCondition::Positive,
        RegisterCondition::NonNegative,
        RegisterCondition::NonZero,
        RegisterCondition::NonPositive,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RegisterCondition::Negative => "N",
            RegisterCondition::Zero => "Z",
            RegisterCondition::Positive => "P",
            RegisterCondition::NonNegative => "NN",
            RegisterCondition::NonZero => "NZ",
            RegisterCondition::NonPositive => "NP",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JumpCondition {
    Always,      // JMP
    SaveJ,       // JSJ
    Overflow,    // JOV
    NoOverflow,  // JNOV
    Less,        // JL
    LessOrEqual, // JLE
    Greater,     // JG
    GreaterOrEqual,
    Equal,
    NotEqual,
    Register(Register, RegisterCondition),
}

impl JumpCondition {
    pub fn all() -> Vec<JumpCondition> {
        let mut v = vec![
            JumpCondition::Always,
            JumpCondition::SaveJ,
            JumpCondition::Overflow,
            JumpCondition::NoOverflow,
            JumpCondition::Less,
            JumpCondition::LessOrEqual,
            JumpCondition::Greater,
            JumpCondition::GreaterOrEqual,
            JumpCondition::Equal,
            JumpCondition::NotEqual,
        ];
        for r in Register::ALL {
            for c in RegisterCondition::ALL {
                v.push(JumpCondition::Register(r, c));
            }
        }
        v
    }
}

impl fmt::Display for JumpCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JumpCondition::Always => f.write_str("MP"),
            JumpCondition::SaveJ => f.write_str("SJ"),
            JumpCondition::Overflow => f.write_str("OV"),
            JumpCondition::NoOverflow => f.write_str("NOV"),
            JumpCondition::Less => f.write_str("L"),
            JumpCondition::LessOrEqual => f.write_str("LE"),
            JumpCondition::Greater => f.write_str("G"),
            JumpCondition::GreaterOrEqual => f.write_str("GE"),
            JumpCondition::Equal => f.write_str("E"),
            JumpCondition::NotEqual => f.write_str("NE"),
            JumpCondition::Register(r, c) => write!(f, "{r}{}", c.as_str()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShiftKind {
    Sla,
    Sra,
    Slax,
    Srax,
    Slc,
    Src,
}

impl ShiftKind {
    pub const ALL: [ShiftKind; 6] = [
        ShiftKind::Sla,
        ShiftKind::Sra,
        ShiftKind::Slax,
        ShiftKind::Srax,
        ShiftKind::Slc,
        ShiftKind::Src,
    ];
}

impl fmt::Display for ShiftKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ShiftKind::Sla => "SLA",
            ShiftKind::Sra => "SRA",
            ShiftKind::Slax => "SLAX",
            ShiftKind::Srax => "SRAX",
            ShiftKind::Slc => "SLC",
            ShiftKind::Src => "SRC",
        })
    }
}

/// Mnemonics that stand alone on a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OnlyNameOp {
    Nop,
    Halt,
    Num,
    Char,
}

impl OnlyNameOp {
    pub const ALL: [OnlyNameOp; 4] = [OnlyNameOp::Nop, OnlyNameOp::Halt, OnlyNameOp::Num, OnlyNameOp::Char];
}

impl fmt::Display for OnlyNameOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OnlyNameOp::Nop => "NOP",
            OnlyNameOp::Halt => "HALT",
            OnlyNameOp::Num => "NUM",
            OnlyNameOp::Char => "CHAR",
        })
    }
}

/// Mnemonics taking `address,index` and an optional `(L:R)` field spec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldOp {
    Load { register: Register, negate: bool },
    Store(StoreSource),
    Add,
    Sub,
    Mul,
    Div,
    Compare(Register),
}

impl FieldOp {
    pub fn all() -> Vec<FieldOp> {
        let mut v = Vec::new();
        for register in Register::ALL {
            v.push(FieldOp::Load { register, negate: false });
            v.push(FieldOp::Load { register, negate: true });
        }
        v.extend(Register::ALL.map(|r| FieldOp::Store(StoreSource::Register(r))));
        v.extend([
            FieldOp::Store(StoreSource::J),
            FieldOp::Store(StoreSource::Z),
            FieldOp::Add,
            FieldOp::Sub,
            FieldOp::Mul,
            FieldOp::Div,
        ]);
        v.extend(Register::ALL.map(FieldOp::Compare));
        v
    }
}

impl fmt::Display for FieldOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldOp::Load { register, negate } => {
                write!(f, "LD{register}{}", if *negate { "N" } else { "" })
            }
            FieldOp::Store(src) => write!(f, "ST{src}"),
            FieldOp::Add => f.write_str("ADD"),
            FieldOp::Sub => f.write_str("SUB"),
            FieldOp::Mul => f.write_str("MUL"),
            FieldOp::Div => f.write_str("DIV"),
            FieldOp::Compare(r) => write!(f, "CMP{r}"),
        }
    }
}

/// Mnemonics taking `address,index` and nothing after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NonFieldOp {
    Jump(JumpCondition),
    Enter { register: Register, negate: bool },
    Increment(Register),
    Decrement(Register),
    Shift(ShiftKind),
}

impl NonFieldOp {
    pub fn all() -> Vec<NonFieldOp> {
        let mut v: Vec<NonFieldOp> = JumpCondition::all().into_iter().map(NonFieldOp::Jump).collect();
        for register in Register::ALL {
            v.push(NonFieldOp::Enter { register, negate: false });
            v.push(NonFieldOp::Enter { register, negate: true });
            v.push(NonFieldOp::Increment(register));
            v.push(NonFieldOp::Decrement(register));
        }
        v.extend(ShiftKind::ALL.map(NonFieldOp::Shift));
        v
    }
}

impl fmt::Display for NonFieldOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NonFieldOp::Jump(cond) => write!(f, "J{cond}"),
            NonFieldOp::Enter { register, negate: false } => write!(f, "ENT{register}"),
            NonFieldOp::Enter { register, negate: true } => write!(f, "ENN{register}"),
            NonFieldOp::Increment(r) => write!(f, "INC{r}"),
            NonFieldOp::Decrement(r) => write!(f, "DEC{r}"),
            NonFieldOp::Shift(kind) => write!(f, "{kind}"),
        }
    }
}

/// Mnemonics taking `address,index` and an optional `(n)` argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArgOp {
    In,
    Out,
    Ioc,
    Jred,
    Jbus,
    Move,
}

impl ArgOp {
    pub const ALL: [ArgOp; 6] = [ArgOp::In, ArgOp::Out, ArgOp::Ioc, ArgOp::Jred, ArgOp::Jbus, ArgOp::Move];
}

impl fmt::Display for ArgOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ArgOp::In => "IN",
            ArgOp::Out => "OUT",
            ArgOp::Ioc => "IOC",
            ArgOp::Jred => "JRED",
            ArgOp::Jbus => "JBUS",
            ArgOp::Move => "MOVE",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    OnlyName,
    Field,
    NonField,
    Arg,
}

impl Category {
    pub const ALL: [Category; 4] = [Category::OnlyName, Category::Field, Category::NonField, Category::Arg];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::OnlyName => "only-name",
            Category::Field => "field",
            Category::NonField => "non-field",
            Category::Arg => "arg",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

bitflags! {
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Categories: u8 {
const ONLY_NAME = 1 << 0;
const FIELD = 1 << 1;
const NON_FIELD = 1 << 2;
const ARG = 1 << 3;
}
}

impl From<Category> for Categories {
    fn from(c: Category) -> Self {
        match c {
            Category::OnlyName => Categories::ONLY_NAME,
            Category::Field => Categories::FIELD,
            Category::NonField => Categories::NON_FIELD,
            Category::Arg => Categories::ARG,
        }
    }
}

impl FromIterator<Category> for Categories {
    fn from_iter<I: IntoIterator<Item = Category>>(iter: I) -> Self {
        iter.into_iter().fold(Categories::empty(), |acc, c| acc | Categories::from(c))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mnemonic {
    OnlyName(OnlyNameOp),
    Field(FieldOp),
    NonField(NonFieldOp),
    Arg(ArgOp),
}

impl Mnemonic {
    pub fn category(&self) -> Category {
        match self {
            Mnemonic::OnlyName(_) => Category::OnlyName,
            Mnemonic::Field(_) => Category::Field,
            Mnemonic::NonField(_) => Category::NonField,
            Mnemonic::Arg(_) => Category::Arg,
        }
    }

    /// The full closed set, grouped by category in grammar order.
    pub fn all() -> Vec<Mnemonic> {
        let mut v: Vec<Mnemonic> = OnlyNameOp::ALL.into_iter().map(Mnemonic::OnlyName).collect();
        v.extend(FieldOp::all().into_iter().map(Mnemonic::Field));
        v.extend(NonFieldOp::all().into_iter().map(Mnemonic::NonField));
        v.extend(ArgOp::ALL.into_iter().map(Mnemonic::Arg));
        v
    }
}

impl fmt::Display for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mnemonic::OnlyName(op) => write!(f, "{op}"),
            Mnemonic::Field(op) => write!(f, "{op}"),
            Mnemonic::NonField(op) => write!(f, "{op}"),
            Mnemonic::Arg(op) => write!(f, "{op}"),
        }
    }
}

static TABLE: Lazy<HashMap<String, Mnemonic>> =
    Lazy::new(|| Mnemonic::all().into_iter().map(|m| (m.to_string(), m)).collect());

/// Canonical spelling -> mnemonic, built once on first use.
pub fn table() -> &'static HashMap<String, Mnemonic> {
    &TABLE
}

pub fn lookup(word: &str) -> Option<Mnemonic> {
    TABLE.get(word).copied()
}

/// Mnemonics in `filter`, sorted by category then spelling.
pub fn listing(filter: Categories) -> Vec<Mnemonic> {
    let mut v: Vec<Mnemonic> = Mnemonic::all()
        .into_iter()
        .filter(|m| filter.contains(m.category().into()))
        .collect();
    v.sort_by_cached_key(|m| (m.category(), m.to_string()));
    v
}

/// Resolves the word at `column` to a mnemonic of the closed table.
pub fn classify(word: &str, column: usize) -> Result<Mnemonic, ParseError> {
    lookup(word).ok_or_else(|| ParseError::UnknownMnemonic {
        mnemonic: word.to_string(),
        column,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spellings_are_unique() {
        assert_eq!(table().len(), Mnemonic::all().len());
    }

    #[test]
    fn classifies_register_suffixes() {
        assert_eq!(
            lookup("LD1"),
            Some(Mnemonic::Field(FieldOp::Load { register: Register::I1, negate: false }))
        );
        assert_eq!(
            lookup("LDXN"),
            Some(Mnemonic::Field(FieldOp::Load { register: Register::X, negate: true }))
        );
        assert_eq!(lookup("STZ"), Some(Mnemonic::Field(FieldOp::Store(StoreSource::Z))));
        assert_eq!(lookup("CMP5"), Some(Mnemonic::Field(FieldOp::Compare(Register::I5))));
        assert_eq!(lookup("ENN3").map(|m| m.category()), Some(Category::NonField));
    }

    #[test]
    fn jump_codes() {
        assert_eq!(lookup("JL"), Some(Mnemonic::NonField(NonFieldOp::Jump(JumpCondition::Less))));
        assert_eq!(
            lookup("JLE"),
            Some(Mnemonic::NonField(NonFieldOp::Jump(JumpCondition::LessOrEqual)))
        );
        assert_eq!(
            lookup("JANZ"),
            Some(Mnemonic::NonField(NonFieldOp::Jump(JumpCondition::Register(
                Register::A,
                RegisterCondition::NonZero
            ))))
        );
        assert_eq!(lookup("JRED"), Some(Mnemonic::Arg(ArgOp::Jred)));
        assert_eq!(lookup("JX"), None);
        assert_eq!(lookup("J"), None);
        assert_eq!(lookup("LD6"), None);
    }

    #[test]
    fn classify_reports_unknown() {
        let err = classify("FOO", 1).unwrap_err();
        assert_eq!(err, ParseError::UnknownMnemonic { mnemonic: "FOO".into(), column: 1 });
    }

    #[test]
    fn listing_filters_by_category() {
        let only = listing(Categories::ONLY_NAME);
        let names: Vec<String> = only.iter().map(|m| m.to_string()).collect();
        assert_eq!(names, vec!["CHAR", "HALT", "NOP", "NUM"]);

        let mixed: Categories = [Category::OnlyName, Category::Arg].into_iter().collect();
        assert_eq!(listing(mixed).len(), 4 + ArgOp::ALL.len());
        assert_eq!(listing(Categories::all()).len(), Mnemonic::all().len());
    }
}
