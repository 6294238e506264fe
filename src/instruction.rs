use std::fmt;

use serde::{Deserialize, Serialize};

use crate::mnemonic::{ArgOp, Category, FieldOp, Mnemonic, NonFieldOp, OnlyNameOp};
use crate::operand::{Address, ArgSpec, FieldSpec, Index, Operand};

/// One successfully parsed line.
///
/// Each variant carries exactly the operands its category allows, so a
/// `NonField` instruction cannot hold a field spec and an `Arg` instruction
/// cannot hold `(L:R)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "snake_case")]
pub enum ParsedInstruction {
    OnlyName {
        op: OnlyNameOp,
    },
    Field {
        op: FieldOp,
        address: Address,
        index: Index,
        fields: FieldSpec,
    },
    NonField {
        op: NonFieldOp,
        address: Address,
        index: Index,
    },
    Arg {
        op: ArgOp,
        address: Address,
        index: Index,
        argument: ArgSpec,
    },
}

impl ParsedInstruction {
    pub fn only_name(op: OnlyNameOp) -> Self {
        Self::OnlyName { op }
    }

    pub fn field(op: FieldOp, address: Address, index: Index, fields: FieldSpec) -> Self {
        Self::Field {
            op,
            address,
            index,
            fields,
        }
    }

    pub fn non_field(op: NonFieldOp, address: Address, index: Index) -> Self {
        Self::NonField { op, address, index }
    }

    pub fn arg(op: ArgOp, address: Address, index: Index, argument: ArgSpec) -> Self {
        Self::Arg {
            op,
            address,
            index,
            argument,
        }
    }

    pub fn mnemonic(&self) -> Mnemonic {
        match *self {
            Self::OnlyName { op } => Mnemonic::OnlyName(op),
            Self::Field { op, .. } => Mnemonic::Field(op),
            Self::NonField { op, .. } => Mnemonic::NonField(op),
            Self::Arg { op, .. } => Mnemonic::Arg(op),
        }
    }

    pub fn category(&self) -> Category {
        self.mnemonic().category()
    }

    pub fn address(&self) -> Option<Address> {
        match *self {
            Self::OnlyName { .. } => None,
            Self::Field { address, .. } | Self::NonField { address, .. } | Self::Arg { address, .. } => Some(address),
        }
    }

    pub fn index(&self) -> Option<Index> {
        match *self {
            Self::OnlyName { .. } => None,
            Self::Field { index, .. } | Self::NonField { index, .. } | Self::Arg { index, .. } => Some(index),
        }
    }

    /// Field spec slot; `None` for mnemonics that have no such slot.
    pub fn fields(&self) -> Option<FieldSpec> {
        match *self {
            Self::Field { fields, .. } => Some(fields),
            _ => None,
        }
    }

    /// Argument slot; `None` for mnemonics that have no such slot.
    pub fn argument(&self) -> Option<ArgSpec> {
        match *self {
            Self::Arg { argument, .. } => Some(argument),
            _ => None,
        }
    }

    /// Operands in source order. Omitted optional operands are left out.
    pub fn operands(&self) -> Vec<Operand> {
        let mut out = Vec::with_capacity(3);
        if let (Some(a), Some(i)) = (self.address(), self.index()) {
            out.push(Operand::Address(a));
            out.push(Operand::Index(i));
        }
        if let Some(FieldSpec::Explicit(f)) = self.fields() {
            out.push(Operand::Fields(f));
        }
        if let Some(ArgSpec::Explicit(a)) = self.argument() {
            out.push(Operand::Argument(a));
        }
        out
    }
}

/// Canonical text: `MNEMONIC address,index` plus `(L:R)` or `(n)` when given.
impl fmt::Display for ParsedInstruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OnlyName { op } => write!(f, "{op}"),
            Self::Field {
                op,
                address,
                index,
                fields,
            } => write!(f, "{op} {address},{index}{fields}"),
            Self::NonField { op, address, index } => write!(f, "{op} {address},{index}"),
            Self::Arg {
                op,
                address,
                index,
                argument,
            } => write!(f, "{op} {address},{index}{argument}"),
        }
    }
}
