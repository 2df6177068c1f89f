//! Cells of the flat instruction stream.
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use strum::{EnumDiscriminants, EnumIs, EnumTryAs, FromRepr};

use crate::{
    ctx::ContextPath,
    op::{ListModMode, MapModMode},
    policy::{ListPolicy, MapPolicy},
    value::Literal,
};

/// Operation codes of the evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, FromRepr, strum::Display)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[strum(serialize_all = "snake_case")]
#[repr(u32)]
pub enum ExpCode {
    CmpEq = 1,
    CmpNe = 2,
    CmpGt = 3,
    CmpGe = 4,
    CmpLt = 5,
    CmpLe = 6,
    CmpRegex = 7,
    CmpGeo = 8,
    And = 16,
    Or = 17,
    Not = 18,
    DigestModulo = 64,
    DeviceSize = 65,
    LastUpdate = 66,
    VoidTime = 67,
    Ttl = 68,
    SetName = 69,
    KeyExists = 70,
    Key = 80,
    Bin = 81,
    BinType = 82,
    Call = 127,
    /// Opens the parameter list of a call.
    CallVopStart = 144,
}

/// One cell of a compiled expression.
#[derive(Debug, Clone, PartialEq, EnumIs, EnumTryAs, EnumDiscriminants)]
#[strum_discriminants(name(InstructionKind))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum InstructionEntry {
    Value(Literal),
    /// Operation marker. `count` is the number of entries the evaluator
    /// consumes for this operation, the marker included; zero for variadic
    /// operations closed by [`InstructionEntry::EndOfVaArgs`].
    Op { code: ExpCode, count: u32 },
    /// Addressing path applied before the following CDT operation.
    Context(ContextPath),
    ListPolicy {
        mode: ListModMode,
        policy: Option<ListPolicy>,
    },
    MapPolicy {
        mode: MapModMode,
        policy: Option<MapPolicy>,
    },
    EndOfVaArgs,
}

impl InstructionEntry {
    #[inline]
    pub const fn op(code: ExpCode, count: u32) -> Self {
        InstructionEntry::Op { code, count }
    }

    #[inline]
    pub const fn int(value: i64) -> Self {
        InstructionEntry::Value(Literal::Int(value))
    }

    /// Operation code if this entry is an operation marker.
    pub fn code(&self) -> Option<ExpCode> {
        match self {
            InstructionEntry::Op { code, .. } => Some(*code),
            _ => None,
        }
    }
}

impl std::fmt::Display for InstructionEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InstructionEntry::Value(lit) => write!(f, "{}", lit),
            InstructionEntry::Op { code, count } => write!(f, "{}/{}", code, count),
            InstructionEntry::Context(ctx) => write!(f, "{}", ctx),
            InstructionEntry::ListPolicy { mode, policy } => match policy {
                Some(policy) => write!(f, "list_{}({})", mode, policy),
                None => write!(f, "list_{}", mode),
            },
            InstructionEntry::MapPolicy { mode, policy } => match policy {
                Some(policy) => write!(f, "map_{}({})", mode, policy),
                None => write!(f, "map_{}", mode),
            },
            InstructionEntry::EndOfVaArgs => write!(f, "end"),
        }
    }
}

/// Finished instruction stream, in evaluation order.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CompiledExpression {
    entries: Box<[InstructionEntry]>,
}

impl CompiledExpression {
    pub fn entries(&self) -> &[InstructionEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, InstructionEntry> {
        self.entries.iter()
    }

    /// Shape of the stream, one discriminant per entry.
    pub fn kinds(&self) -> Vec<InstructionKind> {
        self.entries.iter().map(InstructionKind::from).collect()
    }

    pub fn into_entries(self) -> Vec<InstructionEntry> {
        self.entries.into_vec()
    }
}

impl From<Vec<InstructionEntry>> for CompiledExpression {
    fn from(entries: Vec<InstructionEntry>) -> Self {
        Self {
            entries: entries.into_boxed_slice(),
        }
    }
}

impl<'a> IntoIterator for &'a CompiledExpression {
    type Item = &'a InstructionEntry;
    type IntoIter = std::slice::Iter<'a, InstructionEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl std::fmt::Display for CompiledExpression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, entry) in self.entries.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", entry)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_stream() {
        let expr = CompiledExpression::from(vec![
            InstructionEntry::op(ExpCode::And, 0),
            InstructionEntry::op(ExpCode::CmpEq, 3),
            InstructionEntry::int(5),
            InstructionEntry::int(5),
            InstructionEntry::EndOfVaArgs,
        ]);
        assert_eq!(expr.to_string(), "and/0 cmp_eq/3 5 5 end");
        assert_eq!(
            expr.kinds(),
            vec![
                InstructionKind::Op,
                InstructionKind::Op,
                InstructionKind::Value,
                InstructionKind::Value,
                InstructionKind::EndOfVaArgs,
            ]
        );
    }
}
