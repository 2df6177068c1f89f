//! Addressing paths into nested list and map values.
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use strum::EnumIs;

use crate::{
    policy::{ListOrder, MapOrder},
    value::Literal,
};

/// Step identifiers understood by the evaluator.
pub mod ids {
    pub const LIST_INDEX: u8 = 0x10;
    pub const LIST_RANK: u8 = 0x11;
    pub const LIST_VALUE: u8 = 0x13;
    pub const MAP_INDEX: u8 = 0x20;
    pub const MAP_RANK: u8 = 0x21;
    pub const MAP_KEY: u8 = 0x22;
    pub const MAP_VALUE: u8 = 0x23;

    /// Flags or-ed into `LIST_INDEX` when the step creates missing lists.
    pub const LIST_CREATE_UNORDERED: u8 = 0x40;
    pub const LIST_CREATE_UNORDERED_PAD: u8 = 0x80;
    pub const LIST_CREATE_ORDERED: u8 = 0xc0;

    /// Flags or-ed into `MAP_KEY` when the step creates missing maps.
    pub const MAP_CREATE_UNORDERED: u8 = 0x40;
    pub const MAP_CREATE_KEY_ORDERED: u8 = 0x80;
    pub const MAP_CREATE_KEY_VALUE_ORDERED: u8 = 0xc0;
}

/// One addressing step.
#[derive(Debug, Clone, PartialEq, EnumIs)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ContextStep {
    ListIndex(i64),
    /// Index into a list, creating it (optionally padded) when absent.
    ListIndexCreate {
        index: i64,
        order: ListOrder,
        pad: bool,
    },
    ListRank(i64),
    ListValue(Literal),
    MapIndex(i64),
    MapRank(i64),
    MapKey(Literal),
    /// Key lookup creating the map when absent.
    MapKeyCreate {
        key: Literal,
        order: MapOrder,
    },
    MapValue(Literal),
}

impl ContextStep {
    /// Evaluator step identifier, including creation flags.
    pub fn id(&self) -> u8 {
        match self {
            ContextStep::ListIndex(_) => ids::LIST_INDEX,
            ContextStep::ListIndexCreate { order, pad, .. } => {
                let flag = match (order, pad) {
                    (ListOrder::Ordered, _) => ids::LIST_CREATE_ORDERED,
                    (ListOrder::Unordered, true) => ids::LIST_CREATE_UNORDERED_PAD,
                    (ListOrder::Unordered, false) => ids::LIST_CREATE_UNORDERED,
                };
                ids::LIST_INDEX | flag
            }
            ContextStep::ListRank(_) => ids::LIST_RANK,
            ContextStep::ListValue(_) => ids::LIST_VALUE,
            ContextStep::MapIndex(_) => ids::MAP_INDEX,
            ContextStep::MapRank(_) => ids::MAP_RANK,
            ContextStep::MapKey(_) => ids::MAP_KEY,
            ContextStep::MapKeyCreate { order, .. } => {
                let flag = match order {
                    MapOrder::Unordered => ids::MAP_CREATE_UNORDERED,
                    MapOrder::KeyOrdered => ids::MAP_CREATE_KEY_ORDERED,
                    MapOrder::KeyValueOrdered => ids::MAP_CREATE_KEY_VALUE_ORDERED,
                };
                ids::MAP_KEY | flag
            }
            ContextStep::MapValue(_) => ids::MAP_VALUE,
        }
    }
}

impl std::fmt::Display for ContextStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContextStep::ListIndex(i) => write!(f, "list_index({})", i),
            ContextStep::ListIndexCreate { index, order, pad } => {
                write!(f, "list_index_create({}, {}, pad={})", index, order, pad)
            }
            ContextStep::ListRank(r) => write!(f, "list_rank({})", r),
            ContextStep::ListValue(v) => write!(f, "list_value({})", v),
            ContextStep::MapIndex(i) => write!(f, "map_index({})", i),
            ContextStep::MapRank(r) => write!(f, "map_rank({})", r),
            ContextStep::MapKey(k) => write!(f, "map_key({})", k),
            ContextStep::MapKeyCreate { key, order } => {
                write!(f, "map_key_create({}, {})", key, order)
            }
            ContextStep::MapValue(v) => write!(f, "map_value({})", v),
        }
    }
}

/// Ordered steps, outermost first.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ContextPath {
    steps: Vec<ContextStep>,
}

impl ContextPath {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, step: ContextStep) {
        self.steps.push(step);
    }

    pub fn steps(&self) -> &[ContextStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl FromIterator<ContextStep> for ContextPath {
    fn from_iter<T: IntoIterator<Item = ContextStep>>(iter: T) -> Self {
        Self {
            steps: iter.into_iter().collect(),
        }
    }
}

impl std::fmt::Display for ContextPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ctx[")?;
        for (i, step) in self.steps.iter().enumerate() {
            if i > 0 {
                write!(f, " / ")?;
            }
            write!(f, "{}", step)?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_flags() {
        let step = ContextStep::ListIndexCreate {
            index: 0,
            order: ListOrder::Unordered,
            pad: true,
        };
        assert_eq!(step.id(), 0x90);

        let step = ContextStep::ListIndexCreate {
            index: 0,
            order: ListOrder::Ordered,
            pad: true,
        };
        assert_eq!(step.id(), 0xd0);

        let step = ContextStep::MapKeyCreate {
            key: Literal::Str("k".into()),
            order: MapOrder::KeyValueOrdered,
        };
        assert_eq!(step.id(), 0xe2);
    }
}
