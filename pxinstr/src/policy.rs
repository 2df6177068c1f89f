//! Write policies attached to list and map modifications.
use bitflags::bitflags;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use strum::{Display, FromRepr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, FromRepr, Display)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[strum(serialize_all = "snake_case")]
#[repr(u32)]
pub enum ListOrder {
    #[default]
    Unordered = 0,
    Ordered = 1,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, FromRepr, Display)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[strum(serialize_all = "snake_case")]
#[repr(u32)]
pub enum MapOrder {
    #[default]
    Unordered = 0,
    KeyOrdered = 1,
    KeyValueOrdered = 3,
}

bitflags! {
    /// Write behaviour of list modifications.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
    pub struct ListWriteFlags: u32 {
        /// Only add values not already present.
        const ADD_UNIQUE = 1 << 0;
        /// Refuse inserts beyond the current bounds.
        const INSERT_BOUNDED = 1 << 1;
        /// Violations are skipped instead of failing the call.
        const NO_FAIL = 1 << 2;
        /// Commit the items that passed when `NO_FAIL` is set.
        const PARTIAL = 1 << 3;
    }
}

bitflags! {
    /// Write behaviour of map modifications.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
    pub struct MapWriteFlags: u32 {
        const CREATE_ONLY = 1 << 0;
        const UPDATE_ONLY = 1 << 1;
        const NO_FAIL = 1 << 2;
        const PARTIAL = 1 << 3;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ListPolicy {
    pub order: ListOrder,
    pub flags: ListWriteFlags,
}

impl ListPolicy {
    pub const fn new(order: ListOrder, flags: ListWriteFlags) -> Self {
        Self { order, flags }
    }
}

impl Default for ListPolicy {
    fn default() -> Self {
        Self::new(ListOrder::Unordered, ListWriteFlags::empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MapPolicy {
    pub order: MapOrder,
    pub flags: MapWriteFlags,
    /// Keep a persistent index for top-level ordered maps.
    pub persist_index: bool,
}

impl MapPolicy {
    pub const fn new(order: MapOrder, flags: MapWriteFlags) -> Self {
        Self {
            order,
            flags,
            persist_index: false,
        }
    }
}

impl Default for MapPolicy {
    fn default() -> Self {
        Self::new(MapOrder::Unordered, MapWriteFlags::empty())
    }
}

impl std::fmt::Display for ListPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} flags={:#x}", self.order, self.flags.bits())
    }
}

impl std::fmt::Display for MapPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} flags={:#x}", self.order, self.flags.bits())?;
        if self.persist_index {
            write!(f, " persist_index")?;
        }
        Ok(())
    }
}
