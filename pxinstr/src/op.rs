//! Host-level operation codes.
//!
//! Every record handed to the compiler carries a raw integer opcode. The
//! numbering is grouped by family: structural and comparison operators live
//! below 128, policy markers at 145–150 and the CDT, bit and HLL families in
//! their own thousand-blocks. [`ExpOp::from_code`] is the only place where a
//! raw code is interpreted.
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIs, EnumIter, EnumTryAs, FromRepr};

/// Value type produced by a node, as understood by the evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, FromRepr, EnumIs, Display)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[strum(serialize_all = "snake_case")]
#[repr(u32)]
pub enum ResultType {
    Nil = 0,
    Bool = 1,
    Int = 2,
    Str = 3,
    List = 4,
    Map = 5,
    Blob = 6,
    Float = 7,
    GeoJson = 8,
    Hll = 9,
    /// Let the evaluator infer the type from the operand.
    Auto = 10,
}

impl ResultType {
    /// Decode a raw host result type.
    pub fn from_code(raw: i64) -> Option<Self> {
        u32::try_from(raw).ok().and_then(Self::from_repr)
    }

    #[inline]
    pub const fn code(self) -> i64 {
        self as i64
    }
}

/// Binary comparison operators. Both operands are adjacent nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, FromRepr, EnumIter, Display)]
#[strum(serialize_all = "snake_case")]
#[repr(u32)]
pub enum CmpOp {
    Eq = 1,
    Ne = 2,
    Gt = 3,
    Ge = 4,
    Lt = 5,
    Le = 6,
    Geo = 8,
}

/// Record metadata accessors taking no operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, FromRepr, EnumIter, Display)]
#[strum(serialize_all = "snake_case")]
#[repr(u32)]
pub enum MetaOp {
    DeviceSize = 65,
    LastUpdate = 66,
    VoidTime = 67,
    Ttl = 68,
    SetName = 69,
    KeyExists = 70,
}

/// Policy marker emitted after the operands of a list modification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, FromRepr, EnumIter, Display)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[strum(serialize_all = "snake_case")]
#[repr(u32)]
pub enum ListModMode {
    CreateModify = 145,
    Modify = 146,
}

/// Policy marker emitted after the operands of a map modification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, FromRepr, EnumIter, Display)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[strum(serialize_all = "snake_case")]
#[repr(u32)]
pub enum MapModMode {
    CreateModify = 147,
    Create = 148,
    Modify = 149,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, FromRepr, EnumIter, Display)]
#[strum(serialize_all = "snake_case")]
#[repr(u32)]
pub enum ListReadOp {
    Size = 1000,
    GetByIndex = 1001,
    GetByIndexRangeToEnd = 1002,
    GetByIndexRange = 1003,
    GetByRank = 1004,
    GetByRankRangeToEnd = 1005,
    GetByRankRange = 1006,
    GetByValue = 1007,
    GetByValueRange = 1008,
    GetByValueList = 1009,
    GetByValueRelRankRangeToEnd = 1010,
    GetByValueRelRankRange = 1011,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, FromRepr, EnumIter, Display)]
#[strum(serialize_all = "snake_case")]
#[repr(u32)]
pub enum ListModifyOp {
    Append = 1100,
    AppendItems = 1101,
    Insert = 1102,
    InsertItems = 1103,
    Set = 1104,
    Clear = 1105,
    Increment = 1106,
    Sort = 1107,
    RemoveByValue = 1108,
    RemoveByValueList = 1109,
    RemoveByValueRange = 1110,
    RemoveByValueRelRankRangeToEnd = 1111,
    RemoveByValueRelRankRange = 1112,
    RemoveByIndex = 1113,
    RemoveByIndexRangeToEnd = 1114,
    RemoveByIndexRange = 1115,
    RemoveByRank = 1116,
    RemoveByRankRangeToEnd = 1117,
    RemoveByRankRange = 1118,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, FromRepr, EnumIter, Display)]
#[strum(serialize_all = "snake_case")]
#[repr(u32)]
pub enum MapReadOp {
    Size = 2000,
    GetByKey = 2001,
    GetByKeyRange = 2002,
    GetByKeyList = 2003,
    GetByKeyRelIndexRangeToEnd = 2004,
    GetByKeyRelIndexRange = 2005,
    GetByValue = 2006,
    GetByValueRange = 2007,
    GetByValueList = 2008,
    GetByValueRelRankRangeToEnd = 2009,
    GetByValueRelRankRange = 2010,
    GetByIndex = 2011,
    GetByIndexRangeToEnd = 2012,
    GetByIndexRange = 2013,
    GetByRank = 2014,
    GetByRankRangeToEnd = 2015,
    GetByRankRange = 2016,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, FromRepr, EnumIter, Display)]
#[strum(serialize_all = "snake_case")]
#[repr(u32)]
pub enum MapModifyOp {
    Put = 2100,
    PutItems = 2101,
    Increment = 2102,
    Clear = 2103,
    RemoveByKey = 2104,
    RemoveByKeyList = 2105,
    RemoveByKeyRange = 2106,
    RemoveByKeyRelIndexRangeToEnd = 2107,
    RemoveByKeyRelIndexRange = 2108,
    RemoveByValue = 2109,
    RemoveByValueList = 2110,
    RemoveByValueRange = 2111,
    RemoveByValueRelRankRangeToEnd = 2112,
    RemoveByValueRelRankRange = 2113,
    RemoveByIndex = 2114,
    RemoveByIndexRangeToEnd = 2115,
    RemoveByIndexRange = 2116,
    RemoveByRank = 2117,
    RemoveByRankRangeToEnd = 2118,
    RemoveByRankRange = 2119,
}

/// Bit-blob operations. The first twelve modify the blob in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, FromRepr, EnumIter, Display)]
#[strum(serialize_all = "snake_case")]
#[repr(u32)]
pub enum BitOp {
    Resize = 3000,
    Insert = 3001,
    Remove = 3002,
    Set = 3003,
    Or = 3004,
    Xor = 3005,
    And = 3006,
    Not = 3007,
    Lshift = 3008,
    Rshift = 3009,
    Add = 3010,
    Subtract = 3011,
    SetInt = 3012,
    Get = 3013,
    Count = 3014,
    Lscan = 3015,
    Rscan = 3016,
    GetInt = 3017,
}

/// HyperLogLog operations. Only `Add` modifies the bin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, FromRepr, EnumIter, Display)]
#[strum(serialize_all = "snake_case")]
#[repr(u32)]
pub enum HllOp {
    Add = 4000,
    GetCount = 4001,
    GetUnion = 4002,
    GetUnionCount = 4003,
    GetIntersectCount = 4004,
    GetSimilarity = 4005,
    Describe = 4006,
    MayContain = 4007,
}

/// Decoded host operation.
///
/// Families with many members are grouped under a single variant carrying the
/// family-specific enum, so that the compiler can dispatch on the family first
/// and the member second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIs, EnumTryAs)]
pub enum ExpOp {
    /// Literal value taken from the `value` argument.
    Val,
    Cmp(CmpOp),
    Regex,
    And,
    Or,
    Not,
    DigestModulo,
    Meta(MetaOp),
    RecKey,
    Bin,
    BinType,
    BinExists,
    ListPolicy(ListModMode),
    MapPolicy(MapModMode),
    BitFlags,
    ListRead(ListReadOp),
    ListModify(ListModifyOp),
    MapRead(MapReadOp),
    MapModify(MapModifyOp),
    Bit(BitOp),
    Hll(HllOp),
}

impl ExpOp {
    pub const VAL: u32 = 0;
    pub const REGEX: u32 = 7;
    pub const AND: u32 = 16;
    pub const OR: u32 = 17;
    pub const NOT: u32 = 18;
    pub const DIGEST_MODULO: u32 = 64;
    pub const REC_KEY: u32 = 80;
    pub const BIN: u32 = 81;
    pub const BIN_TYPE: u32 = 82;
    pub const BIN_EXISTS: u32 = 83;
    pub const BIT_FLAGS: u32 = 150;

    /// Decode a raw host opcode. Returns `None` for unknown or negative codes.
    pub fn from_code(raw: i64) -> Option<Self> {
        let code = u32::try_from(raw).ok()?;
        let op = match code {
            Self::VAL => ExpOp::Val,
            Self::REGEX => ExpOp::Regex,
            Self::AND => ExpOp::And,
            Self::OR => ExpOp::Or,
            Self::NOT => ExpOp::Not,
            Self::DIGEST_MODULO => ExpOp::DigestModulo,
            Self::REC_KEY => ExpOp::RecKey,
            Self::BIN => ExpOp::Bin,
            Self::BIN_TYPE => ExpOp::BinType,
            Self::BIN_EXISTS => ExpOp::BinExists,
            Self::BIT_FLAGS => ExpOp::BitFlags,
            _ => {
                return CmpOp::from_repr(code)
                    .map(ExpOp::Cmp)
                    .or_else(|| MetaOp::from_repr(code).map(ExpOp::Meta))
                    .or_else(|| ListModMode::from_repr(code).map(ExpOp::ListPolicy))
                    .or_else(|| MapModMode::from_repr(code).map(ExpOp::MapPolicy))
                    .or_else(|| ListReadOp::from_repr(code).map(ExpOp::ListRead))
                    .or_else(|| ListModifyOp::from_repr(code).map(ExpOp::ListModify))
                    .or_else(|| MapReadOp::from_repr(code).map(ExpOp::MapRead))
                    .or_else(|| MapModifyOp::from_repr(code).map(ExpOp::MapModify))
                    .or_else(|| BitOp::from_repr(code).map(ExpOp::Bit))
                    .or_else(|| HllOp::from_repr(code).map(ExpOp::Hll));
            }
        };
        Some(op)
    }

    /// Raw host opcode for this operation.
    pub const fn code(self) -> i64 {
        let code = match self {
            ExpOp::Val => Self::VAL,
            ExpOp::Cmp(op) => op as u32,
            ExpOp::Regex => Self::REGEX,
            ExpOp::And => Self::AND,
            ExpOp::Or => Self::OR,
            ExpOp::Not => Self::NOT,
            ExpOp::DigestModulo => Self::DIGEST_MODULO,
            ExpOp::Meta(op) => op as u32,
            ExpOp::RecKey => Self::REC_KEY,
            ExpOp::Bin => Self::BIN,
            ExpOp::BinType => Self::BIN_TYPE,
            ExpOp::BinExists => Self::BIN_EXISTS,
            ExpOp::ListPolicy(mode) => mode as u32,
            ExpOp::MapPolicy(mode) => mode as u32,
            ExpOp::BitFlags => Self::BIT_FLAGS,
            ExpOp::ListRead(op) => op as u32,
            ExpOp::ListModify(op) => op as u32,
            ExpOp::MapRead(op) => op as u32,
            ExpOp::MapModify(op) => op as u32,
            ExpOp::Bit(op) => op as u32,
            ExpOp::Hll(op) => op as u32,
        };
        code as i64
    }

    /// Whether the operation takes an open-ended operand list closed by a terminator.
    #[inline]
    pub const fn is_variadic(self) -> bool {
        matches!(self, ExpOp::And | ExpOp::Or)
    }
}

impl std::fmt::Display for ExpOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExpOp::Val => write!(f, "val"),
            ExpOp::Cmp(op) => write!(f, "cmp_{}", op),
            ExpOp::Regex => write!(f, "cmp_regex"),
            ExpOp::And => write!(f, "and"),
            ExpOp::Or => write!(f, "or"),
            ExpOp::Not => write!(f, "not"),
            ExpOp::DigestModulo => write!(f, "digest_modulo"),
            ExpOp::Meta(op) => write!(f, "{}", op),
            ExpOp::RecKey => write!(f, "rec_key"),
            ExpOp::Bin => write!(f, "bin"),
            ExpOp::BinType => write!(f, "bin_type"),
            ExpOp::BinExists => write!(f, "bin_exists"),
            ExpOp::ListPolicy(mode) => write!(f, "list_policy_{}", mode),
            ExpOp::MapPolicy(mode) => write!(f, "map_policy_{}", mode),
            ExpOp::BitFlags => write!(f, "bit_flags"),
            ExpOp::ListRead(op) => write!(f, "list_{}", op),
            ExpOp::ListModify(op) => write!(f, "list_{}", op),
            ExpOp::MapRead(op) => write!(f, "map_{}", op),
            ExpOp::MapModify(op) => write!(f, "map_{}", op),
            ExpOp::Bit(op) => write!(f, "bit_{}", op),
            ExpOp::Hll(op) => write!(f, "hll_{}", op),
        }
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn test_every_family_code_decodes_back() {
        let ops = CmpOp::iter()
            .map(ExpOp::Cmp)
            .chain(MetaOp::iter().map(ExpOp::Meta))
            .chain(ListModMode::iter().map(ExpOp::ListPolicy))
            .chain(MapModMode::iter().map(ExpOp::MapPolicy))
            .chain(ListReadOp::iter().map(ExpOp::ListRead))
            .chain(ListModifyOp::iter().map(ExpOp::ListModify))
            .chain(MapReadOp::iter().map(ExpOp::MapRead))
            .chain(MapModifyOp::iter().map(ExpOp::MapModify))
            .chain(BitOp::iter().map(ExpOp::Bit))
            .chain(HllOp::iter().map(ExpOp::Hll));

        for op in ops {
            assert_eq!(ExpOp::from_code(op.code()), Some(op), "{}", op);
        }
    }

    #[test]
    fn test_reserved_and_negative_codes_are_unknown() {
        assert_eq!(ExpOp::from_code(-1), None);
        assert_eq!(ExpOp::from_code(128), None);
        assert_eq!(ExpOp::from_code(9), None);
        assert_eq!(ExpOp::from_code(i64::MAX), None);
    }

    #[test]
    fn test_display_names() {
        assert_eq!(ExpOp::Cmp(CmpOp::Eq).to_string(), "cmp_eq");
        assert_eq!(
            ExpOp::ListRead(ListReadOp::GetByIndex).to_string(),
            "list_get_by_index"
        );
        assert_eq!(ExpOp::Meta(MetaOp::Ttl).to_string(), "ttl");
        assert_eq!(ResultType::GeoJson.to_string(), "geo_json");
    }
}
