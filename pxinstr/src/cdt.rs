//! Evaluator-side numbering of collection, bit and HLL operations.
//!
//! Host opcodes (see [`crate::op`]) are translated here into the operation
//! numbers the evaluator dispatches on, together with the return-type rules
//! used to infer the type of a read.
use crate::op::{BitOp, HllOp, ListModifyOp, ListReadOp, MapModifyOp, MapReadOp, ResultType};

/// System call selectors passed as the second argument of a call.
pub mod sys {
    pub const CDT: i64 = 0;
    pub const BITS: i64 = 1;
    pub const HLL: i64 = 2;

    /// Or-ed into the selector when the call modifies the bin locally.
    pub const FLAG_MODIFY_LOCAL: i64 = 0x40;
}

/// What a list read hands back.
pub mod list_return {
    pub const NONE: i64 = 0;
    pub const INDEX: i64 = 1;
    pub const REVERSE_INDEX: i64 = 2;
    pub const RANK: i64 = 3;
    pub const REVERSE_RANK: i64 = 4;
    pub const COUNT: i64 = 5;
    pub const VALUE: i64 = 7;
    pub const EXISTS: i64 = 13;
    /// Select everything except the matched range.
    pub const INVERTED: i64 = 0x10000;
}

/// What a map read hands back.
pub mod map_return {
    pub const NONE: i64 = 0;
    pub const INDEX: i64 = 1;
    pub const REVERSE_INDEX: i64 = 2;
    pub const RANK: i64 = 3;
    pub const REVERSE_RANK: i64 = 4;
    pub const COUNT: i64 = 5;
    pub const KEY: i64 = 6;
    pub const VALUE: i64 = 7;
    pub const KEY_VALUE: i64 = 8;
    pub const EXISTS: i64 = 13;
    pub const UNORDERED_MAP: i64 = 16;
    pub const ORDERED_MAP: i64 = 17;
    pub const INVERTED: i64 = 0x10000;
}

/// Type of a list read, given the declared value type, the requested return
/// type and whether the read may select several elements. `None` when the
/// return type is not valid for a read.
pub fn expected_list_type(value_type: ResultType, rtype: i64, is_multi: bool) -> Option<ResultType> {
    let ty = match rtype & !list_return::INVERTED {
        list_return::INDEX
        | list_return::REVERSE_INDEX
        | list_return::RANK
        | list_return::REVERSE_RANK => {
            if is_multi {
                ResultType::List
            } else {
                ResultType::Int
            }
        }
        list_return::COUNT => ResultType::Int,
        list_return::VALUE => {
            if is_multi {
                ResultType::List
            } else {
                value_type
            }
        }
        list_return::EXISTS => ResultType::Bool,
        _ => return None,
    };
    Some(ty)
}

/// Map counterpart of [`expected_list_type`].
pub fn expected_map_type(value_type: ResultType, rtype: i64, is_multi: bool) -> Option<ResultType> {
    let ty = match rtype & !map_return::INVERTED {
        map_return::INDEX | map_return::REVERSE_INDEX | map_return::RANK | map_return::REVERSE_RANK => {
            if is_multi {
                ResultType::List
            } else {
                ResultType::Int
            }
        }
        map_return::COUNT => ResultType::Int,
        map_return::KEY | map_return::VALUE => {
            if is_multi {
                ResultType::List
            } else {
                value_type
            }
        }
        map_return::KEY_VALUE | map_return::UNORDERED_MAP | map_return::ORDERED_MAP => {
            ResultType::Map
        }
        map_return::EXISTS => ResultType::Bool,
        _ => return None,
    };
    Some(ty)
}

impl ListReadOp {
    pub const fn cdt_code(self) -> i64 {
        match self {
            ListReadOp::Size => 16,
            ListReadOp::GetByIndex => 19,
            ListReadOp::GetByRank => 21,
            ListReadOp::GetByValue => 22,
            ListReadOp::GetByValueList => 23,
            ListReadOp::GetByIndexRange | ListReadOp::GetByIndexRangeToEnd => 24,
            ListReadOp::GetByValueRange => 25,
            ListReadOp::GetByRankRange | ListReadOp::GetByRankRangeToEnd => 26,
            ListReadOp::GetByValueRelRankRange | ListReadOp::GetByValueRelRankRangeToEnd => 27,
        }
    }

    /// Whether the read may select more than one element.
    pub const fn is_multi(self) -> bool {
        !matches!(
            self,
            ListReadOp::Size | ListReadOp::GetByIndex | ListReadOp::GetByRank
        )
    }

    /// Whether the host supplies the element type through `bin_type`.
    pub const fn takes_value_type(self) -> bool {
        matches!(self, ListReadOp::GetByIndex | ListReadOp::GetByRank)
    }
}

impl ListModifyOp {
    pub const fn cdt_code(self) -> i64 {
        match self {
            ListModifyOp::Append => 1,
            ListModifyOp::AppendItems => 2,
            ListModifyOp::Insert => 3,
            ListModifyOp::InsertItems => 4,
            ListModifyOp::Set => 9,
            ListModifyOp::Clear => 11,
            ListModifyOp::Increment => 12,
            ListModifyOp::Sort => 13,
            ListModifyOp::RemoveByIndex => 32,
            ListModifyOp::RemoveByRank => 34,
            ListModifyOp::RemoveByValue => 35,
            ListModifyOp::RemoveByValueList => 36,
            ListModifyOp::RemoveByIndexRange | ListModifyOp::RemoveByIndexRangeToEnd => 37,
            ListModifyOp::RemoveByValueRange => 38,
            ListModifyOp::RemoveByRankRange | ListModifyOp::RemoveByRankRangeToEnd => 39,
            ListModifyOp::RemoveByValueRelRankRange
            | ListModifyOp::RemoveByValueRelRankRangeToEnd => 40,
        }
    }
}

impl MapReadOp {
    pub const fn cdt_code(self) -> i64 {
        match self {
            MapReadOp::Size => 96,
            MapReadOp::GetByKey => 97,
            MapReadOp::GetByIndex => 98,
            MapReadOp::GetByValue => 102,
            MapReadOp::GetByRank => 100,
            MapReadOp::GetByKeyRange => 103,
            MapReadOp::GetByIndexRange | MapReadOp::GetByIndexRangeToEnd => 104,
            MapReadOp::GetByValueRange => 105,
            MapReadOp::GetByRankRange | MapReadOp::GetByRankRangeToEnd => 106,
            MapReadOp::GetByKeyList => 107,
            MapReadOp::GetByValueList => 108,
            MapReadOp::GetByKeyRelIndexRange | MapReadOp::GetByKeyRelIndexRangeToEnd => 109,
            MapReadOp::GetByValueRelRankRange | MapReadOp::GetByValueRelRankRangeToEnd => 110,
        }
    }

    pub const fn is_multi(self) -> bool {
        !matches!(
            self,
            MapReadOp::Size | MapReadOp::GetByKey | MapReadOp::GetByIndex | MapReadOp::GetByRank
        )
    }

    pub const fn takes_value_type(self) -> bool {
        matches!(
            self,
            MapReadOp::GetByKey | MapReadOp::GetByIndex | MapReadOp::GetByRank
        )
    }
}

impl MapModifyOp {
    pub const fn cdt_code(self) -> i64 {
        match self {
            MapModifyOp::Put => 67,
            MapModifyOp::PutItems => 68,
            MapModifyOp::Increment => 73,
            MapModifyOp::Clear => 75,
            MapModifyOp::RemoveByKey => 76,
            MapModifyOp::RemoveByIndex => 77,
            MapModifyOp::RemoveByValue => 82,
            MapModifyOp::RemoveByRank => 79,
            MapModifyOp::RemoveByKeyList => 81,
            MapModifyOp::RemoveByValueList => 83,
            MapModifyOp::RemoveByKeyRange => 84,
            MapModifyOp::RemoveByIndexRange | MapModifyOp::RemoveByIndexRangeToEnd => 85,
            MapModifyOp::RemoveByValueRange => 86,
            MapModifyOp::RemoveByRankRange | MapModifyOp::RemoveByRankRangeToEnd => 87,
            MapModifyOp::RemoveByKeyRelIndexRange | MapModifyOp::RemoveByKeyRelIndexRangeToEnd => 88,
            MapModifyOp::RemoveByValueRelRankRange
            | MapModifyOp::RemoveByValueRelRankRangeToEnd => 89,
        }
    }
}

impl BitOp {
    pub const fn cdt_code(self) -> i64 {
        match self {
            BitOp::Resize => 0,
            BitOp::Insert => 1,
            BitOp::Remove => 2,
            BitOp::Set => 3,
            BitOp::Or => 4,
            BitOp::Xor => 5,
            BitOp::And => 6,
            BitOp::Not => 7,
            BitOp::Lshift => 8,
            BitOp::Rshift => 9,
            BitOp::Add => 10,
            BitOp::Subtract => 11,
            BitOp::SetInt => 12,
            BitOp::Get => 50,
            BitOp::Count => 51,
            BitOp::Lscan => 52,
            BitOp::Rscan => 53,
            BitOp::GetInt => 54,
        }
    }

    /// Result type of a read, `None` for in-place modifications.
    pub const fn read_type(self) -> Option<ResultType> {
        match self {
            BitOp::Get => Some(ResultType::Blob),
            BitOp::Count | BitOp::Lscan | BitOp::Rscan | BitOp::GetInt => Some(ResultType::Int),
            _ => None,
        }
    }
}

impl HllOp {
    pub const fn cdt_code(self) -> i64 {
        match self {
            HllOp::Add => 1,
            HllOp::GetCount => 50,
            HllOp::GetUnion => 51,
            HllOp::GetUnionCount => 52,
            HllOp::GetIntersectCount => 53,
            HllOp::GetSimilarity => 54,
            HllOp::Describe => 55,
            HllOp::MayContain => 56,
        }
    }

    pub const fn read_type(self) -> Option<ResultType> {
        match self {
            HllOp::Add => None,
            HllOp::GetCount
            | HllOp::GetUnionCount
            | HllOp::GetIntersectCount
            | HllOp::MayContain => Some(ResultType::Int),
            HllOp::GetUnion => Some(ResultType::Hll),
            HllOp::GetSimilarity => Some(ResultType::Float),
            HllOp::Describe => Some(ResultType::List),
        }
    }
}
