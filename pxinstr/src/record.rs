//! Host records, the compiler's input.
use std::collections::BTreeMap;

use crate::{
    op::{ExpOp, ResultType},
    value::HostValue,
};

/// Keyed arguments of a record.
pub type ArgumentBag = BTreeMap<String, HostValue>;

/// One predicate element as sent by the host, in prefix order.
///
/// All numeric fields are kept raw; nothing is validated until the record is
/// compiled.
#[derive(Debug, Clone)]
pub struct Record {
    pub op: i64,
    pub result_type: i64,
    pub args: ArgumentBag,
    /// Number of child subtrees following this record.
    pub children: i64,
}

impl Record {
    pub fn op(op: ExpOp) -> Self {
        Self::raw(op.code())
    }

    /// Record with an arbitrary, possibly unknown, opcode.
    pub fn raw(op: i64) -> Self {
        Self {
            op,
            result_type: 0,
            args: ArgumentBag::new(),
            children: 0,
        }
    }

    pub fn result(mut self, result_type: ResultType) -> Self {
        self.result_type = result_type.code();
        self
    }

    pub fn arg(mut self, key: impl Into<String>, value: impl Into<HostValue>) -> Self {
        self.args.insert(key.into(), value.into());
        self
    }

    pub fn children(mut self, children: i64) -> Self {
        self.children = children;
        self
    }
}
