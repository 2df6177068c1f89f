//! Runs of list and map operations.
//!
//! Reads: `call/5 type sys [ctx] vop/(1+p) op [return_type]`.
//! Modifications: `call/5 list|map sys|modify [ctx] vop/(1+p[+policy]) op [embedded]`.
use pxinstr::{
    cdt::{list_return, map_return, sys},
    entry::ExpCode,
    op::{ListModifyOp, ListReadOp, MapModifyOp, MapReadOp, ResultType},
};

use super::RunBuilder;
use crate::queue::ExpressionNode;

/// Parameters of a CDT call, as counted by the evaluator.
#[derive(Debug, Clone, Copy)]
struct CallShape {
    /// Parameters following the operation code.
    params: u32,
    /// Additional parameters when a write policy is attached.
    policy_params: u32,
    /// Parameters written inside the run rather than by following nodes.
    embedded: u32,
    /// Whether a policy marker node follows the value operands.
    policy_marker: bool,
}

impl CallShape {
    const fn read(params: u32) -> Self {
        // The return type is the only embedded parameter of a read.
        Self {
            params,
            policy_params: 0,
            embedded: if params > 0 { 1 } else { 0 },
            policy_marker: false,
        }
    }

    const fn write(params: u32, policy_params: u32) -> Self {
        Self {
            params,
            policy_params,
            embedded: 0,
            policy_marker: true,
        }
    }

    const fn embedded(params: u32) -> Self {
        Self {
            params,
            policy_params: 0,
            embedded: 1,
            policy_marker: false,
        }
    }

    const fn bare(params: u32) -> Self {
        Self {
            params,
            policy_params: 0,
            embedded: 0,
            policy_marker: false,
        }
    }

    fn vop_count(&self, has_policy: bool) -> u32 {
        1 + self.params + if has_policy { self.policy_params } else { 0 }
    }

    /// Operand slots filled by following nodes: the non-embedded parameters,
    /// the policy marker when there is one, and the bin.
    fn operands(&self) -> usize {
        (self.params - self.embedded) as usize + usize::from(self.policy_marker) + 1
    }
}

fn list_read_shape(op: ListReadOp) -> CallShape {
    match op {
        ListReadOp::Size => CallShape::read(0),
        ListReadOp::GetByIndex
        | ListReadOp::GetByRank
        | ListReadOp::GetByValue
        | ListReadOp::GetByValueList
        | ListReadOp::GetByIndexRangeToEnd
        | ListReadOp::GetByRankRangeToEnd => CallShape::read(2),
        ListReadOp::GetByIndexRange
        | ListReadOp::GetByRankRange
        | ListReadOp::GetByValueRange
        | ListReadOp::GetByValueRelRankRangeToEnd => CallShape::read(3),
        ListReadOp::GetByValueRelRankRange => CallShape::read(4),
    }
}

fn map_read_shape(op: MapReadOp) -> CallShape {
    match op {
        MapReadOp::Size => CallShape::read(0),
        MapReadOp::GetByKey
        | MapReadOp::GetByKeyList
        | MapReadOp::GetByValue
        | MapReadOp::GetByValueList
        | MapReadOp::GetByIndex
        | MapReadOp::GetByIndexRangeToEnd
        | MapReadOp::GetByRank
        | MapReadOp::GetByRankRangeToEnd => CallShape::read(2),
        MapReadOp::GetByKeyRange
        | MapReadOp::GetByKeyRelIndexRangeToEnd
        | MapReadOp::GetByValueRange
        | MapReadOp::GetByValueRelRankRangeToEnd
        | MapReadOp::GetByIndexRange
        | MapReadOp::GetByRankRange => CallShape::read(3),
        MapReadOp::GetByKeyRelIndexRange | MapReadOp::GetByValueRelRankRange => CallShape::read(4),
    }
}

fn list_modify_shape(op: ListModifyOp) -> CallShape {
    match op {
        ListModifyOp::Append | ListModifyOp::AppendItems => CallShape::write(1, 2),
        ListModifyOp::Insert | ListModifyOp::InsertItems | ListModifyOp::Set => {
            CallShape::write(2, 1)
        }
        ListModifyOp::Increment => CallShape::write(2, 2),
        ListModifyOp::Clear => CallShape::bare(0),
        ListModifyOp::Sort => CallShape::embedded(1),
        ListModifyOp::RemoveByValue
        | ListModifyOp::RemoveByValueList
        | ListModifyOp::RemoveByIndex
        | ListModifyOp::RemoveByIndexRangeToEnd
        | ListModifyOp::RemoveByRank
        | ListModifyOp::RemoveByRankRangeToEnd => CallShape::embedded(2),
        ListModifyOp::RemoveByValueRange
        | ListModifyOp::RemoveByValueRelRankRangeToEnd
        | ListModifyOp::RemoveByIndexRange
        | ListModifyOp::RemoveByRankRange => CallShape::embedded(3),
        ListModifyOp::RemoveByValueRelRankRange => CallShape::embedded(4),
    }
}

fn map_modify_shape(op: MapModifyOp) -> CallShape {
    match op {
        MapModifyOp::Put => CallShape::write(2, 2),
        MapModifyOp::PutItems => CallShape::write(1, 2),
        MapModifyOp::Increment => CallShape::write(2, 1),
        MapModifyOp::Clear => CallShape::bare(0),
        MapModifyOp::RemoveByKey
        | MapModifyOp::RemoveByKeyList
        | MapModifyOp::RemoveByValue
        | MapModifyOp::RemoveByValueList
        | MapModifyOp::RemoveByIndex
        | MapModifyOp::RemoveByIndexRangeToEnd
        | MapModifyOp::RemoveByRank
        | MapModifyOp::RemoveByRankRangeToEnd => CallShape::embedded(2),
        MapModifyOp::RemoveByKeyRange
        | MapModifyOp::RemoveByKeyRelIndexRangeToEnd
        | MapModifyOp::RemoveByValueRange
        | MapModifyOp::RemoveByValueRelRankRangeToEnd
        | MapModifyOp::RemoveByIndexRange
        | MapModifyOp::RemoveByRankRange => CallShape::embedded(3),
        MapModifyOp::RemoveByKeyRelIndexRange | MapModifyOp::RemoveByValueRelRankRange => {
            CallShape::embedded(4)
        }
    }
}

fn call_head(b: &mut RunBuilder<'_>, node: &ExpressionNode, ty: ResultType, selector: i64) {
    b.op(ExpCode::Call, 5)
        .int(ty.code())
        .int(selector)
        .context(node.ctx.as_ref());
}

pub(super) fn list_read(
    b: &mut RunBuilder<'_>,
    node: &ExpressionNode,
    op: ListReadOp,
    return_type: i64,
    expected: ResultType,
) {
    let shape = list_read_shape(op);
    call_head(b, node, expected, sys::CDT);
    b.op(ExpCode::CallVopStart, shape.vop_count(false))
        .int(op.cdt_code());
    if shape.embedded > 0 {
        b.int(return_type);
    }
    b.operands(shape.operands());
}

pub(super) fn map_read(
    b: &mut RunBuilder<'_>,
    node: &ExpressionNode,
    op: MapReadOp,
    return_type: i64,
    expected: ResultType,
) {
    let shape = map_read_shape(op);
    call_head(b, node, expected, sys::CDT);
    b.op(ExpCode::CallVopStart, shape.vop_count(false))
        .int(op.cdt_code());
    if shape.embedded > 0 {
        b.int(return_type);
    }
    b.operands(shape.operands());
}

pub(super) fn list_modify(
    b: &mut RunBuilder<'_>,
    node: &ExpressionNode,
    op: ListModifyOp,
    sort_flags: Option<i64>,
) {
    let shape = list_modify_shape(op);
    call_head(b, node, ResultType::List, sys::CDT | sys::FLAG_MODIFY_LOCAL);
    b.op(
        ExpCode::CallVopStart,
        shape.vop_count(node.list_policy.is_some()),
    )
    .int(op.cdt_code());
    if shape.embedded > 0 {
        // Sort embeds its flags, removals embed a void return type.
        b.int(sort_flags.unwrap_or(list_return::NONE));
    }
    b.operands(shape.operands());
}

pub(super) fn map_modify(b: &mut RunBuilder<'_>, node: &ExpressionNode, op: MapModifyOp) {
    let shape = map_modify_shape(op);
    call_head(b, node, ResultType::Map, sys::CDT | sys::FLAG_MODIFY_LOCAL);
    b.op(
        ExpCode::CallVopStart,
        shape.vop_count(node.map_policy.is_some()),
    )
    .int(op.cdt_code());
    if shape.embedded > 0 {
        b.int(map_return::NONE);
    }
    b.operands(shape.operands());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operand_counts() {
        assert_eq!(list_read_shape(ListReadOp::Size).operands(), 1);
        assert_eq!(list_read_shape(ListReadOp::GetByIndex).operands(), 2);
        assert_eq!(map_read_shape(MapReadOp::GetByKeyRelIndexRange).operands(), 4);
        assert_eq!(list_modify_shape(ListModifyOp::Append).operands(), 3);
        assert_eq!(list_modify_shape(ListModifyOp::Increment).operands(), 4);
        assert_eq!(list_modify_shape(ListModifyOp::Sort).operands(), 1);
        assert_eq!(list_modify_shape(ListModifyOp::Clear).operands(), 1);
        assert_eq!(map_modify_shape(MapModifyOp::Put).operands(), 4);
        assert_eq!(map_modify_shape(MapModifyOp::PutItems).operands(), 3);
        assert_eq!(map_modify_shape(MapModifyOp::RemoveByValueRelRankRange).operands(), 4);
    }

    #[test]
    fn test_policy_extends_vop_count() {
        let shape = list_modify_shape(ListModifyOp::Append);
        assert_eq!(shape.vop_count(false), 2);
        assert_eq!(shape.vop_count(true), 4);
    }
}
