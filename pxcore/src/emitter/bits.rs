//! Runs of bit-blob and HyperLogLog operations.
use pxinstr::{
    cdt::sys,
    entry::ExpCode,
    op::{BitOp, HllOp, ResultType},
};

use super::RunBuilder;
use crate::queue::ExpressionNode;

/// Parameters following the operation code, all supplied by following nodes.
fn bit_params(op: BitOp) -> u32 {
    match op {
        BitOp::Resize | BitOp::Insert | BitOp::Remove | BitOp::Not => 3,
        BitOp::Set | BitOp::Or | BitOp::Xor | BitOp::And => 4,
        BitOp::Lshift | BitOp::Rshift | BitOp::SetInt => 4,
        BitOp::Add | BitOp::Subtract => 5,
        BitOp::Get | BitOp::Count => 2,
        BitOp::Lscan | BitOp::Rscan | BitOp::GetInt => 3,
    }
}

fn hll_params(op: HllOp) -> u32 {
    match op {
        HllOp::Add => 4,
        HllOp::GetCount | HllOp::Describe => 0,
        HllOp::GetUnion
        | HllOp::GetUnionCount
        | HllOp::GetIntersectCount
        | HllOp::GetSimilarity
        | HllOp::MayContain => 1,
    }
}

fn call(
    b: &mut RunBuilder<'_>,
    node: &ExpressionNode,
    ty: ResultType,
    selector: i64,
    params: u32,
    code: i64,
) {
    b.op(ExpCode::Call, 5)
        .int(ty.code())
        .int(selector)
        .context(node.ctx.as_ref())
        .op(ExpCode::CallVopStart, 1 + params)
        .int(code)
        // every parameter plus the bin
        .operands(params as usize + 1);
}

pub(super) fn bit(b: &mut RunBuilder<'_>, node: &ExpressionNode, op: BitOp) {
    let (ty, selector) = match op.read_type() {
        Some(ty) => (ty, sys::BITS),
        None => (ResultType::Blob, sys::BITS | sys::FLAG_MODIFY_LOCAL),
    };
    call(b, node, ty, selector, bit_params(op), op.cdt_code());
}

pub(super) fn hll(b: &mut RunBuilder<'_>, node: &ExpressionNode, op: HllOp) {
    let (ty, selector) = match op.read_type() {
        Some(ty) => (ty, sys::HLL),
        None => (ResultType::Hll, sys::HLL | sys::FLAG_MODIFY_LOCAL),
    };
    call(b, node, ty, selector, hll_params(op), op.cdt_code());
}
