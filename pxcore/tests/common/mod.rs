#![allow(dead_code)]

use pxcore::{
    Compiler,
    magic::{ARG_BIN, ARG_VALUE},
    utils::error::CompileResult,
};
use pxinstr::{
    entry::CompiledExpression,
    op::{CmpOp, ExpOp, ResultType},
    record::Record,
    value::HostValue,
};

pub fn val(value: impl Into<HostValue>) -> Record {
    Record::op(ExpOp::Val).arg(ARG_VALUE, value)
}

pub fn int(value: i64) -> Record {
    val(value).result(ResultType::Int)
}

pub fn bin(name: &str, ty: ResultType) -> Record {
    Record::op(ExpOp::Bin).result(ty).arg(ARG_BIN, name)
}

pub fn cmp(op: CmpOp) -> Record {
    Record::op(ExpOp::Cmp(op)).children(2)
}

pub fn and(children: i64) -> Record {
    Record::op(ExpOp::And).children(children)
}

pub fn or(children: i64) -> Record {
    Record::op(ExpOp::Or).children(children)
}

pub fn compile(records: &[Record]) -> CompileResult<CompiledExpression> {
    Compiler::default().compile(records)
}
