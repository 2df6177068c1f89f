mod common;

use common::*;
use pxcore::{
    Compiler,
    config::CompilerConfig,
    magic::{ARG_BIN, ARG_REGEX_OPTIONS, ARG_VALUE},
    utils::error::{CompileError, ErrorKind},
};
use pxinstr::{
    entry::{ExpCode, InstructionEntry, InstructionKind},
    op::{CmpOp, ExpOp, MetaOp, ResultType},
    record::Record,
    value::Literal,
};

fn raw(s: &str) -> InstructionEntry {
    InstructionEntry::Value(Literal::RawStr(s.to_string()))
}

#[test]
fn empty_input_compiles_to_empty_expression() {
    let expr = compile(&[]).unwrap();
    assert!(expr.is_empty());
    assert_eq!(expr.len(), 0);
}

#[test]
fn and_over_equality_is_terminated_after_its_subtree() {
    let records = [and(1), cmp(CmpOp::Eq), int(5), int(5)];
    let expr = compile(&records).unwrap();

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
    assert_eq!(expr.entries()[0], InstructionEntry::op(ExpCode::And, 0));
    assert_eq!(expr.entries()[1], InstructionEntry::op(ExpCode::CmpEq, 3));
    assert_eq!(expr.entries()[2], InstructionEntry::int(5));
    assert_eq!(expr.entries()[3], InstructionEntry::int(5));
    assert_eq!(expr.to_string(), "and/0 cmp_eq/3 5 5 end");
}

#[test]
fn and_over_two_comparisons() {
    let records = [
        and(2),
        cmp(CmpOp::Eq),
        bin("a", ResultType::Int),
        int(1),
        cmp(CmpOp::Gt),
        bin("b", ResultType::Int),
        int(2),
    ];
    let expr = compile(&records).unwrap();

    assert_eq!(
        expr.entries(),
        &[
            InstructionEntry::op(ExpCode::And, 0),
            InstructionEntry::op(ExpCode::CmpEq, 3),
            InstructionEntry::op(ExpCode::Bin, 3),
            InstructionEntry::int(ResultType::Int.code()),
            raw("a"),
            InstructionEntry::int(1),
            InstructionEntry::op(ExpCode::CmpGt, 3),
            InstructionEntry::op(ExpCode::Bin, 3),
            InstructionEntry::int(ResultType::Int.code()),
            raw("b"),
            InstructionEntry::int(2),
            InstructionEntry::EndOfVaArgs,
        ]
    );
}

#[test]
fn unknown_operation_aborts() {
    let records = [and(2), cmp(CmpOp::Eq), int(5), int(5), Record::raw(9999)];
    let err = compile(&records).unwrap_err();
    assert!(matches!(err, CompileError::UnknownOperation(9999)));
    assert!(err.to_string().starts_with("unrecognized expression operation type"));
    assert_eq!(err.kind(), ErrorKind::Parameter);

    let err = compile(&[Record::raw(-3)]).unwrap_err();
    assert!(matches!(err, CompileError::UnknownOperation(-3)));
}

#[test]
fn bin_without_name_fails() {
    let records = [Record::op(ExpOp::Bin).result(ResultType::Int)];
    let err = compile(&records).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Parameter);
    assert!(matches!(err, CompileError::MissingField { field: "bin", .. }));
}

#[test]
fn bin_name_must_be_text() {
    let records = [Record::op(ExpOp::Bin).result(ResultType::Int).arg(ARG_BIN, 4)];
    let err = compile(&records).unwrap_err();
    assert!(matches!(err, CompileError::InvalidField { field: "bin", .. }));
}

#[test]
fn bin_with_unknown_result_type_fails() {
    let mut record = bin("a", ResultType::Int);
    record.result_type = 42;
    let err = compile(&[record]).unwrap_err();
    assert!(matches!(err, CompileError::UnknownResultType { code: 42, .. }));
}

#[test]
fn metadata_takes_no_operand() {
    let expr = compile(&[Record::op(ExpOp::Meta(MetaOp::Ttl))]).unwrap();
    assert_eq!(expr.entries(), &[InstructionEntry::op(ExpCode::Ttl, 1)]);

    let expr = compile(&[Record::op(ExpOp::Meta(MetaOp::KeyExists))]).unwrap();
    assert_eq!(expr.entries(), &[InstructionEntry::op(ExpCode::KeyExists, 1)]);

    let expr = compile(&[Record::op(ExpOp::DigestModulo).arg(ARG_VALUE, 3)]).unwrap();
    assert_eq!(
        expr.entries(),
        &[
            InstructionEntry::op(ExpCode::DigestModulo, 2),
            InstructionEntry::int(3)
        ]
    );
}

#[test]
fn digest_modulo_requires_value() {
    let err = compile(&[Record::op(ExpOp::DigestModulo)]).unwrap_err();
    assert!(matches!(err, CompileError::MissingField { field: "value", .. }));
}

#[test]
fn record_key_carries_result_type() {
    let expr = compile(&[Record::op(ExpOp::RecKey).result(ResultType::Str)]).unwrap();
    assert_eq!(
        expr.entries(),
        &[
            InstructionEntry::op(ExpCode::Key, 2),
            InstructionEntry::int(ResultType::Str.code())
        ]
    );
}

#[test]
fn regex_embeds_options_and_pattern() {
    let records = [
        Record::op(ExpOp::Regex)
            .arg(ARG_REGEX_OPTIONS, 2)
            .arg(ARG_VALUE, "^pre")
            .children(1),
        bin("name", ResultType::Str),
    ];
    let expr = compile(&records).unwrap();
    assert_eq!(
        expr.entries(),
        &[
            InstructionEntry::op(ExpCode::CmpRegex, 4),
            InstructionEntry::int(2),
            raw("^pre"),
            InstructionEntry::op(ExpCode::Bin, 3),
            InstructionEntry::int(ResultType::Str.code()),
            raw("name"),
        ]
    );
}

#[test]
fn not_over_bin_exists() {
    let records = [
        Record::op(ExpOp::Not).children(1),
        Record::op(ExpOp::BinExists).arg(ARG_BIN, "x"),
    ];
    let expr = compile(&records).unwrap();
    assert_eq!(
        expr.entries(),
        &[
            InstructionEntry::op(ExpCode::Not, 2),
            InstructionEntry::op(ExpCode::CmpNe, 3),
            InstructionEntry::op(ExpCode::BinType, 2),
            raw("x"),
            InstructionEntry::int(0),
        ]
    );
}

#[test]
fn declared_children_must_match_operands() {
    let records = [Record::op(ExpOp::Cmp(CmpOp::Eq)).children(1), int(5)];
    let err = compile(&records).unwrap_err();
    assert!(matches!(
        err,
        CompileError::ArityMismatch {
            index: 0,
            expected: 2,
            declared: 1,
            ..
        }
    ));

    let lenient = Compiler::new(CompilerConfig {
        strict_arity: false,
        ..CompilerConfig::default()
    });
    let expr = lenient.compile(&records).unwrap();
    assert_eq!(expr.len(), 2);
}

#[test]
fn leaf_with_children_is_rejected() {
    let records = [int(1).children(1), int(2)];
    let err = compile(&records).unwrap_err();
    assert!(matches!(err, CompileError::ArityMismatch { expected: 0, declared: 1, .. }));
}

#[test]
fn compiler_is_shareable_between_threads() {
    let compiler = Compiler::default();
    let records = vec![and(2), cmp(CmpOp::Eq), int(1), int(1), cmp(CmpOp::Lt), int(2), int(3)];
    let expected = compiler.compile(&records).unwrap();

    std::thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|_| s.spawn(|| compiler.compile(&records).unwrap()))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}
