mod common;

use common::*;
use pxcore::{Compiler, config::CompilerConfig, utils::error::CompileError};
use pxinstr::{
    entry::{ExpCode, InstructionEntry, InstructionKind},
    op::{CmpOp, ExpOp},
    record::Record,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

/// Random predicate tree written as prefix records, together with the shape
/// of the stream it must compile into.
fn random_tree(
    rng: &mut ChaCha20Rng,
    depth: usize,
    records: &mut Vec<Record>,
    kinds: &mut Vec<InstructionKind>,
) {
    let pick = if depth == 0 { 0 } else { rng.random_range(0..5) };
    match pick {
        0 => {
            records.push(int(rng.random_range(-100..100)));
            kinds.push(InstructionKind::Value);
        }
        1 => {
            records.push(cmp(CmpOp::Lt));
            kinds.push(InstructionKind::Op);
            random_tree(rng, depth - 1, records, kinds);
            random_tree(rng, depth - 1, records, kinds);
        }
        2 => {
            records.push(Record::op(ExpOp::Not).children(1));
            kinds.push(InstructionKind::Op);
            random_tree(rng, depth - 1, records, kinds);
        }
        _ => {
            let count = rng.random_range(0..4);
            records.push(if rng.random_bool(0.5) { and(count) } else { or(count) });
            kinds.push(InstructionKind::Op);
            for _ in 0..count {
                random_tree(rng, depth - 1, records, kinds);
            }
            kinds.push(InstructionKind::EndOfVaArgs);
        }
    }
}

#[test]
fn variadic_operator_with_k_children() {
    for k in 0..6 {
        let mut records = vec![and(k)];
        records.extend((0..k).map(int));
        let expr = compile(&records).unwrap();

        assert_eq!(expr.len(), k as usize + 2);
        assert_eq!(expr.entries()[0], InstructionEntry::op(ExpCode::And, 0));
        assert_eq!(expr.entries()[k as usize + 1], InstructionEntry::EndOfVaArgs);
        for i in 0..k {
            assert_eq!(expr.entries()[i as usize + 1], InstructionEntry::int(i));
        }
    }
}

#[test]
fn terminator_follows_whole_nested_subtree() {
    // or(and(1 < 2), 3 == 3)
    let records = [
        or(2),
        and(1),
        cmp(CmpOp::Lt),
        int(1),
        int(2),
        cmp(CmpOp::Eq),
        int(3),
        int(3),
    ];
    let expr = compile(&records).unwrap();
    assert_eq!(
        expr.to_string(),
        "or/0 and/0 cmp_lt/3 1 2 end cmp_eq/3 3 3 end"
    );
}

#[test]
fn consecutive_terminators_close_inner_first() {
    let records = [or(1), and(1), Record::op(ExpOp::Not).children(1), int(0)];
    let expr = compile(&records).unwrap();
    assert_eq!(expr.to_string(), "or/0 and/0 not/2 0 end end");
}

#[test]
fn random_trees_compile_to_matching_shape() {
    for seed in 0..64 {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let mut records = Vec::new();
        let mut kinds = Vec::new();
        random_tree(&mut rng, 4, &mut records, &mut kinds);

        let expr = compile(&records).unwrap_or_else(|e| panic!("seed {}: {}", seed, e));
        assert_eq!(expr.kinds(), kinds, "seed {}", seed);

        let variadic = records
            .iter()
            .filter(|r| ExpOp::from_code(r.op).is_some_and(ExpOp::is_variadic))
            .count();
        let terminators = expr.iter().filter(|e| e.is_end_of_va_args()).count();
        assert_eq!(variadic, terminators, "seed {}", seed);
    }
}

#[test]
fn missing_children_are_reported() {
    let err = compile(&[and(3), int(1), int(2)]).unwrap_err();
    assert!(matches!(err, CompileError::IncompleteExpression { pending: 1 }));

    let err = compile(&[cmp(CmpOp::Eq), int(1)]).unwrap_err();
    assert!(matches!(err, CompileError::IncompleteExpression { pending: 1 }));
}

#[test]
fn records_after_complete_root_are_rejected() {
    let err = compile(&[and(1), int(1), int(2)]).unwrap_err();
    assert!(matches!(err, CompileError::TrailingRecord { index: 2 }));
}

#[test]
fn negative_child_count_is_rejected() {
    let err = compile(&[and(-1)]).unwrap_err();
    assert!(matches!(err, CompileError::InvalidChildCount { index: 0, declared: -1 }));
}

fn lenient() -> Compiler {
    Compiler::new(CompilerConfig {
        strict_arity: false,
        ..CompilerConfig::default()
    })
}

#[test]
fn huge_child_counts_report_saturated_pending() {
    let err = compile(&[and(i64::MAX), and(i64::MAX)]).unwrap_err();
    assert!(matches!(err, CompileError::IncompleteExpression { pending: i64::MAX }));
}

#[test]
fn lenient_mode_follows_declared_counts() {
    // the comparison declares no children, so the second literal trails the root
    let records = [and(2), Record::op(ExpOp::Cmp(CmpOp::Eq)), int(5), int(5)];

    let err = compile(&records).unwrap_err();
    assert!(matches!(err, CompileError::TrailingRecord { index: 3 }));

    let expr = lenient().compile(&records).unwrap();
    assert_eq!(expr.to_string(), "and/0 cmp_eq/3 5 end 5");
}

#[test]
fn lenient_mode_closes_open_operators() {
    let expr = lenient().compile(&[or(3), and(2), int(1)]).unwrap();
    assert_eq!(expr.to_string(), "or/0 and/0 1 end end");
}
