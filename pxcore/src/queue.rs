//! Flattening of host records into an ordered node list.
//!
//! Records arrive in prefix order. Each one becomes a node whose arguments are
//! resolved into a typed [`NodeKind`] up front, so the emitter never touches an
//! argument bag. Variadic `and`/`or` nodes are closed by a synthesized
//! [`NodeKind::Terminator`] once all of their declared child subtrees have been
//! consumed.
use pxinstr::{
    cdt::{expected_list_type, expected_map_type, list_return, map_return},
    ctx::ContextPath,
    op::{
        BitOp, CmpOp, ExpOp, HllOp, ListModMode, ListModifyOp, ListReadOp, MapModMode,
        MapModifyOp, MapReadOp, MetaOp, ResultType,
    },
    policy::{ListPolicy, MapPolicy},
    record::Record,
    value::Literal,
};
use smallvec::SmallVec;
use strum::EnumIs;

use crate::{
    args::Args,
    coercion::ValueCoercion,
    ext::pxlog::Logger,
    magic::*,
    pxdebug, pxtrace,
    utils::error::{CompileError, CompileResult},
};

/// Operation of a queued node with its arguments resolved.
#[derive(Debug, Clone, PartialEq, EnumIs)]
pub enum NodeKind {
    Value(Literal),
    Compare(CmpOp),
    Regex {
        options: i64,
        pattern: String,
    },
    And,
    Or,
    Not,
    /// Closes the innermost open `and`/`or`.
    Terminator,
    Meta(MetaOp),
    DigestModulo(i64),
    RecordKey(ResultType),
    Bin {
        name: String,
        ty: ResultType,
    },
    BinType {
        name: String,
    },
    BinExists {
        name: String,
    },
    BitFlags(u64),
    ListPolicyMarker(ListModMode),
    MapPolicyMarker(MapModMode),
    ListRead {
        op: ListReadOp,
        return_type: i64,
        expected: ResultType,
    },
    ListModify {
        op: ListModifyOp,
        sort_flags: Option<i64>,
    },
    MapRead {
        op: MapReadOp,
        return_type: i64,
        expected: ResultType,
    },
    MapModify(MapModifyOp),
    Bit(BitOp),
    Hll(HllOp),
}

impl NodeKind {
    pub fn is_variadic(&self) -> bool {
        matches!(self, NodeKind::And | NodeKind::Or)
    }
}

/// One queued predicate element.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionNode {
    pub kind: NodeKind,
    pub result_type: Option<ResultType>,
    pub ctx: Option<ContextPath>,
    pub list_policy: Option<ListPolicy>,
    pub map_policy: Option<MapPolicy>,
    pub declared_children: i64,
    /// Operation of the originating record, `None` for synthesized nodes.
    pub op: Option<ExpOp>,
    /// Index of the originating record, `None` for synthesized nodes.
    pub source: Option<usize>,
}

impl ExpressionNode {
    fn terminator() -> Self {
        Self {
            kind: NodeKind::Terminator,
            result_type: None,
            ctx: None,
            list_policy: None,
            map_policy: None,
            declared_children: 0,
            op: None,
            source: None,
        }
    }

    /// Display name used in diagnostics.
    pub fn name(&self) -> String {
        match self.op {
            Some(op) => op.to_string(),
            None => "end_of_va_args".to_string(),
        }
    }
}

/// Open operator still waiting for child subtrees.
#[derive(Debug, Clone, Copy)]
struct Frame {
    remaining: i64,
    variadic: bool,
}

/// Ordered nodes of one compile call. Dropping the queue releases every
/// context path and policy attached to its nodes.
#[derive(Debug, Default)]
pub struct PredicateQueue {
    nodes: Vec<ExpressionNode>,
}

impl PredicateQueue {
    /// Flatten `records` into a node list.
    ///
    /// With `strict` set, records following a complete root and input ending
    /// with open operators are rejected. Otherwise trailing records are queued
    /// as further top-level nodes and operators still open at the end of input
    /// are closed, innermost first.
    pub fn build(
        records: &[Record],
        coercion: &ValueCoercion<'_>,
        logger: &Logger,
        strict: bool,
    ) -> CompileResult<Self> {
        let variadic = records
            .iter()
            .filter(|r| ExpOp::from_code(r.op).is_some_and(ExpOp::is_variadic))
            .count();

        let mut queue = Self::default();
        queue.nodes.try_reserve_exact(records.len() + variadic)?;

        let mut frames: SmallVec<Frame, 8> = SmallVec::new();
        let mut complete = false;

        for (index, record) in records.iter().enumerate() {
            if complete && strict {
                return Err(CompileError::TrailingRecord { index });
            }

            let op = ExpOp::from_code(record.op).ok_or(CompileError::UnknownOperation(record.op))?;
            if record.children < 0 {
                return Err(CompileError::InvalidChildCount {
                    index,
                    declared: record.children,
                });
            }

            let node = resolve(op, index, record, coercion)?;
            pxtrace!(logger, "record {}: {} with {} child(ren)", index, op, record.children);

            if let Some(parent) = frames.last_mut() {
                parent.remaining -= 1;
            }
            queue.nodes.push(node);

            if op.is_variadic() || record.children > 0 {
                frames.push(Frame {
                    remaining: record.children,
                    variadic: op.is_variadic(),
                });
            }

            // Close every operator whose last subtree just ended.
            while frames.last().is_some_and(|frame| frame.remaining == 0) {
                if let Some(frame) = frames.pop() {
                    if frame.variadic {
                        queue.nodes.try_reserve(1)?;
                        queue.nodes.push(ExpressionNode::terminator());
                    }
                }
            }

            complete = frames.is_empty();
        }

        if strict && !frames.is_empty() {
            let pending = frames
                .iter()
                .fold(0i64, |acc, frame| acc.saturating_add(frame.remaining));
            return Err(CompileError::IncompleteExpression { pending });
        }

        while let Some(frame) = frames.pop() {
            if frame.variadic {
                queue.nodes.try_reserve(1)?;
                queue.nodes.push(ExpressionNode::terminator());
            }
        }

        pxdebug!(
            logger,
            "queued {} node(s) from {} record(s)",
            queue.nodes.len(),
            records.len()
        );
        Ok(queue)
    }

    pub fn nodes(&self) -> &[ExpressionNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

fn resolve(
    op: ExpOp,
    index: usize,
    record: &Record,
    coercion: &ValueCoercion<'_>,
) -> CompileResult<ExpressionNode> {
    let args = Args::new(op, &record.args);
    let result_type = ResultType::from_code(record.result_type);
    let declared_result = || {
        result_type.ok_or_else(|| CompileError::UnknownResultType {
            op: op.to_string(),
            code: record.result_type,
        })
    };

    let ctx = args.context(coercion)?;
    let list_policy = args.list_policy()?;
    let map_policy = args.map_policy()?;

    let kind = match op {
        ExpOp::Val => NodeKind::Value(coercion.coerce(args.get(ARG_VALUE))?),
        ExpOp::Cmp(cmp) => NodeKind::Compare(cmp),
        ExpOp::Regex => NodeKind::Regex {
            options: args.int_or(ARG_REGEX_OPTIONS, 0)?,
            pattern: args.string(ARG_VALUE)?,
        },
        ExpOp::And => NodeKind::And,
        ExpOp::Or => NodeKind::Or,
        ExpOp::Not => NodeKind::Not,
        ExpOp::DigestModulo => NodeKind::DigestModulo(args.int(ARG_VALUE)?),
        ExpOp::Meta(meta) => NodeKind::Meta(meta),
        ExpOp::RecKey => NodeKind::RecordKey(declared_result()?),
        ExpOp::Bin => NodeKind::Bin {
            name: args.bin_name()?,
            ty: declared_result()?,
        },
        ExpOp::BinType => NodeKind::BinType {
            name: args.bin_name()?,
        },
        ExpOp::BinExists => NodeKind::BinExists {
            name: args.bin_name()?,
        },
        ExpOp::BitFlags => NodeKind::BitFlags(args.uint(ARG_VALUE)?),
        ExpOp::ListPolicy(mode) => NodeKind::ListPolicyMarker(mode),
        ExpOp::MapPolicy(mode) => NodeKind::MapPolicyMarker(mode),
        ExpOp::ListRead(read) => {
            let return_type = match read {
                ListReadOp::Size => list_return::COUNT,
                _ => args.int(ARG_LIST_RETURN_TYPE)?,
            };
            let value_type = value_type(&args, op, read.takes_value_type())?;
            let expected = expected_list_type(value_type, return_type, read.is_multi())
                .ok_or_else(|| CompileError::InvalidReturnType {
                    op: op.to_string(),
                    code: return_type,
                })?;
            NodeKind::ListRead {
                op: read,
                return_type,
                expected,
            }
        }
        ExpOp::ListModify(modify) => NodeKind::ListModify {
            op: modify,
            sort_flags: match modify {
                ListModifyOp::Sort => Some(args.int(ARG_LIST_ORDER)?),
                _ => None,
            },
        },
        ExpOp::MapRead(read) => {
            let return_type = match read {
                MapReadOp::Size => map_return::COUNT,
                _ => args.int(ARG_MAP_RETURN_TYPE)?,
            };
            let value_type = value_type(&args, op, read.takes_value_type())?;
            let expected = expected_map_type(value_type, return_type, read.is_multi())
                .ok_or_else(|| CompileError::InvalidReturnType {
                    op: op.to_string(),
                    code: return_type,
                })?;
            NodeKind::MapRead {
                op: read,
                return_type,
                expected,
            }
        }
        ExpOp::MapModify(modify) => NodeKind::MapModify(modify),
        ExpOp::Bit(bit) => NodeKind::Bit(bit),
        ExpOp::Hll(hll) => NodeKind::Hll(hll),
    };

    Ok(ExpressionNode {
        kind,
        result_type,
        ctx,
        list_policy,
        map_policy,
        declared_children: record.children,
        op: Some(op),
        source: Some(index),
    })
}

/// Element type of a single-element read, taken from `bin_type`.
fn value_type(args: &Args<'_>, op: ExpOp, takes_value_type: bool) -> CompileResult<ResultType> {
    if !takes_value_type {
        return Ok(ResultType::Auto);
    }
    let code = args.int(ARG_BIN_TYPE)?;
    ResultType::from_code(code).ok_or_else(|| CompileError::UnknownResultType {
        op: op.to_string(),
        code,
    })
}
