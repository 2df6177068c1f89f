//! Translation of queued nodes into instruction runs.
//!
//! Each node writes one contiguous run. Operands that are themselves nodes
//! (the two sides of a comparison, the bin of a CDT call, ...) are not part of
//! the run: the handler declares how many such external operands it consumes
//! through [`RunBuilder::operands`], and the driver checks that number against
//! the child count declared by the host.
use pxinstr::{
    ctx::ContextPath,
    entry::{ExpCode, InstructionEntry},
    op::{CmpOp, MetaOp},
    value::Literal,
};

use crate::{
    queue::{ExpressionNode, NodeKind},
    utils::error::{CompileError, CompileResult},
};

mod bits;
mod cdt;

/// What a node contributed to the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Run {
    /// Entries appended by the node itself.
    pub written: usize,
    /// Operand slots filled by the nodes that follow.
    pub operands: usize,
}

/// Appends the entries of one run to the output buffer.
pub struct RunBuilder<'b> {
    buf: &'b mut Vec<InstructionEntry>,
    start: usize,
    operands: usize,
}

impl<'b> RunBuilder<'b> {
    pub fn new(buf: &'b mut Vec<InstructionEntry>) -> Self {
        let start = buf.len();
        Self {
            buf,
            start,
            operands: 0,
        }
    }

    pub fn entry(&mut self, entry: InstructionEntry) -> &mut Self {
        self.buf.push(entry);
        self
    }

    pub fn op(&mut self, code: ExpCode, count: u32) -> &mut Self {
        self.entry(InstructionEntry::op(code, count))
    }

    pub fn int(&mut self, value: i64) -> &mut Self {
        self.entry(InstructionEntry::int(value))
    }

    pub fn uint(&mut self, value: u64) -> &mut Self {
        self.value(Literal::Uint(value))
    }

    pub fn raw_str(&mut self, value: &str) -> &mut Self {
        self.value(Literal::RawStr(value.to_string()))
    }

    pub fn value(&mut self, value: Literal) -> &mut Self {
        self.entry(InstructionEntry::Value(value))
    }

    /// Context path of a CDT call, written only when one is attached.
    pub fn context(&mut self, ctx: Option<&ContextPath>) -> &mut Self {
        if let Some(ctx) = ctx {
            self.entry(InstructionEntry::Context(ctx.clone()));
        }
        self
    }

    /// Declare `count` more operand slots supplied by following nodes.
    pub fn operands(&mut self, count: usize) -> &mut Self {
        self.operands += count;
        self
    }

    pub fn finish(self) -> Run {
        Run {
            written: self.buf.len() - self.start,
            operands: self.operands,
        }
    }
}

/// Writes the run of every node kind.
#[derive(Debug, Clone, Copy)]
pub struct OpcodeEmitter {
    bound: usize,
}

impl OpcodeEmitter {
    /// Emitter refusing runs longer than `bound` entries.
    pub fn new(bound: usize) -> Self {
        Self { bound }
    }

    pub fn emit(&self, node: &ExpressionNode, buf: &mut Vec<InstructionEntry>) -> CompileResult<Run> {
        let mut b = RunBuilder::new(buf);

        match &node.kind {
            NodeKind::Value(lit) => {
                b.value(lit.clone());
            }
            NodeKind::Compare(cmp) => {
                b.op(cmp_code(*cmp), 3).operands(2);
            }
            NodeKind::Regex { options, pattern } => {
                b.op(ExpCode::CmpRegex, 4)
                    .int(*options)
                    .raw_str(pattern)
                    .operands(1);
            }
            NodeKind::And | NodeKind::Or => {
                let code = if node.kind.is_and() {
                    ExpCode::And
                } else {
                    ExpCode::Or
                };
                b.op(code, 0).operands(node.declared_children as usize);
            }
            NodeKind::Not => {
                b.op(ExpCode::Not, 2).operands(1);
            }
            NodeKind::Terminator => {
                b.entry(InstructionEntry::EndOfVaArgs);
            }
            NodeKind::Meta(meta) => {
                b.op(meta_code(*meta), 1);
            }
            NodeKind::DigestModulo(modulo) => {
                b.op(ExpCode::DigestModulo, 2).int(*modulo);
            }
            NodeKind::RecordKey(ty) => {
                b.op(ExpCode::Key, 2).int(ty.code());
            }
            NodeKind::Bin { name, ty } => {
                b.op(ExpCode::Bin, 3).int(ty.code()).raw_str(name);
            }
            NodeKind::BinType { name } => {
                b.op(ExpCode::BinType, 2).raw_str(name);
            }
            NodeKind::BinExists { name } => {
                // bin_type(name) != 0
                b.op(ExpCode::CmpNe, 3)
                    .op(ExpCode::BinType, 2)
                    .raw_str(name)
                    .int(0);
            }
            NodeKind::BitFlags(flags) => {
                b.uint(*flags);
            }
            NodeKind::ListPolicyMarker(mode) => {
                b.entry(InstructionEntry::ListPolicy {
                    mode: *mode,
                    policy: node.list_policy,
                });
            }
            NodeKind::MapPolicyMarker(mode) => {
                b.entry(InstructionEntry::MapPolicy {
                    mode: *mode,
                    policy: node.map_policy,
                });
            }
            NodeKind::ListRead {
                op,
                return_type,
                expected,
            } => cdt::list_read(&mut b, node, *op, *return_type, *expected),
            NodeKind::ListModify { op, sort_flags } => cdt::list_modify(&mut b, node, *op, *sort_flags),
            NodeKind::MapRead {
                op,
                return_type,
                expected,
            } => cdt::map_read(&mut b, node, *op, *return_type, *expected),
            NodeKind::MapModify(op) => cdt::map_modify(&mut b, node, *op),
            NodeKind::Bit(op) => bits::bit(&mut b, node, *op),
            NodeKind::Hll(op) => bits::hll(&mut b, node, *op),
        }

        let run = b.finish();
        if run.written > self.bound {
            return Err(CompileError::RunOverflow {
                op: node.name(),
                written: run.written,
                bound: self.bound,
            });
        }
        Ok(run)
    }
}

fn cmp_code(cmp: CmpOp) -> ExpCode {
    match cmp {
        CmpOp::Eq => ExpCode::CmpEq,
        CmpOp::Ne => ExpCode::CmpNe,
        CmpOp::Gt => ExpCode::CmpGt,
        CmpOp::Ge => ExpCode::CmpGe,
        CmpOp::Lt => ExpCode::CmpLt,
        CmpOp::Le => ExpCode::CmpLe,
        CmpOp::Geo => ExpCode::CmpGeo,
    }
}

fn meta_code(meta: MetaOp) -> ExpCode {
    match meta {
        MetaOp::DeviceSize => ExpCode::DeviceSize,
        MetaOp::LastUpdate => ExpCode::LastUpdate,
        MetaOp::VoidTime => ExpCode::VoidTime,
        MetaOp::Ttl => ExpCode::Ttl,
        MetaOp::SetName => ExpCode::SetName,
        MetaOp::KeyExists => ExpCode::KeyExists,
    }
}
