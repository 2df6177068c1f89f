//! Instruction model for flat predicate expressions.
//!
//! A predicate arrives from the host as a prefix-ordered list of [`record::Record`]s
//! and leaves the compiler as a [`entry::CompiledExpression`]: a flat sequence of
//! [`entry::InstructionEntry`] cells walked by a stack-based evaluator. This crate
//! only defines the vocabulary shared by both ends; compilation lives in `pxcore`.

pub mod cdt;
pub mod ctx;
pub mod entry;
pub mod op;
pub mod policy;
pub mod record;
pub mod value;
