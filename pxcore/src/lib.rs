//! Compiler from host predicate records to flat predicate expressions.
//!
//! The host describes a filter or transform predicate as a prefix-ordered list
//! of [`pxinstr::record::Record`]s. [`Compiler::compile`] resolves every record
//! into a typed node, closes variadic operators with terminators and writes
//! one instruction run per node into a [`pxinstr::entry::CompiledExpression`].
//!
//! ```
//! use pxcore::{Compiler, magic::ARG_VALUE};
//! use pxinstr::{op::{CmpOp, ExpOp, ResultType}, record::Record};
//!
//! let records = [
//!     Record::op(ExpOp::And).children(1),
//!     Record::op(ExpOp::Cmp(CmpOp::Eq)).children(2),
//!     Record::op(ExpOp::Val).result(ResultType::Int).arg(ARG_VALUE, 5),
//!     Record::op(ExpOp::Val).result(ResultType::Int).arg(ARG_VALUE, 5),
//! ];
//! let expr = Compiler::default().compile(&records).unwrap();
//! assert_eq!(expr.to_string(), "and/0 cmp_eq/3 5 5 end");
//! ```

pub mod args;
pub mod coercion;
pub mod compiler;
pub mod config;
pub mod emitter;
pub mod ext;
pub mod magic;
pub mod queue;
pub mod utils;

pub extern crate chrono;

pub use compiler::Compiler;
