mod common;

use std::sync::Arc;

use common::*;
use parking_lot::Mutex;
use pxcore::{
    Compiler,
    ext::pxlog::{LogLevel, LogMessage, Logger},
};
use pxinstr::{op::CmpOp, record::Record};

fn collecting_compiler(min_level: LogLevel) -> (Compiler, Arc<Mutex<Vec<LogMessage>>>) {
    let messages = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&messages);
    let logger = Logger::with_callback(
        Arc::new(move |msg: &LogMessage| sink.lock().push(msg.clone())),
        min_level,
    );
    (Compiler::default().with_logger(logger), messages)
}

#[test]
fn success_is_reported_at_info() {
    let (compiler, messages) = collecting_compiler(LogLevel::Info);
    compiler
        .compile(&[and(1), cmp(CmpOp::Eq), int(5), int(5)])
        .unwrap();

    let messages = messages.lock();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].level, LogLevel::Info);
    assert!(messages[0].message.starts_with("compiled 4 record(s)"));
    assert!(messages[0].module.starts_with("pxcore"));
}

#[test]
fn failure_is_reported_at_warn() {
    let (compiler, messages) = collecting_compiler(LogLevel::Warn);
    assert!(compiler.compile(&[Record::raw(777)]).is_err());

    let messages = messages.lock();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].level, LogLevel::Warn);
    assert!(messages[0].message.contains("unrecognized expression operation type: 777"));
}

#[test]
fn trace_level_sees_every_record() {
    let (compiler, messages) = collecting_compiler(LogLevel::Trace);
    compiler.compile(&[Record::op(pxinstr::op::ExpOp::Not).children(1), int(1)]).unwrap();

    let messages = messages.lock();
    let traces = messages
        .iter()
        .filter(|m| m.level == LogLevel::Trace)
        .count();
    assert_eq!(traces, 2);
    assert!(messages.iter().any(|m| m.level == LogLevel::Debug));
}
