use std::path::PathBuf;

use pxcore::{
    Compiler,
    config::CompilerConfig,
    magic::{ARG_BIN, DEFAULT_ENTRIES_PER_NODE},
    utils::error::ConfigError,
};
use pxinstr::{
    op::{ExpOp, ResultType},
    record::Record,
};

fn temp_config(name: &str) -> PathBuf {
    std::env::temp_dir()
        .join(format!("pxexp-test-{}", std::process::id()))
        .join(name)
}

#[test]
fn save_then_load() {
    let path = temp_config("roundtrip/compiler.toml");
    let config = CompilerConfig {
        entries_per_node: 4,
        strict_arity: false,
    };
    config.save_to_toml(&path).unwrap();

    let loaded = CompilerConfig::load_from_toml(&path).unwrap();
    assert_eq!(loaded, config);

    std::fs::remove_file(&path).unwrap();
}

#[test]
fn missing_file_is_an_io_error() {
    let err = CompilerConfig::load_from_toml(&temp_config("absent.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}

#[test]
fn parse_errors_name_the_file() {
    let path = temp_config("broken.toml");
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, "entries_per_node = [").unwrap();

    let err = CompilerConfig::load_from_toml(&path).unwrap_err();
    match err {
        ConfigError::Parse { file, .. } => assert_eq!(file, path.display().to_string()),
        other => panic!("unexpected error: {}", other),
    }

    std::fs::remove_file(&path).unwrap();
}

#[test]
fn defaults() {
    let config = CompilerConfig::default();
    assert_eq!(config.entries_per_node, DEFAULT_ENTRIES_PER_NODE);
    assert!(config.strict_arity);
    assert_eq!(Compiler::default().config(), &config);
}

#[test]
fn bound_applies_to_every_node() {
    let records = [Record::op(ExpOp::Bin).result(ResultType::Int).arg(ARG_BIN, "n")];

    let tight = Compiler::new(CompilerConfig {
        entries_per_node: 3,
        ..CompilerConfig::default()
    });
    assert_eq!(tight.compile(&records).unwrap().len(), 3);

    let tighter = Compiler::new(CompilerConfig {
        entries_per_node: 2,
        ..CompilerConfig::default()
    });
    assert!(tighter.compile(&records).is_err());
}
