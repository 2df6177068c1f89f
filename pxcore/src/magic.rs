/// Argument holding a literal, an integer parameter or a bit-flag word.
pub const ARG_VALUE: &str = "value";

/// Argument holding the context path of a CDT operation.
pub const ARG_CTX: &str = "ctx";

/// Argument holding a bin name.
pub const ARG_BIN: &str = "bin";

pub const ARG_LIST_RETURN_TYPE: &str = "list_return_type";
pub const ARG_MAP_RETURN_TYPE: &str = "map_return_type";

/// Argument holding the element type of single-element CDT reads.
pub const ARG_BIN_TYPE: &str = "bin_type";

pub const ARG_LIST_POLICY: &str = "list_policy";
pub const ARG_MAP_POLICY: &str = "map_policy";
pub const ARG_LIST_ORDER: &str = "list_order";
pub const ARG_REGEX_OPTIONS: &str = "regex_options";

/// Keys of a single context step.
pub const CTX_ID: &str = "id";
pub const CTX_VALUE: &str = "value";
pub const CTX_EXTRA_ARGS: &str = "extra_args";
pub const CTX_PAD: &str = "pad";
pub const CTX_MAP_ORDER: &str = "map_order";

/// Keys of a policy sub-map.
pub const POLICY_WRITE_FLAGS: &str = "write_flags";
pub const POLICY_MAP_WRITE_FLAGS: &str = "map_write_flags";
pub const POLICY_MAP_ORDER: &str = "map_order";
pub const POLICY_PERSIST_INDEX: &str = "persist_index";

/// Upper bound on entries written for a single node. The largest run (a map
/// or list read through a context path) takes seven.
pub const DEFAULT_ENTRIES_PER_NODE: usize = 11;

/// Name of the environment variable containing the path to the compiler configuration file.
/// If not set, defaults to
///  (1) on Linux and macOS: `$XDG_CONFIG_HOME/pxexp/compiler.toml` or `$HOME/.config/pxexp/compiler.toml`
///  (2) on Windows: `%APPDATA%\pxexp\compiler.toml`
pub const ENV_CONFIG_PATH: &str = "PXEXP_CONFIG_PATH";

/// Host step identifiers that create the addressed container when missing.
/// Other steps use the evaluator identifiers directly.
pub const CTX_LIST_INDEX_CREATE_ID: i64 = 0x14;
pub const CTX_MAP_KEY_CREATE_ID: i64 = 0x24;
