//! Diagnostics of the compiler.
//!
//! Messages always go to the [`log`] facade. A host may additionally install a
//! callback to receive them as structured [`LogMessage`]s.
use std::sync::Arc;

use strum::FromRepr;

/// Logger levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, FromRepr)]
#[repr(u32)]
pub enum LogLevel {
    Trace = 0,
    Debug = 1,
    Info = 2,
    Warn = 3,
    Error = 4,
}

impl From<LogLevel> for log::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => log::Level::Trace,
            LogLevel::Debug => log::Level::Debug,
            LogLevel::Info => log::Level::Info,
            LogLevel::Warn => log::Level::Warn,
            LogLevel::Error => log::Level::Error,
        }
    }
}

/// Message handed to a host callback.
#[derive(Debug, Clone)]
pub struct LogMessage {
    pub level: LogLevel,
    pub timepoint: chrono::NaiveDateTime,
    pub message: String,
    pub module: String,
    pub file: Option<String>,
    pub line: Option<u32>,
    pub thread_name: Option<String>,
}

pub type LogCallback = Arc<dyn Fn(&LogMessage) + Send + Sync>;

/// Routes messages to the `log` facade and an optional host callback.
#[derive(Clone)]
pub struct Logger {
    callback: Option<LogCallback>,
    min_level: LogLevel,
}

impl Logger {
    pub fn new() -> Self {
        Self {
            callback: None,
            min_level: LogLevel::Trace,
        }
    }

    /// Forward messages at or above `min_level` to `callback`.
    pub fn with_callback(callback: LogCallback, min_level: LogLevel) -> Self {
        Self {
            callback: Some(callback),
            min_level,
        }
    }

    pub fn enabled(&self, level: LogLevel) -> bool {
        (self.callback.is_some() && level >= self.min_level) || log::log_enabled!(log::Level::from(level))
    }

    pub fn dispatch(&self, msg: LogMessage) {
        log::log!(target: msg.module.as_str(), log::Level::from(msg.level), "{}", msg.message);
        if let Some(callback) = &self.callback {
            if msg.level >= self.min_level {
                callback(&msg);
            }
        }
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("callback", &self.callback.is_some())
            .field("min_level", &self.min_level)
            .finish()
    }
}

#[macro_export]
macro_rules! pxlog {
    (
        $logger:expr,
        $level:expr,
        $( $arg:tt )*
    ) => {
        {
            let logger: &$crate::ext::pxlog::Logger = &$logger;
            let level = $level;
            if logger.enabled(level) {
                let msg = $crate::ext::pxlog::LogMessage {
                    level,
                    timepoint: $crate::chrono::Local::now().naive_local(),
                    message: format!($($arg)*),
                    module: module_path!().to_string(),
                    file: Some(file!().to_string()),
                    line: Some(line!()),
                    thread_name: std::thread::current().name().map(|s| s.to_string()),
                };
                logger.dispatch(msg);
            }
        }
    };
}

#[macro_export]
macro_rules! pxtrace {
    (
        $logger:expr,
        $( $arg:tt )*
    ) => {
        $crate::pxlog!(
            $logger,
            $crate::ext::pxlog::LogLevel::Trace,
            $( $arg )*
        )
    };
}

#[macro_export]
macro_rules! pxdebug {
    (
        $logger:expr,
        $( $arg:tt )*
    ) => {
        $crate::pxlog!(
            $logger,
            $crate::ext::pxlog::LogLevel::Debug,
            $( $arg )*
        )
    };
}

#[macro_export]
macro_rules! pxinfo {
    (
        $logger:expr,
        $( $arg:tt )*
    ) => {
        $crate::pxlog!(
            $logger,
            $crate::ext::pxlog::LogLevel::Info,
            $( $arg )*
        )
    };
}

#[macro_export]
macro_rules! pxwarn {
    (
        $logger:expr,
        $( $arg:tt )*
    ) => {
        $crate::pxlog!(
            $logger,
            $crate::ext::pxlog::LogLevel::Warn,
            $( $arg )*
        )
    };
}

#[macro_export]
macro_rules! pxerror {
    (
        $logger:expr,
        $( $arg:tt )*
    ) => {
        $crate::pxlog!(
            $logger,
            $crate::ext::pxlog::LogLevel::Error,
            $( $arg )*
        )
    };
}
