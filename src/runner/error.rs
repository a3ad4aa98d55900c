//! Test run error types.
//!
//! This module defines the errors raised while constructing a runner and
//! while executing steps. Configuration errors surface at construction,
//! before any step runs; every per-step error kind is caught at the
//! sequencer boundary and becomes the run's terminal failure.

use std::fmt;
use std::path::PathBuf;

/// Errors raised while validating runner configuration.
///
/// These are precondition violations: they are returned from
/// [`TestRunner::new`](crate::runner::TestRunner::new) and from route-list
/// loading, never from a running step.
#[derive(Debug)]
pub enum ConfigError {
    /// A route has an empty title.
    EmptyTitle {
        /// Position of the offending route in the list.
        index: usize,
    },

    /// A route has an empty URL.
    EmptyUrl {
        /// Title of the offending route.
        title: String,
    },

    /// A route names an HTTP method the runner does not support.
    UnknownMethod {
        /// Title of the offending route.
        title: String,
        /// The unrecognized method name.
        method: String,
    },

    /// The base URL could not be parsed.
    InvalidBaseUrl {
        /// The offending base URL.
        url: String,
        /// Parser message.
        message: String,
    },

    /// A route-list document could not be parsed.
    Parse(String),

    /// A route-list file could not be read.
    Read {
        /// Path of the unreadable file.
        path: PathBuf,
        /// I/O error message.
        message: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::EmptyTitle { index } => {
                write!(f, "Route at index {} has an empty title", index)
            }
            ConfigError::EmptyUrl { title } => {
                write!(f, "Route '{}' has an empty url", title)
            }
            ConfigError::UnknownMethod { title, method } => {
                write!(f, "Route '{}' uses unknown HTTP method '{}'", title, method)
            }
            ConfigError::InvalidBaseUrl { url, message } => {
                write!(f, "Invalid base URL '{}': {}", url, message)
            }
            ConfigError::Parse(message) => {
                write!(f, "Invalid route list: {}", message)
            }
            ConfigError::Read { path, message } => {
                write!(f, "Cannot read route list {}: {}", path.display(), message)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Errors that fail a single step and, with it, the whole run.
///
/// All three kinds are treated uniformly by the sequencer: the first one
/// raised halts processing and becomes the run's terminal failure.
#[derive(Debug)]
pub enum RunnerError {
    /// Assertion, validation, or extraction mismatch.
    Step {
        /// Human-readable description of the mismatch.
        message: String,
        /// Response status code, where one was observed.
        status_code: Option<u16>,
    },

    /// Network-level failure reported by the transport.
    Transport {
        /// Transport error message.
        message: String,
        /// Status code carried by the error, if any.
        status_code: Option<u16>,
    },

    /// File open/read failure while staging an upload.
    Io {
        /// Path of the file that could not be staged.
        path: PathBuf,
        /// I/O error message.
        message: String,
    },
}

impl RunnerError {
    /// Creates a step failure without an associated status code.
    pub fn step(message: impl Into<String>) -> Self {
        RunnerError::Step {
            message: message.into(),
            status_code: None,
        }
    }

    /// Creates a step failure carrying the observed status code.
    pub fn step_with_status(message: impl Into<String>, status_code: u16) -> Self {
        RunnerError::Step {
            message: message.into(),
            status_code: Some(status_code),
        }
    }

    /// Creates a transport failure.
    pub fn transport(message: impl Into<String>, status_code: Option<u16>) -> Self {
        RunnerError::Transport {
            message: message.into(),
            status_code,
        }
    }

    /// Returns the status code attached to the error, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            RunnerError::Step { status_code, .. } => *status_code,
            RunnerError::Transport { status_code, .. } => *status_code,
            RunnerError::Io { .. } => None,
        }
    }
}

impl fmt::Display for RunnerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunnerError::Step { message, .. } => write!(f, "{}", message),
            RunnerError::Transport {
                message,
                status_code,
            } => match status_code {
                Some(code) => write!(f, "Transport error ({}): {}", code, message),
                None => write!(f, "Transport error: {}", message),
            },
            RunnerError::Io { path, message } => {
                write!(f, "I/O error for {}: {}", path.display(), message)
            }
        }
    }
}

impl std::error::Error for RunnerError {}

/// Convert reqwest errors to transport failures.
impl From<reqwest::Error> for RunnerError {
    fn from(err: reqwest::Error) -> Self {
        let status_code = err.status().map(|s| s.as_u16());
        let message = if err.is_timeout() {
            format!("request timed out: {}", err)
        } else if err.is_connect() {
            format!("connection failed: {}", err)
        } else {
            err.to_string()
        };
        RunnerError::Transport {
            message,
            status_code,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::EmptyTitle { index: 2 };
        assert_eq!(format!("{}", err), "Route at index 2 has an empty title");

        let err = ConfigError::UnknownMethod {
            title: "login".to_string(),
            method: "FETCH".to_string(),
        };
        assert_eq!(
            format!("{}", err),
            "Route 'login' uses unknown HTTP method 'FETCH'"
        );
    }

    #[test]
    fn test_runner_error_display() {
        let err = RunnerError::step_with_status("expected 200 but got 404", 404);
        assert_eq!(format!("{}", err), "expected 200 but got 404");
        assert_eq!(err.status_code(), Some(404));

        let err = RunnerError::transport("connection refused", None);
        assert_eq!(format!("{}", err), "Transport error: connection refused");
        assert_eq!(err.status_code(), None);
    }

    #[test]
    fn test_io_error_display() {
        let err = RunnerError::Io {
            path: PathBuf::from("/tmp/missing.png"),
            message: "No such file or directory".to_string(),
        };
        let rendered = format!("{}", err);
        assert!(rendered.contains("/tmp/missing.png"));
        assert!(rendered.contains("No such file"));
    }

    #[test]
    fn test_error_trait_objects() {
        let err: &dyn std::error::Error = &RunnerError::step("boom");
        assert_eq!(format!("{}", err), "boom");

        let err: &dyn std::error::Error = &ConfigError::Parse("not an array".to_string());
        assert_eq!(format!("{}", err), "Invalid route list: not an array");
    }
}
