//! Fatal startup errors.
//!
//! Every stage returns these instead of ending the process; `main` is the
//! only place that turns one into an exit status.

use thiserror::Error;

use crate::rpc::RpcBootstrapError;

/// Status used for every fatal startup condition.
pub const FAILURE_EXIT_CODE: i32 = 1;

/// A condition that prevents the actor from being started.
#[derive(Debug, Error)]
pub enum StartupError {
    /// Unknown option, missing value or malformed number.
    #[error(transparent)]
    Usage(#[from] UsageError),

    /// An option that is illegal in the resolved mode was used.
    #[error("{mode} only option(s) '{options}' used.  {hint}")]
    ModeConflict {
        mode: &'static str,
        options: String,
        hint: &'static str,
    },

    /// The build cannot run in the resolved mode.
    #[error("Only --server mode is supported in this build.")]
    UnsupportedMode,

    /// The remote-control listener could not be set up.
    #[error(transparent)]
    RpcBootstrap(#[from] RpcBootstrapError),

    /// The client or server failed while being constructed.
    #[error("{0:#}")]
    Runtime(#[from] anyhow::Error),
}

impl StartupError {
    pub fn exit_code(&self) -> i32 {
        FAILURE_EXIT_CODE
    }
}

/// Problems with the shape of the argument vector itself.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UsageError {
    #[error("Unknown option '{0}' -- use '--help' for help")]
    UnknownOption(String),

    #[error("'{option}' needs a string argument.")]
    MissingString { option: String },

    #[error("'{option}' needs a numeric argument from '{min}' to '{max}'.")]
    BadNumber { option: String, min: u32, max: u32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usage_messages_name_the_option() {
        let err = StartupError::from(UsageError::BadNumber {
            option: "--port".into(),
            min: 0,
            max: 65535,
        });
        assert_eq!(
            err.to_string(),
            "'--port' needs a numeric argument from '0' to '65535'."
        );
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn runtime_error_keeps_context_chain() {
        let source = anyhow::anyhow!("address in use").context("cannot bind the socket");
        let err = StartupError::from(source);
        assert_eq!(err.to_string(), "cannot bind the socket: address in use");
    }
}
