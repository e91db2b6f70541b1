//! Remote-control interface: loopback JSON-RPC guarded by a shared secret.

mod credentials;
mod server;
mod types;

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::args::Mode;
use crate::config::RpcSettings;
use crate::shutdown::ShutdownHandle;

pub use credentials::{
    load_credential, read_secret, RpcCredential, SecretString, MIN_SECRET_LENGTH,
};
pub use server::{RpcServer, AUTH_METHOD, MAX_LINE_BYTES};
pub use types::{
    string_param, Request, Response, RpcError, RpcMethods, ERR_AUTHENTICATION_FAILED,
    ERR_INTERNAL, ERR_INVALID_PARAMS, ERR_INVALID_REQUEST, ERR_METHOD_NOT_FOUND, ERR_PARSE,
    ERR_UNAUTHENTICATED,
};

#[derive(Debug, Error)]
pub enum RpcBootstrapError {
    #[error("- JSON-RPC: --jsonrpcsecretfile is required.")]
    SecretFileRequired,

    #[error("- JSON-RPC: Unable to open secret file {}", path.display())]
    SecretFileUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("JSON-RPC: Refusing to run with secret of length {length} (required: {required}).")]
    SecretTooShort { length: usize, required: usize },

    #[error("- JSON-RPC: Server failed to start on port {port}: {source}")]
    ListenerFailed {
        port: u16,
        #[source]
        source: io::Error,
    },
}

/// Load the secret and start the listener.
///
/// Must complete before the actor is constructed so that any failure
/// stops startup without side effects.
pub async fn bootstrap(
    settings: &RpcSettings,
    mode: Mode,
    shutdown: ShutdownHandle,
) -> Result<RpcServer, RpcBootstrapError> {
    let credential = load_credential(settings)?;
    tracing::warn!(
        "- JSON-RPC: This interface is experimental and is subject to breaking changes even on patch versions (not subject to semantic versioning) during the initial phase."
    );
    RpcServer::start(credential, mode, shutdown).await
}
