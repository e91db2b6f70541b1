use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

use crate::args::Mode;
use crate::rpc::credentials::{RpcCredential, SecretString};
use crate::rpc::types::{
    string_param, Request, Response, RpcError, RpcMethods, ERR_AUTHENTICATION_FAILED,
    ERR_INVALID_REQUEST, ERR_METHOD_NOT_FOUND, ERR_PARSE, ERR_UNAUTHENTICATED,
};
use crate::rpc::RpcBootstrapError;
use crate::shutdown::ShutdownHandle;

pub const AUTH_METHOD: &str = "koord/apiAuth";

/// Longest request line accepted; a peer exceeding it is disconnected.
pub const MAX_LINE_BYTES: u64 = 64 * 1024;

/// Loopback-only JSON-RPC listener, one request per line.
pub struct RpcServer {
    addr: SocketAddr,
    shared: Arc<Shared>,
    task: JoinHandle<()>,
}

impl std::fmt::Debug for RpcServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcServer")
            .field("addr", &self.addr)
            .finish_non_exhaustive()
    }
}

struct Shared {
    secret: SecretString,
    handlers: RwLock<Vec<Arc<dyn RpcMethods>>>,
}

impl RpcServer {
    /// Bind to `127.0.0.1:<port>` and start accepting connections.
    pub async fn start(
        credential: RpcCredential,
        mode: Mode,
        shutdown: ShutdownHandle,
    ) -> Result<Self, RpcBootstrapError> {
        let port = credential.port;
        let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, port))
            .await
            .map_err(|source| RpcBootstrapError::ListenerFailed { port, source })?;
        let addr = listener
            .local_addr()
            .map_err(|source| RpcBootstrapError::ListenerFailed { port, source })?;

        let core: Arc<dyn RpcMethods> = Arc::new(CoreMethods { mode });
        let shared = Arc::new(Shared {
            secret: credential.secret,
            handlers: RwLock::new(vec![core]),
        });

        let task = tokio::spawn(accept_loop(listener, shared.clone(), shutdown));
        tracing::info!("- JSON-RPC: listening on {}", addr);

        Ok(Self { addr, shared, task })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    /// Expose an actor's methods to connected peers.
    pub fn attach(&self, handler: Arc<dyn RpcMethods>) {
        self.shared.handlers.write().push(handler);
    }

    /// Wait for the accept loop to finish after shutdown was signalled.
    pub async fn join(self) {
        if let Err(e) = self.task.await {
            tracing::debug!("JSON-RPC accept loop ended abnormally: {}", e);
        }
    }
}

async fn accept_loop(listener: TcpListener, shared: Arc<Shared>, shutdown: ShutdownHandle) {
    loop {
        let accepted = tokio::select! {
            _ = shutdown.wait() => break,
            accepted = listener.accept() => accepted,
        };
        match accepted {
            Ok((stream, peer)) => {
                tracing::debug!(%peer, "JSON-RPC connection accepted");
                tokio::spawn(serve_connection(stream, shared.clone(), shutdown.clone()));
            }
            Err(e) => tracing::warn!("JSON-RPC: accept failed: {}", e),
        }
    }
}

async fn serve_connection(stream: TcpStream, shared: Arc<Shared>, shutdown: ShutdownHandle) {
    let (reader, mut writer) = stream.into_split();
    let mut reader = BufReader::new(reader);
    let mut authenticated = false;

    loop {
        let mut buf = Vec::new();
        let mut limited = (&mut reader).take(MAX_LINE_BYTES + 1);
        let read = tokio::select! {
            _ = shutdown.wait() => break,
            read = limited.read_until(b'\n', &mut buf) => read,
        };
        match read {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                tracing::debug!("JSON-RPC read failed: {}", e);
                break;
            }
        }
        if !buf.ends_with(b"\n") && buf.len() as u64 > MAX_LINE_BYTES {
            tracing::warn!("JSON-RPC: request line exceeds {} bytes, closing", MAX_LINE_BYTES);
            break;
        }
        let line = String::from_utf8_lossy(&buf);
        let line = line.trim_end_matches(['\n', '\r']);
        if line.trim().is_empty() {
            continue;
        }

        let response = shared.handle_line(line, &mut authenticated);
        let mut payload = match serde_json::to_string(&response) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!("JSON-RPC: cannot encode response: {}", e);
                break;
            }
        };
        payload.push('\n');
        if writer.write_all(payload.as_bytes()).await.is_err() {
            break;
        }
    }
}

impl Shared {
    fn handle_line(&self, line: &str, authenticated: &mut bool) -> Response {
        let value: Value = match serde_json::from_str(line) {
            Ok(value) => value,
            Err(_) => {
                return Response::failure(Value::Null, RpcError::new(ERR_PARSE, "Parse error"))
            }
        };
        let id = value.get("id").cloned().unwrap_or(Value::Null);
        let request: Request = match serde_json::from_value(value) {
            Ok(request) => request,
            Err(_) => {
                return Response::failure(id, RpcError::new(ERR_INVALID_REQUEST, "Invalid request"))
            }
        };
        if request.jsonrpc != "2.0" {
            return Response::failure(id, RpcError::new(ERR_INVALID_REQUEST, "Invalid request"));
        }

        if request.method == AUTH_METHOD {
            return match string_param(&request.params, "secret") {
                Ok(secret) if secret == self.secret.expose() => {
                    *authenticated = true;
                    Response::success(id, json!("ok"))
                }
                Ok(_) => Response::failure(
                    id,
                    RpcError::new(ERR_AUTHENTICATION_FAILED, "Authentication failed."),
                ),
                Err(e) => Response::failure(id, e),
            };
        }

        if !*authenticated {
            return Response::failure(
                id,
                RpcError::new(
                    ERR_UNAUTHENTICATED,
                    format!("Unauthenticated: Please authenticate using {AUTH_METHOD} first."),
                ),
            );
        }

        let handlers = self.handlers.read();
        let result = handlers
            .iter()
            .find_map(|handler| handler.call(&request.method, &request.params));
        match result {
            Some(Ok(result)) => Response::success(id, result),
            Some(Err(e)) => Response::failure(id, e),
            None => Response::failure(
                id,
                RpcError::new(ERR_METHOD_NOT_FOUND, "Method not found"),
            ),
        }
    }
}

/// Methods available regardless of which actor runs.
struct CoreMethods {
    mode: Mode,
}

impl RpcMethods for CoreMethods {
    fn call(&self, method: &str, _params: &Value) -> Option<Result<Value, RpcError>> {
        match method {
            "koord/getMode" => Some(Ok(json!({ "mode": self.mode.as_str() }))),
            "koord/getVersion" => Some(Ok(json!({ "version": env!("CARGO_PKG_VERSION") }))),
            _ => None,
        }
    }
}
