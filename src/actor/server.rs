use std::net::{SocketAddr, UdpSocket};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use parking_lot::RwLock;
use serde::Serialize;
use serde_json::{json, Value};

use crate::actor::socket::{bind_address, bind_socket, drain};
use crate::args::names;
use crate::config::validation::is_loopback_directory;
use crate::config::{ResolvedConfiguration, ServerConfig, ServerInfo, ServerSettings};
use crate::rpc::{string_param, RpcError, RpcMethods};
use crate::shutdown::ShutdownHandle;

/// How the server takes part in server discovery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "role", content = "address", rename_all = "lowercase")]
pub enum DirectoryRole {
    /// Not listed anywhere.
    None,
    /// Registers with the directory at this address.
    Register(String),
    /// Hosts a server list itself.
    Host,
}

impl DirectoryRole {
    pub fn from_address(address: Option<&str>) -> Self {
        match address {
            None | Some("") => DirectoryRole::None,
            Some(address) if is_loopback_directory(address) => DirectoryRole::Host,
            Some(address) => DirectoryRole::Register(address.to_string()),
        }
    }
}

/// Server state visible to the remote-control interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerProfile {
    pub server_info: Option<ServerInfo>,
    pub welcome_message: Option<String>,
    pub directory: DirectoryRole,
    pub num_channels: u32,
    pub port: u16,
    pub recording_dir: Option<PathBuf>,
    pub recording_enabled: bool,
    pub delay_pan: bool,
    pub start_minimized: bool,
}

pub struct ServerActor {
    config: ServerConfig,
    profile: Arc<RwLock<ServerProfile>>,
    socket: UdpSocket,
    local_addr: SocketAddr,
}

impl ServerActor {
    /// Bind the server socket and merge init-file settings under the
    /// command-line values.
    pub fn new(
        resolved: &ResolvedConfiguration,
        config: ServerConfig,
        settings: &ServerSettings,
    ) -> anyhow::Result<Self> {
        let socket = bind_socket(bind_address(
            resolved.port,
            config.bind_ip,
            resolved.enable_ipv6,
        ))?;
        let local_addr = socket.local_addr().context("cannot read the server socket address")?;

        let given = |long: &str| resolved.given_on_command_line(long);

        let welcome_message = if given(names::WELCOME_MESSAGE) {
            config.welcome_message.clone()
        } else {
            settings.welcome_message.clone()
        };
        let server_info = if given(names::SERVER_INFO) {
            config.server_info.clone()
        } else {
            settings.server_info.as_deref().map(ServerInfo::parse)
        };
        let directory_server = if given(names::DIRECTORY_SERVER) {
            config.directory_server.clone()
        } else {
            settings.directory_server.clone()
        };
        let recording_dir = if given(names::RECORDING) {
            config.recording_dir.clone()
        } else {
            settings.recording_dir.clone()
        };
        let delay_pan = config.delay_pan || settings.delay_pan.unwrap_or(false);
        let start_minimized = config.start_minimized || settings.start_minimized.unwrap_or(false);

        let directory = DirectoryRole::from_address(directory_server.as_deref());
        match &directory {
            DirectoryRole::None => {}
            DirectoryRole::Register(address) => {
                tracing::info!("registering with directory {}", address)
            }
            DirectoryRole::Host => tracing::info!("hosting a server list"),
        }

        let profile = ServerProfile {
            server_info,
            welcome_message,
            directory,
            num_channels: config.num_channels,
            port: local_addr.port(),
            recording_enabled: recording_dir.is_some() && !config.disable_recording,
            recording_dir,
            delay_pan,
            start_minimized,
        };

        Ok(Self {
            config,
            profile: Arc::new(RwLock::new(profile)),
            socket,
            local_addr,
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn profile(&self) -> ServerProfile {
        self.profile.read().clone()
    }

    pub fn rpc_methods(&self) -> Arc<dyn RpcMethods> {
        Arc::new(ServerRpc {
            profile: Arc::clone(&self.profile),
        })
    }

    pub async fn run(self, shutdown: ShutdownHandle) -> anyhow::Result<()> {
        tracing::info!(
            addr = %self.local_addr,
            channels = self.config.num_channels,
            multithreading = self.config.multithreading,
            "server started"
        );
        drain(self.socket, shutdown).await?;
        if self.config.disconnect_all_on_quit {
            tracing::info!("disconnecting all clients");
        }
        tracing::info!("server stopped");
        Ok(())
    }
}

struct ServerRpc {
    profile: Arc<RwLock<ServerProfile>>,
}

impl RpcMethods for ServerRpc {
    fn call(&self, method: &str, params: &Value) -> Option<Result<Value, RpcError>> {
        match method {
            "koordserver/getServerProfile" => Some(
                serde_json::to_value(&*self.profile.read())
                    .map_err(|e| RpcError::internal(e.to_string())),
            ),
            "koordserver/setWelcomeMessage" => Some(string_param(params, "message").map(|msg| {
                self.profile.write().welcome_message = Some(msg);
                json!("ok")
            })),
            "koordserver/getRecorderStatus" => {
                let profile = self.profile.read();
                Some(Ok(json!({
                    "enabled": profile.recording_enabled,
                    "recordingDirectory": profile.recording_dir,
                })))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RoleConfig;

    fn resolved(options: &[&str], server: ServerConfig) -> ResolvedConfiguration {
        ResolvedConfiguration {
            use_gui: true,
            use_translation: true,
            enable_ipv6: false,
            port: 0,
            qos: 128,
            ini_file: None,
            rpc: None,
            command_line_options: options.iter().map(|s| s.to_string()).collect(),
            role: RoleConfig::Server(server),
        }
    }

    fn loopback() -> ServerConfig {
        ServerConfig {
            bind_ip: Some("127.0.0.1".parse().unwrap()),
            ..ServerConfig::default()
        }
    }

    #[test]
    fn directory_role_from_address() {
        assert_eq!(DirectoryRole::from_address(None), DirectoryRole::None);
        assert_eq!(DirectoryRole::from_address(Some("")), DirectoryRole::None);
        assert_eq!(DirectoryRole::from_address(Some("localhost")), DirectoryRole::Host);
        assert_eq!(DirectoryRole::from_address(Some("127.0.0.1")), DirectoryRole::Host);
        assert_eq!(
            DirectoryRole::from_address(Some("anygenre1.example.org")),
            DirectoryRole::Register("anygenre1.example.org".into())
        );
    }

    #[test]
    fn init_file_fills_what_the_command_line_left_out() {
        let config = ServerConfig {
            welcome_message: Some("hi".into()),
            ..loopback()
        };
        let settings = ServerSettings {
            welcome_message: Some("from ini".into()),
            server_info: Some("Jam;Berlin;DE".into()),
            directory_server: Some("localhost".into()),
            ..ServerSettings::default()
        };
        let actor = ServerActor::new(
            &resolved(&[names::WELCOME_MESSAGE], config.clone()),
            config,
            &settings,
        )
        .unwrap();
        let profile = actor.profile();
        assert_eq!(profile.welcome_message.as_deref(), Some("hi"));
        assert_eq!(profile.server_info.unwrap().city, "Berlin");
        assert_eq!(profile.directory, DirectoryRole::Host);
        assert_eq!(actor.local_addr().ip().to_string(), "127.0.0.1");
    }

    #[test]
    fn rpc_updates_welcome_message() {
        let actor =
            ServerActor::new(&resolved(&[], loopback()), loopback(), &ServerSettings::default())
                .unwrap();
        let methods = actor.rpc_methods();
        assert_eq!(
            methods
                .call("koordserver/setWelcomeMessage", &json!({"message": "welcome"}))
                .unwrap(),
            Ok(json!("ok"))
        );
        assert_eq!(actor.profile().welcome_message.as_deref(), Some("welcome"));

        let status = methods
            .call("koordserver/getRecorderStatus", &Value::Null)
            .unwrap()
            .unwrap();
        assert_eq!(status["enabled"], false);

        let err = methods
            .call("koordserver/setWelcomeMessage", &json!({}))
            .unwrap()
            .unwrap_err();
        assert_eq!(err.code, crate::rpc::ERR_INVALID_PARAMS);
    }
}
