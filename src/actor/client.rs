use std::net::{SocketAddr, UdpSocket};
use std::sync::Arc;

use anyhow::Context;
use parking_lot::RwLock;
use serde::Serialize;
use serde_json::{json, Value};

use crate::actor::socket::{bind_address, bind_socket, drain};
use crate::args::names;
use crate::config::{ClientConfig, ClientSettings, ResolvedConfiguration};
use crate::rpc::{string_param, RpcError, RpcMethods};
use crate::shutdown::ShutdownHandle;

/// Client state visible to the remote-control interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientInfo {
    pub name: String,
    pub connect_address: Option<String>,
    pub midi_setup: Option<String>,
    pub muted: bool,
    pub port: u16,
}

pub struct ClientActor {
    config: ClientConfig,
    info: Arc<RwLock<ClientInfo>>,
    socket: UdpSocket,
    local_addr: SocketAddr,
}

impl ClientActor {
    /// Bind the client socket and merge init-file settings under the
    /// command-line values.
    pub fn new(
        resolved: &ResolvedConfiguration,
        config: ClientConfig,
        settings: &ClientSettings,
    ) -> anyhow::Result<Self> {
        let socket = bind_socket(bind_address(resolved.port, None, resolved.enable_ipv6))?;
        let local_addr = socket.local_addr().context("cannot read the client socket address")?;

        let name = if resolved.given_on_command_line(names::CLIENT_NAME) {
            config.client_name.clone().unwrap_or_default()
        } else {
            settings.name.clone().unwrap_or_default()
        };
        let midi_setup = if resolved.given_on_command_line(names::CTRL_MIDI_CH) {
            config.midi_setup.clone()
        } else {
            settings.midi_setup.clone()
        };

        let info = ClientInfo {
            name,
            connect_address: config.connect_address.clone(),
            midi_setup,
            muted: config.mute_stream,
            port: local_addr.port(),
        };

        Ok(Self {
            config,
            info: Arc::new(RwLock::new(info)),
            socket,
            local_addr,
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn info(&self) -> ClientInfo {
        self.info.read().clone()
    }

    pub fn rpc_methods(&self) -> Arc<dyn RpcMethods> {
        Arc::new(ClientRpc {
            info: Arc::clone(&self.info),
        })
    }

    pub async fn run(self, shutdown: ShutdownHandle) -> anyhow::Result<()> {
        tracing::info!(addr = %self.local_addr, "client started");
        if let Some(address) = &self.config.connect_address {
            tracing::info!("connecting to {}", address);
        }
        if !self.config.no_auto_jack_connect {
            tracing::debug!("automatic audio connections enabled");
        }
        drain(self.socket, shutdown).await?;
        tracing::info!("client stopped");
        Ok(())
    }
}

struct ClientRpc {
    info: Arc<RwLock<ClientInfo>>,
}

impl RpcMethods for ClientRpc {
    fn call(&self, method: &str, params: &Value) -> Option<Result<Value, RpcError>> {
        match method {
            "koordclient/getClientInfo" => Some(
                serde_json::to_value(&*self.info.read())
                    .map_err(|e| RpcError::internal(e.to_string())),
            ),
            "koordclient/setName" => Some(string_param(params, "name").map(|name| {
                self.info.write().name = name;
                json!("ok")
            })),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RoleConfig;

    fn resolved(options: &[&str], client: ClientConfig) -> ResolvedConfiguration {
        ResolvedConfiguration {
            use_gui: false,
            use_translation: true,
            enable_ipv6: false,
            port: 0,
            qos: 128,
            ini_file: None,
            rpc: None,
            command_line_options: options.iter().map(|s| s.to_string()).collect(),
            role: RoleConfig::Client(client),
        }
    }

    #[test]
    fn command_line_name_beats_init_file() {
        let client = ClientConfig {
            client_name: Some("cli".into()),
            ..ClientConfig::default()
        };
        let settings = ClientSettings {
            name: Some("ini".into()),
            midi_setup: Some("1".into()),
        };
        let actor =
            ClientActor::new(&resolved(&[names::CLIENT_NAME], client.clone()), client, &settings)
                .unwrap();
        assert_eq!(actor.info().name, "cli");
        assert_eq!(actor.info().midi_setup.as_deref(), Some("1"));
    }

    #[test]
    fn init_file_fills_missing_name() {
        let settings = ClientSettings {
            name: Some("ini".into()),
            midi_setup: None,
        };
        let actor = ClientActor::new(
            &resolved(&[], ClientConfig::default()),
            ClientConfig::default(),
            &settings,
        )
        .unwrap();
        assert_eq!(actor.info().name, "ini");
    }

    #[test]
    fn set_name_over_rpc() {
        let actor = ClientActor::new(
            &resolved(&[], ClientConfig::default()),
            ClientConfig::default(),
            &ClientSettings::default(),
        )
        .unwrap();
        let methods = actor.rpc_methods();
        let reply = methods
            .call("koordclient/setName", &json!({"name": "drums"}))
            .unwrap();
        assert_eq!(reply, Ok(json!("ok")));
        let info = methods
            .call("koordclient/getClientInfo", &Value::Null)
            .unwrap()
            .unwrap();
        assert_eq!(info["name"], "drums");
        assert!(methods.call("koordserver/getServerProfile", &Value::Null).is_none());
    }
}
