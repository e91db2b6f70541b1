//! Client and server actors.
//!
//! Each actor owns its configuration and socket for the run's duration.
//! The audio engine behind them is not part of this crate; the run loops
//! only keep the socket open until shutdown.

mod client;
mod server;
mod socket;

use std::net::SocketAddr;
use std::sync::Arc;

use crate::args::Mode;
use crate::config::{InitFileSettings, ResolvedConfiguration, RoleConfig};
use crate::rpc::{RpcMethods, RpcServer};
use crate::shutdown::ShutdownHandle;

pub use client::{ClientActor, ClientInfo};
pub use server::{DirectoryRole, ServerActor, ServerProfile};
pub use socket::bind_address;

pub enum Actor {
    Client(ClientActor),
    Server(ServerActor),
}

/// Construct exactly one actor for the resolved mode and attach its
/// remote-control methods to `rpc`, if present.
pub fn dispatch(
    config: ResolvedConfiguration,
    settings: &InitFileSettings,
    rpc: Option<&RpcServer>,
) -> anyhow::Result<Actor> {
    let actor = match config.role.clone() {
        RoleConfig::Client(client) => {
            Actor::Client(ClientActor::new(&config, client, &settings.client)?)
        }
        RoleConfig::Server(server) => {
            Actor::Server(ServerActor::new(&config, server, &settings.server)?)
        }
    };

    if let Some(rpc) = rpc {
        rpc.attach(actor.rpc_methods());
    }
    if config.use_gui {
        tracing::debug!("interactive front end is not part of this binary; running headless");
    }
    Ok(actor)
}

impl Actor {
    pub fn mode(&self) -> Mode {
        match self {
            Actor::Client(_) => Mode::Client,
            Actor::Server(_) => Mode::Server,
        }
    }

    pub fn local_addr(&self) -> SocketAddr {
        match self {
            Actor::Client(client) => client.local_addr(),
            Actor::Server(server) => server.local_addr(),
        }
    }

    pub fn rpc_methods(&self) -> Arc<dyn RpcMethods> {
        match self {
            Actor::Client(client) => client.rpc_methods(),
            Actor::Server(server) => server.rpc_methods(),
        }
    }

    /// Run until shutdown is signalled.
    pub async fn run(self, shutdown: ShutdownHandle) -> anyhow::Result<()> {
        match self {
            Actor::Client(client) => client.run(shutdown).await,
            Actor::Server(server) => server.run(shutdown).await,
        }
    }
}
