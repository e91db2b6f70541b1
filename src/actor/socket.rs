use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr, UdpSocket};

use anyhow::Context;

use crate::shutdown::ShutdownHandle;

/// Largest datagram the drain loop accepts.
const MAX_DATAGRAM: usize = 2048;

/// Address the actor's socket binds to.
///
/// An explicit bind IP wins; otherwise every interface of the enabled
/// address family.
pub fn bind_address(port: u16, bind_ip: Option<IpAddr>, enable_ipv6: bool) -> SocketAddr {
    let ip = bind_ip.unwrap_or(if enable_ipv6 {
        IpAddr::V6(Ipv6Addr::UNSPECIFIED)
    } else {
        IpAddr::V4(Ipv4Addr::UNSPECIFIED)
    });
    SocketAddr::new(ip, port)
}

pub fn bind_socket(addr: SocketAddr) -> anyhow::Result<UdpSocket> {
    let socket = UdpSocket::bind(addr)
        .with_context(|| format!("cannot bind the socket (maybe the software is already running) on {addr}"))?;
    socket
        .set_nonblocking(true)
        .context("cannot switch the socket to non-blocking mode")?;
    Ok(socket)
}

/// Receive and discard datagrams until shutdown is signalled.
pub async fn drain(socket: UdpSocket, shutdown: ShutdownHandle) -> anyhow::Result<()> {
    let socket =
        tokio::net::UdpSocket::from_std(socket).context("cannot register the socket with the runtime")?;
    let mut buf = vec![0u8; MAX_DATAGRAM];

    loop {
        tokio::select! {
            _ = shutdown.wait() => break,
            received = socket.recv_from(&mut buf) => match received {
                Ok((len, peer)) => tracing::trace!(%peer, len, "datagram received"),
                Err(e) => tracing::debug!("receive failed: {}", e),
            },
        }
    }
    Ok(())
}
