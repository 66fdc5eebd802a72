//! The probe session
//!
//! A session owns the two sockets of a discover/offer exchange: the
//! device-bound broadcast sender and the wildcard listener on the client
//! port. The exchange itself is strictly sequential: one DISCOVER out,
//! one datagram in.

use crate::{
    config::ProbeConfig,
    error::ProbeError,
    network,
    v4::message::{message_type, DhcpMessage},
};
use rand::{rngs::StdRng, Rng as _, SeedableRng as _};
use std::net::{Ipv4Addr, SocketAddr};
use tokio::{net::UdpSocket, time};

/// What a probe learned from the first offer heard on the segment.
#[derive(Debug, Clone)]
pub struct OfferSummary {
    /// The lease the server proposed (yiaddr).
    pub offered_ip: Ipv4Addr,
    /// Next server to use in bootstrap (siaddr).
    pub next_server: Ipv4Addr,
    /// Server identifier option, when the server sent one.
    pub server_identifier: Option<Ipv4Addr>,
    /// Transaction ID echoed in the reply.
    pub xid: u32,
    /// Socket address the reply arrived from.
    pub from: SocketAddr,
}

pub struct ProbeSession {
    config: ProbeConfig,
    send_socket: UdpSocket,
    recv_socket: UdpSocket,
    rng: StdRng,
}

impl ProbeSession {
    /// Opens the broadcast send socket and the reply listen socket.
    ///
    /// Both sockets are released when the session drops, on every exit
    /// path. The transaction ID generator is seeded here, once per
    /// session. Must be called from within a tokio runtime.
    pub fn new(config: ProbeConfig) -> Result<Self, ProbeError> {
        let send_socket =
            network::new_broadcast_socket(&config.interface, config.client_port)?;
        let recv_socket = network::new_listen_socket(config.client_port)?;

        Ok(Self {
            config,
            send_socket,
            recv_socket,
            rng: StdRng::from_os_rng(),
        })
    }

    /// Broadcasts a single DISCOVER and returns its transaction ID.
    pub async fn send_discover(&mut self) -> Result<u32, ProbeError> {
        let xid = self.rng.random();
        let frame = DhcpMessage::discover(xid, &self.config.hardware_addr).encode();
        let target =
            SocketAddr::from((self.config.broadcast_address, self.config.server_port));

        self.send_socket
            .send_to(&frame, target)
            .await
            .map_err(ProbeError::Send)?;

        tracing::debug!(
            "Sent {} byte DISCOVER (xid {:#010x}) to {}",
            frame.len(),
            xid,
            target
        );
        Ok(xid)
    }

    /// Waits for one datagram on the client port and decodes it.
    ///
    /// Blocks indefinitely unless the config carries a timeout. No
    /// sender filtering: the offering server may answer from an address
    /// the client cannot predict yet.
    pub async fn recv_offer(&mut self) -> Result<(DhcpMessage, SocketAddr), ProbeError> {
        let mut buf = [0u8; 1500];
        let (len, from) = match self.config.timeout {
            Some(duration) => {
                time::timeout(duration, self.recv_socket.recv_from(&mut buf))
                    .await
                    .map_err(|_| ProbeError::Timeout)?
                    .map_err(ProbeError::Receive)?
            }
            None => self
                .recv_socket
                .recv_from(&mut buf)
                .await
                .map_err(ProbeError::Receive)?,
        };

        tracing::debug!("Received {} bytes from {}", len, from);
        let msg = DhcpMessage::decode(&buf[..len])?;
        Ok((msg, from))
    }

    /// Runs the discover/offer exchange once and summarizes the reply.
    ///
    /// The first well-sized datagram on the port is accepted as the
    /// offer; a missing cookie, a foreign transaction ID or a non-OFFER
    /// message type are logged, not filtered out.
    pub async fn probe(&mut self) -> Result<OfferSummary, ProbeError> {
        let xid = self.send_discover().await?;
        tracing::info!("DISCOVER broadcast on '{}'", self.config.interface);

        let (offer, from) = self.recv_offer().await?;

        if !offer.has_magic_cookie() {
            tracing::warn!("Reply from {} lacks the DHCP magic cookie", from);
        }
        if offer.xid != xid {
            tracing::warn!(
                "Reply xid {:#010x} does not match our {:#010x}",
                offer.xid,
                xid
            );
        }
        match offer.message_type() {
            Some(message_type::OFFER) => {}
            other => tracing::warn!("Reply message type is {:?}, not OFFER", other),
        }

        Ok(OfferSummary {
            offered_ip: offer.yiaddr,
            next_server: offer.siaddr,
            server_identifier: offer.server_identifier(),
            xid: offer.xid,
            from,
        })
    }
}
