use crate::network::SocketError;
use crate::v4::message::MalformedPacket;
use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("Socket setup failed")]
    Socket(#[from] SocketError),

    #[error("Failed to broadcast DHCP discover")]
    Send(#[source] io::Error),

    #[error("Failed to receive a DHCP reply")]
    Receive(#[source] io::Error),

    #[error("Malformed DHCP datagram")]
    Malformed(#[from] MalformedPacket),

    #[error("Timed out waiting for a DHCP offer")]
    Timeout,

    #[error("Failed to parse MAC address: {0}")]
    MacParse(String),

    #[error("Interface '{0}' not found or has no MAC address")]
    InterfaceInvalid(String),
}
