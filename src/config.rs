use crate::error::ProbeError;
use crate::v4::message::{DHCP_CLIENT_PORT, DHCP_SERVER_PORT};
use clap::Parser;
use std::{net::Ipv4Addr, time::Duration};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// The network interface to probe from (e.g., 'eth0')
    #[arg(short, long)]
    pub interface: String,

    /// Hardware address to probe as, instead of the interface's own
    #[arg(short, long)]
    pub mac: Option<String>,

    /// Give up after this many seconds instead of waiting indefinitely
    #[arg(short, long)]
    pub timeout: Option<u64>,
}

pub struct ProbeConfig {
    pub interface: String,
    pub hardware_addr: [u8; 6],
    pub client_port: u16,
    pub server_port: u16,
    pub broadcast_address: Ipv4Addr,
    /// Bound on the offer wait; `None` blocks until a datagram arrives.
    pub timeout: Option<Duration>,
}

impl ProbeConfig {
    pub fn new(interface: String, hardware_addr: [u8; 6]) -> Self {
        Self {
            interface,
            hardware_addr,
            client_port: DHCP_CLIENT_PORT,
            server_port: DHCP_SERVER_PORT,
            broadcast_address: Ipv4Addr::BROADCAST,
            timeout: None,
        }
    }
}

/// Parses a MAC address string (e.g., "0a:1b:2c:3d:4e:5f") into its six
/// bytes, accepting ':' or '-' separators.
pub fn parse_mac(text: &str) -> Result<[u8; 6], ProbeError> {
    let mut mac = [0u8; 6];
    let mut count = 0;
    for part in text.split([':', '-']) {
        if count == mac.len() {
            return Err(ProbeError::MacParse(text.to_string()));
        }
        mac[count] =
            u8::from_str_radix(part, 16).map_err(|_| ProbeError::MacParse(text.to_string()))?;
        count += 1;
    }
    if count != mac.len() {
        return Err(ProbeError::MacParse(text.to_string()));
    }
    Ok(mac)
}
