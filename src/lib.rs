//! # Dhcprobe - A DHCP Server Discovery Probe
//!
//! Dhcprobe probes a local network segment for DHCP servers. It builds a
//! DHCP DISCOVER, broadcasts it from a named interface that need not have
//! an IP address configured, then listens on the well-known client port
//! for the first DHCP OFFER.
//!
//! ## Features
//!
//! - Hand-rolled fixed-frame DHCPv4 wire codec (236-byte header plus a
//!   312-byte option window)
//! - Device-bound broadcast sockets via `socket2` and `SO_BINDTODEVICE`
//! - Asynchronous operation using Tokio
//! - Robust error handling
//!
//! ## Example
//!
//! ```rust,no_run
//! use dhcprobe::{ProbeConfig, ProbeSession};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mac = [0x02, 0x00, 0x00, 0x00, 0x00, 0x00];
//!     let config = ProbeConfig::new("eth0".to_string(), mac);
//!     let mut session = ProbeSession::new(config)?;
//!     let offer = session.probe().await?;
//!     println!("Offered address: {}", offer.offered_ip);
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod network;
pub mod v4;

pub use client::{OfferSummary, ProbeSession};
pub use config::{Args, ProbeConfig};
pub use error::ProbeError;
pub use v4::message::DhcpMessage;
