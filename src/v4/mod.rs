//! DHCPv4 protocol implementation
//!
//! This module contains the DHCPv4-specific implementation including:
//! - The fixed-frame wire codec
//! - Option window access

pub mod message;

#[cfg(test)]
mod tests;

pub use message::{DhcpMessage, MalformedPacket, OpCode};
