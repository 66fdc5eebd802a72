//! DHCPv4 wire format.
//!
//! A DHCP message is a fixed-layout BOOTP header followed by a fixed
//! 312-byte option window, so every frame on the wire is exactly
//! [`FRAME_SIZE`] bytes. Options are `(code, length, value)` triples
//! behind the magic cookie.

use bytes::{Buf, BufMut, Bytes, BytesMut};
use std::net::Ipv4Addr;
use thiserror::Error;

pub const DHCP_CLIENT_PORT: u16 = 68;
pub const DHCP_SERVER_PORT: u16 = 67;

/// Size of the fixed BOOTP header, up to and excluding the option window.
pub const FIXED_HEADER_SIZE: usize = 236;
/// Capacity of the option window carried by every frame.
pub const OPTIONS_CAPACITY: usize = 312;
/// Total on-wire size of a DHCP frame.
pub const FRAME_SIZE: usize = FIXED_HEADER_SIZE + OPTIONS_CAPACITY;

/// Marks the start of the DHCP option area (RFC 2131 §3).
pub const MAGIC_COOKIE: [u8; 4] = [0x63, 0x82, 0x53, 0x63];

/// High bit of `flags`: ask the server to reply by broadcast.
pub const BROADCAST_FLAG: u16 = 0x8000;

pub const HTYPE_ETHERNET: u8 = 1;
pub const HLEN_ETHERNET: u8 = 6;

const CHADDR_LEN: usize = 16;
const SNAME_LEN: usize = 64;
const FILE_LEN: usize = 128;

/// DHCP option codes.
pub mod option_code {
    pub const PAD: u8 = 0;
    pub const REQUESTED_ADDRESS: u8 = 50;
    pub const MESSAGE_TYPE: u8 = 53;
    pub const SERVER_IDENTIFIER: u8 = 54;
    pub const END: u8 = 255;
}

/// Values of the message type option (53).
pub mod message_type {
    pub const DISCOVER: u8 = 1;
    pub const OFFER: u8 = 2;
    pub const REQUEST: u8 = 3;
    pub const DECLINE: u8 = 4;
    pub const ACK: u8 = 5;
    pub const NAK: u8 = 6;
    pub const RELEASE: u8 = 7;
    pub const INFORM: u8 = 8;
}

/// Defines all the ways an inbound datagram can fail structural decode.
#[derive(Error, Debug)]
pub enum MalformedPacket {
    #[error("datagram is {0} bytes, expected a {FRAME_SIZE}-byte DHCP frame")]
    WrongSize(usize),

    #[error("unknown BOOTP op code {0}")]
    BadOpCode(u8),
}

/// BOOTP message op code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum OpCode {
    /// Client to server.
    Request = 1,
    /// Server to client.
    Reply = 2,
}

impl TryFrom<u8> for OpCode {
    type Error = MalformedPacket;

    fn try_from(value: u8) -> Result<Self, MalformedPacket> {
        match value {
            1 => Ok(OpCode::Request),
            2 => Ok(OpCode::Reply),
            other => Err(MalformedPacket::BadOpCode(other)),
        }
    }
}

/// A decoded DHCP message.
///
/// `sname`, `file` and `options` keep their full on-wire width; option
/// values are binary, not null-terminated text.
#[derive(Debug, Clone)]
pub struct DhcpMessage {
    pub op: OpCode,
    pub htype: u8,
    pub hlen: u8,
    pub hops: u8,
    /// Transaction ID correlating a request with its replies.
    pub xid: u32,
    pub secs: u16,
    pub flags: u16,
    /// Client IP address, if the client already has one.
    pub ciaddr: Ipv4Addr,
    /// 'your' address: the lease the server is offering.
    pub yiaddr: Ipv4Addr,
    /// Next server to use in bootstrap.
    pub siaddr: Ipv4Addr,
    /// Relay agent address.
    pub giaddr: Ipv4Addr,
    /// Client hardware address; the first `hlen` bytes are significant.
    pub chaddr: [u8; CHADDR_LEN],
    pub sname: [u8; SNAME_LEN],
    pub file: [u8; FILE_LEN],
    /// Magic cookie plus TLV options, zero-padded to capacity.
    pub options: [u8; OPTIONS_CAPACITY],
}

impl DhcpMessage {
    /// Constructs a DHCP Discover message for the given hardware address.
    ///
    /// All address fields are zero and the broadcast flag is set, since
    /// the probing interface has no IP configured yet. The option window
    /// carries the message type (DISCOVER) and a requested address of
    /// 0.0.0.0, meaning no preference.
    pub fn discover(xid: u32, hardware_addr: &[u8; 6]) -> Self {
        let mut chaddr = [0u8; CHADDR_LEN];
        chaddr[..6].copy_from_slice(hardware_addr);

        let mut options = [0u8; OPTIONS_CAPACITY];
        options[..4].copy_from_slice(&MAGIC_COOKIE);
        options[4] = option_code::MESSAGE_TYPE;
        options[5] = 1;
        options[6] = message_type::DISCOVER;
        options[7] = option_code::REQUESTED_ADDRESS;
        options[8] = 4;
        // value bytes 9..13 stay 0.0.0.0

        Self {
            op: OpCode::Request,
            htype: HTYPE_ETHERNET,
            hlen: HLEN_ETHERNET,
            hops: 0,
            xid,
            secs: 0,
            flags: BROADCAST_FLAG,
            ciaddr: Ipv4Addr::UNSPECIFIED,
            yiaddr: Ipv4Addr::UNSPECIFIED,
            siaddr: Ipv4Addr::UNSPECIFIED,
            giaddr: Ipv4Addr::UNSPECIFIED,
            chaddr,
            sname: [0u8; SNAME_LEN],
            file: [0u8; FILE_LEN],
            options,
        }
    }

    /// Encodes the message into its constant-size wire frame.
    ///
    /// The result is always exactly [`FRAME_SIZE`] bytes; multi-byte
    /// fields are big-endian.
    pub fn encode(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(FRAME_SIZE);
        buf.put_u8(self.op as u8);
        buf.put_u8(self.htype);
        buf.put_u8(self.hlen);
        buf.put_u8(self.hops);
        buf.put_u32(self.xid);
        buf.put_u16(self.secs);
        buf.put_u16(self.flags);
        buf.put_slice(&self.ciaddr.octets());
        buf.put_slice(&self.yiaddr.octets());
        buf.put_slice(&self.siaddr.octets());
        buf.put_slice(&self.giaddr.octets());
        buf.put_slice(&self.chaddr);
        buf.put_slice(&self.sname);
        buf.put_slice(&self.file);
        buf.put_slice(&self.options);
        debug_assert_eq!(buf.len(), FRAME_SIZE);
        buf.freeze()
    }

    /// Decodes a datagram into a message.
    ///
    /// This is a structural decode only: the frame size and the op code
    /// must be right, but the magic cookie, message type and transaction
    /// ID are left for the caller to interpret.
    pub fn decode(data: &[u8]) -> Result<Self, MalformedPacket> {
        if data.len() != FRAME_SIZE {
            return Err(MalformedPacket::WrongSize(data.len()));
        }

        let mut buf = data;
        let op = OpCode::try_from(buf.get_u8())?;
        let htype = buf.get_u8();
        let hlen = buf.get_u8();
        let hops = buf.get_u8();
        let xid = buf.get_u32();
        let secs = buf.get_u16();
        let flags = buf.get_u16();
        let ciaddr = Ipv4Addr::from(buf.get_u32());
        let yiaddr = Ipv4Addr::from(buf.get_u32());
        let siaddr = Ipv4Addr::from(buf.get_u32());
        let giaddr = Ipv4Addr::from(buf.get_u32());

        let mut chaddr = [0u8; CHADDR_LEN];
        buf.copy_to_slice(&mut chaddr);
        let mut sname = [0u8; SNAME_LEN];
        buf.copy_to_slice(&mut sname);
        let mut file = [0u8; FILE_LEN];
        buf.copy_to_slice(&mut file);
        let mut options = [0u8; OPTIONS_CAPACITY];
        buf.copy_to_slice(&mut options);

        Ok(Self {
            op,
            htype,
            hlen,
            hops,
            xid,
            secs,
            flags,
            ciaddr,
            yiaddr,
            siaddr,
            giaddr,
            chaddr,
            sname,
            file,
            options,
        })
    }

    /// Whether the option window starts with the DHCP magic cookie.
    pub fn has_magic_cookie(&self) -> bool {
        self.options[..4] == MAGIC_COOKIE
    }

    /// Whether the broadcast-reply flag is set.
    pub fn broadcast(&self) -> bool {
        self.flags & BROADCAST_FLAG != 0
    }

    /// Value of the first occurrence of `code` in the option window.
    ///
    /// The scan skips pad bytes and stops at the end marker, a truncated
    /// TLV, or the window boundary.
    pub fn option(&self, code: u8) -> Option<&[u8]> {
        if !self.has_magic_cookie() {
            return None;
        }
        let mut i = MAGIC_COOKIE.len();
        while i < OPTIONS_CAPACITY {
            match self.options[i] {
                option_code::PAD => i += 1,
                option_code::END => return None,
                found => {
                    let len = *self.options.get(i + 1)? as usize;
                    let start = i + 2;
                    let end = start + len;
                    if end > OPTIONS_CAPACITY {
                        return None;
                    }
                    if found == code {
                        return Some(&self.options[start..end]);
                    }
                    i = end;
                }
            }
        }
        None
    }

    /// Value of the message type option (53), if present and well-formed.
    pub fn message_type(&self) -> Option<u8> {
        match self.option(option_code::MESSAGE_TYPE) {
            Some([t]) => Some(*t),
            _ => None,
        }
    }

    /// Server identifier option (54), if present and well-formed.
    pub fn server_identifier(&self) -> Option<Ipv4Addr> {
        let value = self.option(option_code::SERVER_IDENTIFIER)?;
        let octets: [u8; 4] = value.try_into().ok()?;
        Some(Ipv4Addr::from(octets))
    }
}
