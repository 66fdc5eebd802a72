//! Socket plumbing for the probe.
//!
//! DHCP discovery talks from an interface that has no IP address yet, so
//! the send side needs a link-layer device binding plus broadcast
//! permission, and the receive side needs the wildcard address on the
//! client port with address reuse so it can coexist with a running DHCP
//! client.

use std::{io, net::UdpSocket as StdUdpSocket};
use thiserror::Error;
use tokio::net::UdpSocket as TokioUdpSocket;

/// Defines all possible errors for socket setup.
#[derive(Error, Debug)]
pub enum SocketError {
    #[error("Failed to create a new socket")]
    CreateSocket(#[source] io::Error),

    #[error("Failed to enable broadcast on socket")]
    SetBroadcast(#[source] io::Error),

    #[error("Failed to set SO_REUSEADDR on socket")]
    SetReuseAddress(#[source] io::Error),

    #[error("Failed to set SO_BINDTODEVICE on interface '{interface}'")]
    BindToDevice {
        interface: String,
        #[source]
        source: io::Error,
    },

    #[error("Failed to bind socket to address")]
    BindSocket(#[source] io::Error),

    #[error("Failed to set socket to non-blocking mode")]
    SetNonBlocking(#[source] io::Error),

    #[error("Failed to convert socket to TokioUdpSocket")]
    ConvertToTokio(#[source] io::Error),

    #[allow(dead_code)]
    #[error("Binding to a specific device is not supported on this platform")]
    NotSupported,
}

/// Creates the broadcast send socket, bound to a network device and port.
///
/// The socket gets `SO_BROADCAST` (the discover goes to the limited
/// broadcast address), `SO_REUSEADDR`, and `SO_BINDTODEVICE` for the
/// named interface, then binds to `0.0.0.0` on the given port. Any
/// failure aborts the whole setup; the partially configured socket is
/// dropped and never reaches the caller.
#[cfg(target_os = "linux")]
pub fn new_broadcast_socket(
    interface: &str,
    port: u16,
) -> Result<TokioUdpSocket, SocketError> {
    use socket2::{Domain, Socket, Type};
    use std::os::fd::AsRawFd;

    // Create a socket2 socket, which allows setting options before binding.
    let socket2 =
        Socket::new(Domain::IPV4, Type::DGRAM, None).map_err(SocketError::CreateSocket)?;

    socket2
        .set_broadcast(true)
        .map_err(SocketError::SetBroadcast)?;

    socket2
        .set_reuse_address(true)
        .map_err(SocketError::SetReuseAddress)?;

    // Set `SO_BINDTODEVICE`. This is an unsafe raw syscall; it is safe
    // here because the file descriptor is valid and the option value is
    // the interface name bytes.
    let ret = unsafe {
        libc::setsockopt(
            socket2.as_raw_fd(),
            libc::SOL_SOCKET,
            libc::SO_BINDTODEVICE,
            interface.as_ptr() as *const libc::c_void,
            interface.len() as libc::socklen_t,
        )
    };
    if ret < 0 {
        return Err(SocketError::BindToDevice {
            interface: interface.to_string(),
            source: io::Error::last_os_error(),
        });
    }

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    socket2.bind(&addr.into()).map_err(SocketError::BindSocket)?;

    into_tokio(socket2.into())
}

/// Fallback for non-Linux systems where `SO_BINDTODEVICE` is not available.
#[cfg(not(target_os = "linux"))]
pub fn new_broadcast_socket(
    _interface: &str,
    _port: u16,
) -> Result<TokioUdpSocket, SocketError> {
    Err(SocketError::NotSupported)
}

/// Creates the reply listen socket on the wildcard address.
///
/// No device binding and no sender filtering here: the offering server
/// may answer from an address the client cannot predict while it has no
/// IP configured. `SO_REUSEADDR` lets this socket share the client port
/// with the send socket and with any resident DHCP client.
pub fn new_listen_socket(port: u16) -> Result<TokioUdpSocket, SocketError> {
    use socket2::{Domain, Socket, Type};

    let socket2 =
        Socket::new(Domain::IPV4, Type::DGRAM, None).map_err(SocketError::CreateSocket)?;

    socket2
        .set_reuse_address(true)
        .map_err(SocketError::SetReuseAddress)?;

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    socket2.bind(&addr.into()).map_err(SocketError::BindSocket)?;

    into_tokio(socket2.into())
}

/// Converts a bound std socket into a non-blocking tokio socket.
fn into_tokio(socket: StdUdpSocket) -> Result<TokioUdpSocket, SocketError> {
    socket
        .set_nonblocking(true)
        .map_err(SocketError::SetNonBlocking)?;
    TokioUdpSocket::from_std(socket).map_err(SocketError::ConvertToTokio)
}
