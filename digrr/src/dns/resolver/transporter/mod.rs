//! # DNS Transporter
//!
//! The `transporter` module moves raw DNS messages between **digrr** and a name server
//! over UDP. It knows nothing about the message format: it sends the bytes it is given
//! and returns the bytes it receives.
//!
//! ## Exchange model
//!
//! Every call to [`UdpTransport::exchange`] is one self-contained round trip:
//!
//! 1. resolve `nameserver` to a socket address on the transport's port (53 by default),
//! 2. bind an ephemeral local socket of the same address family and connect it,
//! 3. send the query in a single datagram,
//! 4. receive a single datagram into a 512-octet buffer (RFC 1035 §4.2.1).
//!
//! Both the send and the receive share one absolute deadline computed from the
//! caller's timeout. The socket is owned by the call and dropped (closed) on every
//! exit path. Nothing is retried: a response larger than 512 octets arrives cut by the
//! server with the TC bit set, and falling back to TCP is left to the caller.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use digrr::dns::resolver::transporter::UdpTransport;
//!
//! let transport = UdpTransport::default();
//! let query: Vec<u8> = Vec::new(); // a packed DNS query
//! let response = transport.exchange("8.8.8.8", &query, Duration::from_secs(3));
//! ```

use crate::dns::compressor::CompressorErrors;
use crate::dns::resolver::DecodeQueryErrors;
use std::io;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr, ToSocketAddrs, UdpSocket};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, trace};

/// Well-known DNS server port.
pub const DNS_PORT: u16 = 53;

/// Largest DNS message carried over UDP without EDNS(0).
pub const MAX_UDP_PAYLOAD: usize = 512;

/// Blocking (and, with `tokio-dep`, async) UDP exchange with a single name server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UdpTransport {
    port: u16,
}

impl Default for UdpTransport {
    fn default() -> Self {
        UdpTransport { port: DNS_PORT }
    }
}

impl UdpTransport {
    /// A transport talking to name servers on a non-standard port.
    pub fn with_port(port: u16) -> Self {
        UdpTransport { port }
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Resolves `nameserver` (an IP literal or a host name) to the address queries go to.
    ///
    /// IPv6 literals may be written with or without brackets.
    pub fn server_addr(&self, nameserver: &str) -> Result<SocketAddr, UdpErrors> {
        let dial_error = |source| UdpErrors::Dial {
            server: nameserver.to_string(),
            source,
        };

        (host_part(nameserver), self.port)
            .to_socket_addrs()
            .map_err(dial_error)?
            .next()
            .ok_or_else(|| {
                dial_error(io::Error::new(
                    io::ErrorKind::NotFound,
                    "name server has no address",
                ))
            })
    }

    /// Sends `query` to `nameserver` and waits for one response datagram.
    ///
    /// # Errors
    /// - [`UdpErrors::Dial`] when the address cannot be resolved or the socket cannot be set up.
    /// - [`UdpErrors::Write`] / [`UdpErrors::Read`] for socket failures.
    /// - [`UdpErrors::Timeout`] once `timeout` has elapsed.
    /// - [`UdpErrors::EmptyResponse`] when a zero-length datagram comes back.
    pub fn exchange(
        &self,
        nameserver: &str,
        query: &[u8],
        timeout: Duration,
    ) -> Result<Vec<u8>, UdpErrors> {
        // Too far out to represent means no deadline at all.
        let deadline = Instant::now().checked_add(timeout);
        let server = self.server_addr(nameserver)?;
        let dial_error = |source| UdpErrors::Dial {
            server: server.to_string(),
            source,
        };

        let socket = UdpSocket::bind(unspecified_for(&server)).map_err(dial_error)?;
        socket.connect(server).map_err(dial_error)?;
        debug!(%server, bytes = query.len(), "sending DNS query");

        socket
            .set_write_timeout(remaining(deadline, timeout)?)
            .map_err(UdpErrors::Write)?;
        socket
            .send(query)
            .map_err(|e| io_failure(e, timeout, UdpErrors::Write))?;

        socket
            .set_read_timeout(remaining(deadline, timeout)?)
            .map_err(UdpErrors::Read)?;
        let mut buf = [0u8; MAX_UDP_PAYLOAD];
        let len = socket
            .recv(&mut buf)
            .map_err(|e| io_failure(e, timeout, UdpErrors::Read))?;

        if len == 0 {
            return Err(UdpErrors::EmptyResponse);
        }

        trace!(%server, bytes = len, "received DNS response");
        Ok(buf[..len].to_vec())
    }

    /// Async version of [`UdpTransport::exchange`] built on `tokio::net`.
    #[cfg(feature = "tokio-dep")]
    #[cfg_attr(docsrs, doc(cfg(feature = "tokio-dep")))]
    pub async fn exchange_async(
        &self,
        nameserver: &str,
        query: &[u8],
        timeout: Duration,
    ) -> Result<Vec<u8>, UdpErrors> {
        use tokio::net::UdpSocket as TokioUdpSocket;

        let round_trip = async {
            let dial_error = |source| UdpErrors::Dial {
                server: nameserver.to_string(),
                source,
            };

            let server = tokio::net::lookup_host((host_part(nameserver), self.port))
                .await
                .map_err(dial_error)?
                .next()
                .ok_or_else(|| {
                    dial_error(io::Error::new(
                        io::ErrorKind::NotFound,
                        "name server has no address",
                    ))
                })?;

            let socket = TokioUdpSocket::bind(unspecified_for(&server))
                .await
                .map_err(dial_error)?;
            socket.connect(server).await.map_err(dial_error)?;
            debug!(%server, bytes = query.len(), "sending DNS query");

            socket.send(query).await.map_err(UdpErrors::Write)?;

            let mut buf = [0u8; MAX_UDP_PAYLOAD];
            let len = socket.recv(&mut buf).await.map_err(UdpErrors::Read)?;
            if len == 0 {
                return Err(UdpErrors::EmptyResponse);
            }

            trace!(%server, bytes = len, "received DNS response");
            Ok::<_, UdpErrors>(buf[..len].to_vec())
        };

        let Some(deadline) = tokio::time::Instant::now().checked_add(timeout) else {
            return round_trip.await;
        };
        match tokio::time::timeout_at(deadline, round_trip).await {
            Ok(result) => result,
            Err(_elapsed) => Err(UdpErrors::Timeout(timeout)),
        }
    }
}

fn host_part(nameserver: &str) -> &str {
    nameserver
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .unwrap_or(nameserver)
}

fn unspecified_for(server: &SocketAddr) -> SocketAddr {
    match server {
        SocketAddr::V4(_) => SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0)),
        SocketAddr::V6(_) => SocketAddr::from((Ipv6Addr::UNSPECIFIED, 0)),
    }
}

/// Time left before `deadline`; an exhausted deadline is a timeout, not a zero socket timeout.
///
/// `None` in and out means the socket blocks without a timeout.
fn remaining(
    deadline: Option<Instant>,
    timeout: Duration,
) -> Result<Option<Duration>, UdpErrors> {
    let Some(deadline) = deadline else {
        return Ok(None);
    };
    let left = deadline.saturating_duration_since(Instant::now());
    if left.is_zero() {
        return Err(UdpErrors::Timeout(timeout));
    }
    Ok(Some(left))
}

// Socket timeouts surface as WouldBlock on unix and TimedOut on windows.
fn io_failure(error: io::Error, timeout: Duration, wrap: fn(io::Error) -> UdpErrors) -> UdpErrors {
    match error.kind() {
        io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut => UdpErrors::Timeout(timeout),
        _ => wrap(error),
    }
}

/// Represents errors that may occur when sending or receiving DNS queries over UDP.
#[derive(Debug, Error)]
pub enum UdpErrors {
    #[error("Could not open a UDP socket to the name server {server}: {source}")]
    Dial {
        server: String,
        #[source]
        source: io::Error,
    },
    #[error("Could not send the DNS query: {0}")]
    Write(#[source] io::Error),
    #[error("Could not read the DNS response: {0}")]
    Read(#[source] io::Error),
    #[error("The name server did not answer within {0:?}")]
    Timeout(Duration),
    #[error("The name server returned an empty response")]
    EmptyResponse,
    #[error("The DNS query's response ID didn't match with the DNS question sent.\nId: {0}")]
    IdResponseInvalid(u16),
    #[error("Could not encode the DNS query: {0}")]
    EncodeQuery(#[from] CompressorErrors),
    #[error(transparent)]
    DecodeQueryErrors(#[from] DecodeQueryErrors),
}

impl UdpErrors {
    /// `true` for the deadline-exceeded condition.
    pub fn is_timeout(&self) -> bool {
        matches!(self, UdpErrors::Timeout(_))
    }
}
