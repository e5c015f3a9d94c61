//! # digrr DNS Resolver
//!
//! A minimal, blocking DNS client built in pure Rust, compliant with [RFC 1035](https://datatracker.ietf.org/doc/html/rfc1035).
//!
//! One call builds one query, sends it over UDP to the name server you name, waits at
//! most `timeout` for one datagram and decodes it into a [`DnsMessage`].
//!
//! ## Features
//!
//! | Feature       | Description                                                                 |
//! |----------------|------------------------------------------------------------------------------|
//! | `std`          | Enables the **blocking** UDP resolver using the standard library (default).   |
//! | `tokio-dep`    | Adds the **asynchronous** resolver built on [Tokio](https://tokio.rs).       |
//! | `agnostic`     | Provides only message encoding and decoding, with no network I/O.      |
//!
//! > **Note:** `agnostic` cannot be enabled together with `std` or `tokio-dep`.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! # #[cfg(any(feature = "std", feature = "tokio-dep"))]
//! # {
//! use std::time::Duration;
//! use digrr::dns::resolver::{resolve, RData, RecordType};
//!
//! match resolve("8.8.8.8", "example.com", RecordType::A.into(), Duration::from_secs(3)) {
//!     Ok(response) => {
//!         for answer in &response.answer {
//!             if let RData::A(ip) = answer.r_data {
//!                 println!("A: {ip}");
//!             }
//!         }
//!     }
//!     Err(e) => eprintln!("DNS resolution failed: {e}"),
//! }
//! # }
//! ```
//!
//! Recursion is only *requested* (RD bit): the queried server does the work. Nothing is
//! cached and nothing is retried; on a timeout or a truncated response (see
//! [`DnsMessage::is_truncated`]) it is up to the caller to ask again elsewhere.
//!
//! ## Supported Record Types
//!
//! - `A`, `AAAA`: host addresses
//! - `NS`, `CNAME`, `PTR`: name servers, aliases and pointers
//! - `SOA`: Start of Authority
//! - `MX`: Mail Exchange
//! - `TXT`: Text records (SPF, DKIM, etc.)
//! - `SRV`: service location
//! - `HINFO`, `MINFO`, and `WKS`
//! - `MB`, `MG`, `MR`, and the obsolete `MD` and `MF`
//!
//! Records of any other type decode as [`RData::Opaque`] with their raw RDATA.
//!
//! ## Error Handling
//!
//! - `ResolverErrors`: top-level resolver errors from the public API.
//! - `UdpErrors`: network-related failures such as timeouts or empty responses.
//! - [`DecodeQueryErrors`]: low-level message parsing failures (bubbled up from UDP errors).
//! - [`CompressorErrors`](crate::dns::compressor::CompressorErrors): invalid domain names.

#[cfg(all(feature = "agnostic", any(feature = "std", feature = "tokio-dep")))]
compile_error!("Features `agnostic` and (`std`/`tokio`) cannot be enabled at the same time");

mod message;
mod record;

pub use self::message::{
    DecodeQueryErrors, DnsHeaderFlags, DnsMessage, HEADER_LEN, HeaderSection, OpCodeOptions,
    QuestionSection, ResponseCode, generate_id, pack_flags, pack_query, unpack_flags,
};
pub use self::record::{
    RData, RecordClass, RecordType, ResourceRecord, UnknownRecordType, decode_rdata,
    parse_record_type,
};

cfg_if::cfg_if! {
    if #[cfg(any(feature = "std", feature = "tokio-dep"))] {
        pub mod transporter;

        use std::time::Duration;
        use thiserror::Error;
        use tracing::{debug, warn};
        use transporter::{UdpErrors, UdpTransport};

        /// Queries `nameserver` (port 53) for `domain` records of `query_type`.
        ///
        /// `timeout` bounds the whole exchange: once it elapses the call fails with a
        /// timeout error instead of blocking.
        ///
        /// # Example
        /// ```rust,no_run
        /// # #[cfg(any(feature = "std", feature = "tokio-dep"))]
        /// # fn main() -> Result<(), digrr::dns::resolver::ResolverErrors> {
        /// use std::time::Duration;
        /// use digrr::dns::resolver::resolve;
        ///
        /// let response = resolve("d.root-servers.net.", "example.com", 2, Duration::from_secs(3))?;
        /// for authority in &response.authority {
        ///     println!("{authority}");
        /// }
        /// # Ok(())
        /// # }
        /// # #[cfg(not(any(feature = "std", feature = "tokio-dep")))]
        /// # fn main() {}
        /// ```
        ///
        /// # Errors
        /// Returns [`ResolverErrors`] if the query could not be sent, no valid answer came back
        /// in time, or the response could not be decoded.
        pub fn resolve(
            nameserver: &str,
            domain: &str,
            query_type: u16,
            timeout: Duration,
        ) -> Result<DnsMessage, ResolverErrors> {
            resolve_with(&UdpTransport::default(), nameserver, domain, query_type, timeout)
        }

        /// Same as [`resolve`] over a caller supplied transport (e.g. a non-standard port).
        pub fn resolve_with(
            transport: &UdpTransport,
            nameserver: &str,
            domain: &str,
            query_type: u16,
            timeout: Duration,
        ) -> Result<DnsMessage, ResolverErrors> {
            let msg = DnsMessage::new_query(domain, query_type, OpCodeOptions::StandardQuery);
            Ok(send_query_blocking(transport, nameserver, &msg, timeout)?)
        }

        /// Resolves an IPv4 (`A`) record for the given domain name.
        pub fn resolve_ipv4(
            nameserver: &str,
            name: &str,
            timeout: Duration,
        ) -> Result<DnsMessage, ResolverErrors> {
            resolve(nameserver, name, RecordType::A.into(), timeout)
        }

        /// Resolves the authoritative name servers (`NS`) of the given domain name.
        pub fn resolve_ns(
            nameserver: &str,
            name: &str,
            timeout: Duration,
        ) -> Result<DnsMessage, ResolverErrors> {
            resolve(nameserver, name, RecordType::Ns.into(), timeout)
        }

        /// Resolves a canonical name (`CNAME`) record for the given domain name.
        ///
        /// This record maps an alias name to its true, canonical domain name.
        pub fn resolve_cname(
            nameserver: &str,
            name: &str,
            timeout: Duration,
        ) -> Result<DnsMessage, ResolverErrors> {
            resolve(nameserver, name, RecordType::Cname.into(), timeout)
        }

        /// Resolves a Start of Authority (`SOA`) record for the given domain name.
        ///
        /// The SOA record defines the authoritative DNS server and zone parameters.
        pub fn resolve_soa(
            nameserver: &str,
            name: &str,
            timeout: Duration,
        ) -> Result<DnsMessage, ResolverErrors> {
            resolve(nameserver, name, RecordType::Soa.into(), timeout)
        }

        /// Resolves a Mail Exchange (`MX`) record for the given domain name.
        pub fn resolve_mx(
            nameserver: &str,
            name: &str,
            timeout: Duration,
        ) -> Result<DnsMessage, ResolverErrors> {
            resolve(nameserver, name, RecordType::Mx.into(), timeout)
        }

        /// Resolves a Text (`TXT`) record for the given domain name.
        ///
        /// Commonly used for SPF, DKIM, and general verification data.
        pub fn resolve_txt(
            nameserver: &str,
            name: &str,
            timeout: Duration,
        ) -> Result<DnsMessage, ResolverErrors> {
            resolve(nameserver, name, RecordType::Txt.into(), timeout)
        }

        fn send_query_blocking(
            transport: &UdpTransport,
            nameserver: &str,
            query: &DnsMessage,
            timeout: Duration,
        ) -> Result<DnsMessage, UdpErrors> {
            let bytes = query.encode_query()?;
            let response = transport.exchange(nameserver, &bytes, timeout)?;
            internal::check_and_decode(&response, query.header.id)
        }

        /// Represents high-level resolver errors exposed to users.
        #[derive(Debug, Error)]
        pub enum ResolverErrors {
            #[error(transparent)]
            SendingUdpQuery(#[from] UdpErrors),
        }

        impl ResolverErrors {
            /// `true` when the name server did not answer before the deadline.
            pub fn is_timeout(&self) -> bool {
                match self {
                    ResolverErrors::SendingUdpQuery(e) => e.is_timeout(),
                }
            }
        }

        mod internal {
            use super::*;

            pub(crate) fn check_response_id(id_in_bytes: [u8; 2], id: u16) -> bool {
                id == u16::from_be_bytes(id_in_bytes)
            }

            pub(crate) fn check_and_decode(
                response: &[u8],
                id: u16,
            ) -> Result<DnsMessage, UdpErrors> {
                if let [first, second, ..] = response {
                    if !check_response_id([*first, *second], id) {
                        return Err(UdpErrors::IdResponseInvalid(id));
                    }
                }

                let msg = DnsMessage::decode_query(response)?;
                if msg.is_truncated() {
                    warn!(id, "response truncated by the name server (TC bit set)");
                }
                debug!(
                    id,
                    rcode = ?msg.response_code(),
                    answers = msg.answer.len(),
                    authority = msg.authority.len(),
                    additional = msg.additional.len(),
                    "decoded DNS response"
                );
                Ok(msg)
            }
        }
    }
}

cfg_if::cfg_if! {
    if #[cfg(feature = "tokio-dep")] {
        /// Async version of [`resolve`]; the same single exchange, driven by Tokio.
        #[cfg_attr(docsrs, doc(cfg(feature = "tokio-dep")))]
        pub async fn resolve_async(
            nameserver: &str,
            domain: &str,
            query_type: u16,
            timeout: Duration,
        ) -> Result<DnsMessage, ResolverErrors> {
            let transport = UdpTransport::default();
            resolve_async_with(&transport, nameserver, domain, query_type, timeout).await
        }

        /// Async version of [`resolve_with`].
        #[cfg_attr(docsrs, doc(cfg(feature = "tokio-dep")))]
        pub async fn resolve_async_with(
            transport: &UdpTransport,
            nameserver: &str,
            domain: &str,
            query_type: u16,
            timeout: Duration,
        ) -> Result<DnsMessage, ResolverErrors> {
            let msg = DnsMessage::new_query(domain, query_type, OpCodeOptions::StandardQuery);
            let bytes = msg.encode_query().map_err(UdpErrors::from)?;
            let response = transport.exchange_async(nameserver, &bytes, timeout).await?;
            Ok(internal::check_and_decode(&response, msg.header.id)?)
        }
    }
}

#[cfg(all(test, any(feature = "std", feature = "tokio-dep")))]
mod tests {
    use super::*;
    use std::net::{Ipv4Addr, UdpSocket};
    use std::thread;

    /// Answers one query with an `A 93.184.216.34` record, optionally corrupting the ID.
    fn spawn_server(id_offset: u16) -> (u16, thread::JoinHandle<Vec<u8>>) {
        let socket = UdpSocket::bind("127.0.0.1:0").unwrap();
        let port = socket.local_addr().unwrap().port();
        let handle = thread::spawn(move || {
            let mut buf = [0u8; 512];
            let (len, peer) = socket.recv_from(&mut buf).unwrap();
            let query = buf[..len].to_vec();

            let mut response = query.clone();
            let id = u16::from_be_bytes([query[0], query[1]]).wrapping_add(id_offset);
            response[0..2].copy_from_slice(&id.to_be_bytes());
            response[2..4].copy_from_slice(&0x8180u16.to_be_bytes());
            response[6..8].copy_from_slice(&1u16.to_be_bytes());
            response.extend_from_slice(&[0xC0, 0x0C, 0x00, 0x01, 0x00, 0x01]);
            response.extend_from_slice(&3600u32.to_be_bytes());
            response.extend_from_slice(&[0x00, 0x04, 0x5D, 0xB8, 0xD8, 0x22]);

            socket.send_to(&response, peer).unwrap();
            query
        });
        (port, handle)
    }

    #[test]
    fn test_resolve_with_local_server() {
        let (port, handle) = spawn_server(0);
        let transport = UdpTransport::with_port(port);

        let msg = resolve_with(
            &transport,
            "127.0.0.1",
            "example.com",
            RecordType::A.into(),
            Duration::from_secs(2),
        )
        .unwrap();

        let query = handle.join().unwrap();
        assert_eq!(msg.header.id, u16::from_be_bytes([query[0], query[1]]));
        // RD set on the way out
        assert_eq!(&query[2..4], &[0x01, 0x00]);

        assert_eq!(msg.question().unwrap().name, "example.com");
        assert_eq!(msg.answer.len(), 1);
        assert_eq!(msg.answer[0].r_data, RData::A(Ipv4Addr::new(93, 184, 216, 34)));
        assert!(msg.authority.is_empty());
        assert!(msg.additional.is_empty());
    }

    #[test]
    fn test_resolve_with_unbounded_timeout() {
        let (port, handle) = spawn_server(0);
        let msg = resolve_with(
            &UdpTransport::with_port(port),
            "127.0.0.1",
            "example.com",
            RecordType::A.into(),
            Duration::MAX,
        )
        .unwrap();
        handle.join().unwrap();

        assert_eq!(msg.answer[0].r_data, RData::A(Ipv4Addr::new(93, 184, 216, 34)));
    }

    #[test]
    fn test_resolve_rejects_foreign_id() {
        let (port, handle) = spawn_server(1);
        let result = resolve_with(
            &UdpTransport::with_port(port),
            "127.0.0.1",
            "example.com",
            1,
            Duration::from_secs(2),
        );
        handle.join().unwrap();

        assert!(matches!(
            result,
            Err(ResolverErrors::SendingUdpQuery(UdpErrors::IdResponseInvalid(_)))
        ));
    }

    #[test]
    fn test_resolve_times_out() {
        let silent = UdpSocket::bind("127.0.0.1:0").unwrap();
        let transport = UdpTransport::with_port(silent.local_addr().unwrap().port());

        let result = resolve_with(
            &transport,
            "127.0.0.1",
            "example.com",
            1,
            Duration::from_millis(100),
        );
        assert!(result.unwrap_err().is_timeout());
    }

    #[test]
    fn test_resolve_rejects_invalid_domain_before_sending() {
        let result = resolve_with(
            &UdpTransport::with_port(9),
            "127.0.0.1",
            &format!("{}.com", "x".repeat(64)),
            1,
            Duration::from_millis(100),
        );
        assert!(matches!(
            result,
            Err(ResolverErrors::SendingUdpQuery(UdpErrors::EncodeQuery(_)))
        ));
    }

    #[test]
    fn test_check_and_decode_surfaces_decode_errors() {
        let result = internal::check_and_decode(&[0x00, 0x01, 0x81], 1);
        assert!(matches!(
            result,
            Err(UdpErrors::DecodeQueryErrors(DecodeQueryErrors::TruncatedMessage(3)))
        ));
    }

    #[cfg(feature = "tokio-dep")]
    #[tokio::test]
    async fn test_resolve_async_with_local_server() {
        let (port, handle) = spawn_server(0);
        let msg = resolve_async_with(
            &UdpTransport::with_port(port),
            "127.0.0.1",
            "example.com",
            1,
            Duration::from_secs(2),
        )
        .await
        .unwrap();
        handle.join().unwrap();

        assert_eq!(msg.answer[0].r_data, RData::A(Ipv4Addr::new(93, 184, 216, 34)));
    }
}
