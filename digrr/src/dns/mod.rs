//! # digrr DNS
//!
//! The two halves of a DNS client: the wire format and the network exchange.
//!
//! ## Modules
//!
//! - `compressor`: domain name encoding and decoding, compression pointers included.
//! - `resolver`: message, header and resource record codecs plus the `resolve` entry point.
//! - `resolver::transporter`: the single UDP request/response exchange with a deadline
//!   (`std` or `tokio-dep` only).
//!
//! With the `agnostic` feature only the codecs are built, so the messages can be carried
//! over whatever transport the caller brings.
//!
//! ## Quick Example
//!
//! ```rust,no_run
//! # #[cfg(feature = "std")]
//! # {
//! use std::time::Duration;
//! use digrr::dns::resolver::resolve_ipv4;
//!
//! match resolve_ipv4("1.1.1.1", "example.com", Duration::from_secs(2)) {
//!     Ok(response) => {
//!         for answer in &response.answer {
//!             println!("{answer}");
//!         }
//!     }
//!     Err(e) => eprintln!("DNS resolution failed: {e}"),
//! }
//! # }
//! ```

pub mod compressor;
pub mod resolver;
