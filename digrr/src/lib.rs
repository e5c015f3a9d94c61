#![cfg_attr(docsrs, feature(doc_cfg))]
//! # digrr
//!
//! A minimal DNS client library: build one query, send it to one name server over UDP,
//! decode the answer. Compliant with the RFC 1035 wire format.
//!
//! ## Feature Variants
//!
//! - **Default (`std`) version**
//!   - Blocking UDP transport using `std::net`.
//!   - [`dns::resolver::resolve`] and its typed helpers.
//!
//! - **Tokio (`tokio-dep`) version**
//!   - Adds `resolve_async`, driven by `tokio::net`.
//!
//! - **Agnostic version**
//!   - Only encoding and decoding of DNS messages and names.
//!   - No transport included, the user chooses their own.
//!
//! - **`serde`**
//!   - Derives `Serialize` on the decoded message types.
//!
//! ## Quick Start
//!
//! Add this to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! digrr = { version = "0.1", features = ["std"]}
//! digrr = { version = "0.1", features = ["tokio-dep"]}
//! digrr = { version = "0.1", default-features = false, features = ["agnostic"]}
//! ```
//!
//! ### Building a query by hand
//!
//! ```rust
//! use digrr::dns::resolver::{DnsMessage, OpCodeOptions, RecordType};
//!
//! let msg = DnsMessage::new_query("example.com", RecordType::A, OpCodeOptions::StandardQuery);
//! let bytes = msg.encode_query().unwrap();
//!
//! // header + "example.com" + QTYPE + QCLASS
//! assert_eq!(bytes.len(), 12 + 13 + 4);
//! ```
//!
//! ## Error Handling
//!
//! All operations return `Result<T, E>`; every error enum implements `std::error::Error`
//! through `thiserror`, and diagnostics are emitted through `tracing`.
//!
//! ## License
//!
//! This project is licensed under the MIT License.

pub mod dns;
