//! # DNS message codec
//!
//! This module defines the representation of DNS messages and the codec that turns an
//! outgoing query into bytes and a received datagram back into a [`DnsMessage`].
//!
//! - **HeaderSection**: message ID, packed flags and the count of each section.
//! - **DnsHeaderFlags**: the 16-bit flags field, see [`pack_flags`] / [`unpack_flags`].
//! - **QuestionSection**: query name, type and class.
//! - **ResourceRecord**: answer, authority and additional records with typed RDATA.
//!
//! ```text
//!     +---------------------+
//!     |        Header       |
//!     +---------------------+
//!     |       Question      | the question for the name server
//!     +---------------------+
//!     |        Answer       | RRs answering the question
//!     +---------------------+
//!     |      Authority      | RRs pointing toward an authority
//!     +---------------------+
//!     |      Additional     | RRs holding additional information
//!     +---------------------+
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use digrr::dns::resolver::{DnsMessage, OpCodeOptions, RecordType};
//!
//! let msg = DnsMessage::new_query("example.com", RecordType::A, OpCodeOptions::StandardQuery);
//! let query_bytes = msg.encode_query().unwrap();
//! assert_eq!(query_bytes.len(), 12 + 13 + 4);
//! ```

use super::record::ResourceRecord;
use crate::dns::compressor::{CompressorErrors, MessageCompressor, decode_name};
use std::collections::HashMap;
use thiserror::Error;
use tracing::trace;

#[cfg(feature = "serde")]
use serde::Serialize;

/// Size of the fixed message header, in octets.
pub const HEADER_LEN: usize = 12;

mod internal {
    use rand::Rng;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    /// Generates a random 16-bit ID for a DNS query.
    pub fn generate_id() -> u16 {
        let mut thread_rng = rand::rng();
        let mut rng = SmallRng::from_rng(&mut thread_rng);

        rng.random::<u16>()
    }
}

pub use self::internal::generate_id;

/// Errors raised while decoding a DNS message.
///
/// Any of them invalidates the whole message: offsets and compression pointers are
/// relative to the buffer, so nothing after a malformed field can be trusted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeQueryErrors {
    #[error("DNS header needs 12 bytes, only {0} available")]
    TruncatedHeader(usize),
    #[error("DNS message is truncated (offset {0})")]
    TruncatedMessage(usize),
    #[error("RDLENGTH {rd_length} is invalid for record type {record_type}")]
    BadRdLength { record_type: u16, rd_length: u16 },
    #[error(transparent)]
    Name(#[from] CompressorErrors),
}

pub(crate) fn read_u16(bytes: &[u8], offset: usize) -> Option<u16> {
    let raw = bytes.get(offset..offset + 2)?;
    Some(u16::from_be_bytes([raw[0], raw[1]]))
}

pub(crate) fn read_u32(bytes: &[u8], offset: usize) -> Option<u32> {
    let raw = bytes.get(offset..offset + 4)?;
    Some(u32::from_be_bytes([raw[0], raw[1], raw[2], raw[3]]))
}

/// Represents a full DNS message, including header and all four sections.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct DnsMessage {
    pub header: HeaderSection,
    // The question for the name server
    pub question: Vec<QuestionSection>,
    // RRs answering the question
    pub answer: Vec<ResourceRecord>,
    // RRs pointing toward an authority
    pub authority: Vec<ResourceRecord>,
    // RRs holding additional information
    pub additional: Vec<ResourceRecord>,
}

impl DnsMessage {
    /// Creates a new standard query message.
    ///
    /// The header carries a random ID and the Recursion Desired bit; the question class is IN.
    ///
    /// # Arguments
    /// * `target` - The domain name to query.
    /// * `record_type` - Type of record (A, MX, TXT, etc.), a [`RecordType`](super::RecordType) or a raw code.
    /// * `query_type` - DNS operation code (Standard, Inverse, or ServerStatus).
    pub fn new_query(
        target: &str,
        record_type: impl Into<u16>,
        query_type: OpCodeOptions,
    ) -> DnsMessage {
        DnsMessage {
            header: HeaderSection {
                id: generate_id(), //random u16 number
                flags: DnsHeaderFlags {
                    qr: false,
                    opcode: query_type as u8,
                    aa: false,
                    tc: false,
                    rd: true,
                    ra: false,
                    z: 0,
                    rcode: 0,
                }
                .to_u16(),
                qd_count: 1,
                an_count: 0,
                ns_count: 0,
                ar_count: 0,
            },
            question: vec![QuestionSection {
                name: target.to_string(),
                record_type: record_type.into(),
                class: 1,
            }],
            answer: Vec::new(),
            authority: Vec::new(),
            additional: Vec::new(),
        }
    }

    /// Encodes the header and question section into bytes for sending over the network.
    ///
    /// Record sections are never written on outbound queries, so the header goes out with
    /// `qd_count` equal to the number of questions and every other count set to zero.
    pub fn encode_query(&self) -> Result<Vec<u8>, CompressorErrors> {
        encode_questions(&self.header, &self.question)
    }

    /// Decodes a complete DNS message received from a name server.
    ///
    /// Sections are read in wire order, each holding exactly as many entries as its header
    /// count announces. The first malformed field aborts the decode.
    pub fn decode_query(bytes: &[u8]) -> Result<DnsMessage, DecodeQueryErrors> {
        if bytes.len() < HEADER_LEN {
            return Err(DecodeQueryErrors::TruncatedMessage(bytes.len()));
        }

        let header = HeaderSection::from_bytes(bytes)?;
        let mut offset = HEADER_LEN;

        let mut question = Vec::new();
        for _ in 0..header.qd_count {
            let (entry, next) = QuestionSection::decode(bytes, offset)?;
            question.push(entry);
            offset = next;
        }

        let answer = decode_records(bytes, &mut offset, header.an_count)?;
        let authority = decode_records(bytes, &mut offset, header.ns_count)?;
        let additional = decode_records(bytes, &mut offset, header.ar_count)?;

        if offset < bytes.len() {
            trace!(trailing = bytes.len() - offset, "ignoring bytes after the last section");
        }

        Ok(DnsMessage {
            header,
            question,
            answer,
            authority,
            additional,
        })
    }

    /// The first entry of the question section.
    pub fn question(&self) -> Option<&QuestionSection> {
        self.question.first()
    }

    /// The unpacked header flags.
    pub fn flags(&self) -> DnsHeaderFlags {
        self.header.flags()
    }

    pub fn response_code(&self) -> ResponseCode {
        self.header.response_code()
    }

    /// `true` when the server cut the response to fit the UDP datagram (TC bit).
    pub fn is_truncated(&self) -> bool {
        self.flags().tc
    }
}

/// Packs a single-question query: header, question name, QTYPE and QCLASS.
///
/// The header counts are rewritten to describe exactly one question and no records.
pub fn pack_query(
    header: &HeaderSection,
    question: &QuestionSection,
) -> Result<Vec<u8>, CompressorErrors> {
    encode_questions(header, std::slice::from_ref(question))
}

fn encode_questions(
    header: &HeaderSection,
    questions: &[QuestionSection],
) -> Result<Vec<u8>, CompressorErrors> {
    let header = HeaderSection {
        qd_count: questions.len() as u16,
        an_count: 0,
        ns_count: 0,
        ar_count: 0,
        ..*header
    };

    let mut message: Vec<u8> = Vec::with_capacity(512);
    let mut pointer_map: HashMap<String, usize> = HashMap::new();

    message.extend_from_slice(&header.to_bytes());
    for question in questions {
        MessageCompressor::compress(&question.name, &mut message, &mut pointer_map)?;
        message.extend_from_slice(&question.record_type.to_be_bytes());
        message.extend_from_slice(&question.class.to_be_bytes());
    }
    Ok(message)
}

fn decode_records(
    bytes: &[u8],
    offset: &mut usize,
    count: u16,
) -> Result<Vec<ResourceRecord>, DecodeQueryErrors> {
    let mut records = Vec::new();
    for _ in 0..count {
        let (record, next) = ResourceRecord::decode(bytes, *offset)?;
        records.push(record);
        *offset = next;
    }
    Ok(records)
}

/// Represents the header section of a DNS message.
///
/// The header contains an ID, flags, and counts for each section
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct HeaderSection {
    /// Identifier to match requests and responses.
    pub id: u16,
    /// Flags and control bits for the DNS message.
    /// Use [`DnsHeaderFlags`]
    pub flags: u16,
    /// Number of entries in the question section.
    pub qd_count: u16,
    /// Number of resource records in the answer section.
    pub an_count: u16,
    /// Number of name server records in the authority section.
    pub ns_count: u16,
    /// Number of resource records in the additional section.
    pub ar_count: u16,
}

#[allow(clippy::wrong_self_convention)]
impl HeaderSection {
    /// Converts the header into a 12-byte array suitable for network transmission.
    pub fn to_bytes(&self) -> [u8; 12] {
        let mut bytes = [0u8; 12];
        bytes[0..2].copy_from_slice(&self.id.to_be_bytes());
        bytes[2..4].copy_from_slice(&self.flags.to_be_bytes());
        bytes[4..6].copy_from_slice(&self.qd_count.to_be_bytes());
        bytes[6..8].copy_from_slice(&self.an_count.to_be_bytes());
        bytes[8..10].copy_from_slice(&self.ns_count.to_be_bytes());
        bytes[10..12].copy_from_slice(&self.ar_count.to_be_bytes());
        bytes
    }

    /// Reads the header from the first 12 octets of `bytes`.
    pub fn from_bytes(bytes: &[u8]) -> Result<HeaderSection, DecodeQueryErrors> {
        if bytes.len() < HEADER_LEN {
            return Err(DecodeQueryErrors::TruncatedHeader(bytes.len()));
        }
        let field = |i: usize| u16::from_be_bytes([bytes[2 * i], bytes[2 * i + 1]]);
        Ok(HeaderSection {
            id: field(0),
            flags: field(1),
            qd_count: field(2),
            an_count: field(3),
            ns_count: field(4),
            ar_count: field(5),
        })
    }

    pub fn flags(&self) -> DnsHeaderFlags {
        DnsHeaderFlags::from_u16(self.flags)
    }

    pub fn response_code(&self) -> ResponseCode {
        ResponseCode::from(self.flags().rcode)
    }
}

/// Represents the 16-bit DNS flags field (RFC 1035 §4.1.1).
///
/// ```text
///   +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
///   |QR|   Opcode  |AA|TC|RD|RA|   Z    |   RCODE   |
///   +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct DnsHeaderFlags {
    /// Query/Response flag
    pub qr: bool,
    /// Operation code
    /// Use `OpCodeOptions`
    pub opcode: u8,
    /// Authoritative Answer
    pub aa: bool,
    /// Truncation flag
    pub tc: bool,
    /// Recursion Desired
    pub rd: bool,
    /// Recursion Available
    pub ra: bool,
    /// Reserved bits (RFC 1035)
    pub z: u8,
    /// Response code
    pub rcode: u8,
}

/// Operation codes available for DNS queries (RFC 1035 §4.1.1).
// 3-15 reserved for future use
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpCodeOptions {
    StandardQuery = 0,
    InverseQuery = 1,
    ServerStatusRequest = 2,
}

impl DnsHeaderFlags {
    /// Encode the flags into a 16-bit integer.
    ///
    /// `opcode` and `rcode` must fit in 4 bits and `z` in 3 bits; higher bits are dropped.
    pub fn to_u16(self) -> u16 {
        ((self.qr as u16) << 15)
            | ((self.opcode as u16 & 0b1111) << 11)
            | ((self.aa as u16) << 10)
            | ((self.tc as u16) << 9)
            | ((self.rd as u16) << 8)
            | ((self.ra as u16) << 7)
            | ((self.z as u16 & 0b111) << 4)
            | (self.rcode as u16 & 0b1111)
    }
    /// Decode from a 16-bit integer into structured flags.
    pub fn from_u16(value: u16) -> Self {
        Self {
            qr: (value >> 15) & 1 != 0,
            opcode: ((value >> 11) & 0b1111) as u8,
            aa: (value >> 10) & 1 != 0,
            tc: (value >> 9) & 1 != 0,
            rd: (value >> 8) & 1 != 0,
            ra: (value >> 7) & 1 != 0,
            z: ((value >> 4) & 0b111) as u8,
            rcode: (value & 0b1111) as u8,
        }
    }
}

/// Packs the seven header flag fields into one word, the reserved `Z` bits left at zero.
///
/// Precondition: `opcode <= 0xF` and `rcode <= 0xF`.
pub fn pack_flags(qr: bool, opcode: u8, aa: bool, tc: bool, rd: bool, ra: bool, rcode: u8) -> u16 {
    DnsHeaderFlags {
        qr,
        opcode,
        aa,
        tc,
        rd,
        ra,
        z: 0,
        rcode,
    }
    .to_u16()
}

pub fn unpack_flags(flags: u16) -> DnsHeaderFlags {
    DnsHeaderFlags::from_u16(flags)
}

/// RCODE values (RFC 1035 §4.1.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum ResponseCode {
    NoError,
    /// The name server was unable to interpret the query.
    FormatError,
    ServerFailure,
    /// The queried domain name does not exist (NXDOMAIN).
    NameError,
    NotImplemented,
    Refused,
    /// 6-15 reserved for future use
    Other(u8),
}

impl From<u8> for ResponseCode {
    fn from(value: u8) -> Self {
        match value {
            0 => ResponseCode::NoError,
            1 => ResponseCode::FormatError,
            2 => ResponseCode::ServerFailure,
            3 => ResponseCode::NameError,
            4 => ResponseCode::NotImplemented,
            5 => ResponseCode::Refused,
            other => ResponseCode::Other(other),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct QuestionSection {
    /// The domain name being queried.
    pub name: String,
    /// The type of DNS record being requested (e.g., A, AAAA, MX).
    pub record_type: u16,
    /// The class of the DNS record (usually IN for Internet, or CH for Chaos).
    pub class: u16,
}

impl QuestionSection {
    fn decode(bytes: &[u8], offset: usize) -> Result<(QuestionSection, usize), DecodeQueryErrors> {
        let (name, next) = decode_name(bytes, offset)?;
        let record_type = read_u16(bytes, next).ok_or(DecodeQueryErrors::TruncatedMessage(next))?;
        let class = read_u16(bytes, next + 2).ok_or(DecodeQueryErrors::TruncatedMessage(next))?;
        Ok((
            QuestionSection {
                name,
                record_type,
                class,
            },
            next + 4,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dns::resolver::record::{RData, RecordType};
    use std::net::Ipv4Addr;

    /// Header + "example.com" question, ready for records that point back at offset 12.
    fn response_prefix(an: u16, ns: u16, ar: u16) -> Vec<u8> {
        let header = HeaderSection {
            id: 0x1234,
            flags: 0x8180,
            qd_count: 1,
            an_count: an,
            ns_count: ns,
            ar_count: ar,
        };
        let mut bytes = header.to_bytes().to_vec();
        bytes.extend_from_slice(&[
            7, b'e', b'x', b'a', b'm', b'p', b'l', b'e', 3, b'c', b'o', b'm', 0,
        ]);
        bytes.extend_from_slice(&[0x00, 0x01, 0x00, 0x01]);
        bytes
    }

    /// Appends a record owned by the question name (pointer to offset 12).
    fn push_record(bytes: &mut Vec<u8>, record_type: u16, ttl: u32, rdata: &[u8]) {
        bytes.extend_from_slice(&[0xC0, 0x0C]);
        bytes.extend_from_slice(&record_type.to_be_bytes());
        bytes.extend_from_slice(&1u16.to_be_bytes());
        bytes.extend_from_slice(&ttl.to_be_bytes());
        bytes.extend_from_slice(&(rdata.len() as u16).to_be_bytes());
        bytes.extend_from_slice(rdata);
    }

    #[test]
    fn test_dns_header_flags_encode_decode() {
        let flags = DnsHeaderFlags {
            qr: true,
            opcode: OpCodeOptions::ServerStatusRequest as u8,
            aa: true,
            tc: false,
            rd: true,
            ra: false,
            z: 3,
            rcode: 5,
        };

        let decoded = DnsHeaderFlags::from_u16(flags.to_u16());
        assert_eq!(decoded, flags);
    }

    #[test]
    fn test_pack_flags_layout() {
        assert_eq!(pack_flags(false, 0, false, false, true, false, 0), 0x0100);
        assert_eq!(pack_flags(true, 0, false, false, true, true, 0), 0x8180);
        assert_eq!(pack_flags(true, 0xF, true, true, true, true, 0xF), 0xFF8F);
    }

    #[test]
    fn test_pack_unpack_flags_round_trip() {
        for opcode in 0..=0xF {
            for rcode in 0..=0xF {
                for bits in 0..32u8 {
                    let [qr, aa, tc, rd, ra] = [0, 1, 2, 3, 4].map(|i| bits >> i & 1 == 1);
                    let flags = unpack_flags(pack_flags(qr, opcode, aa, tc, rd, ra, rcode));
                    let unpacked = (
                        flags.qr,
                        flags.opcode,
                        flags.aa,
                        flags.tc,
                        flags.rd,
                        flags.ra,
                        flags.rcode,
                    );
                    assert_eq!(unpacked, (qr, opcode, aa, tc, rd, ra, rcode));
                    assert_eq!(flags.z, 0);
                }
            }
        }
    }

    #[test]
    fn test_header_round_trip_and_truncation() {
        let header = HeaderSection {
            id: 0xBEEF,
            flags: 0x8583,
            qd_count: 1,
            an_count: 2,
            ns_count: 3,
            ar_count: 4,
        };
        assert_eq!(HeaderSection::from_bytes(&header.to_bytes()), Ok(header));
        assert_eq!(
            HeaderSection::from_bytes(&[0u8; 11]),
            Err(DecodeQueryErrors::TruncatedHeader(11))
        );
        assert_eq!(header.response_code(), ResponseCode::NameError);
    }

    #[test]
    fn test_dns_message_new_query() {
        let msg = DnsMessage::new_query("example.com", RecordType::A, OpCodeOptions::StandardQuery);

        assert_eq!(msg.header.qd_count, 1);
        assert_eq!(msg.header.an_count, 0);
        assert_eq!(msg.header.ns_count, 0);
        assert_eq!(msg.header.ar_count, 0);
        assert!(msg.flags().rd);
        assert!(!msg.flags().qr);

        let question = msg.question().unwrap();
        assert_eq!(question.name, "example.com");
        assert_eq!(question.record_type, RecordType::A as u16);
        assert_eq!(question.class, 1);

        assert!(msg.answer.is_empty());
        assert!(msg.authority.is_empty());
        assert!(msg.additional.is_empty());
    }

    #[test]
    fn test_dns_message_encode_query() {
        let msg = DnsMessage::new_query("google.com", 2u16, OpCodeOptions::StandardQuery);
        let bytes = msg.encode_query().unwrap();

        assert_eq!(&bytes[0..2], &msg.header.id.to_be_bytes());
        assert_eq!(&bytes[2..12], &[0x01, 0x00, 0, 1, 0, 0, 0, 0, 0, 0]);
        assert_eq!(
            &bytes[12..],
            &[6, b'g', b'o', b'o', b'g', b'l', b'e', 3, b'c', b'o', b'm', 0, 0, 2, 0, 1]
        );
    }

    #[test]
    fn test_pack_query_rewrites_counts() {
        let header = HeaderSection {
            id: 7,
            flags: pack_flags(false, 0, false, false, true, false, 0),
            qd_count: 9,
            an_count: 9,
            ns_count: 9,
            ar_count: 9,
        };
        let question = QuestionSection {
            name: "example.com".to_string(),
            record_type: RecordType::Mx as u16,
            class: 1,
        };
        let bytes = pack_query(&header, &question).unwrap();
        let decoded = HeaderSection::from_bytes(&bytes).unwrap();
        assert_eq!((decoded.qd_count, decoded.an_count), (1, 0));
        assert_eq!((decoded.ns_count, decoded.ar_count), (0, 0));

        let too_long = QuestionSection {
            name: "a".repeat(64),
            ..question
        };
        assert!(matches!(
            pack_query(&header, &too_long),
            Err(CompressorErrors::LabelTooLong(_))
        ));
    }

    #[test]
    fn test_decode_own_query() {
        let msg =
            DnsMessage::new_query("example.com", RecordType::Txt, OpCodeOptions::StandardQuery);
        let decoded = DnsMessage::decode_query(&msg.encode_query().unwrap()).unwrap();
        assert_eq!(decoded, msg);
    }

    #[test]
    fn test_decode_a_record_response() {
        let mut bytes = response_prefix(1, 0, 0);
        push_record(&mut bytes, 1, 3600, &[0x5D, 0xB8, 0xD8, 0x22]);

        let msg = DnsMessage::decode_query(&bytes).unwrap();
        assert_eq!(msg.header.id, 0x1234);
        assert!(msg.flags().qr);
        assert_eq!(msg.response_code(), ResponseCode::NoError);
        assert_eq!(msg.question().unwrap().name, "example.com");

        assert_eq!(msg.answer.len(), 1);
        let record = &msg.answer[0];
        assert_eq!(record.owner_name, "example.com");
        assert_eq!(record.ttl, 3600);
        assert_eq!(record.rd_length, 4);
        assert_eq!(record.r_data, RData::A(Ipv4Addr::new(93, 184, 216, 34)));
    }

    #[test]
    fn test_unknown_type_next_to_a_record() {
        let mut bytes = response_prefix(2, 0, 0);
        push_record(&mut bytes, 0, 60, &[0xAA, 0xBB, 0xCC]);
        push_record(&mut bytes, 1, 60, &[10, 0, 0, 1]);

        let msg = DnsMessage::decode_query(&bytes).unwrap();
        assert_eq!(msg.answer.len(), 2);
        assert_eq!(msg.answer[0].record_type, 0);
        assert_eq!(msg.answer[0].r_data, RData::Opaque(vec![0xAA, 0xBB, 0xCC]));
        assert_eq!(msg.answer[1].r_data, RData::A(Ipv4Addr::new(10, 0, 0, 1)));
    }

    #[test]
    fn test_decode_all_sections_in_order() {
        let mut bytes = response_prefix(1, 1, 1);
        // answer: example.com CNAME www.example.com (compressed)
        push_record(&mut bytes, 5, 300, &[3, b'w', b'w', b'w', 0xC0, 0x0C]);
        // authority: example.com NS ns1.example.com
        push_record(&mut bytes, 2, 86400, &[3, b'n', b's', b'1', 0xC0, 0x0C]);
        // additional: example.com MX 10 example.com
        push_record(&mut bytes, 15, 300, &[0x00, 0x0A, 0xC0, 0x0C]);

        let msg = DnsMessage::decode_query(&bytes).unwrap();
        assert_eq!(msg.answer.len(), usize::from(msg.header.an_count));
        assert_eq!(msg.authority.len(), usize::from(msg.header.ns_count));
        assert_eq!(msg.additional.len(), usize::from(msg.header.ar_count));

        assert_eq!(msg.answer[0].r_data, RData::Cname("www.example.com".to_string()));
        assert_eq!(msg.authority[0].r_data, RData::Ns("ns1.example.com".to_string()));
        assert_eq!(
            msg.additional[0].r_data,
            RData::Mx {
                preference: 10,
                exchange: "example.com".to_string()
            }
        );
    }

    #[test]
    fn test_decode_tolerates_empty_question_section() {
        let header = HeaderSection {
            id: 1,
            flags: 0x8180,
            qd_count: 0,
            an_count: 0,
            ns_count: 0,
            ar_count: 0,
        };
        let msg = DnsMessage::decode_query(&header.to_bytes()).unwrap();
        assert!(msg.question().is_none());
    }

    #[test]
    fn test_decode_short_message() {
        assert_eq!(
            DnsMessage::decode_query(&[0u8; 5]),
            Err(DecodeQueryErrors::TruncatedMessage(5))
        );
    }

    #[test]
    fn test_decode_fails_when_records_are_missing() {
        // header announces two answers, only one present
        let mut bytes = response_prefix(2, 0, 0);
        push_record(&mut bytes, 1, 60, &[10, 0, 0, 1]);
        assert!(DnsMessage::decode_query(&bytes).is_err());
    }

    #[test]
    fn test_decode_fails_on_cut_rdata() {
        let mut bytes = response_prefix(1, 0, 0);
        push_record(&mut bytes, 1, 60, &[10, 0, 0, 1]);
        bytes.truncate(bytes.len() - 1);
        assert!(matches!(
            DnsMessage::decode_query(&bytes),
            Err(DecodeQueryErrors::TruncatedMessage(_))
        ));
    }

    #[test]
    fn test_decode_fails_on_bad_record_after_good_one() {
        let mut bytes = response_prefix(2, 0, 0);
        push_record(&mut bytes, 1, 60, &[10, 0, 0, 1]);
        push_record(&mut bytes, 1, 60, &[10, 0, 0]);
        assert_eq!(
            DnsMessage::decode_query(&bytes),
            Err(DecodeQueryErrors::BadRdLength {
                record_type: 1,
                rd_length: 3
            })
        );
    }

    #[test]
    fn test_decode_fails_on_pointer_loop_in_owner() {
        let mut bytes = response_prefix(1, 0, 0);
        let loop_at = bytes.len() as u8;
        bytes.extend_from_slice(&[0xC0, loop_at]);
        assert!(matches!(
            DnsMessage::decode_query(&bytes),
            Err(DecodeQueryErrors::Name(CompressorErrors::CompressionLoop(_)))
        ));
    }
}
