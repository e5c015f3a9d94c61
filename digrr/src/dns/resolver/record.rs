//! # Resource records
//!
//! All RRs (resource records) share the same top level format (RFC 1035 §4.1.3):
//!
//! ```text
//!   +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
//!   /                      NAME                     /
//!   +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
//!   |                      TYPE                     |
//!   +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
//!   |                     CLASS                     |
//!   +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
//!   |                      TTL                      |
//!   |                                               |
//!   +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
//!   |                   RDLENGTH                    |
//!   +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--|
//!   /                     RDATA                     /
//!   +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
//! ```
//!
//! The RDATA grammar depends on TYPE. Every supported type registers one decoder in a
//! static registry keyed by type code; any other type code is kept verbatim as
//! [`RData::Opaque`], so a new record type never breaks the decoding of the rest of a
//! message.

use super::message::{DecodeQueryErrors, read_u16, read_u32};
use crate::dns::compressor::decode_name;
use std::fmt::{self, Display};
use std::net::{Ipv4Addr, Ipv6Addr};
use std::str::FromStr;
use tracing::trace;

#[cfg(feature = "serde")]
use serde::Serialize;

/// TYPE and QTYPE values (RFC 1035 §3.2.2, §3.2.3, RFC 3596, RFC 2782).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum RecordType {
    // A host address
    A = 1,
    // An authoritative name server
    Ns = 2,
    // A mail destination (obsolete, use MX)
    Md = 3,
    // A mail forwarder (obsolete, use MX)
    Mf = 4,
    // The Canonical name for an alias
    Cname = 5,
    // Marks the start of a zone of authority
    Soa = 6,
    // A mailbox domain name (experimental)
    Mb = 7,
    // A mail group member (experimental)
    Mg = 8,
    // A mail rename domain name (experimental)
    Mr = 9,
    // A null RR (experimental)
    Null = 10,
    // A well known service description
    Wks = 11,
    // A domain name pointer
    Ptr = 12,
    // Host information
    Hinfo = 13,
    // Mailbox or mail list information
    Minfo = 14,
    // Mail exchange
    Mx = 15,
    // Text strings
    Txt = 16,
    // IPv6 host address
    Aaaa = 28,
    // Service location (RFC 2782)
    Srv = 33,
    // QTYPE only: zone transfer
    Axfr = 252,
    // QTYPE only: mailbox-related records (MB, MG or MR)
    Mailb = 253,
    // QTYPE only: mail agent RRs (obsolete, see MX)
    Maila = 254,
    // QTYPE only: all records
    Any = 255,
}

impl RecordType {
    const ALL: [RecordType; 22] = [
        RecordType::A,
        RecordType::Ns,
        RecordType::Md,
        RecordType::Mf,
        RecordType::Cname,
        RecordType::Soa,
        RecordType::Mb,
        RecordType::Mg,
        RecordType::Mr,
        RecordType::Null,
        RecordType::Wks,
        RecordType::Ptr,
        RecordType::Hinfo,
        RecordType::Minfo,
        RecordType::Mx,
        RecordType::Txt,
        RecordType::Aaaa,
        RecordType::Srv,
        RecordType::Axfr,
        RecordType::Mailb,
        RecordType::Maila,
        RecordType::Any,
    ];

    /// Looks up a known type code.
    pub fn from_u16(code: u16) -> Option<RecordType> {
        Self::ALL.into_iter().find(|rt| *rt as u16 == code)
    }

    /// Encode the record type as a 2-byte big-endian value.
    pub fn to_bytes(self) -> [u8; 2] {
        (self as u16).to_be_bytes()
    }

    /// The presentation mnemonic (`"A"`, `"MX"`, ...).
    pub fn mnemonic(self) -> &'static str {
        match self {
            RecordType::A => "A",
            RecordType::Ns => "NS",
            RecordType::Md => "MD",
            RecordType::Mf => "MF",
            RecordType::Cname => "CNAME",
            RecordType::Soa => "SOA",
            RecordType::Mb => "MB",
            RecordType::Mg => "MG",
            RecordType::Mr => "MR",
            RecordType::Null => "NULL",
            RecordType::Wks => "WKS",
            RecordType::Ptr => "PTR",
            RecordType::Hinfo => "HINFO",
            RecordType::Minfo => "MINFO",
            RecordType::Mx => "MX",
            RecordType::Txt => "TXT",
            RecordType::Aaaa => "AAAA",
            RecordType::Srv => "SRV",
            RecordType::Axfr => "AXFR",
            RecordType::Mailb => "MAILB",
            RecordType::Maila => "MAILA",
            RecordType::Any => "ANY",
        }
    }
}

impl From<RecordType> for u16 {
    fn from(value: RecordType) -> Self {
        value as u16
    }
}

impl Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

/// Error returned when a string is neither a known mnemonic nor a numeric type code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown record type: {0}")]
pub struct UnknownRecordType(pub String);

/// Parses a mnemonic (`"mx"`, case-insensitive) into its type code.
///
/// Plain numbers and the RFC 3597 `TYPE<n>` form are accepted for codes without a mnemonic.
pub fn parse_record_type(s: &str) -> Result<u16, UnknownRecordType> {
    if let Ok(rt) = s.parse::<RecordType>() {
        return Ok(rt.into());
    }
    let digits = s
        .strip_prefix("TYPE")
        .or_else(|| s.strip_prefix("type"))
        .unwrap_or(s);
    digits
        .parse::<u16>()
        .map_err(|_| UnknownRecordType(s.to_string()))
}

impl FromStr for RecordType {
    type Err = UnknownRecordType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|rt| rt.mnemonic().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownRecordType(s.to_string()))
    }
}

/// CLASS and QCLASS values (RFC 1035 §3.2.4, §3.2.5).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum RecordClass {
    // The Internet
    In = 1,
    // The CSNET class (obsolete)
    Cs = 2,
    // The CHAOS class
    Ch = 3,
    // Hesiod
    Hs = 4,
    // QCLASS only: any class
    Any = 255,
}

impl RecordClass {
    /// Looks up a known class code.
    pub fn from_u16(code: u16) -> Option<RecordClass> {
        match code {
            1 => Some(RecordClass::In),
            2 => Some(RecordClass::Cs),
            3 => Some(RecordClass::Ch),
            4 => Some(RecordClass::Hs),
            255 => Some(RecordClass::Any),
            _ => None,
        }
    }

    pub fn mnemonic(self) -> &'static str {
        match self {
            RecordClass::In => "IN",
            RecordClass::Cs => "CS",
            RecordClass::Ch => "CH",
            RecordClass::Hs => "HS",
            RecordClass::Any => "ANY",
        }
    }
}

impl From<RecordClass> for u16 {
    fn from(value: RecordClass) -> Self {
        value as u16
    }
}

/// Type specific payload of a resource record.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum RData {
    A(Ipv4Addr),
    Ns(String),
    Md(String),
    Mf(String),
    Cname(String),
    Soa {
        /// Primary name server of the zone.
        mname: String,
        /// Mailbox of the person responsible for the zone.
        rname: String,
        serial: u32,
        refresh: u32,
        retry: u32,
        expire: u32,
        minimum: u32,
    },
    Wks {
        address: Ipv4Addr,
        protocol: u8,
        bitmap: Vec<u8>,
    },
    Mb(String),
    Mg(String),
    Mr(String),
    Ptr(String),
    Hinfo {
        cpu: String,
        os: String,
    },
    Minfo {
        rmailbx: String,
        emailbx: String,
    },
    Mx {
        preference: u16,
        exchange: String,
    },
    /// Every character-string of the record, in wire order.
    Txt(Vec<String>),
    Aaaa(Ipv6Addr),
    Srv {
        priority: u16,
        weight: u16,
        port: u16,
        /// Host providing the service.
        target: String,
    },
    /// RDATA of a type without a registered decoder, kept verbatim.
    Opaque(Vec<u8>),
}

impl Display for RData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RData::A(address) => write!(f, "{address}"),
            RData::Aaaa(address) => write!(f, "{address}"),
            RData::Ns(name)
            | RData::Md(name)
            | RData::Mf(name)
            | RData::Cname(name)
            | RData::Mb(name)
            | RData::Mg(name)
            | RData::Mr(name)
            | RData::Ptr(name) => write!(f, "{name}"),
            RData::Soa {
                mname,
                rname,
                serial,
                refresh,
                retry,
                expire,
                minimum,
            } => write!(
                f,
                "{mname} {rname} {serial} {refresh} {retry} {expire} {minimum}"
            ),
            RData::Wks {
                address,
                protocol,
                bitmap,
            } => write!(f, "{address} {protocol} {}", hex(bitmap)),
            RData::Hinfo { cpu, os } => write!(f, "{cpu:?} {os:?}"),
            RData::Minfo { rmailbx, emailbx } => write!(f, "{rmailbx} {emailbx}"),
            RData::Mx {
                preference,
                exchange,
            } => write!(f, "{preference} {exchange}"),
            RData::Srv {
                priority,
                weight,
                port,
                target,
            } => write!(f, "{priority} {weight} {port} {target}"),
            RData::Txt(segments) => {
                let quoted: Vec<String> = segments.iter().map(|s| format!("{s:?}")).collect();
                f.write_str(&quoted.join(" "))
            }
            // RFC 3597 generic encoding
            RData::Opaque(bytes) => write!(f, "\\# {} {}", bytes.len(), hex(bytes)),
        }
    }
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// A single resource record of the answer, authority or additional section.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ResourceRecord {
    /// The domain name that owns this record.
    pub owner_name: String,
    /// The TYPE code, see [`RecordType`].
    pub record_type: u16,
    /// The CLASS code, see [`RecordClass`].
    pub class: u16,
    /// Time-to-live of the record in seconds.
    pub ttl: i32,
    /// Length of the RDATA field on the wire.
    pub rd_length: u16,
    pub r_data: RData,
}

impl ResourceRecord {
    /// The record type, if it is one of the known codes.
    pub fn kind(&self) -> Option<RecordType> {
        RecordType::from_u16(self.record_type)
    }

    /// Decodes one record starting at `offset` and returns it with the offset of the next one.
    pub(crate) fn decode(
        bytes: &[u8],
        offset: usize,
    ) -> Result<(ResourceRecord, usize), DecodeQueryErrors> {
        let (owner_name, next) = decode_name(bytes, offset)?;

        let truncated = DecodeQueryErrors::TruncatedMessage(next);
        let record_type = read_u16(bytes, next).ok_or(truncated.clone())?;
        let class = read_u16(bytes, next + 2).ok_or(truncated.clone())?;
        let ttl = read_u32(bytes, next + 4).ok_or(truncated.clone())? as i32;
        let rd_length = read_u16(bytes, next + 8).ok_or(truncated)?;

        let rdata_offset = next + 10;
        let r_data = decode_rdata(bytes, rdata_offset, rd_length, record_type)?;

        let record = ResourceRecord {
            owner_name,
            record_type,
            class,
            ttl,
            rd_length,
            r_data,
        };
        Ok((record, rdata_offset + usize::from(rd_length)))
    }
}

impl Display for ResourceRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let class = match RecordClass::from_u16(self.class) {
            Some(class) => class.mnemonic().to_string(),
            None => format!("CLASS{}", self.class),
        };
        let record_type = match self.kind() {
            Some(rt) => rt.mnemonic().to_string(),
            None => format!("TYPE{}", self.record_type),
        };
        write!(
            f,
            "{}\t{}\t{}\t{}\t{}",
            self.owner_name, self.ttl, class, record_type, self.r_data
        )
    }
}

/// Decodes the RDATA of one record: `(message, rdata offset, RDLENGTH) -> payload`.
///
/// Decoders receive the whole message so compressed names can follow their pointers.
pub(crate) type RDataDecoder = fn(&[u8], usize, u16) -> Result<RData, DecodeQueryErrors>;

/// Type code to decoder registry. Supporting a new record type means adding one entry.
pub(crate) static DECODERS: &[(RecordType, RDataDecoder)] = &[
    (RecordType::A, decode_a),
    (RecordType::Ns, decode_ns),
    (RecordType::Md, decode_md),
    (RecordType::Mf, decode_mf),
    (RecordType::Cname, decode_cname),
    (RecordType::Soa, decode_soa),
    (RecordType::Mb, decode_mb),
    (RecordType::Mg, decode_mg),
    (RecordType::Mr, decode_mr),
    (RecordType::Wks, decode_wks),
    (RecordType::Ptr, decode_ptr),
    (RecordType::Hinfo, decode_hinfo),
    (RecordType::Minfo, decode_minfo),
    (RecordType::Mx, decode_mx),
    (RecordType::Txt, decode_txt),
    (RecordType::Aaaa, decode_aaaa),
    (RecordType::Srv, decode_srv),
];

/// Returns the registered decoder for `code`.
pub(crate) fn decoder_for(code: u16) -> Option<RDataDecoder> {
    DECODERS
        .iter()
        .find(|(rt, _)| *rt as u16 == code)
        .map(|(_, decoder)| *decoder)
}

/// Decodes exactly `rd_length` octets of RDATA at `offset` according to `record_type`.
///
/// Unknown types never fail: their RDATA is returned as [`RData::Opaque`].
pub fn decode_rdata(
    bytes: &[u8],
    offset: usize,
    rd_length: u16,
    record_type: u16,
) -> Result<RData, DecodeQueryErrors> {
    let end = offset + usize::from(rd_length);
    if end > bytes.len() {
        return Err(DecodeQueryErrors::TruncatedMessage(offset));
    }

    match decoder_for(record_type) {
        Some(decode) => decode(bytes, offset, rd_length),
        None => {
            trace!(record_type, rd_length, "keeping RDATA of unsupported type as opaque");
            Ok(RData::Opaque(bytes[offset..end].to_vec()))
        }
    }
}

fn bad_length(record_type: RecordType, rd_length: u16) -> DecodeQueryErrors {
    DecodeQueryErrors::BadRdLength {
        record_type: record_type as u16,
        rd_length,
    }
}

fn decode_a(bytes: &[u8], offset: usize, rd_length: u16) -> Result<RData, DecodeQueryErrors> {
    let octets: [u8; 4] = bytes[offset..offset + usize::from(rd_length)]
        .try_into()
        .map_err(|_| bad_length(RecordType::A, rd_length))?;
    Ok(RData::A(Ipv4Addr::from(octets)))
}

fn decode_aaaa(bytes: &[u8], offset: usize, rd_length: u16) -> Result<RData, DecodeQueryErrors> {
    let octets: [u8; 16] = bytes[offset..offset + usize::from(rd_length)]
        .try_into()
        .map_err(|_| bad_length(RecordType::Aaaa, rd_length))?;
    Ok(RData::Aaaa(Ipv6Addr::from(octets)))
}

// The encoded name may be shorter than RDLENGTH suggests once compression is involved.
fn decode_ns(bytes: &[u8], offset: usize, _rd_length: u16) -> Result<RData, DecodeQueryErrors> {
    Ok(RData::Ns(decode_name(bytes, offset)?.0))
}

fn decode_cname(bytes: &[u8], offset: usize, _rd_length: u16) -> Result<RData, DecodeQueryErrors> {
    Ok(RData::Cname(decode_name(bytes, offset)?.0))
}

fn decode_ptr(bytes: &[u8], offset: usize, _rd_length: u16) -> Result<RData, DecodeQueryErrors> {
    Ok(RData::Ptr(decode_name(bytes, offset)?.0))
}

fn decode_md(bytes: &[u8], offset: usize, _rd_length: u16) -> Result<RData, DecodeQueryErrors> {
    Ok(RData::Md(decode_name(bytes, offset)?.0))
}

fn decode_mf(bytes: &[u8], offset: usize, _rd_length: u16) -> Result<RData, DecodeQueryErrors> {
    Ok(RData::Mf(decode_name(bytes, offset)?.0))
}

fn decode_mb(bytes: &[u8], offset: usize, _rd_length: u16) -> Result<RData, DecodeQueryErrors> {
    Ok(RData::Mb(decode_name(bytes, offset)?.0))
}

fn decode_mg(bytes: &[u8], offset: usize, _rd_length: u16) -> Result<RData, DecodeQueryErrors> {
    Ok(RData::Mg(decode_name(bytes, offset)?.0))
}

fn decode_mr(bytes: &[u8], offset: usize, _rd_length: u16) -> Result<RData, DecodeQueryErrors> {
    Ok(RData::Mr(decode_name(bytes, offset)?.0))
}

fn decode_srv(bytes: &[u8], offset: usize, rd_length: u16) -> Result<RData, DecodeQueryErrors> {
    if rd_length < 6 {
        return Err(bad_length(RecordType::Srv, rd_length));
    }
    let field =
        |i: usize| read_u16(bytes, offset + 2 * i).ok_or(bad_length(RecordType::Srv, rd_length));
    let (target, _) = decode_name(bytes, offset + 6)?;
    Ok(RData::Srv {
        priority: field(0)?,
        weight: field(1)?,
        port: field(2)?,
        target,
    })
}

fn decode_soa(bytes: &[u8], offset: usize, rd_length: u16) -> Result<RData, DecodeQueryErrors> {
    let end = offset + usize::from(rd_length);
    let (mname, next) = decode_name(bytes, offset)?;
    let (rname, next) = decode_name(bytes, next)?;

    if next + 20 > end {
        return Err(bad_length(RecordType::Soa, rd_length));
    }

    let field =
        |i: usize| read_u32(bytes, next + 4 * i).ok_or(bad_length(RecordType::Soa, rd_length));
    Ok(RData::Soa {
        mname,
        rname,
        serial: field(0)?,
        refresh: field(1)?,
        retry: field(2)?,
        expire: field(3)?,
        minimum: field(4)?,
    })
}

fn decode_mx(bytes: &[u8], offset: usize, rd_length: u16) -> Result<RData, DecodeQueryErrors> {
    if rd_length < 2 {
        return Err(bad_length(RecordType::Mx, rd_length));
    }
    let preference = read_u16(bytes, offset).ok_or(bad_length(RecordType::Mx, rd_length))?;
    let (exchange, _) = decode_name(bytes, offset + 2)?;
    Ok(RData::Mx {
        preference,
        exchange,
    })
}

fn decode_minfo(bytes: &[u8], offset: usize, _rd_length: u16) -> Result<RData, DecodeQueryErrors> {
    let (rmailbx, next) = decode_name(bytes, offset)?;
    let (emailbx, _) = decode_name(bytes, next)?;
    Ok(RData::Minfo { rmailbx, emailbx })
}

fn decode_wks(bytes: &[u8], offset: usize, rd_length: u16) -> Result<RData, DecodeQueryErrors> {
    let rdata = &bytes[offset..offset + usize::from(rd_length)];
    if rdata.len() < 5 {
        return Err(bad_length(RecordType::Wks, rd_length));
    }
    Ok(RData::Wks {
        address: Ipv4Addr::new(rdata[0], rdata[1], rdata[2], rdata[3]),
        protocol: rdata[4],
        bitmap: rdata[5..].to_vec(),
    })
}

fn decode_txt(bytes: &[u8], offset: usize, rd_length: u16) -> Result<RData, DecodeQueryErrors> {
    let rdata = &bytes[offset..offset + usize::from(rd_length)];
    let segments = character_strings(rdata).ok_or(bad_length(RecordType::Txt, rd_length))?;
    Ok(RData::Txt(segments))
}

fn decode_hinfo(bytes: &[u8], offset: usize, rd_length: u16) -> Result<RData, DecodeQueryErrors> {
    let rdata = &bytes[offset..offset + usize::from(rd_length)];
    match character_strings(rdata).as_deref() {
        Some([cpu, os]) => Ok(RData::Hinfo {
            cpu: cpu.clone(),
            os: os.clone(),
        }),
        _ => Err(bad_length(RecordType::Hinfo, rd_length)),
    }
}

/// Splits RDATA into `<length><octets>` character-strings.
///
/// Returns `None` when a segment's declared length overruns the RDATA.
fn character_strings(rdata: &[u8]) -> Option<Vec<String>> {
    let mut segments = Vec::new();
    let mut cursor = 0;

    while cursor < rdata.len() {
        let len = usize::from(rdata[cursor]);
        let segment = rdata.get(cursor + 1..cursor + 1 + len)?;
        segments.push(String::from_utf8_lossy(segment).into_owned());
        cursor += 1 + len;
    }

    Some(segments)
}
