//! Intel HEX record definitions
//!
//! A [`Record`] is the typed form of one `:LLAAAATT<data>CC` line. Records are
//! produced by [`decode`](super::decode::decode) and consumed immediately by the
//! address-space builder.

use std::fmt;
use std::fmt::Write as _;

/// Record type field (the `TT` byte of a line)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordType {
    Data,
    EndOfFile,
    ExtendedSegmentAddress,
    StartSegmentAddress,
    ExtendedLinearAddress, // Recognized, has no effect on the map
    StartLinearAddress,
    Unknown(u8),
}

impl RecordType {
    /// The numeric code written in the type field
    pub fn code(self) -> u8 {
        match self {
            RecordType::Data => 0x00,
            RecordType::EndOfFile => 0x01,
            RecordType::ExtendedSegmentAddress => 0x02,
            RecordType::StartSegmentAddress => 0x03,
            RecordType::ExtendedLinearAddress => 0x04,
            RecordType::StartLinearAddress => 0x05,
            RecordType::Unknown(code) => code,
        }
    }

    /// Payload length required by the record type, if it has a fixed one
    pub fn fixed_payload_len(self) -> Option<usize> {
        match self {
            RecordType::EndOfFile => Some(0),
            RecordType::ExtendedSegmentAddress | RecordType::ExtendedLinearAddress => Some(2),
            RecordType::StartSegmentAddress | RecordType::StartLinearAddress => Some(4),
            RecordType::Data | RecordType::Unknown(_) => None,
        }
    }
}

impl From<u8> for RecordType {
    fn from(code: u8) -> Self {
        match code {
            0x00 => RecordType::Data,
            0x01 => RecordType::EndOfFile,
            0x02 => RecordType::ExtendedSegmentAddress,
            0x03 => RecordType::StartSegmentAddress,
            0x04 => RecordType::ExtendedLinearAddress,
            0x05 => RecordType::StartLinearAddress,
            other => RecordType::Unknown(other),
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordType::Data => write!(f, "Data"),
            RecordType::EndOfFile => write!(f, "End Of File"),
            RecordType::ExtendedSegmentAddress => write!(f, "Extended Segment Address"),
            RecordType::StartSegmentAddress => write!(f, "Start Segment Address"),
            RecordType::ExtendedLinearAddress => write!(f, "Extended Linear Address"),
            RecordType::StartLinearAddress => write!(f, "Start Linear Address"),
            RecordType::Unknown(code) => write!(f, "unknown type 0x{:02X}", code),
        }
    }
}

/// One decoded line of an Intel HEX file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub record_type: RecordType,
    pub load_offset: u16,
    pub payload: Vec<u8>,
    pub checksum: u8,
}

impl Record {
    /// Build a record and compute its checksum from the other fields
    pub fn new(record_type: RecordType, load_offset: u16, payload: Vec<u8>) -> Self {
        let checksum = checksum(&header_bytes(record_type, load_offset, payload.len()), &payload);
        Record {
            record_type,
            load_offset,
            payload,
            checksum,
        }
    }

    /// Number of payload bytes (the `LL` field)
    pub fn byte_count(&self) -> usize {
        self.payload.len()
    }

    /// Whether the stored checksum matches the record contents
    pub fn checksum_valid(&self) -> bool {
        let header = header_bytes(self.record_type, self.load_offset, self.payload.len());
        checksum(&header, &self.payload) == self.checksum
    }

    /// The 16-bit value carried by an address record (ESA / ELA), big-endian
    pub fn address_value(&self) -> Option<u16> {
        match self.record_type {
            RecordType::ExtendedSegmentAddress | RecordType::ExtendedLinearAddress => {
                match self.payload.as_slice() {
                    [hi, lo] => Some(u16::from_be_bytes([*hi, *lo])),
                    _ => None,
                }
            }
            _ => None,
        }
    }

    /// Re-encode the record as a canonical uppercase HEX line
    pub fn encode(&self) -> String {
        let mut line = String::with_capacity(11 + self.payload.len() * 2);
        line.push(':');
        let header = header_bytes(self.record_type, self.load_offset, self.payload.len());
        for byte in header.iter().chain(self.payload.iter()) {
            let _ = write!(line, "{:02X}", byte);
        }
        let _ = write!(line, "{:02X}", self.checksum);
        line
    }
}

fn header_bytes(record_type: RecordType, load_offset: u16, len: usize) -> [u8; 4] {
    let [hi, lo] = load_offset.to_be_bytes();
    [len as u8, hi, lo, record_type.code()]
}

/// Two's complement of the byte sum of header and payload, modulo 256
pub fn checksum(header: &[u8], payload: &[u8]) -> u8 {
    let sum = header
        .iter()
        .chain(payload.iter())
        .fold(0u8, |acc, &b| acc.wrapping_add(b));
    sum.wrapping_neg()
}
