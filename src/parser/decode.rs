//! Line decoder for Intel HEX text
//!
//! [`decode`] turns one line into a [`Record`] or a [`DecodeError`]. Every
//! rejected line is dropped by [`decode_lines`]; nothing malformed reaches the
//! address-space builder.

use super::record::{checksum, Record, RecordType};
use thiserror::Error;
use tracing::debug;

/// Start marker of every record line
pub const START_CODE: char = ':';

/// Byte count + 2 address bytes + type + checksum
const MIN_FRAME_BYTES: usize = 5;

/// Reasons a line is rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("empty line")]
    Empty,

    #[error("line does not start with ':'")]
    MissingStartCode,

    #[error("odd number of hex digits ({0})")]
    OddLength(usize),

    #[error("invalid hex digit '{character}' at column {column}")]
    InvalidDigit { character: char, column: usize },

    #[error("record too short: {0} bytes")]
    TooShort(usize),

    #[error("byte count {declared} does not match {actual} payload bytes")]
    LengthMismatch { declared: usize, actual: usize },

    #[error("checksum mismatch: expected 0x{expected:02X}, found 0x{found:02X}")]
    ChecksumMismatch { expected: u8, found: u8 },

    #[error("{0} record must carry {1} bytes")]
    InvalidPayloadLength(RecordType, usize),

    #[error("{0}")]
    UnknownType(RecordType),
}

/// Decode a single line
pub fn decode(line: &str) -> Result<Record, DecodeError> {
    let line = line.trim();
    if line.is_empty() {
        return Err(DecodeError::Empty);
    }

    let digits = line
        .strip_prefix(START_CODE)
        .ok_or(DecodeError::MissingStartCode)?;
    if digits.len() % 2 != 0 {
        return Err(DecodeError::OddLength(digits.len()));
    }

    let bytes = hex_to_bytes(digits)?;
    if bytes.len() < MIN_FRAME_BYTES {
        return Err(DecodeError::TooShort(bytes.len()));
    }

    let declared = bytes[0] as usize;
    let actual = bytes.len() - MIN_FRAME_BYTES;
    if declared != actual {
        return Err(DecodeError::LengthMismatch { declared, actual });
    }

    let (header, rest) = bytes.split_at(4);
    let (payload, check) = rest.split_at(declared);
    let found = check[0];
    let expected = checksum(header, payload);
    if expected != found {
        return Err(DecodeError::ChecksumMismatch { expected, found });
    }

    let record_type = RecordType::from(header[3]);
    if let RecordType::Unknown(_) = record_type {
        return Err(DecodeError::UnknownType(record_type));
    }
    if let Some(required) = record_type.fixed_payload_len() {
        if payload.len() != required {
            return Err(DecodeError::InvalidPayloadLength(record_type, required));
        }
    }

    Ok(Record {
        record_type,
        load_offset: u16::from_be_bytes([header[1], header[2]]),
        payload: payload.to_vec(),
        checksum: found,
    })
}

/// Decode a sequence of lines in file order, dropping rejected ones.
///
/// Blank lines are skipped without a log entry; every other rejection is
/// logged at `debug` with its 1-based line number.
pub fn decode_lines<'a, I>(lines: I) -> impl Iterator<Item = Record> + 'a
where
    I: IntoIterator<Item = &'a str>,
    I::IntoIter: 'a,
{
    lines
        .into_iter()
        .enumerate()
        .filter_map(|(index, line)| match decode(line) {
            Ok(record) => Some(record),
            Err(DecodeError::Empty) => None,
            Err(e) => {
                debug!(line = index + 1, error = %e, "skipping line");
                None
            }
        })
}

fn hex_to_bytes(digits: &str) -> Result<Vec<u8>, DecodeError> {
    let mut bytes = Vec::with_capacity(digits.len() / 2);
    let mut high: Option<u8> = None;

    for (i, c) in digits.chars().enumerate() {
        let nibble = c.to_digit(16).ok_or(DecodeError::InvalidDigit {
            character: c,
            column: i + 2, // 1-based, after the start code
        })? as u8;

        match high.take() {
            Some(h) => bytes.push((h << 4) | nibble),
            None => high = Some(nibble),
        }
    }

    Ok(bytes)
}
