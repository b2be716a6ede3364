//! Intel HEX record parser
//!
//! This module turns the text of a HEX file into typed records:
//! - [`record`]: [`Record`] and [`RecordType`] definitions, checksum arithmetic
//! - [`decode`]: line decoding and validation (text → records)
//!
//! # Rejection Policy
//!
//! Any line that fails structural validation, carries a bad checksum, or has an
//! unrecognized type is dropped. Decoding never aborts the run; the caller only
//! ever sees records that passed every check.

pub mod decode;
pub mod record;

pub use decode::{decode, decode_lines, DecodeError};
pub use record::{Record, RecordType};
