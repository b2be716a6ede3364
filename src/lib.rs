//! # Introduction
//!
//! hexmap reads an Intel HEX firmware image and draws a map of which
//! addresses hold data and which are free, so the space left in a small
//! flash part can be checked at a glance.
//!
//! ## Pipeline
//!
//! ```text
//! Lines → Decoder → Records → Builder → AddressSpace → Layout → Map lines
//! ```
//!
//! 1. [`parser`] — decodes and validates each line; bad lines are dropped.
//! 2. [`memory`] — folds records into per-segment extent sets, tracking the
//!    current Extended Segment Address base.
//! 3. [`layout`] — compresses each segment into a grid of cells, one glyph
//!    per `bytes_per_cell` addresses.
//! 4. [`ui`] — ratatui viewer for scrolling large maps; not part of the
//!    stable library API.
//!
//! ## Supported records
//!
//! Data, End Of File and Extended Segment Address shape the map. Start
//! Segment Address, Start Linear Address and Extended Linear Address are
//! accepted and ignored.

pub mod constants;
pub mod layout;
pub mod memory;
pub mod parser;
pub mod ui;

use memory::{BuildOptions, BuildOutcome};

/// Decode `text` line by line and build the address-space model
pub fn build_from_text(text: &str, options: &BuildOptions) -> BuildOutcome {
    memory::build(parser::decode_lines(text.lines()), options)
}
