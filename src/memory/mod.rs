//! Address-space model for a HEX image
//!
//! This module provides the occupancy model built from decoded records:
//! - [`extent`]: sorted, merged `[start, end)` ranges of programmed bytes
//! - [`segment`]: 64 KB segments and the appearance-ordered [`AddressSpace`]
//! - [`builder`]: the record fold that fills the model
//!
//! # Addressing
//!
//! All addresses are absolute 20-bit values (plus the small overflow a
//! segment based near the top of the range can reach):
//! ```text
//! absolute = (ESA value << 4) + load offset
//! ```
//! A segment spans `[base, base + 0x10000)`; data never leaves its segment.

pub mod builder;
pub mod extent;
pub mod segment;

/// Absolute byte address
pub type Address = u32;

pub use builder::{apply_record, build, BuildOptions, BuildOutcome, BuildState, SkipReason, SkippedRecord};
pub use extent::{Extent, ExtentSet};
pub use segment::{AddressSpace, Segment};
