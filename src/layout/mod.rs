//! Layout engine: address-space model → character grid
//!
//! Each segment that holds data becomes one [`MapBlock`]. A block covers the
//! segment from its lowest to its highest programmed address, rounded out to
//! whole cells measured from the segment base, and is cut into lines of
//! `cells_per_line` cells.
//!
//! # Cell Alignment
//!
//! A cell must never straddle the end of a 64 KB segment window, so
//! `bytes_per_cell` has to divide `0x10000` evenly. Any other value is a
//! [`LayoutError::MisalignedCell`]; the engine refuses to draw a grid whose
//! last cell would mix two segments.
//!
//! ```text
//! Segment 0x0000 [0x000000-0x00ffff]: 19 bytes used
//! 0x000000  ▓▓▓▓▓
//! ```

pub mod grid;

pub use grid::{CellState, Glyphs, MapBlock, MapLine};

use crate::constants::{DEFAULT_BYTES_PER_CELL, DEFAULT_CELLS_PER_LINE, SEGMENT_WINDOW};
use crate::memory::{Address, AddressSpace, Segment};
use thiserror::Error;

/// Grid geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutConfig {
    pub bytes_per_cell: u32,
    pub cells_per_line: usize,
    pub glyphs: Glyphs,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        LayoutConfig {
            bytes_per_cell: DEFAULT_BYTES_PER_CELL,
            cells_per_line: DEFAULT_CELLS_PER_LINE,
            glyphs: Glyphs::default(),
        }
    }
}

impl LayoutConfig {
    /// Check the parts of the configuration that do not depend on the model
    pub fn validate(&self) -> Result<(), LayoutError> {
        if self.bytes_per_cell == 0 {
            return Err(LayoutError::InvalidConfig(
                "bytes per cell must be at least 1".to_string(),
            ));
        }
        if self.cells_per_line == 0 {
            return Err(LayoutError::InvalidConfig(
                "cells per line must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Errors that stop a render
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("invalid layout configuration: {0}")]
    InvalidConfig(String),

    #[error(
        "{bytes_per_cell} bytes per cell does not divide segment {segment_base:#07x} \
         (span {span_start:#07x}..{span_end:#07x}) into whole cells"
    )]
    MisalignedCell {
        segment_base: Address,
        bytes_per_cell: u32,
        span_start: Address,
        span_end: Address,
    },
}

/// Lay out every segment that holds data, in appearance order
pub fn layout(space: &AddressSpace, config: &LayoutConfig) -> Result<Vec<MapBlock>, LayoutError> {
    config.validate()?;

    let mut blocks = Vec::new();
    for segment in space {
        if let Some(block) = layout_segment(segment, config)? {
            blocks.push(block);
        }
    }
    Ok(blocks)
}

/// Render the model as printable lines.
///
/// Each block contributes its header and map lines; blocks are separated by
/// one empty line.
pub fn render(space: &AddressSpace, config: &LayoutConfig) -> Result<Vec<String>, LayoutError> {
    let blocks = layout(space, config)?;
    Ok(blocks_to_lines(&blocks, &config.glyphs))
}

/// Flatten laid-out blocks into printable lines
pub fn blocks_to_lines(blocks: &[MapBlock], glyphs: &Glyphs) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, block) in blocks.iter().enumerate() {
        if i > 0 {
            lines.push(String::new());
        }
        lines.extend(block.to_text_lines(glyphs));
    }
    lines
}

/// Lay out one segment; `None` if it holds no data
pub fn layout_segment(
    segment: &Segment,
    config: &LayoutConfig,
) -> Result<Option<MapBlock>, LayoutError> {
    let extents = segment.extents();
    let (Some(lowest), Some(highest_end)) = (extents.lowest(), extents.highest_end()) else {
        return Ok(None);
    };

    let base = segment.base();
    let cell = config.bytes_per_cell;

    // Offsets from the segment base, rounded out to whole cells
    let first_offset = (lowest - base) / cell * cell;
    let end_offset = (highest_end - base).div_ceil(cell) as u64 * cell as u64;

    if SEGMENT_WINDOW % cell != 0 || end_offset > SEGMENT_WINDOW as u64 {
        return Err(LayoutError::MisalignedCell {
            segment_base: base,
            bytes_per_cell: cell,
            span_start: base + first_offset,
            span_end: (base as u64 + end_offset) as Address,
        });
    }

    let span_start = base + first_offset;
    let span_end = base + end_offset as Address;

    let cells: Vec<CellState> = (span_start..span_end)
        .step_by(cell as usize)
        .map(|addr| {
            if extents.intersects(addr, addr + cell) {
                CellState::Occupied
            } else {
                CellState::Free
            }
        })
        .collect();

    let lines = cells
        .chunks(config.cells_per_line)
        .enumerate()
        .map(|(i, chunk)| MapLine {
            address: span_start + (i * config.cells_per_line) as u32 * cell,
            cells: chunk.to_vec(),
        })
        .collect();

    Ok(Some(MapBlock {
        segment_base: base,
        window_end: segment.window_end(),
        span_start,
        span_end,
        bytes_per_cell: cell,
        occupied_bytes: segment.occupied_bytes(),
        lines,
    }))
}
