//! Grid types produced by the layout engine

use crate::memory::Address;
use std::fmt::Write as _;

/// Glyph pair used to draw cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyphs {
    pub occupied: char,
    pub free: char,
}

impl Default for Glyphs {
    fn default() -> Self {
        Glyphs {
            occupied: crate::constants::GLYPH_OCCUPIED,
            free: crate::constants::GLYPH_FREE,
        }
    }
}

/// Occupancy of one cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellState {
    Occupied,
    Free,
}

impl CellState {
    pub fn glyph(self, glyphs: &Glyphs) -> char {
        match self {
            CellState::Occupied => glyphs.occupied,
            CellState::Free => glyphs.free,
        }
    }
}

/// One row of cells, labelled with the address of its first cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapLine {
    pub address: Address,
    pub cells: Vec<CellState>,
}

impl MapLine {
    /// Address label, e.g. `0x010000`
    pub fn label(&self) -> String {
        format!("{:#08x}", self.address)
    }

    pub fn to_text(&self, glyphs: &Glyphs) -> String {
        let mut text = String::with_capacity(10 + self.cells.len() * 3);
        let _ = write!(text, "{}  ", self.label());
        text.extend(self.cells.iter().map(|c| c.glyph(glyphs)));
        text
    }
}

/// The rendered map of one segment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapBlock {
    /// Absolute base of the segment
    pub segment_base: Address,
    /// One past the last address of the segment window
    pub window_end: Address,
    /// First address covered by the first cell
    pub span_start: Address,
    /// One past the last address covered by the last cell
    pub span_end: Address,
    pub bytes_per_cell: u32,
    pub occupied_bytes: u64,
    pub lines: Vec<MapLine>,
}

impl MapBlock {
    /// Block title naming the segment and its usage
    pub fn header(&self) -> String {
        format!(
            "Segment {:#06x} [{:#08x}-{:#08x}]: {} bytes used",
            self.segment_base >> crate::constants::SEGMENT_BASE_SHIFT,
            self.segment_base,
            self.window_end - 1,
            self.occupied_bytes
        )
    }

    pub fn cell_count(&self) -> usize {
        self.lines.iter().map(|l| l.cells.len()).sum()
    }

    pub fn occupied_cells(&self) -> usize {
        self.lines
            .iter()
            .flat_map(|l| l.cells.iter())
            .filter(|&&c| c == CellState::Occupied)
            .count()
    }

    /// Header followed by one text line per map line
    pub fn to_text_lines(&self, glyphs: &Glyphs) -> Vec<String> {
        let mut out = Vec::with_capacity(self.lines.len() + 1);
        out.push(self.header());
        out.extend(self.lines.iter().map(|l| l.to_text(glyphs)));
        out
    }
}
