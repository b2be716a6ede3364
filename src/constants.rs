// Constants for the HEX map

/// Size of one addressable segment window (64 KB)
pub const SEGMENT_WINDOW: u32 = 0x1_0000;

/// Extended Segment Address values are shifted left by 4 to form the base
pub const SEGMENT_BASE_SHIFT: u32 = 4;

/// Default number of bytes represented by one map cell
pub const DEFAULT_BYTES_PER_CELL: u32 = 64;

/// Default number of cells per map line
/// 64 cells plus the address label fits an 80 column terminal
pub const DEFAULT_CELLS_PER_LINE: usize = 64;

/// Glyph for a cell containing at least one programmed byte
pub const GLYPH_OCCUPIED: char = '▓';

/// Glyph for a cell with no programmed bytes
pub const GLYPH_FREE: char = '░';
