//! Segments and the address-space model
//!
//! A [`Segment`] is one 64 KB window starting at `ESA value × 16`. The
//! [`AddressSpace`] keeps segments in the order they were first seen in the
//! file, which is also the order they are drawn in.

use super::extent::ExtentSet;
use super::Address;
use crate::constants::SEGMENT_WINDOW;
use rustc_hash::FxHashMap;

/// One 64 KB addressing window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    base: Address,
    extents: ExtentSet,
}

impl Segment {
    pub fn new(base: Address) -> Self {
        Segment {
            base,
            extents: ExtentSet::new(),
        }
    }

    /// Absolute address of the first byte of the window
    pub fn base(&self) -> Address {
        self.base
    }

    /// One past the last address of the window
    pub fn window_end(&self) -> Address {
        self.base + SEGMENT_WINDOW
    }

    /// The ESA value that selects this segment
    pub fn paragraph(&self) -> u32 {
        self.base >> crate::constants::SEGMENT_BASE_SHIFT
    }

    /// True if `[start, end)` lies fully inside the window
    pub fn contains_range(&self, start: Address, end: Address) -> bool {
        start >= self.base && end <= self.window_end() && start <= end
    }

    /// Mark `[start, end)` as occupied.
    ///
    /// Returns `false` and leaves the segment untouched if the range leaves
    /// the window.
    pub fn occupy(&mut self, start: Address, end: Address) -> bool {
        if !self.contains_range(start, end) {
            return false;
        }
        self.extents.insert(start, end);
        true
    }

    pub fn extents(&self) -> &ExtentSet {
        &self.extents
    }

    pub fn occupied_bytes(&self) -> u64 {
        self.extents.occupied_bytes()
    }

    /// True if no data record landed in this segment
    pub fn is_empty(&self) -> bool {
        self.extents.is_empty()
    }
}

/// Segments in order of first appearance
#[derive(Debug, Clone, Default)]
pub struct AddressSpace {
    segments: Vec<Segment>,
    index: FxHashMap<Address, usize>,
}

impl AddressSpace {
    pub fn new() -> Self {
        AddressSpace {
            segments: Vec::new(),
            index: FxHashMap::default(),
        }
    }

    /// Get the segment at `base`, creating an empty one on first use
    pub fn segment_mut(&mut self, base: Address) -> &mut Segment {
        let idx = match self.index.get(&base) {
            Some(&idx) => idx,
            None => {
                self.segments.push(Segment::new(base));
                let idx = self.segments.len() - 1;
                self.index.insert(base, idx);
                idx
            }
        };
        &mut self.segments[idx]
    }

    pub fn get(&self, base: Address) -> Option<&Segment> {
        self.index.get(&base).map(|&idx| &self.segments[idx])
    }

    /// Segments in appearance order
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Segment> {
        self.segments.iter()
    }

    /// Bases in appearance order
    pub fn bases(&self) -> Vec<Address> {
        self.segments.iter().map(Segment::base).collect()
    }

    pub fn occupied_bytes(&self) -> u64 {
        self.segments.iter().map(Segment::occupied_bytes).sum()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

impl PartialEq for AddressSpace {
    fn eq(&self, other: &Self) -> bool {
        self.segments == other.segments
    }
}

impl Eq for AddressSpace {}

impl<'a> IntoIterator for &'a AddressSpace {
    type Item = &'a Segment;
    type IntoIter = std::slice::Iter<'a, Segment>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_window() {
        let seg = Segment::new(0x1_0000);
        assert_eq!(seg.paragraph(), 0x1000);
        assert_eq!(seg.window_end(), 0x2_0000);
        assert!(seg.contains_range(0x1_0000, 0x2_0000));
        assert!(!seg.contains_range(0x1_FFF8, 0x2_0008));
        assert!(!seg.contains_range(0x0_FFFF, 0x1_0001));
    }

    #[test]
    fn test_occupy_rejects_out_of_window() {
        let mut seg = Segment::new(0);
        assert!(!seg.occupy(0xFFF8, 0x1_0008));
        assert!(seg.is_empty());
        assert!(seg.occupy(0xFFF8, 0x1_0000));
        assert_eq!(seg.occupied_bytes(), 8);
    }

    #[test]
    fn test_appearance_order_preserved() {
        let mut space = AddressSpace::new();
        space.segment_mut(0x2_0000);
        space.segment_mut(0);
        space.segment_mut(0x1_0000);
        space.segment_mut(0x2_0000);
        assert_eq!(space.bases(), vec![0x2_0000, 0, 0x1_0000]);
        assert_eq!(space.len(), 3);
    }

    #[test]
    fn test_lookup_by_base() {
        let mut space = AddressSpace::new();
        space.segment_mut(0x100).occupy(0x110, 0x120);
        assert_eq!(space.get(0x100).map(Segment::occupied_bytes), Some(0x10));
        assert!(space.get(0x200).is_none());
        assert_eq!(space.occupied_bytes(), 0x10);
    }
}
