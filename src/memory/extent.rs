//! Occupied address extents
//!
//! An [`ExtentSet`] keeps half-open `[start, end)` ranges sorted by start
//! address. Inserting a range merges it with every extent it overlaps or
//! touches, so the set never holds two ranges that could be one.

use super::Address;

/// A contiguous run of occupied addresses, `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Extent {
    pub start: Address,
    pub end: Address,
}

impl Extent {
    /// Create an extent; `start` must be below `end`
    pub fn new(start: Address, end: Address) -> Self {
        debug_assert!(start < end, "empty extent {:#x}..{:#x}", start, end);
        Extent { start, end }
    }

    pub fn len(&self) -> u32 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// True if the extent shares at least one address with `[start, end)`
    pub fn intersects(&self, start: Address, end: Address) -> bool {
        self.start < end && start < self.end
    }
}

/// Sorted, non-overlapping set of extents
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtentSet {
    extents: Vec<Extent>,
}

impl ExtentSet {
    pub fn new() -> Self {
        ExtentSet {
            extents: Vec::new(),
        }
    }

    /// Insert `[start, end)`, merging with overlapping or adjacent extents.
    /// Empty ranges are ignored.
    pub fn insert(&mut self, start: Address, end: Address) {
        if start >= end {
            return;
        }

        // First extent that could touch the new range
        let first = self.extents.partition_point(|e| e.end < start);
        // One past the last extent that could touch it
        let last = first + self.extents[first..].partition_point(|e| e.start <= end);

        let merged = if first == last {
            Extent::new(start, end)
        } else {
            Extent::new(
                start.min(self.extents[first].start),
                end.max(self.extents[last - 1].end),
            )
        };

        self.extents.splice(first..last, std::iter::once(merged));
    }

    /// True if any address in `[start, end)` is occupied
    pub fn intersects(&self, start: Address, end: Address) -> bool {
        let idx = self.extents.partition_point(|e| e.end <= start);
        self.extents
            .get(idx)
            .is_some_and(|e| e.intersects(start, end))
    }

    /// Lowest occupied address
    pub fn lowest(&self) -> Option<Address> {
        self.extents.first().map(|e| e.start)
    }

    /// One past the highest occupied address
    pub fn highest_end(&self) -> Option<Address> {
        self.extents.last().map(|e| e.end)
    }

    /// Total number of occupied bytes
    pub fn occupied_bytes(&self) -> u64 {
        self.extents.iter().map(|e| e.len() as u64).sum()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Extent> {
        self.extents.iter()
    }

    pub fn as_slice(&self) -> &[Extent] {
        &self.extents
    }

    pub fn len(&self) -> usize {
        self.extents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extents.is_empty()
    }
}

impl<'a> IntoIterator for &'a ExtentSet {
    type Item = &'a Extent;
    type IntoIter = std::slice::Iter<'a, Extent>;

    fn into_iter(self) -> Self::IntoIter {
        self.extents.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ranges(set: &ExtentSet) -> Vec<(u32, u32)> {
        set.iter().map(|e| (e.start, e.end)).collect()
    }

    #[test]
    fn test_adjacent_extents_merge() {
        let mut set = ExtentSet::new();
        set.insert(0x100, 0x110);
        set.insert(0x110, 0x120);
        assert_eq!(ranges(&set), vec![(0x100, 0x120)]);
    }

    #[test]
    fn test_adjacent_merge_in_reverse_order() {
        let mut set = ExtentSet::new();
        set.insert(0x110, 0x120);
        set.insert(0x100, 0x110);
        assert_eq!(ranges(&set), vec![(0x100, 0x120)]);
    }

    #[test]
    fn test_disjoint_extents_stay_sorted() {
        let mut set = ExtentSet::new();
        set.insert(0x300, 0x310);
        set.insert(0x100, 0x110);
        set.insert(0x200, 0x210);
        assert_eq!(
            ranges(&set),
            vec![(0x100, 0x110), (0x200, 0x210), (0x300, 0x310)]
        );
    }

    #[test]
    fn test_insert_bridges_several_extents() {
        let mut set = ExtentSet::new();
        set.insert(0x00, 0x10);
        set.insert(0x20, 0x30);
        set.insert(0x40, 0x50);
        set.insert(0x60, 0x70);
        set.insert(0x08, 0x48);
        assert_eq!(ranges(&set), vec![(0x00, 0x50), (0x60, 0x70)]);
    }

    #[test]
    fn test_contained_and_duplicate_inserts() {
        let mut set = ExtentSet::new();
        set.insert(0x10, 0x40);
        set.insert(0x18, 0x20);
        set.insert(0x10, 0x40);
        assert_eq!(ranges(&set), vec![(0x10, 0x40)]);
        assert_eq!(set.occupied_bytes(), 0x30);
    }

    #[test]
    fn test_empty_insert_ignored() {
        let mut set = ExtentSet::new();
        set.insert(0x10, 0x10);
        assert!(set.is_empty());
        assert_eq!(set.lowest(), None);
    }

    #[test]
    fn test_intersects() {
        let mut set = ExtentSet::new();
        set.insert(0x10, 0x20);
        set.insert(0x40, 0x41);

        assert!(set.intersects(0x00, 0x11));
        assert!(set.intersects(0x1F, 0x30));
        assert!(set.intersects(0x3C, 0x40 + 1));
        assert!(!set.intersects(0x00, 0x10));
        assert!(!set.intersects(0x20, 0x40));
        assert!(!set.intersects(0x41, 0x100));
    }

    #[test]
    fn test_bounds() {
        let mut set = ExtentSet::new();
        set.insert(0x80, 0x90);
        set.insert(0x04, 0x08);
        assert_eq!(set.lowest(), Some(0x04));
        assert_eq!(set.highest_end(), Some(0x90));
    }
}
