//! Address-space builder
//!
//! Folds the decoded record stream into an [`AddressSpace`]. The only state
//! carried from one record to the next is the current segment base, held in
//! an explicit [`BuildState`] so that [`apply_record`] can be exercised one
//! record at a time.
//!
//! # Record Effects
//!
//! - **Extended Segment Address**: selects `value × 16` as the new base and
//!   registers the segment.
//! - **Data**: occupies `[base + offset, base + offset + len)` in the current
//!   segment. A record that would run past the end of its 64 KB window is
//!   skipped and reported.
//! - Everything else (End Of File, start addresses, Extended Linear Address)
//!   leaves the model untouched.

use super::segment::AddressSpace;
use super::Address;
use crate::constants::SEGMENT_BASE_SHIFT;
use crate::parser::{Record, RecordType};
use thiserror::Error;
use tracing::{debug, warn};

/// Builder settings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildOptions {
    /// Runs of at least this many `0x00` or `0xFF` bytes within one data
    /// record count as unprogrammed. Zero disables the filter.
    pub erased_run: usize,
}

/// State carried between records
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildState {
    pub segment_base: Address,
}

/// Why a record was left out of the model
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkipReason {
    #[error(
        "data record at {start:#07x}..{end:#07x} runs past the segment end {window_end:#07x}"
    )]
    SegmentWrap {
        start: Address,
        end: Address,
        window_end: Address,
    },
}

/// A record the builder refused, with its position in the record stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRecord {
    pub index: usize,
    pub segment_base: Address,
    pub load_offset: u16,
    pub reason: SkipReason,
}

/// Result of a full build
#[derive(Debug, Clone, Default)]
pub struct BuildOutcome {
    pub space: AddressSpace,
    pub skipped: Vec<SkippedRecord>,
}

/// Apply one record to the model.
///
/// Returns the state for the next record. A skipped record leaves both the
/// model and the state unchanged.
pub fn apply_record(
    space: &mut AddressSpace,
    state: BuildState,
    record: &Record,
    options: &BuildOptions,
) -> Result<BuildState, SkipReason> {
    match record.record_type {
        RecordType::ExtendedSegmentAddress => {
            let Some(value) = record.address_value() else {
                return Ok(state);
            };
            let segment_base = (value as Address) << SEGMENT_BASE_SHIFT;
            space.segment_mut(segment_base);
            debug!("segment base set to {:#07x}", segment_base);
            Ok(BuildState { segment_base })
        }
        RecordType::Data => {
            if record.payload.is_empty() {
                return Ok(state);
            }

            let start = state.segment_base + record.load_offset as Address;
            let end = start + record.byte_count() as Address;
            let segment = space.segment_mut(state.segment_base);
            if !segment.contains_range(start, end) {
                return Err(SkipReason::SegmentWrap {
                    start,
                    end,
                    window_end: segment.window_end(),
                });
            }

            for (from, to) in programmed_ranges(&record.payload, options.erased_run) {
                segment.occupy(start + from as Address, start + to as Address);
            }
            Ok(state)
        }
        RecordType::EndOfFile
        | RecordType::StartSegmentAddress
        | RecordType::StartLinearAddress
        | RecordType::ExtendedLinearAddress
        | RecordType::Unknown(_) => Ok(state),
    }
}

/// Build the address-space model from records in file order
pub fn build<I>(records: I, options: &BuildOptions) -> BuildOutcome
where
    I: IntoIterator<Item = Record>,
{
    let mut outcome = BuildOutcome::default();
    let mut state = BuildState::default();

    for (index, record) in records.into_iter().enumerate() {
        match apply_record(&mut outcome.space, state, &record, options) {
            Ok(next) => state = next,
            Err(reason) => {
                warn!(record = index, "{}", reason);
                outcome.skipped.push(SkippedRecord {
                    index,
                    segment_base: state.segment_base,
                    load_offset: record.load_offset,
                    reason,
                });
            }
        }
    }

    outcome
}

/// Byte ranges of `payload` that count as programmed, relative to its start.
fn programmed_ranges(payload: &[u8], erased_run: usize) -> Vec<(usize, usize)> {
    if erased_run == 0 {
        return vec![(0, payload.len())];
    }

    let mut ranges = Vec::new();
    let mut keep_from = 0;
    let mut i = 0;

    while i < payload.len() {
        let byte = payload[i];
        if byte != 0x00 && byte != 0xFF {
            i += 1;
            continue;
        }

        let run_end = i + payload[i..].iter().take_while(|&&b| b == byte).count();
        if run_end - i >= erased_run {
            if keep_from < i {
                ranges.push((keep_from, i));
            }
            keep_from = run_end;
        }
        i = run_end;
    }

    if keep_from < payload.len() {
        ranges.push((keep_from, payload.len()));
    }
    ranges
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::extent::Extent;

    fn esa(value: u16) -> Record {
        Record::new(
            RecordType::ExtendedSegmentAddress,
            0,
            value.to_be_bytes().to_vec(),
        )
    }

    fn data(offset: u16, len: usize) -> Record {
        Record::new(RecordType::Data, offset, vec![0xA5; len])
    }

    fn extents(space: &AddressSpace, base: Address) -> Vec<Extent> {
        space
            .get(base)
            .map(|s| s.extents().as_slice().to_vec())
            .unwrap_or_default()
    }

    #[test]
    fn test_esa_sets_base() {
        let mut space = AddressSpace::new();
        let options = BuildOptions::default();
        let state = apply_record(&mut space, BuildState::default(), &esa(0x1000), &options).unwrap();
        assert_eq!(state.segment_base, 0x1_0000);
        assert_eq!(space.bases(), vec![0x1_0000]);
        assert!(space.get(0x1_0000).unwrap().is_empty());
    }

    #[test]
    fn test_data_resolves_against_segment_base() {
        let out = build(vec![esa(0x1000), data(0x0010, 4)], &BuildOptions::default());
        assert_eq!(extents(&out.space, 0x1_0000), vec![Extent::new(0x1_0010, 0x1_0014)]);
        assert!(out.skipped.is_empty());
    }

    #[test]
    fn test_data_before_any_esa_uses_base_zero() {
        let out = build(vec![data(0x0100, 0x10)], &BuildOptions::default());
        assert_eq!(out.space.bases(), vec![0]);
        assert_eq!(extents(&out.space, 0), vec![Extent::new(0x100, 0x110)]);
    }

    #[test]
    fn test_adjacent_records_merge() {
        let out = build(vec![data(0x100, 0x10), data(0x110, 0x10)], &BuildOptions::default());
        assert_eq!(extents(&out.space, 0), vec![Extent::new(0x100, 0x120)]);
    }

    #[test]
    fn test_wrapping_record_skipped() {
        let out = build(
            vec![data(0xFFF8, 0x10), data(0x0000, 2)],
            &BuildOptions::default(),
        );
        assert_eq!(extents(&out.space, 0), vec![Extent::new(0, 2)]);
        assert_eq!(out.skipped.len(), 1);
        assert_eq!(out.skipped[0].index, 0);
        assert_eq!(
            out.skipped[0].reason,
            SkipReason::SegmentWrap {
                start: 0xFFF8,
                end: 0x1_0008,
                window_end: 0x1_0000
            }
        );
    }

    #[test]
    fn test_record_ending_at_window_top_kept() {
        let out = build(vec![data(0xFFF0, 0x10)], &BuildOptions::default());
        assert_eq!(extents(&out.space, 0), vec![Extent::new(0xFFF0, 0x1_0000)]);
        assert!(out.skipped.is_empty());
    }

    #[test]
    fn test_linear_and_start_records_have_no_effect() {
        let ela = Record::new(RecordType::ExtendedLinearAddress, 0, vec![0x08, 0x00]);
        let sla = Record::new(RecordType::StartLinearAddress, 0, vec![0, 0, 0x01, 0x00]);
        let ssa = Record::new(RecordType::StartSegmentAddress, 0, vec![0, 0, 0x38, 0x00]);
        let eof = Record::new(RecordType::EndOfFile, 0, vec![]);

        let out = build(
            vec![esa(0x2000), ela, sla, ssa, data(0x0000, 4), eof],
            &BuildOptions::default(),
        );
        assert_eq!(out.space.bases(), vec![0x2_0000]);
        assert_eq!(extents(&out.space, 0x2_0000), vec![Extent::new(0x2_0000, 0x2_0004)]);
    }

    #[test]
    fn test_zero_length_data_is_noop() {
        let out = build(vec![data(0x0040, 0)], &BuildOptions::default());
        assert!(out.space.is_empty());
        assert!(out.skipped.is_empty());
    }

    #[test]
    fn test_back_to_back_esa_keeps_appearance_order() {
        let out = build(
            vec![esa(0x3000), esa(0x1000), data(0, 1), esa(0x3000), data(0, 1)],
            &BuildOptions::default(),
        );
        assert_eq!(out.space.bases(), vec![0x3_0000, 0x1_0000]);
        assert_eq!(extents(&out.space, 0x3_0000), vec![Extent::new(0x3_0000, 0x3_0001)]);
        assert_eq!(extents(&out.space, 0x1_0000), vec![Extent::new(0x1_0000, 0x1_0001)]);
    }

    #[test]
    fn test_programmed_ranges() {
        let payload = [0x12, 0xFF, 0xFF, 0xFF, 0x34, 0x00, 0x00, 0x56];
        assert_eq!(programmed_ranges(&payload, 0), vec![(0, 8)]);
        assert_eq!(programmed_ranges(&payload, 3), vec![(0, 1), (4, 8)]);
        assert_eq!(programmed_ranges(&payload, 2), vec![(0, 1), (4, 5), (7, 8)]);
        assert_eq!(programmed_ranges(&[0xFF; 4], 4), Vec::<(usize, usize)>::new());
        // Mixed 0x00/0xFF bytes are two separate runs
        assert_eq!(programmed_ranges(&[0x00, 0xFF], 2), vec![(0, 2)]);
    }

    #[test]
    fn test_erased_runs_excluded_from_model() {
        let mut payload = vec![0x01, 0x02];
        payload.extend([0xFF; 8]);
        payload.extend([0x03, 0x04]);
        let rec = Record::new(RecordType::Data, 0x0100, payload);

        let out = build(vec![rec], &BuildOptions { erased_run: 4 });
        assert_eq!(
            extents(&out.space, 0),
            vec![Extent::new(0x100, 0x102), Extent::new(0x10A, 0x10C)]
        );
    }
}
