//! Byte-range tables: owned copies of one CPU's writable memory.
//!
//! A table holds one buffer per write region, sized to the region. The
//! search engine keeps several tables with identical layouts side by side
//! (snapshots and candidate flags) and combines them range by range.

use log::{debug, warn};

use crate::core::{CheatBus, RegionKind, WriteRegion};
use crate::error::SearchError;

/// One contiguous region and its backing buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ByteRange {
    start: u32,
    end: u32,
    kind: RegionKind,
    buffer: Vec<u8>,
}

impl ByteRange {
    pub fn start(&self) -> u32 {
        self.start
    }

    /// Last address covered (inclusive).
    pub fn end(&self) -> u32 {
        self.end
    }

    pub fn kind(&self) -> RegionKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn data(&self) -> &[u8] {
        &self.buffer
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.buffer
    }

    /// Absolute address of byte `offset` in this range.
    pub fn address_of(&self, offset: usize) -> u32 {
        self.start + offset as u32
    }

    fn same_layout(&self, other: &Self) -> bool {
        self.start == other.start && self.end == other.end && self.kind == other.kind
    }
}

/// An ordered list of byte ranges covering the scanned regions of one CPU.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ByteRangeTable {
    ranges: Vec<ByteRange>,
}

/// Allocate a zeroed buffer of `size` bytes, honouring an optional byte budget.
fn allocate(size: usize, used: &mut usize, limit: Option<usize>) -> Option<Vec<u8>> {
    if limit.is_some_and(|limit| used.saturating_add(size) > limit) {
        return None;
    }
    let mut buffer = Vec::new();
    buffer.try_reserve_exact(size).ok()?;
    buffer.resize(size, 0);
    *used += size;
    Some(buffer)
}

impl ByteRangeTable {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build one table over `regions`.
    pub fn build(regions: &[WriteRegion], limit: Option<usize>) -> Result<Self, SearchError> {
        let [table] = Self::build_set::<1>(regions, limit)?;
        Ok(table)
    }

    /// Build `N` tables with the same layout over `regions` in one batch.
    ///
    /// `limit` caps the total bytes allocated across the batch. If any buffer
    /// cannot be allocated, everything built so far is released and the error
    /// reports the bytes still missing: the failed buffers of the region that
    /// ran out, plus every buffer of the regions after it.
    pub fn build_set<const N: usize>(
        regions: &[WriteRegion],
        limit: Option<usize>,
    ) -> Result<[Self; N], SearchError> {
        let mut tables: [Self; N] = std::array::from_fn(|_| Self::new());
        let mut used = 0usize;
        let mut needed = 0usize;

        for region in regions.iter().filter(|region| !region.is_empty()) {
            let size = region.len();
            if needed != 0 {
                needed += N * size;
                continue;
            }

            let mut buffers = Vec::with_capacity(N);
            for _ in 0..N {
                match allocate(size, &mut used, limit) {
                    Some(buffer) => buffers.push(buffer),
                    None => needed += size,
                }
            }
            if needed != 0 {
                continue;
            }

            for (table, buffer) in tables.iter_mut().zip(buffers) {
                table.ranges.push(ByteRange {
                    start: region.start,
                    end: region.end,
                    kind: region.kind,
                    buffer,
                });
            }
        }

        if needed != 0 {
            warn!("search tables need {needed} more bytes (0x{needed:X})");
            return Err(SearchError::OutOfMemory { needed });
        }

        debug!(
            "built {N} byte-range tables: {} ranges, {used} bytes",
            tables.first().map_or(0, |table| table.ranges.len()),
        );
        Ok(tables)
    }

    pub fn ranges(&self) -> &[ByteRange] {
        &self.ranges
    }

    pub fn ranges_mut(&mut self) -> &mut [ByteRange] {
        &mut self.ranges
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Bytes held across all ranges.
    pub fn total_bytes(&self) -> usize {
        self.ranges.iter().map(ByteRange::len).sum()
    }

    /// Whether `other` covers exactly the same ranges.
    pub fn same_layout(&self, other: &Self) -> bool {
        self.ranges.len() == other.ranges.len()
            && self
                .ranges
                .iter()
                .zip(&other.ranges)
                .all(|(a, b)| a.same_layout(b))
    }

    /// Copy the live bytes of `cpu` into the table, one bus read per byte.
    pub fn backup<B: CheatBus + ?Sized>(&mut self, bus: &mut B, cpu: usize) {
        for range in &mut self.ranges {
            let start = range.start;
            for (offset, byte) in range.buffer.iter_mut().enumerate() {
                *byte = bus.read_byte(cpu, start + offset as u32);
            }
        }
    }

    /// Set every byte of every range to `value`.
    pub fn fill(&mut self, value: u8) {
        for range in &mut self.ranges {
            range.buffer.fill(value);
        }
    }

    /// Copy the contents of `src`, which must have the same layout.
    pub fn copy_from(&mut self, src: &Self) -> Result<(), SearchError> {
        if !self.same_layout(src) {
            return Err(SearchError::LayoutMismatch);
        }
        for (dest, src) in self.ranges.iter_mut().zip(&src.ranges) {
            dest.buffer.copy_from_slice(&src.buffer);
        }
        Ok(())
    }

    /// Release all buffers, leaving an empty table.
    pub fn reset(&mut self) {
        self.ranges = Vec::new();
    }
}
