//! Memory search: narrow down the addresses that hold a value of interest.
//!
//! A search keeps five byte-range tables over the scanned regions of one
//! CPU:
//!
//! - `start`: memory as it was when the search began (shown in results)
//! - `backup`: memory as of the last search step
//! - `flags`: nonzero for every byte that is still a candidate
//! - `old_backup` / `old_flags`: the pair before the last step, for restore

pub mod range_table;

use std::fmt;

use log::{debug, info, warn};

use crate::core::{CheatBus, CheatHost, MachineInfo, RegionKind, WriteRegion, format_address};
use crate::error::SearchError;

pub use range_table::{ByteRange, ByteRangeTable};

/// Most results a result listing shows.
pub const MAX_SEARCH_RESULTS: usize = 500;

/// Flag byte of a byte that is still a candidate.
const CANDIDATE: u8 = 0xFF;

// ---------------------------------------------------------------------------
// Options and outcomes
// ---------------------------------------------------------------------------

/// Which write regions a search scans.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SearchSpeed {
    /// Every write region, device handlers included.
    All,
    /// RAM and banked RAM.
    Normal,
    /// Like `Normal`, or only the machine's preferred bank if it names one.
    #[default]
    Fast,
}

impl SearchSpeed {
    /// Whether a region of `kind` is scanned at this speed.
    pub fn scans(self, kind: RegionKind, preferred_bank: Option<u8>) -> bool {
        match (self, kind, preferred_bank) {
            (Self::All, _, _) => true,
            (_, RegionKind::Handler, _) => false,
            (Self::Fast, RegionKind::Bank(bank), Some(preferred)) => bank == preferred,
            (Self::Fast, RegionKind::Ram, Some(_)) => false,
            _ => true,
        }
    }
}

/// Whether the previous search step can be undone.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum RestoreStatus {
    /// No search has been started.
    #[default]
    NotInitialized,
    /// A search was started but no step has been taken since.
    NoRestoreTarget,
    /// The state before the last step is saved.
    Ready,
    /// The saved state has already been restored.
    RestoredAlready,
}

impl fmt::Display for RestoreStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::NotInitialized => "no search started",
            Self::NoRestoreTarget => "no previous results to restore",
            Self::Ready => "previous results restored",
            Self::RestoredAlready => "previous results already restored",
        })
    }
}

/// How live memory is compared with the last snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnergyComparison {
    Less,
    Equal,
    Greater,
    NotEqual,
}

/// How a new search seeds its candidates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchStart {
    /// Only bytes holding `v` or `v - 1`.
    Value(u8),
    /// Every scanned byte.
    Any,
}

impl fmt::Display for SearchStart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(value) => write!(f, "{value}"),
            Self::Any => f.write_str("any value"),
        }
    }
}

/// One narrowing step of a running search.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchComparison {
    /// Live value is `v` or `v - 1`.
    Value(u8),
    /// Live value moved by exactly this amount since the last step.
    Delta(i16),
    /// Live value compares to the last snapshot this way.
    Energy(EnergyComparison),
    /// Per-bit: keep bits that stayed the same (or changed).
    Bit { same: bool },
    /// Whole byte stayed the same (or changed).
    Byte { same: bool },
}

impl SearchComparison {
    /// New flag byte for a candidate whose snapshot was `old` and is now `live`.
    fn narrow(self, flag: u8, live: u8, old: u8) -> u8 {
        let keep = match self {
            Self::Value(value) => matches_value(live, value),
            Self::Delta(delta) => i16::from(live) - i16::from(old) == delta,
            Self::Energy(EnergyComparison::Less) => live < old,
            Self::Energy(EnergyComparison::Equal) => live == old,
            Self::Energy(EnergyComparison::Greater) => live > old,
            Self::Energy(EnergyComparison::NotEqual) => live != old,
            Self::Bit { same: true } => return flag & !(live ^ old),
            Self::Bit { same: false } => return flag & (live ^ old),
            Self::Byte { same } => (live == old) == same,
        };
        if keep { flag } else { 0 }
    }
}

/// Exact match, or one below to allow for a value that just ticked down.
fn matches_value(live: u8, value: u8) -> bool {
    live == value || i16::from(live) == i16::from(value) - 1
}

/// A candidate address and its value when the search started.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchResult {
    pub address: u32,
    pub value: u8,
}

impl SearchResult {
    /// `"4C12 = 03"`, with the address padded to the CPU's bus width.
    pub fn format(&self, address_bits: u32) -> String {
        format!("{} = {:02X}", format_address(self.address, address_bits), self.value)
    }
}

// ---------------------------------------------------------------------------
// Search engine
// ---------------------------------------------------------------------------

pub struct MemorySearch {
    cpu: Option<usize>,
    start: ByteRangeTable,
    backup: ByteRangeTable,
    flags: ByteRangeTable,
    old_backup: ByteRangeTable,
    old_flags: ByteRangeTable,
    speed: SearchSpeed,
    memory_limit: Option<usize>,
    status: RestoreStatus,
}

impl MemorySearch {
    /// `memory_limit` caps the bytes the five tables may take together.
    pub fn new(speed: SearchSpeed, memory_limit: Option<usize>) -> Self {
        Self {
            cpu: None,
            start: ByteRangeTable::new(),
            backup: ByteRangeTable::new(),
            flags: ByteRangeTable::new(),
            old_backup: ByteRangeTable::new(),
            old_flags: ByteRangeTable::new(),
            speed,
            memory_limit,
            status: RestoreStatus::NotInitialized,
        }
    }

    pub fn speed(&self) -> SearchSpeed {
        self.speed
    }

    /// Takes effect on the next table build.
    pub fn set_speed(&mut self, speed: SearchSpeed) {
        self.speed = speed;
    }

    pub fn memory_limit(&self) -> Option<usize> {
        self.memory_limit
    }

    pub fn set_memory_limit(&mut self, limit: Option<usize>) {
        self.memory_limit = limit;
    }

    pub fn status(&self) -> RestoreStatus {
        self.status
    }

    /// CPU the current tables cover.
    pub fn cpu(&self) -> Option<usize> {
        self.cpu
    }

    pub fn start_table(&self) -> &ByteRangeTable {
        &self.start
    }

    pub fn backup_table(&self) -> &ByteRangeTable {
        &self.backup
    }

    pub fn flag_table(&self) -> &ByteRangeTable {
        &self.flags
    }

    /// Regions of `cpu` scanned at the current speed.
    pub fn scanned_regions<M: MachineInfo + ?Sized>(
        &self,
        info: &M,
        cpu: usize,
    ) -> Vec<WriteRegion> {
        let preferred = info.preferred_search_bank();
        info.write_regions(cpu)
            .into_iter()
            .filter(|region| self.speed.scans(region.kind, preferred))
            .collect()
    }

    /// Allocate the five tables for `cpu`, discarding any running search.
    ///
    /// On failure the previous tables and search state are left untouched.
    pub fn build_tables<M: MachineInfo + ?Sized>(
        &mut self,
        info: &M,
        cpu: usize,
    ) -> Result<(), SearchError> {
        let regions = self.scanned_regions(info, cpu);
        let [start, backup, flags, old_backup, old_flags] =
            ByteRangeTable::build_set::<5>(&regions, self.memory_limit).inspect_err(|e| {
                warn!("no search available for CPU {cpu}: {e}");
            })?;

        self.start = start;
        self.backup = backup;
        self.flags = flags;
        self.old_backup = old_backup;
        self.old_flags = old_flags;
        self.cpu = Some(cpu);
        self.status = RestoreStatus::NotInitialized;
        debug!(
            "search tables for CPU {cpu}: {} regions, {} bytes each",
            regions.len(),
            self.start.total_bytes()
        );
        Ok(())
    }

    /// Begin a new search on `cpu`.
    ///
    /// [`SearchStart::Value`] keeps bytes holding `v` or `v - 1`;
    /// [`SearchStart::Any`] keeps every scanned byte for later narrowing.
    /// Returns the number of candidates.
    pub fn start_search<H: CheatHost + ?Sized>(
        &mut self,
        host: &mut H,
        cpu: usize,
        start: SearchStart,
    ) -> Result<usize, SearchError> {
        self.build_tables(&*host, cpu)?;

        self.start.backup(host, cpu);
        self.backup.backup(host, cpu);
        self.flags.fill(CANDIDATE);

        let count = match start {
            SearchStart::Any => self.flags.total_bytes(),
            SearchStart::Value(value) => {
                let mut count = 0;
                for (flags, snapshot) in
                    self.flags.ranges_mut().iter_mut().zip(self.backup.ranges())
                {
                    for (flag, &live) in flags.data_mut().iter_mut().zip(snapshot.data()) {
                        if matches_value(live, value) {
                            count += 1;
                        } else {
                            *flag = 0;
                        }
                    }
                }
                count
            }
        };

        self.old_backup.copy_from(&self.backup)?;
        self.old_flags.copy_from(&self.flags)?;
        self.status = RestoreStatus::NoRestoreTarget;

        info!("search on CPU {cpu} for {start}: {count} matches");
        Ok(count)
    }

    /// Narrow the candidates against live memory and take a new snapshot.
    ///
    /// The state before this step is saved for [`MemorySearch::restore_previous`].
    /// Returns the number of candidates left.
    pub fn continue_search<B: CheatBus + ?Sized>(
        &mut self,
        bus: &mut B,
        comparison: SearchComparison,
    ) -> Result<usize, SearchError> {
        let cpu = match (self.status, self.cpu) {
            (RestoreStatus::NotInitialized, _) | (_, None) => return Err(SearchError::NotStarted),
            (_, Some(cpu)) => cpu,
        };

        self.old_backup.copy_from(&self.backup)?;
        self.old_flags.copy_from(&self.flags)?;
        self.status = RestoreStatus::Ready;

        let mut count = 0;
        for (flags, snapshot) in self.flags.ranges_mut().iter_mut().zip(self.backup.ranges_mut()) {
            let start = snapshot.start();
            for (offset, (flag, old)) in flags
                .data_mut()
                .iter_mut()
                .zip(snapshot.data_mut())
                .enumerate()
            {
                let live = bus.read_byte(cpu, start + offset as u32);
                if *flag != 0 {
                    *flag = comparison.narrow(*flag, live, *old);
                    if *flag != 0 {
                        count += 1;
                    }
                }
                *old = live;
            }
        }

        debug!("search step {comparison:?}: {count} candidates left");
        Ok(count)
    }

    /// Candidates in address order, with their values at the start of the search.
    pub fn results(&self) -> impl Iterator<Item = SearchResult> + '_ {
        self.flags
            .ranges()
            .iter()
            .zip(self.start.ranges())
            .flat_map(|(flags, start)| {
                flags
                    .data()
                    .iter()
                    .zip(start.data())
                    .enumerate()
                    .filter(|(_, (flag, _))| **flag != 0)
                    .map(move |(offset, (_, &value))| SearchResult {
                        address: start.address_of(offset),
                        value,
                    })
            })
    }

    /// Number of bytes still flagged as candidates.
    pub fn candidate_count(&self) -> usize {
        self.flags
            .ranges()
            .iter()
            .map(|range| range.data().iter().filter(|&&flag| flag != 0).count())
            .sum()
    }

    /// Undo the last search step, once.
    ///
    /// Returns the status before the call: only [`RestoreStatus::Ready`]
    /// means something was restored.
    pub fn restore_previous(&mut self) -> RestoreStatus {
        let prior = self.status;
        if prior == RestoreStatus::Ready {
            let restored = self
                .backup
                .copy_from(&self.old_backup)
                .and_then(|()| self.flags.copy_from(&self.old_flags));
            match restored {
                Ok(()) => self.status = RestoreStatus::RestoredAlready,
                Err(e) => warn!("search restore failed: {e}"),
            }
        }
        debug!("search restore: {prior}");
        prior
    }

    /// Release every table and forget the search.
    pub fn reset(&mut self) {
        self.start.reset();
        self.backup.reset();
        self.flags.reset();
        self.old_backup.reset();
        self.old_flags.reset();
        self.cpu = None;
        self.status = RestoreStatus::NotInitialized;
    }
}

impl Default for MemorySearch {
    fn default() -> Self {
        Self::new(SearchSpeed::default(), None)
    }
}
