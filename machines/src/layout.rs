//! Static memory-map descriptions of arcade boards.
//!
//! A layout lists, per CPU, the writable areas of the board's memory map:
//! plain RAM, banked RAM and areas decoded to device handlers. Read-only
//! areas (program and graphics ROM) are left out.

use phosphor_cheat::core::{RegionKind, WriteRegion};

/// One writable area of a CPU's memory map (inclusive bounds).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RegionLayout {
    pub start: u32,
    pub end: u32,
    pub kind: RegionKind,
    /// What the board keeps there (e.g. "work RAM", "POKEY").
    pub label: &'static str,
}

impl RegionLayout {
    pub const fn ram(start: u32, end: u32, label: &'static str) -> Self {
        Self { start, end, kind: RegionKind::Ram, label }
    }

    pub const fn bank(bank: u8, start: u32, end: u32, label: &'static str) -> Self {
        Self { start, end, kind: RegionKind::Bank(bank), label }
    }

    pub const fn handler(start: u32, end: u32, label: &'static str) -> Self {
        Self { start, end, kind: RegionKind::Handler, label }
    }

    pub fn len(&self) -> usize {
        (self.end - self.start) as usize + 1
    }

    pub fn is_empty(&self) -> bool {
        self.end < self.start
    }

    pub fn contains(&self, addr: u32) -> bool {
        (self.start..=self.end).contains(&addr)
    }

    pub fn write_region(&self) -> WriteRegion {
        WriteRegion::new(self.start, self.end, self.kind)
    }
}

#[derive(Debug)]
pub struct CpuLayout {
    /// CPU type, for display (e.g. "Z80").
    pub label: &'static str,
    pub address_bits: u32,
    pub regions: &'static [RegionLayout],
}

impl CpuLayout {
    pub fn address_mask(&self) -> u32 {
        if self.address_bits >= 32 {
            u32::MAX
        } else {
            (1 << self.address_bits) - 1
        }
    }
}

#[derive(Debug)]
pub struct MachineLayout {
    /// Board or game title, for display.
    pub name: &'static str,
    /// Driver name records in a cheat database are keyed by.
    pub driver: &'static str,
    pub fps: f64,
    pub cpus: &'static [CpuLayout],
    /// Bank holding the live game state, scanned alone by fast searches.
    pub preferred_bank: Option<u8>,
}

impl MachineLayout {
    pub fn cpu(&self, index: usize) -> Option<&CpuLayout> {
        self.cpus.get(index)
    }

    /// Total writable bytes across every CPU.
    pub fn total_bytes(&self) -> usize {
        self.cpus
            .iter()
            .flat_map(|cpu| cpu.regions)
            .map(RegionLayout::len)
            .sum()
    }
}
