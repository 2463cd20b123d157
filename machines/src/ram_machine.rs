//! A headless stand-in for a running board.
//!
//! `RamMachine` backs every writable region of a [`MachineLayout`] with a
//! plain byte buffer. Reads outside those regions see an open bus (0xFF) and
//! writes there are dropped, like writes to ROM on the real hardware. Device
//! handler regions behave as simple latches: a read returns the last value
//! written.

use log::debug;
use phosphor_cheat::core::{CheatBus, MachineInfo, WriteRegion};

use crate::layout::MachineLayout;

const OPEN_BUS: u8 = 0xFF;

struct Block {
    start: u32,
    end: u32,
    data: Vec<u8>,
}

impl Block {
    fn offset(&self, addr: u32) -> Option<usize> {
        (self.start..=self.end)
            .contains(&addr)
            .then(|| (addr - self.start) as usize)
    }
}

pub struct RamMachine {
    layout: &'static MachineLayout,
    blocks: Vec<Vec<Block>>,
    reads: u64,
    writes: u64,
}

impl RamMachine {
    pub fn from_layout(layout: &'static MachineLayout) -> Self {
        let blocks = layout
            .cpus
            .iter()
            .map(|cpu| {
                cpu.regions
                    .iter()
                    .map(|r| Block {
                        start: r.start,
                        end: r.end,
                        data: vec![0; r.len()],
                    })
                    .collect()
            })
            .collect();
        Self {
            layout,
            blocks,
            reads: 0,
            writes: 0,
        }
    }

    /// Copy `data` into `cpu`'s address space starting at `addr`.
    ///
    /// Returns the number of bytes that landed in a writable region; the
    /// rest fall on unmapped or read-only addresses and are discarded.
    pub fn load(&mut self, cpu: usize, addr: u32, data: &[u8]) -> usize {
        let mask = self.address_mask(cpu);
        let mut stored = 0;
        for (i, &byte) in data.iter().enumerate() {
            let target = addr.wrapping_add(i as u32) & mask;
            if let Some(slot) = self.slot_mut(cpu, target) {
                *slot = byte;
                stored += 1;
            }
        }
        debug!(
            "loaded {stored} of {} bytes at CPU{cpu}:{addr:04X}",
            data.len()
        );
        stored
    }

    /// Read a byte without counting it as bus traffic.
    pub fn peek(&self, cpu: usize, addr: u32) -> u8 {
        self.slot(cpu, addr & self.address_mask(cpu)).unwrap_or(OPEN_BUS)
    }

    /// Bus reads performed since construction.
    pub fn read_count(&self) -> u64 {
        self.reads
    }

    /// Bus writes performed since construction, including dropped ones.
    pub fn write_count(&self) -> u64 {
        self.writes
    }

    fn slot(&self, cpu: usize, addr: u32) -> Option<u8> {
        self.blocks
            .get(cpu)?
            .iter()
            .find_map(|b| b.offset(addr).map(|i| b.data[i]))
    }

    fn slot_mut(&mut self, cpu: usize, addr: u32) -> Option<&mut u8> {
        self.blocks
            .get_mut(cpu)?
            .iter_mut()
            .find_map(|b| b.offset(addr).map(|i| &mut b.data[i]))
    }
}

impl CheatBus for RamMachine {
    fn read_byte(&mut self, cpu: usize, addr: u32) -> u8 {
        self.reads += 1;
        self.peek(cpu, addr)
    }

    fn write_byte(&mut self, cpu: usize, addr: u32, data: u8) {
        self.writes += 1;
        let addr = addr & self.address_mask(cpu);
        if let Some(slot) = self.slot_mut(cpu, addr) {
            *slot = data;
        }
    }
}

impl MachineInfo for RamMachine {
    fn driver_name(&self) -> &str {
        self.layout.driver
    }

    fn cpu_count(&self) -> usize {
        self.layout.cpus.len()
    }

    fn address_mask(&self, cpu: usize) -> u32 {
        self.layout.cpu(cpu).map_or(0, |c| c.address_mask())
    }

    fn address_bits(&self, cpu: usize) -> u32 {
        self.layout.cpu(cpu).map_or(0, |c| c.address_bits)
    }

    fn frames_per_second(&self) -> f64 {
        self.layout.fps
    }

    fn write_regions(&self, cpu: usize) -> Vec<WriteRegion> {
        self.layout
            .cpu(cpu)
            .map(|c| c.regions.iter().map(|r| r.write_region()).collect())
            .unwrap_or_default()
    }

    fn preferred_search_bank(&self) -> Option<u8> {
        self.layout.preferred_bank
    }
}
