//! Williams first-generation boards (Joust, Robotron: 2084).
//!
//! Both games share one memory map: a 6809 whose lower 48KB is video RAM
//! with the game's working state in the top slice, palette and CMOS RAM in
//! the I/O page, and a 6808 sound board with 256 bytes of RAM.

use crate::layout::{CpuLayout, MachineLayout, RegionLayout};
use crate::registry::MachineEntry;

const CPU_CLOCK_HZ: f64 = 1_000_000.0;
/// 260 scanlines of 64 cycles.
const CYCLES_PER_FRAME: f64 = 260.0 * 64.0;

/// The bank scanned alone by fast searches.
const STATE_BANK: u8 = 1;

const WILLIAMS_CPUS: &[CpuLayout] = &[
    CpuLayout {
        label: "M6809",
        address_bits: 16,
        regions: &[
            RegionLayout::ram(0x0000, 0x97FF, "video RAM"),
            RegionLayout::bank(STATE_BANK, 0x9800, 0xBFFF, "work RAM"),
            RegionLayout::handler(0xC000, 0xC00F, "palette"),
            RegionLayout::handler(0xC900, 0xC900, "ROM bank select"),
            RegionLayout::handler(0xCA00, 0xCA07, "blitter"),
            RegionLayout::handler(0xCC00, 0xCFFF, "CMOS RAM"),
        ],
    },
    CpuLayout {
        label: "M6808",
        address_bits: 16,
        regions: &[RegionLayout::ram(0x0000, 0x00FF, "sound RAM")],
    },
];

pub static JOUST_LAYOUT: MachineLayout = MachineLayout {
    name: "Joust",
    driver: "joust",
    fps: CPU_CLOCK_HZ / CYCLES_PER_FRAME,
    cpus: WILLIAMS_CPUS,
    preferred_bank: Some(STATE_BANK),
};

pub static ROBOTRON_LAYOUT: MachineLayout = MachineLayout {
    name: "Robotron: 2084",
    driver: "robotron",
    fps: CPU_CLOCK_HZ / CYCLES_PER_FRAME,
    cpus: WILLIAMS_CPUS,
    preferred_bank: Some(STATE_BANK),
};

inventory::submit! {
    MachineEntry::new("joust", &JOUST_LAYOUT)
}

inventory::submit! {
    MachineEntry::new("robotron", &ROBOTRON_LAYOUT)
}
