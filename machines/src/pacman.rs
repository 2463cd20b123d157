use crate::layout::{CpuLayout, MachineLayout, RegionLayout};
use crate::registry::MachineEntry;

// ---------------------------------------------------------------------------
// Pac-Man (Namco/Midway, 1980)
// ---------------------------------------------------------------------------
//
// Z80 @ 3.072 MHz, A15 not connected (0x8000-0xFFFF mirrors 0x0000-0x7FFF).
// Frame: 192 x 264 = 50688 CPU cycles.

const CPU_CLOCK_HZ: f64 = 3_072_000.0;
const CYCLES_PER_FRAME: f64 = 192.0 * 264.0;

pub static PACMAN_LAYOUT: MachineLayout = MachineLayout {
    name: "Pac-Man",
    driver: "pacman",
    fps: CPU_CLOCK_HZ / CYCLES_PER_FRAME,
    cpus: &[CpuLayout {
        label: "Z80",
        address_bits: 15,
        regions: &[
            RegionLayout::handler(0x4000, 0x43FF, "video RAM"),
            RegionLayout::handler(0x4400, 0x47FF, "color RAM"),
            RegionLayout::ram(0x4C00, 0x4FFF, "work RAM"),
            RegionLayout::handler(0x5000, 0x5007, "output latch"),
            RegionLayout::handler(0x5040, 0x505F, "sound"),
            RegionLayout::ram(0x5060, 0x506F, "sprite coordinates"),
        ],
    }],
    preferred_bank: None,
};

inventory::submit! {
    MachineEntry::new("pacman", &PACMAN_LAYOUT)
}
