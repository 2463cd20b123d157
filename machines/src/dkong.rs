use crate::layout::{CpuLayout, MachineLayout, RegionLayout};
use crate::registry::MachineEntry;

// ---------------------------------------------------------------------------
// Donkey Kong (Nintendo, 1981)
// ---------------------------------------------------------------------------
//
// Main CPU: Z80 @ 3.072 MHz, 264 lines of 192 cycles per frame.
// Sound CPU: I8035 with a 12-bit program space and its own 256-byte RAM.

const CPU_CLOCK_HZ: f64 = 3_072_000.0;
const CYCLES_PER_FRAME: f64 = 264.0 * 192.0;

pub static DKONG_LAYOUT: MachineLayout = MachineLayout {
    name: "Donkey Kong",
    driver: "dkong",
    fps: CPU_CLOCK_HZ / CYCLES_PER_FRAME,
    cpus: &[
        CpuLayout {
            label: "Z80",
            address_bits: 16,
            regions: &[
                RegionLayout::ram(0x6000, 0x6BFF, "work RAM"),
                RegionLayout::ram(0x7000, 0x73FF, "sprite RAM"),
                RegionLayout::handler(0x7400, 0x77FF, "video RAM"),
                RegionLayout::handler(0x7800, 0x7808, "DMA"),
                RegionLayout::handler(0x7C00, 0x7C00, "sound latch"),
                RegionLayout::handler(0x7D00, 0x7D87, "output latches"),
            ],
        },
        CpuLayout {
            label: "I8035",
            address_bits: 12,
            regions: &[RegionLayout::ram(0x0000, 0x00FF, "internal RAM")],
        },
    ],
    preferred_bank: None,
};

inventory::submit! {
    MachineEntry::new("dkong", &DKONG_LAYOUT)
}
