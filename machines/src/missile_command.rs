use crate::layout::{CpuLayout, MachineLayout, RegionLayout};
use crate::registry::MachineEntry;

// ---------------------------------------------------------------------------
// Missile Command (Atari, 1980)
// ---------------------------------------------------------------------------
//
// 6502 @ 1.25 MHz on a 15-bit bus. 256 scanlines of 80 cycles per frame.
// The 16KB RAM at 0x0000 doubles as the bitmap.

const CPU_CLOCK_HZ: f64 = 1_250_000.0;
const CYCLES_PER_FRAME: f64 = 256.0 * 80.0;

pub static MISSILE_COMMAND_LAYOUT: MachineLayout = MachineLayout {
    name: "Missile Command",
    driver: "missile",
    fps: CPU_CLOCK_HZ / CYCLES_PER_FRAME,
    cpus: &[CpuLayout {
        label: "M6502",
        address_bits: 15,
        regions: &[
            RegionLayout::ram(0x0000, 0x3FFF, "RAM"),
            RegionLayout::handler(0x4000, 0x47FF, "POKEY"),
            RegionLayout::handler(0x4800, 0x48FF, "output latch"),
            RegionLayout::handler(0x4B00, 0x4BFF, "palette"),
            RegionLayout::handler(0x4C00, 0x4CFF, "watchdog"),
            RegionLayout::handler(0x4D00, 0x4DFF, "IRQ acknowledge"),
        ],
    }],
    preferred_bank: None,
};

inventory::submit! {
    MachineEntry::new("missile", &MISSILE_COMMAND_LAYOUT)
}
