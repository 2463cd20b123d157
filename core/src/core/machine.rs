use super::bus::CheatBus;

/// What sits behind a write region of a CPU's memory map.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RegionKind {
    /// Plain read/write RAM.
    Ram,
    /// Banked RAM, numbered 1-8.
    Bank(u8),
    /// A device write handler (video latch, sound chip, DMA, ...).
    Handler,
}

/// One contiguous writable area of a CPU's memory map (inclusive bounds).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WriteRegion {
    pub start: u32,
    pub end: u32,
    pub kind: RegionKind,
}

impl WriteRegion {
    pub const fn new(start: u32, end: u32, kind: RegionKind) -> Self {
        Self { start, end, kind }
    }

    /// Number of bytes covered by the region.
    pub fn len(&self) -> usize {
        (self.end - self.start) as usize + 1
    }

    pub fn is_empty(&self) -> bool {
        self.end < self.start
    }

    pub fn contains(&self, addr: u32) -> bool {
        (self.start..=self.end).contains(&addr)
    }
}

/// Machine-level facts the cheat engine needs from the running driver.
///
/// The engine does not know how CPUs or memory maps are implemented; the
/// host machine answers these questions for it.
pub trait MachineInfo {
    /// Short driver name used to select records from a cheat database (e.g. "pacman").
    fn driver_name(&self) -> &str;

    /// Number of CPUs in this machine configuration.
    fn cpu_count(&self) -> usize;

    /// Address-bus mask of `cpu` (0xFFFF for a 16-bit bus).
    fn address_mask(&self, cpu: usize) -> u32;

    /// Width of `cpu`'s address bus in bits. Defaults to the width of the mask.
    fn address_bits(&self, cpu: usize) -> u32 {
        32 - self.address_mask(cpu).leading_zeros()
    }

    /// Emulated frame rate.
    fn frames_per_second(&self) -> f64;

    /// All write regions of `cpu`, in memory-map order.
    fn write_regions(&self, cpu: usize) -> Vec<WriteRegion>;

    /// Bank a driver knows holds the live game state, if any.
    /// Fast searches scan only this bank when it is set.
    fn preferred_search_bank(&self) -> Option<u8> {
        None
    }

    /// Whether `crc` identifies the loaded software image. CRC 0 matches anything.
    #[cfg(feature = "code-patch")]
    fn matches_crc(&self, crc: u32) -> bool {
        crc == 0
    }
}

/// A complete host: memory access plus machine description.
pub trait CheatHost: CheatBus + MachineInfo {}

impl<T: CheatBus + MachineInfo + ?Sized> CheatHost for T {}

/// Format `addr` with as many hex digits as `bits` of address bus require (4 to 8).
pub fn format_address(addr: u32, bits: u32) -> String {
    match bits.div_ceil(4) {
        0..=4 => format!("{addr:04X}"),
        5 => format!("{addr:05X}"),
        6 => format!("{addr:06X}"),
        7 => format!("{addr:07X}"),
        _ => format!("{addr:08X}"),
    }
}
