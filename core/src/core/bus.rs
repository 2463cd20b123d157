/// Byte-level access to the emulated address spaces.
///
/// Every poke the cheat engine performs and every byte the search engine
/// samples goes through this trait, never through a raw pointer into
/// emulated RAM, so memory-mapped side effects are preserved.
pub trait CheatBus {
    /// Read the byte at `addr` in `cpu`'s address space.
    ///
    /// Takes `&mut self` because reads may have side effects on the
    /// emulated hardware (latches, FIFOs, watchdogs).
    fn read_byte(&mut self, cpu: usize, addr: u32) -> u8;

    /// Write `data` to `addr` in `cpu`'s address space.
    fn write_byte(&mut self, cpu: usize, addr: u32, data: u8);
}

impl<B: CheatBus + ?Sized> CheatBus for &mut B {
    fn read_byte(&mut self, cpu: usize, addr: u32) -> u8 {
        (**self).read_byte(cpu, addr)
    }

    fn write_byte(&mut self, cpu: usize, addr: u32, data: u8) {
        (**self).write_byte(cpu, addr, data)
    }
}
