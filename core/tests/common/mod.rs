#![allow(dead_code)]

use phosphor_cheat::core::{CheatBus, MachineInfo, RegionKind, WriteRegion};

/// Minimal host for testing: flat memory per CPU, regions declared by the test.
pub struct TestBus {
    pub driver: String,
    pub fps: f64,
    pub masks: Vec<u32>,
    pub memory: Vec<Vec<u8>>,
    pub regions: Vec<Vec<WriteRegion>>,
    pub preferred_bank: Option<u8>,
    /// CRC of the loaded image; database lines with CRC 0 match any image.
    pub crc: u32,
    /// Every write, in order: (cpu, address, data).
    pub writes: Vec<(usize, u32, u8)>,
}

impl TestBus {
    /// One 16-bit CPU at 60 frames per second, no regions.
    pub fn new(driver: &str) -> Self {
        Self {
            driver: driver.to_string(),
            fps: 60.0,
            masks: vec![0xFFFF],
            memory: vec![vec![0; 0x10000]],
            regions: vec![Vec::new()],
            preferred_bank: None,
            crc: 0,
            writes: Vec::new(),
        }
    }

    /// Add a CPU with the given address mask.
    pub fn with_cpu(mut self, mask: u32) -> Self {
        self.masks.push(mask);
        self.memory.push(vec![0; mask as usize + 1]);
        self.regions.push(Vec::new());
        self
    }

    pub fn with_region(mut self, cpu: usize, start: u32, end: u32, kind: RegionKind) -> Self {
        self.regions[cpu].push(WriteRegion::new(start, end, kind));
        self
    }

    pub fn load(&mut self, cpu: usize, addr: u32, data: &[u8]) {
        let start = addr as usize;
        self.memory[cpu][start..start + data.len()].copy_from_slice(data);
    }

    pub fn peek(&self, cpu: usize, addr: u32) -> u8 {
        self.memory[cpu][addr as usize]
    }

    /// Change memory behind the cheat engine's back, without logging a write.
    pub fn poke(&mut self, cpu: usize, addr: u32, data: u8) {
        self.memory[cpu][addr as usize] = data;
    }
}

impl CheatBus for TestBus {
    fn read_byte(&mut self, cpu: usize, addr: u32) -> u8 {
        self.memory[cpu][(addr & self.masks[cpu]) as usize]
    }

    fn write_byte(&mut self, cpu: usize, addr: u32, data: u8) {
        self.memory[cpu][(addr & self.masks[cpu]) as usize] = data;
        self.writes.push((cpu, addr, data));
    }
}

impl MachineInfo for TestBus {
    fn driver_name(&self) -> &str {
        &self.driver
    }

    fn cpu_count(&self) -> usize {
        self.masks.len()
    }

    fn address_mask(&self, cpu: usize) -> u32 {
        self.masks[cpu]
    }

    fn frames_per_second(&self) -> f64 {
        self.fps
    }

    fn write_regions(&self, cpu: usize) -> Vec<WriteRegion> {
        self.regions[cpu].clone()
    }

    fn preferred_search_bank(&self) -> Option<u8> {
        self.preferred_bank
    }

    #[cfg(feature = "code-patch")]
    fn matches_crc(&self, crc: u32) -> bool {
        crc == 0 || crc == self.crc
    }
}
