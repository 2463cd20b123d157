pub mod layout;
pub mod ram_machine;
pub mod registry;

pub mod dkong;
pub mod missile_command;
pub mod pacman;
pub mod williams;

pub use layout::{CpuLayout, MachineLayout, RegionLayout};
pub use ram_machine::RamMachine;
pub use registry::MachineEntry;
