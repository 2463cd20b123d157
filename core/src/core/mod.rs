pub mod bus;
pub mod machine;

pub use bus::CheatBus;
pub use machine::{CheatHost, MachineInfo, RegionKind, WriteRegion, format_address};
