//! Machine registry for automatic front-end discovery.
//!
//! Each board module self-registers via [`inventory::submit!`] with a
//! [`MachineEntry`] naming the machine on the command line and pointing at
//! its static memory layout. The front-end discovers available machines at
//! runtime without any central list.

use crate::layout::MachineLayout;
use crate::ram_machine::RamMachine;

/// Describes a machine the front-end can host cheats for.
pub struct MachineEntry {
    /// CLI name used to select this machine (e.g., "joust").
    pub name: &'static str,
    pub layout: &'static MachineLayout,
}

impl MachineEntry {
    pub const fn new(name: &'static str, layout: &'static MachineLayout) -> Self {
        Self { name, layout }
    }

    /// Build a fresh headless machine with zeroed writable memory.
    pub fn create(&self) -> RamMachine {
        RamMachine::from_layout(self.layout)
    }
}

inventory::collect!(MachineEntry);

/// Return all registered machines, sorted by name.
pub fn all() -> Vec<&'static MachineEntry> {
    let mut entries: Vec<_> = inventory::iter::<MachineEntry>.into_iter().collect();
    entries.sort_by_key(|e| e.name);
    entries
}

/// Look up a machine by its CLI name.
pub fn find(name: &str) -> Option<&'static MachineEntry> {
    inventory::iter::<MachineEntry>
        .into_iter()
        .find(|e| e.name == name)
}
