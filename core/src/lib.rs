pub mod cheat;
pub mod core;
pub mod engine;
pub mod error;
pub mod search;
pub mod watch;

pub mod prelude {
    pub use crate::cheat::database::{DatabaseSource, DirectorySource};
    pub use crate::cheat::table::CheatTable;
    pub use crate::cheat::{Cheat, CheatFlags, SubCheat};
    pub use crate::core::{CheatBus, CheatHost, MachineInfo, RegionKind, WriteRegion};
    pub use crate::engine::{CheatConfig, CheatEngine};
    pub use crate::error::{DatabaseError, SearchError};
    pub use crate::search::{
        MemorySearch, RestoreStatus, SearchComparison, SearchSpeed, SearchStart,
    };
    pub use crate::watch::{WatchLabel, WatchTable, Watchpoint};
}
