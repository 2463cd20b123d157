//! The cheat engine context.
//!
//! [`CheatEngine`] owns everything the cheat subsystem keeps between calls:
//! the cheat table, the watchpoints, the memory search and the session
//! flags. The host creates one per running machine and drives it from its
//! frame loop.

use std::io::BufRead;

use log::{debug, info};

use crate::cheat::database::{self, DEFAULT_DATABASE, DatabaseSource};
use crate::cheat::executor::run_frame;
use crate::cheat::table::CheatTable;
use crate::cheat::{Cheat, SubCheat};
use crate::core::{CheatBus, MachineInfo};
use crate::error::DatabaseError;
use crate::search::{MemorySearch, SearchSpeed};
use crate::watch::WatchTable;

/// Cheat engine settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CheatConfig {
    /// Database files, separated by `;` or `:`, loaded in order.
    pub cheat_files: String,
    pub search_speed: SearchSpeed,
    /// Cap on the bytes the search tables may take. `None` leaves only
    /// real allocation failure as a bound.
    pub search_memory_limit: Option<usize>,
    /// Vertical spacing of watch lines on screen.
    pub watch_line_height: u16,
}

impl Default for CheatConfig {
    fn default() -> Self {
        Self {
            cheat_files: DEFAULT_DATABASE.to_owned(),
            search_speed: SearchSpeed::default(),
            search_memory_limit: None,
            watch_line_height: 8,
        }
    }
}

pub struct CheatEngine {
    config: CheatConfig,
    table: CheatTable,
    watches: WatchTable,
    search: MemorySearch,
    /// Master switch; when off no cheat pokes memory.
    enabled: bool,
    /// Set once any cheat has been turned on this session.
    user_cheated: bool,
}

impl CheatEngine {
    pub fn new(config: CheatConfig) -> Self {
        let watches = WatchTable::new(config.watch_line_height);
        let search = MemorySearch::new(config.search_speed, config.search_memory_limit);
        Self {
            config,
            table: CheatTable::new(),
            watches,
            search,
            enabled: true,
            user_cheated: false,
        }
    }

    /// Reset the session and load the configured databases for `info`'s driver.
    ///
    /// Returns the number of cheats loaded.
    pub fn init<S, M>(&mut self, source: &S, info: &M) -> usize
    where
        S: DatabaseSource + ?Sized,
        M: MachineInfo + ?Sized,
    {
        self.user_cheated = false;
        self.enabled = true;
        self.search.reset();
        self.watches = WatchTable::new(self.config.watch_line_height);
        self.load_databases(source, info, false)
    }

    /// Load every configured database. Without `merge` the table is emptied first.
    pub fn load_databases<S, M>(&mut self, source: &S, info: &M, merge: bool) -> usize
    where
        S: DatabaseSource + ?Sized,
        M: MachineInfo + ?Sized,
    {
        database::load_files(&mut self.table, source, &self.config.cheat_files, info, merge)
    }

    /// Merge one named database into the table.
    pub fn load_database<S, M>(
        &mut self,
        source: &S,
        name: &str,
        info: &M,
    ) -> Result<usize, DatabaseError>
    where
        S: DatabaseSource + ?Sized,
        M: MachineInfo + ?Sized,
    {
        database::load_file(&mut self.table, source, name, info)
    }

    /// Merge records read straight from `reader`, e.g. a cheat typed in by hand.
    pub fn load_from<R, M>(&mut self, reader: R, info: &M) -> usize
    where
        R: BufRead,
        M: MachineInfo + ?Sized,
    {
        database::load(&mut self.table, reader, info)
    }

    /// Release the cheats and search tables at the end of a session.
    pub fn stop(&mut self) {
        info!(
            "cheat engine stopped ({} cheats, {} active)",
            self.table.len(),
            self.table.active_count()
        );
        self.table.clear();
        self.search.reset();
    }

    pub fn config(&self) -> &CheatConfig {
        &self.config
    }

    pub fn table(&self) -> &CheatTable {
        &self.table
    }

    /// Mutable access for editing a cheat's name, comment or subcheat fields.
    pub fn cheat_mut(&mut self, index: usize) -> Option<&mut Cheat> {
        self.table.get_mut(index)
    }

    pub fn watches(&self) -> &WatchTable {
        &self.watches
    }

    pub fn watches_mut(&mut self) -> &mut WatchTable {
        &mut self.watches
    }

    pub fn search(&self) -> &MemorySearch {
        &self.search
    }

    pub fn search_mut(&mut self) -> &mut MemorySearch {
        &mut self.search
    }

    // -----------------------------------------------------------------------
    // Cheat table editing
    // -----------------------------------------------------------------------

    /// Insert a placeholder cheat; watches tied to later cheats follow them.
    pub fn insert_cheat(&mut self, index: usize) -> Option<usize> {
        let index = self.table.insert_cheat(index)?;
        self.watches.cheat_inserted(index);
        Some(index)
    }

    /// Remove a cheat; watches tied to it are untied.
    pub fn delete_cheat(&mut self, index: usize) -> Option<Cheat> {
        let index = index.min(self.table.len().checked_sub(1)?);
        let cheat = self.table.delete_cheat(index)?;
        self.watches.cheat_deleted(index);
        Some(cheat)
    }

    pub fn insert_subcheat(&mut self, cheat: usize, sub: usize) -> Option<(usize, usize)> {
        self.table.insert_subcheat(cheat, sub)
    }

    pub fn delete_subcheat(&mut self, cheat: usize, sub: usize) -> Option<SubCheat> {
        self.table.delete_subcheat(cheat, sub)
    }

    /// Turn cheat `index` on or off.
    ///
    /// Turning a cheat on marks the session as cheated. With code patches,
    /// turning a code-patch cheat off writes its original bytes back.
    #[cfg_attr(not(feature = "code-patch"), allow(unused_variables))]
    pub fn set_status<B: CheatBus + ?Sized>(
        &mut self,
        index: usize,
        active: bool,
        bus: &mut B,
    ) -> Option<usize> {
        let index = self.table.set_status(index, active)?;
        if active {
            self.user_cheated = true;
        }
        #[cfg(feature = "code-patch")]
        if !active {
            self.unpatch(index, bus);
        }
        Some(index)
    }

    /// Write back the original bytes of a code-patch cheat.
    #[cfg(feature = "code-patch")]
    fn unpatch<B: CheatBus + ?Sized>(&self, index: usize, bus: &mut B) {
        let Some(cheat) = self.table.get(index) else {
            return;
        };
        if cheat.patch != crate::cheat::PatchKind::Code {
            return;
        }
        for sub in cheat.subcheats() {
            bus.write_byte(sub.cpu, sub.address, sub.old_data);
        }
    }

    /// Flip cheat `index` as a menu would: the master switch is turned back on.
    pub fn toggle_cheat<B: CheatBus + ?Sized>(
        &mut self,
        index: usize,
        bus: &mut B,
    ) -> Option<usize> {
        let cheat = self.table.get(index)?;
        if cheat.is_comment() {
            return None;
        }
        let active = !cheat.is_active();
        let index = self.set_status(index, active, bus)?;
        self.enabled = true;
        Some(index)
    }

    // -----------------------------------------------------------------------
    // Session flags
    // -----------------------------------------------------------------------

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Flip the master switch. Only has an effect while some cheat is active.
    ///
    /// Returns the master switch state after the call.
    pub fn toggle_enabled(&mut self) -> bool {
        if self.table.active_count() != 0 {
            self.enabled = !self.enabled;
            info!("cheats {}", if self.enabled { "on" } else { "off" });
        }
        self.enabled
    }

    /// Whether any cheat has been turned on since [`CheatEngine::init`].
    pub fn user_has_cheated(&self) -> bool {
        self.user_cheated
    }

    // -----------------------------------------------------------------------
    // Per frame
    // -----------------------------------------------------------------------

    /// Run every active cheat for one frame. Returns the number of bytes written.
    pub fn do_cheat<B: CheatBus + ?Sized>(&mut self, bus: &mut B) -> usize {
        if !self.enabled || self.table.active_count() == 0 {
            return 0;
        }
        run_frame(&mut self.table, bus)
    }

    /// Add a watch on cheat `index`'s master address.
    pub fn add_watch_from_cheat(&mut self, index: usize) -> Option<usize> {
        let cheat = self.table.get(index)?;
        let slot = self.watches.watch_cheat(index, cheat);
        debug!("watch for cheat {index}: {slot:?}");
        slot
    }
}

impl Default for CheatEngine {
    fn default() -> Self {
        Self::new(CheatConfig::default())
    }
}
