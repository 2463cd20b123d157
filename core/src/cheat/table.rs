//! The in-memory cheat table.
//!
//! Order is significant (it is the display and execution order). The
//! number of active cheats is tracked incrementally by [`CheatTable::set_status`]
//! so the per-frame executor can bail out in O(1) when nothing is enabled.

use log::debug;

use super::{Cheat, SubCheat};

/// Maximum number of cheats held at once.
pub const MAX_LOADED_CHEATS: usize = 200;

pub struct CheatTable {
    cheats: Vec<Cheat>,
    active_count: usize,
    capacity: usize,
}

impl CheatTable {
    pub fn new() -> Self {
        Self::with_capacity(MAX_LOADED_CHEATS)
    }

    /// Create a table bounded to `capacity` cheats.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            cheats: Vec::new(),
            active_count: 0,
            capacity,
        }
    }

    pub fn len(&self) -> usize {
        self.cheats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cheats.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.cheats.len() >= self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of cheats with the ACTIVE flag set.
    pub fn active_count(&self) -> usize {
        self.active_count
    }

    pub fn get(&self, index: usize) -> Option<&Cheat> {
        self.cheats.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Cheat> {
        self.cheats.get_mut(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Cheat> {
        self.cheats.iter()
    }

    pub(crate) fn cheats_mut(&mut self) -> &mut [Cheat] {
        &mut self.cheats
    }

    /// Drop every cheat and zero the active count.
    pub fn clear(&mut self) {
        self.cheats.clear();
        self.active_count = 0;
    }

    /// Clamp `index` to the last valid entry; `None` when the table is empty.
    fn clamp_index(&self, index: usize) -> Option<usize> {
        if self.cheats.is_empty() {
            None
        } else {
            Some(index.min(self.cheats.len() - 1))
        }
    }

    /// Insert a placeholder cheat at `index` (clamped to the end of the table).
    ///
    /// Returns the index used, or `None` if the table is full.
    pub fn insert_cheat(&mut self, index: usize) -> Option<usize> {
        if self.is_full() {
            return None;
        }
        let index = index.min(self.cheats.len());
        self.cheats.insert(index, Cheat::new(Cheat::PLACEHOLDER_NAME));
        Some(index)
    }

    /// Append a fully formed cheat, as the database loader does.
    ///
    /// Returns the new index, or `None` if the table is full. An active
    /// cheat is counted.
    pub fn push(&mut self, cheat: Cheat) -> Option<usize> {
        if self.is_full() {
            return None;
        }
        if cheat.is_active() {
            self.active_count += 1;
        }
        self.cheats.push(cheat);
        Some(self.cheats.len() - 1)
    }

    /// Remove the cheat at `index` (clamped to the last entry).
    pub fn delete_cheat(&mut self, index: usize) -> Option<Cheat> {
        let index = self.clamp_index(index)?;
        let cheat = self.cheats.remove(index);
        if cheat.is_active() {
            self.active_count -= 1;
        }
        Some(cheat)
    }

    /// Insert a zeroed subcheat into cheat `cheat_index` (both indices clamped).
    ///
    /// Returns the (cheat, subcheat) indices used.
    pub fn insert_subcheat(
        &mut self,
        cheat_index: usize,
        sub_index: usize,
    ) -> Option<(usize, usize)> {
        let cheat_index = self.clamp_index(cheat_index)?;
        let sub_index = self.cheats[cheat_index].insert_subcheat(sub_index);
        Some((cheat_index, sub_index))
    }

    /// Remove a subcheat from cheat `cheat_index` (both indices clamped).
    pub fn delete_subcheat(&mut self, cheat_index: usize, sub_index: usize) -> Option<SubCheat> {
        let cheat_index = self.clamp_index(cheat_index)?;
        self.cheats[cheat_index].delete_subcheat(sub_index)
    }

    /// Turn cheat `index` (clamped) on or off.
    ///
    /// Activation re-arms every subcheat (counters, backup, DONE and TIMED
    /// cleared). Deactivation resets counters and backup. Comment cheats
    /// cannot be activated. Returns the index affected, or `None` when
    /// nothing was done.
    pub fn set_status(&mut self, index: usize, active: bool) -> Option<usize> {
        let index = self.clamp_index(index)?;
        let cheat = &mut self.cheats[index];

        if active {
            if cheat.is_comment() {
                return None;
            }
            cheat.subcheats_mut().iter_mut().for_each(SubCheat::rearm);
            if !cheat.is_active() {
                cheat.set_active(true);
                self.active_count += 1;
            }
            debug!("cheat {index} \"{}\" enabled", cheat.name);
        } else {
            cheat.subcheats_mut().iter_mut().for_each(SubCheat::reset_counters);
            if cheat.is_active() {
                cheat.set_active(false);
                self.active_count -= 1;
            }
            debug!("cheat {index} \"{}\" disabled", cheat.name);
        }
        Some(index)
    }
}

impl Default for CheatTable {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> IntoIterator for &'a CheatTable {
    type Item = &'a Cheat;
    type IntoIter = std::slice::Iter<'a, Cheat>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
