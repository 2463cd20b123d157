pub mod code;
pub mod database;
pub mod executor;
pub mod table;

use bitflags::bitflags;

use code::{Trigger, classify};

bitflags! {
    /// State bits of a [`Cheat`].
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct CheatFlags: u8 {
        /// Enabled by the user; counted in the active total.
        const ACTIVE = 0x01;
        /// Watch-only entry (code 998).
        const WATCH = 0x02;
        /// Comment-only entry (code 999); never activatable.
        const COMMENT = 0x04;
    }
}

bitflags! {
    /// Executor state bits of a [`SubCheat`].
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct SubCheatFlags: u16 {
        /// One-shot action has fired; cleared only by re-activating the cheat.
        const DONE = 0x0001;
        /// A delay or guard window is open.
        const TIMED = 0x0002;
    }
}

/// How a code-patch database entry is restored when it is turned off.
#[cfg(feature = "code-patch")]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PatchKind {
    /// 'C': the original byte is written back on deactivation.
    Code,
    /// Anything else: plain data patch.
    #[default]
    Data,
}

/// One (cpu, address, data) action plus its trigger policy.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SubCheat {
    pub cpu: usize,
    /// Address, already masked to the CPU's address bus.
    pub address: u32,
    /// Byte to poke (or bit mask for the set/reset codes).
    pub data: u8,
    /// Original byte restored when a code patch is turned off.
    #[cfg(feature = "code-patch")]
    pub old_data: u8,
    /// Last observed or pre-change byte, depending on the code.
    pub backup: u8,
    pub code: u32,
    /// Lower bound of a user-selectable value (metadata for the UI).
    pub min: u8,
    /// Upper bound of a user-selectable value (metadata for the UI).
    pub max: u8,
    /// Frames between firings for timed codes; fixed once classified.
    pub frames_til_trigger: u32,
    /// Countdown, decremented every frame while nonzero.
    pub frame_count: u32,
    flags: SubCheatFlags,
}

impl SubCheat {
    /// Create an unclassified subcheat with code 0.
    pub fn new(cpu: usize, address: u32, data: u8) -> Self {
        Self {
            cpu,
            address,
            data,
            max: 0xFF,
            ..Self::default()
        }
    }

    /// Assign `code`, deriving timing and bounds at frame rate `fps`.
    ///
    /// Returns the flags the owning cheat must carry for this code.
    pub fn set_code(&mut self, code: u32, fps: f64) -> CheatFlags {
        let class = classify(code, self.data, fps);
        self.code = code;
        self.frames_til_trigger = class.frames_til_trigger;
        self.min = class.min;
        self.max = class.max;
        self.data = class.data;
        if class.clears_address {
            self.address = 0;
        }
        class.flags
    }

    pub fn trigger(&self) -> Trigger {
        Trigger::from_code(self.code)
    }

    pub fn flags(&self) -> SubCheatFlags {
        self.flags
    }

    pub fn is_done(&self) -> bool {
        self.flags.contains(SubCheatFlags::DONE)
    }

    pub fn is_timed(&self) -> bool {
        self.flags.contains(SubCheatFlags::TIMED)
    }

    pub(crate) fn set_done(&mut self) {
        self.flags.insert(SubCheatFlags::DONE);
    }

    pub(crate) fn set_timed(&mut self) {
        self.flags.insert(SubCheatFlags::TIMED);
    }

    pub(crate) fn clear_timed(&mut self) {
        self.flags.remove(SubCheatFlags::TIMED);
    }

    /// Zero the countdown and backup and close any open window.
    pub(crate) fn reset_counters(&mut self) {
        self.frame_count = 0;
        self.backup = 0;
        self.clear_timed();
    }

    /// Full reset on activation: counters plus the one-shot DONE bit.
    pub(crate) fn rearm(&mut self) {
        self.reset_counters();
        self.flags = SubCheatFlags::empty();
    }
}

/// A named, user-toggleable cheat made of one or more subcheats.
///
/// Subcheat 0 is the master; later entries come from linked database lines.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cheat {
    pub name: String,
    pub comment: Option<String>,
    #[cfg(feature = "code-patch")]
    pub crc: u32,
    #[cfg(feature = "code-patch")]
    pub patch: PatchKind,
    flags: CheatFlags,
    subcheats: Vec<SubCheat>,
}

impl Cheat {
    /// Name given to freshly inserted cheats.
    pub const PLACEHOLDER_NAME: &'static str = "(none)";

    /// Create an inactive cheat with a single zeroed subcheat.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_master(name, None, SubCheat::default())
    }

    /// Create an inactive cheat around an already classified master subcheat.
    pub fn with_master(name: impl Into<String>, comment: Option<String>, master: SubCheat) -> Self {
        Self {
            name: name.into(),
            comment,
            #[cfg(feature = "code-patch")]
            crc: 0,
            #[cfg(feature = "code-patch")]
            patch: PatchKind::Data,
            flags: CheatFlags::empty(),
            subcheats: vec![master],
        }
    }

    pub fn flags(&self) -> CheatFlags {
        self.flags
    }

    pub fn is_active(&self) -> bool {
        self.flags.contains(CheatFlags::ACTIVE)
    }

    pub fn is_watch(&self) -> bool {
        self.flags.contains(CheatFlags::WATCH)
    }

    pub fn is_comment(&self) -> bool {
        self.flags.contains(CheatFlags::COMMENT)
    }

    pub(crate) fn set_active(&mut self, active: bool) {
        self.flags.set(CheatFlags::ACTIVE, active);
    }

    /// Add the WATCH/COMMENT bits a subcheat's code calls for.
    pub(crate) fn add_code_flags(&mut self, flags: CheatFlags) {
        self.flags.insert(flags & (CheatFlags::WATCH | CheatFlags::COMMENT));
    }

    pub fn master(&self) -> &SubCheat {
        &self.subcheats[0]
    }

    pub fn subcheats(&self) -> &[SubCheat] {
        &self.subcheats
    }

    pub fn subcheats_mut(&mut self) -> &mut [SubCheat] {
        &mut self.subcheats
    }

    /// Assign a code to subcheat `index` (clamped) and carry its flags onto the cheat.
    pub fn set_subcheat_code(&mut self, index: usize, code: u32, fps: f64) {
        let index = index.min(self.subcheats.len() - 1);
        let flags = self.subcheats[index].set_code(code, fps);
        self.add_code_flags(flags);
    }

    /// Insert a zeroed subcheat at `index`, clamped to the end of the list.
    ///
    /// Returns the index actually used.
    pub fn insert_subcheat(&mut self, index: usize) -> usize {
        let index = index.min(self.subcheats.len());
        self.subcheats.insert(index, SubCheat::default());
        index
    }

    /// Remove the subcheat at `index`, clamped to the last entry.
    ///
    /// The master is never removed from a single-entry cheat.
    pub fn delete_subcheat(&mut self, index: usize) -> Option<SubCheat> {
        if self.subcheats.len() < 2 {
            return None;
        }
        let index = index.min(self.subcheats.len() - 1);
        Some(self.subcheats.remove(index))
    }

    pub(crate) fn push_subcheat(&mut self, subcheat: SubCheat) {
        self.subcheats.push(subcheat);
    }
}
