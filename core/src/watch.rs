//! Watchpoints: live memory bytes shown on screen.
//!
//! The table has a fixed number of slots. A slot is in use while its byte
//! count is nonzero. Watches are independent of cheats but may be tied to
//! one, in which case they follow it when the cheat table changes.

use log::debug;

use crate::cheat::Cheat;
use crate::core::CheatHost;

/// Number of watch slots.
pub const MAX_WATCHES: usize = 20;

/// Longest text label kept, in characters.
pub const MAX_LABEL_LEN: usize = 254;

/// What follows the bytes of a watch line.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum WatchLabel {
    #[default]
    None,
    /// The watched address, in hex.
    Address,
    /// Free text.
    Text(String),
}

impl WatchLabel {
    /// A text label, cut to [`MAX_LABEL_LEN`] characters.
    pub fn text(text: &str) -> Self {
        Self::Text(text.chars().take(MAX_LABEL_LEN).collect())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Watchpoint {
    pub cpu: usize,
    pub address: u32,
    /// Consecutive bytes shown; 0 marks the slot unused.
    pub length: u8,
    pub label: WatchLabel,
    /// Index of the cheat this watch was created from.
    pub cheat: Option<usize>,
    pub x: u16,
    pub y: u16,
}

impl Watchpoint {
    pub fn new(cpu: usize, address: u32, length: u8) -> Self {
        Self {
            cpu,
            address,
            length,
            ..Self::default()
        }
    }

    pub fn with_label(mut self, label: WatchLabel) -> Self {
        self.label = match label {
            WatchLabel::Text(text) => WatchLabel::text(&text),
            other => other,
        };
        self
    }

    pub fn is_active(&self) -> bool {
        self.length != 0
    }
}

/// One rendered watch, ready for the display.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WatchLine {
    pub x: u16,
    pub y: u16,
    pub text: String,
}

pub struct WatchTable {
    slots: Vec<Watchpoint>,
    visible: bool,
}

impl WatchTable {
    /// All slots unused, stacked down the screen `line_height` pixels apart.
    pub fn new(line_height: u16) -> Self {
        let slots = (0..MAX_WATCHES)
            .map(|slot| Watchpoint {
                y: (slot as u16).saturating_mul(line_height),
                ..Watchpoint::default()
            })
            .collect();
        Self {
            slots,
            visible: true,
        }
    }

    pub fn slots(&self) -> &[Watchpoint] {
        &self.slots
    }

    pub fn get(&self, slot: usize) -> Option<&Watchpoint> {
        self.slots.get(slot)
    }

    /// Any slot in use.
    pub fn is_active(&self) -> bool {
        self.slots.iter().any(Watchpoint::is_active)
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Show or hide every watch at once. Returns the new visibility.
    pub fn toggle_visible(&mut self) -> bool {
        self.visible = !self.visible;
        debug!("watchpoints {}", if self.visible { "on" } else { "off" });
        self.visible
    }

    pub fn find_free(&self) -> Option<usize> {
        self.slots.iter().position(|watch| !watch.is_active())
    }

    /// Replace slot `slot` (clamped to the last slot), keeping its screen position.
    ///
    /// Text labels are cut to [`MAX_LABEL_LEN`]. Returns the slot used.
    pub fn configure(&mut self, slot: usize, mut watch: Watchpoint) -> usize {
        let slot = slot.min(MAX_WATCHES - 1);
        if let WatchLabel::Text(text) = &mut watch.label {
            if let Some((cut, _)) = text.char_indices().nth(MAX_LABEL_LEN) {
                text.truncate(cut);
            }
        }
        let entry = &mut self.slots[slot];
        let (x, y) = (entry.x, entry.y);
        *entry = Watchpoint { x, y, ..watch };
        debug!(
            "watch {slot}: cpu {} address {:X} x{}",
            entry.cpu, entry.address, entry.length
        );
        slot
    }

    /// Put `watch` in the first free slot. `None` when every slot is taken.
    pub fn add(&mut self, watch: Watchpoint) -> Option<usize> {
        let slot = self.find_free()?;
        Some(self.configure(slot, watch))
    }

    /// Move slot `slot` (clamped) on screen.
    pub fn set_position(&mut self, slot: usize, x: u16, y: u16) {
        let entry = &mut self.slots[slot.min(MAX_WATCHES - 1)];
        entry.x = x;
        entry.y = y;
    }

    /// Mark slot `slot` (clamped) unused.
    pub fn clear(&mut self, slot: usize) {
        self.configure(slot, Watchpoint::default());
    }

    /// Watch the master byte of cheat `index`, labelled with the cheat's name.
    pub fn watch_cheat(&mut self, index: usize, cheat: &Cheat) -> Option<usize> {
        let master = cheat.master();
        let watch = Watchpoint {
            cheat: Some(index),
            ..Watchpoint::new(master.cpu, master.address, 1)
                .with_label(WatchLabel::text(&cheat.name))
        };
        self.add(watch)
    }

    /// Follow the removal of cheat `index` from the cheat table.
    pub fn cheat_deleted(&mut self, index: usize) {
        for watch in &mut self.slots {
            watch.cheat = match watch.cheat {
                Some(tied) if tied == index => None,
                Some(tied) if tied > index => Some(tied - 1),
                other => other,
            };
        }
    }

    /// Follow the insertion of a cheat at `index` into the cheat table.
    pub fn cheat_inserted(&mut self, index: usize) {
        for watch in &mut self.slots {
            if let Some(tied) = watch.cheat.as_mut().filter(|tied| **tied >= index) {
                *tied += 1;
            }
        }
    }

    /// Text of every slot in use, reading the watched bytes from `host`.
    ///
    /// Nothing is produced while the table is hidden.
    pub fn display_lines<H: CheatHost + ?Sized>(&self, host: &mut H) -> Vec<WatchLine> {
        if !self.visible {
            return Vec::new();
        }
        self.slots
            .iter()
            .filter(|watch| watch.is_active())
            .map(|watch| WatchLine {
                x: watch.x,
                y: watch.y,
                text: render(watch, host),
            })
            .collect()
    }
}

impl Default for WatchTable {
    fn default() -> Self {
        Self::new(8)
    }
}

fn render<H: CheatHost + ?Sized>(watch: &Watchpoint, host: &mut H) -> String {
    let mut text = (0..u32::from(watch.length))
        .map(|offset| {
            let byte = host.read_byte(watch.cpu, watch.address.wrapping_add(offset));
            format!("{byte:02x}")
        })
        .collect::<Vec<_>>()
        .join(" ");

    match &watch.label {
        WatchLabel::None => {}
        WatchLabel::Address if host.address_bits(watch.cpu) <= 16 => {
            text.push_str(&format!(" ({:04x})", watch.address));
        }
        WatchLabel::Address => text.push_str(&format!(" ({:08x})", watch.address)),
        WatchLabel::Text(label) => text.push_str(&format!(" ({label})")),
    }
    text
}
