//! Cheat trigger codes.
//!
//! A numeric code selects how and when a subcheat pokes memory. The same
//! [`Trigger`] decoding drives both database classification and the
//! per-frame executor, so the two can never disagree about a code.
//!
//! | code | behaviour |
//! |---|---|
//! | 0 | poke every frame |
//! | 1 | poke once |
//! | 2, 3, 4 | poke every 1, 2, 5 seconds |
//! | 5, 6, 7 | poke 1, 2, 5 seconds after the value changed |
//! | 8-11 | poke unless the value is decremented by 1-4 per frame |
//! | 20, 21, 22-24 | set bits every frame / once / every 1, 2, 5 seconds |
//! | 40, 41, 42-44 | reset bits every frame / once / every 1, 2, 5 seconds |
//! | 60-65 | user-selected value, poked once when the value changes |
//! | 70-75 | user-selected value, poked once |
//! | 500-599 | linked continuation of the previous cheat (database only) |
//! | 998 | watch only |
//! | 999 | comment only |

use super::CheatFlags;

pub const CODE_POKE: u32 = 0;
pub const LAST_DIRECT_CODE: u32 = 99;
pub const LINK_START: u32 = 500;
pub const LINK_END: u32 = 599;
pub const CODE_WATCH: u32 = 998;
pub const CODE_COMMENT: u32 = 999;

/// Executor policy selected by a code.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Trigger {
    Poke,
    PokeOnce,
    PokePeriodic,
    PokeAfterChange,
    /// Guard against a natural decrement of the given amount per frame.
    DecrementGuard(u8),
    SetBits,
    SetBitsOnce,
    SetBitsPeriodic,
    ResetBits,
    ResetBitsOnce,
    ResetBitsPeriodic,
    UserOnChange,
    UserOnce,
    Watch,
    Comment,
    /// Unrecognised code: never acts.
    Inert,
}

impl Trigger {
    pub fn from_code(code: u32) -> Self {
        match code {
            0 => Self::Poke,
            1 => Self::PokeOnce,
            2..=4 => Self::PokePeriodic,
            5..=7 => Self::PokeAfterChange,
            // Expected decrement is code - 8 + 1.
            8..=11 => Self::DecrementGuard((code - 8 + 1) as u8),
            20 => Self::SetBits,
            21 => Self::SetBitsOnce,
            22..=24 => Self::SetBitsPeriodic,
            40 => Self::ResetBits,
            41 => Self::ResetBitsOnce,
            42..=44 => Self::ResetBitsPeriodic,
            60..=65 => Self::UserOnChange,
            70..=75 => Self::UserOnce,
            CODE_WATCH => Self::Watch,
            CODE_COMMENT => Self::Comment,
            _ => Self::Inert,
        }
    }

    pub fn is_user_selectable(self) -> bool {
        matches!(self, Self::UserOnChange | Self::UserOnce)
    }
}

/// Whether `code` marks a database line as a linked continuation.
pub fn is_link_code(code: u32) -> bool {
    (LINK_START..=LINK_END).contains(&code)
}

/// Timer period in seconds for the periodic and delayed codes.
fn period_seconds(code: u32) -> u32 {
    match code {
        2 | 5 | 22 | 42 => 1,
        3 | 6 | 23 | 43 => 2,
        4 | 7 | 24 | 44 => 5,
        _ => 0,
    }
}

/// Metadata derived from a code when a subcheat is created.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Classification {
    pub frames_til_trigger: u32,
    pub min: u8,
    pub max: u8,
    /// Data byte to keep; user-selectable, watch and comment codes clear it.
    pub data: u8,
    /// Comment codes force the address to 0.
    pub clears_address: bool,
    /// Flags to set on the owning cheat.
    pub flags: CheatFlags,
}

/// Classify `code` with the given `data` byte at frame rate `fps`.
///
/// Deterministic: the same inputs always produce the same result.
pub fn classify(code: u32, data: u8, fps: f64) -> Classification {
    let trigger = Trigger::from_code(code);
    let frames_til_trigger = (period_seconds(code) as f64 * fps) as u32;

    let mut class = Classification {
        frames_til_trigger,
        min: 0,
        max: 0xFF,
        data,
        clears_address: false,
        flags: CheatFlags::empty(),
    };

    match trigger {
        Trigger::UserOnChange | Trigger::UserOnce => {
            // The data field carries the upper bound of the user's choice.
            class.min = if matches!(code, 62 | 65 | 72 | 75) { 1 } else { 0 };
            class.max = data;
            class.data = 0;
        }
        Trigger::Watch => {
            class.max = 0;
            class.data = 0;
            class.flags = CheatFlags::WATCH;
        }
        Trigger::Comment => {
            class.max = 0;
            class.data = 0;
            class.clears_address = true;
            class.flags = CheatFlags::COMMENT;
        }
        _ => {}
    }

    class
}

/// How a user-selectable value is presented and encoded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UserValueFormat {
    /// Value is stored as packed BCD.
    pub bcd: bool,
    /// Added to the stored value for display (1 for "1 to byte+1" codes).
    pub display_offset: u8,
}

/// Presentation of the value range of a user-selectable code, if it is one.
pub fn user_value_format(code: u32) -> Option<UserValueFormat> {
    let base = match code {
        60..=65 => code - 60,
        70..=75 => code - 70,
        _ => return None,
    };
    Some(UserValueFormat {
        bcd: matches!(base, 3..=5),
        display_offset: if matches!(base, 1 | 4) { 1 } else { 0 },
    })
}

/// Whether `value` is a valid packed-BCD byte (both digits 0-9).
pub fn is_bcd(value: u8) -> bool {
    (value & 0x0F) <= 9 && value <= 0x99
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn periods_follow_frame_rate() {
        assert_eq!(classify(2, 0x10, 60.0).frames_til_trigger, 60);
        assert_eq!(classify(6, 0x10, 60.0).frames_til_trigger, 120);
        assert_eq!(classify(44, 0x10, 60.0).frames_til_trigger, 300);
        // Fractional rates truncate
        assert_eq!(classify(22, 0x10, 60.61).frames_til_trigger, 60);
        assert_eq!(classify(24, 0x10, 60.61).frames_til_trigger, 303);
    }

    #[test]
    fn user_codes_move_data_into_max() {
        let class = classify(62, 0x09, 60.0);
        assert_eq!(class.min, 1);
        assert_eq!(class.max, 0x09);
        assert_eq!(class.data, 0);

        let class = classify(70, 0x63, 60.0);
        assert_eq!(class.min, 0);
        assert_eq!(class.max, 0x63);
    }

    #[test]
    fn comment_clears_address_and_data() {
        let class = classify(CODE_COMMENT, 0x55, 60.0);
        assert!(class.clears_address);
        assert_eq!(class.data, 0);
        assert_eq!(class.flags, CheatFlags::COMMENT);
    }

    #[test]
    fn decrement_guard_amounts() {
        assert_eq!(Trigger::from_code(8), Trigger::DecrementGuard(1));
        assert_eq!(Trigger::from_code(11), Trigger::DecrementGuard(4));
    }

    #[test]
    fn link_range() {
        assert!(!is_link_code(499));
        assert!(is_link_code(500));
        assert!(is_link_code(599));
        assert!(!is_link_code(600));
    }

    #[test]
    fn user_value_formats() {
        assert_eq!(
            user_value_format(64),
            Some(UserValueFormat { bcd: true, display_offset: 1 })
        );
        assert_eq!(
            user_value_format(72),
            Some(UserValueFormat { bcd: false, display_offset: 0 })
        );
        assert_eq!(user_value_format(1), None);
    }

    #[test]
    fn bcd_check() {
        assert!(is_bcd(0x99));
        assert!(is_bcd(0x42));
        assert!(!is_bcd(0x1A));
        assert!(!is_bcd(0xA0));
    }
}
