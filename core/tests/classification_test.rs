use phosphor_cheat::cheat::code::{CODE_COMMENT, CODE_WATCH, Classification, Trigger, classify};
use phosphor_cheat::cheat::{Cheat, CheatFlags, SubCheat};

/// Expected (frames_til_trigger, min, max, flags) for `code` with data 0x42 at 60 fps.
fn expected(code: u32) -> (u32, u8, u8, CheatFlags) {
    match code {
        2 | 5 | 22 | 42 => (60, 0, 0xFF, CheatFlags::empty()),
        3 | 6 | 23 | 43 => (120, 0, 0xFF, CheatFlags::empty()),
        4 | 7 | 24 | 44 => (300, 0, 0xFF, CheatFlags::empty()),
        60 | 61 | 63 | 64 | 70 | 71 | 73 | 74 => (0, 0, 0x42, CheatFlags::empty()),
        62 | 65 | 72 | 75 => (0, 1, 0x42, CheatFlags::empty()),
        CODE_WATCH => (0, 0, 0, CheatFlags::WATCH),
        CODE_COMMENT => (0, 0, 0, CheatFlags::COMMENT),
        _ => (0, 0, 0xFF, CheatFlags::empty()),
    }
}

fn all_codes() -> impl Iterator<Item = u32> {
    (0..=99).chain([CODE_WATCH, CODE_COMMENT])
}

#[test]
fn test_classification_table() {
    for code in all_codes() {
        let class = classify(code, 0x42, 60.0);
        let (frames, min, max, flags) = expected(code);
        assert_eq!(class.frames_til_trigger, frames, "code {code} frames");
        assert_eq!(class.min, min, "code {code} min");
        assert_eq!(class.max, max, "code {code} max");
        assert_eq!(class.flags, flags, "code {code} flags");
    }
}

#[test]
fn test_classification_is_deterministic() {
    for fps in [50.0, 57.5, 60.0, 60.61] {
        for code in all_codes() {
            let first: Classification = classify(code, 0x17, fps);
            assert_eq!(first, classify(code, 0x17, fps), "code {code} at {fps}");
        }
    }
}

#[test]
fn test_user_and_sentinel_codes_clear_data() {
    for code in all_codes() {
        let class = classify(code, 0x42, 60.0);
        let cleared = Trigger::from_code(code).is_user_selectable()
            || code == CODE_WATCH
            || code == CODE_COMMENT;
        assert_eq!(class.data, if cleared { 0 } else { 0x42 }, "code {code}");
        assert_eq!(class.clears_address, code == CODE_COMMENT, "code {code}");
    }
}

#[test]
fn test_set_code_applies_classification() {
    let mut sub = SubCheat::new(0, 0x4E14, 0x09);
    sub.set_code(CODE_COMMENT, 60.0);
    assert_eq!(sub.address, 0);
    assert_eq!(sub.data, 0);

    let mut cheat = Cheat::with_master("Lives", None, SubCheat::new(0, 0x4E14, 0x05));
    cheat.set_subcheat_code(0, 65, 60.0);
    let master = cheat.master();
    assert_eq!((master.min, master.max, master.data), (1, 0x05, 0));
    assert!(cheat.flags().is_empty());
}
