mod common;

use common::TestBus;
use phosphor_cheat::cheat::executor::run_frame;
use phosphor_cheat::cheat::table::CheatTable;
use phosphor_cheat::cheat::{Cheat, SubCheat};

const ADDR: u32 = 0x4E14;

/// One active cheat with a single subcheat at `ADDR`, classified at 60 fps.
fn active_cheat(code: u32, data: u8) -> CheatTable {
    let mut master = SubCheat::new(0, ADDR, data);
    master.set_code(code, 60.0);
    let mut table = CheatTable::new();
    table.push(Cheat::with_master("test", None, master));
    table.set_status(0, true);
    table
}

fn run(table: &mut CheatTable, bus: &mut TestBus, frames: usize) {
    for _ in 0..frames {
        run_frame(table, bus);
    }
}

#[test]
fn test_code_0_pokes_every_frame() {
    let mut bus = TestBus::new("pacman");
    let mut table = active_cheat(0, 0x06);
    for frame in 0..10u8 {
        bus.poke(0, ADDR, frame);
        run_frame(&mut table, &mut bus);
        assert_eq!(bus.peek(0, ADDR), 0x06);
    }
    assert_eq!(bus.writes.len(), 10);
    assert!(bus.writes.iter().all(|&w| w == (0, ADDR, 0x06)));
}

#[test]
fn test_code_1_pokes_once_until_rearmed() {
    let mut bus = TestBus::new("pacman");
    let mut table = active_cheat(1, 0x09);
    run(&mut table, &mut bus, 5);
    assert_eq!(bus.writes, vec![(0, ADDR, 0x09)]);
    assert!(table.get(0).unwrap().master().is_done());

    // Deactivating alone does not re-arm.
    table.set_status(0, false);
    assert!(table.get(0).unwrap().master().is_done());

    table.set_status(0, true);
    run(&mut table, &mut bus, 5);
    assert_eq!(bus.writes.len(), 2);
}

#[test]
fn test_periodic_poke() {
    let mut bus = TestBus::new("pacman");
    let mut table = active_cheat(2, 0x03);
    // Fires on frame 0, then waits 60 frames between pokes.
    run(&mut table, &mut bus, 1);
    assert_eq!(bus.writes.len(), 1);
    run(&mut table, &mut bus, 60);
    assert_eq!(bus.writes.len(), 1);
    run(&mut table, &mut bus, 1);
    assert_eq!(bus.writes.len(), 2);
}

#[test]
fn test_delayed_poke_without_change() {
    for code in [5, 6, 7] {
        let mut bus = TestBus::new("pacman");
        bus.poke(0, ADDR, 0x03);
        let mut table = active_cheat(code, 0x03);
        run(&mut table, &mut bus, 1000);
        assert!(bus.writes.is_empty(), "code {code}");
    }
}

#[test]
fn test_delayed_poke_after_change() {
    for (code, delay) in [(5, 60), (6, 120), (7, 300)] {
        let mut bus = TestBus::new("pacman");
        bus.poke(0, ADDR, 0x03);
        let mut table = active_cheat(code, 0x03);
        run(&mut table, &mut bus, 10);

        // The value drops; the change is seen on the next frame.
        bus.poke(0, ADDR, 0x02);
        run(&mut table, &mut bus, 1);
        run(&mut table, &mut bus, delay);
        assert!(bus.writes.is_empty(), "code {code} poked early");
        run(&mut table, &mut bus, 1);
        assert_eq!(bus.writes, vec![(0, ADDR, 0x03)], "code {code}");

        run(&mut table, &mut bus, 1000);
        assert_eq!(bus.writes.len(), 1, "code {code} poked again");
    }
}

#[test]
fn test_decrement_guard_allows_expected_decrement() {
    // Code 9 expects the value to drop by 2 per frame.
    let mut bus = TestBus::new("pacman");
    bus.poke(0, ADDR, 0x40);
    let mut table = active_cheat(9, 0x40);

    run(&mut table, &mut bus, 1); // snapshot 0x40
    bus.poke(0, ADDR, 0x3E);
    run(&mut table, &mut bus, 1); // countdown
    run(&mut table, &mut bus, 1); // check: 0x3E == 0x40 - 2
    assert!(bus.writes.is_empty());
}

#[test]
fn test_decrement_guard_forces_value() {
    let mut bus = TestBus::new("pacman");
    bus.poke(0, ADDR, 0x40);
    let mut table = active_cheat(8, 0x40);

    run(&mut table, &mut bus, 1);
    bus.poke(0, ADDR, 0x30);
    run(&mut table, &mut bus, 2);
    assert_eq!(bus.writes, vec![(0, ADDR, 0x40)]);
}

#[test]
fn test_decrement_guard_from_zero_pokes() {
    let mut bus = TestBus::new("pacman");
    let mut table = active_cheat(8, 0x05);
    run(&mut table, &mut bus, 3);
    assert_eq!(bus.writes, vec![(0, ADDR, 0x05)]);
}

#[test]
fn test_bit_codes() {
    let mut bus = TestBus::new("pacman");
    bus.poke(0, ADDR, 0b0101_0000);
    let mut table = active_cheat(20, 0b0000_0011);
    run(&mut table, &mut bus, 1);
    assert_eq!(bus.peek(0, ADDR), 0b0101_0011);

    let mut bus = TestBus::new("pacman");
    bus.poke(0, ADDR, 0xFF);
    let mut table = active_cheat(41, 0x0F);
    run(&mut table, &mut bus, 3);
    assert_eq!(bus.peek(0, ADDR), 0xF0);
    assert_eq!(bus.writes.len(), 1);

    let mut bus = TestBus::new("pacman");
    let mut table = active_cheat(22, 0x80);
    run(&mut table, &mut bus, 62);
    assert_eq!(bus.writes.len(), 2);
}

#[test]
fn test_user_value_poked_when_changed() {
    let mut bus = TestBus::new("pacman");
    bus.poke(0, ADDR, 0x03);
    let mut table = active_cheat(60, 0x09);
    table.get_mut(0).unwrap().subcheats_mut()[0].data = 0x07;

    run(&mut table, &mut bus, 10);
    assert!(bus.writes.is_empty());

    bus.poke(0, ADDR, 0x02);
    run(&mut table, &mut bus, 1);
    assert_eq!(bus.writes, vec![(0, ADDR, 0x07)]);
    run(&mut table, &mut bus, 10);
    assert_eq!(bus.writes.len(), 1);
}

#[test]
fn test_user_value_poked_once() {
    let mut bus = TestBus::new("pacman");
    let mut table = active_cheat(72, 0x63);
    table.get_mut(0).unwrap().subcheats_mut()[0].data = 0x10;
    run(&mut table, &mut bus, 10);
    assert_eq!(bus.writes, vec![(0, ADDR, 0x10)]);
}

#[test]
fn test_subcheats_run_in_order() {
    let mut bus = TestBus::new("pacman");
    let mut master = SubCheat::new(0, 0x4E00, 0x01);
    master.set_code(0, 60.0);
    let mut cheat = Cheat::with_master("linked", None, master);
    cheat.insert_subcheat(1);
    cheat.subcheats_mut()[1] = SubCheat::new(0, 0x4E01, 0x02);
    let mut table = CheatTable::new();
    table.push(cheat);
    table.push(Cheat::with_master("off", None, SubCheat::new(0, 0x4E02, 0x03)));
    table.set_status(0, true);

    run_frame(&mut table, &mut bus);
    assert_eq!(bus.writes, vec![(0, 0x4E00, 0x01), (0, 0x4E01, 0x02)]);
}
