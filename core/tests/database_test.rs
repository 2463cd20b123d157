// Plain-format database lines; the CRC format is covered in code_patch_test.rs.
#![cfg(not(feature = "code-patch"))]

mod common;

use std::io::Cursor;

use common::TestBus;
use phosphor_cheat::cheat::database::{DirectorySource, load, load_file, load_files};
use phosphor_cheat::cheat::table::CheatTable;
use phosphor_cheat::error::DatabaseError;

fn load_str(table: &mut CheatTable, text: &str, bus: &TestBus) -> usize {
    load(table, Cursor::new(text.as_bytes()), bus)
}

#[test]
fn test_single_record() {
    let bus = TestBus::new("pacman");
    let mut table = CheatTable::new();
    let n = load_str(
        &mut table,
        "pacman:0:4E14:06:000:1UP Unlimited lives:Coded on 1 byte\n",
        &bus,
    );
    assert_eq!(n, 1);
    let cheat = table.get(0).unwrap();
    assert_eq!(cheat.name, "1UP Unlimited lives");
    assert_eq!(cheat.comment.as_deref(), Some("Coded on 1 byte"));
    assert!(!cheat.is_active());
    let master = cheat.master();
    assert_eq!((master.cpu, master.address, master.data, master.code), (0, 0x4E14, 0x06, 0));
}

#[test]
fn test_linked_record() {
    let bus = TestBus::new("pacman");
    let mut table = CheatTable::new();
    let db = "\
pacman:0:4E14:06:000:Lives
pacman:0:4E15:09:501:
pacman:0:4C00:01:000:Other
";
    assert_eq!(load_str(&mut table, db, &bus), 2);
    let cheat = table.get(0).unwrap();
    assert_eq!(cheat.subcheats().len(), 2);
    assert_eq!(cheat.subcheats()[1].code, 1);
    assert_eq!(cheat.subcheats()[1].address, 0x4E15);
    assert_eq!(table.get(1).unwrap().subcheats().len(), 1);
}

#[test]
fn test_driver_prefix_must_match_exactly() {
    let bus = TestBus::new("pacman");
    let mut table = CheatTable::new();
    let db = "\
pacman2:0:4E14:06:000:Wrong game
pacma:0:4E14:06:000:Too short
;pacman:0:4E14:06:000:Commented out
pacman:0:4E14:06:000:Right game
";
    assert_eq!(load_str(&mut table, db, &bus), 1);
    assert_eq!(table.get(0).unwrap().name, "Right game");
}

#[test]
fn test_malformed_lines_are_skipped() {
    let bus = TestBus::new("pacman");
    let mut table = CheatTable::new();
    let db = "\
pacman:0:4E14:06:000
pacman:0:XYZ:06:000:Bad address
pacman:zero:4E14:06:000:Bad cpu
pacman:1:4E14:06:000:No such cpu
pacman:0:4E14:06:000:Good
";
    assert_eq!(load_str(&mut table, db, &bus), 1);
    assert_eq!(table.get(0).unwrap().name, "Good");
}

#[test]
fn test_continuation_of_rejected_record_is_dropped() {
    let bus = TestBus::new("pacman");
    let mut table = CheatTable::new();
    let db = "\
pacman:0:4E00:01:000:First
pacman:3:4E14:06:000:Bad cpu
pacman:0:4E15:09:500:
";
    assert_eq!(load_str(&mut table, db, &bus), 1);
    assert_eq!(table.get(0).unwrap().subcheats().len(), 1);
}

#[test]
fn test_address_and_data_are_masked() {
    let bus = TestBus::new("milliped").with_cpu(0x7FFF);
    let mut table = CheatTable::new();
    load_str(&mut table, "milliped:1:1FFFF:1AB:000:Masked\n", &bus);
    let master = table.get(0).unwrap().master();
    assert_eq!(master.address, 0x7FFF);
    assert_eq!(master.data, 0xAB);
}

#[test]
fn test_missing_comment_and_crlf() {
    let bus = TestBus::new("dkong");
    let mut table = CheatTable::new();
    load_str(&mut table, "dkong:0:6228:03:000:Infinite lives\r\n", &bus);
    let cheat = table.get(0).unwrap();
    assert_eq!(cheat.name, "Infinite lives");
    assert_eq!(cheat.comment, None);
}

#[test]
fn test_sentinel_codes_set_flags() {
    let bus = TestBus::new("joust");
    let mut table = CheatTable::new();
    let db = "\
joust:0:0000:00:999:-- Player 1 --
joust:0:A052:00:998:Score
";
    load_str(&mut table, db, &bus);
    assert!(table.get(0).unwrap().is_comment());
    assert!(table.get(1).unwrap().is_watch());
}

#[test]
fn test_loading_stops_at_capacity() {
    let bus = TestBus::new("pacman");
    let mut table = CheatTable::with_capacity(2);
    let db = "\
pacman:0:4E00:01:000:A
pacman:0:4E01:01:000:B
pacman:0:4E02:01:501:
pacman:0:4E03:01:000:C
";
    assert_eq!(load_str(&mut table, db, &bus), 2);
    assert_eq!(table.len(), 2);
    assert_eq!(table.get(1).unwrap().subcheats().len(), 2);
}

fn database_dir(name: &str, files: &[(&str, &str)]) -> std::path::PathBuf {
    let dir = std::env::temp_dir().join(name);
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    for (file, contents) in files {
        std::fs::write(dir.join(file), contents).unwrap();
    }
    dir
}

#[test]
fn test_merge_files_in_order() {
    let dir = database_dir(
        "phosphor_cheat_test_merge",
        &[
            ("cheat.dat", "pacman:0:4E14:06:000:From cheat.dat\n"),
            ("extra.dat", "pacman:0:4C00:01:000:From extra.dat\n"),
        ],
    );
    let source = DirectorySource::new([dir.clone()]);
    let bus = TestBus::new("pacman");
    let mut table = CheatTable::new();

    let n = load_files(&mut table, &source, "cheat.dat;missing.dat:extra.dat", &bus, false);
    assert_eq!(n, 2);
    let names: Vec<_> = table.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["From cheat.dat", "From extra.dat"]);

    // Merging again appends; a fresh load replaces.
    assert_eq!(load_files(&mut table, &source, "extra.dat", &bus, true), 1);
    assert_eq!(table.len(), 3);
    assert_eq!(load_files(&mut table, &source, "extra.dat", &bus, false), 1);
    assert_eq!(table.len(), 1);

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_missing_file() {
    let dir = database_dir("phosphor_cheat_test_missing", &[]);
    let source = DirectorySource::new([dir.clone()]);
    let bus = TestBus::new("pacman");
    let mut table = CheatTable::new();

    assert_eq!(load_files(&mut table, &source, "cheat.dat", &bus, false), 0);
    assert!(table.is_empty());
    let err = load_file(&mut table, &source, "cheat.dat", &bus).unwrap_err();
    assert!(matches!(err, DatabaseError::Io { ref name, .. } if name == "cheat.dat"));

    std::fs::remove_dir_all(&dir).unwrap();
}
