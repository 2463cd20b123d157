//! Cheat database loading.
//!
//! A database is a colon-delimited text file with one record per line:
//!
//! ```text
//! pacman:0:4E14:06:000:1UP Unlimited lives:Coded on 1 byte
//! ```
//!
//! Only lines whose driver field matches the running machine exactly are
//! loaded. Lines with a link code (500-599) extend the cheat started by the
//! most recent regular line. Malformed lines are skipped without error.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use log::{debug, info, trace, warn};

use super::code::{LINK_START, is_link_code};
#[cfg(feature = "code-patch")]
use super::PatchKind;
use super::table::CheatTable;
use super::{Cheat, CheatFlags, SubCheat};
use crate::core::MachineInfo;
use crate::error::DatabaseError;

/// Default database file name.
pub const DEFAULT_DATABASE: &str = "cheat.dat";

// ---------------------------------------------------------------------------
// File sources
// ---------------------------------------------------------------------------

/// Opens database files by name.
pub trait DatabaseSource {
    fn open(&self, name: &str) -> io::Result<Box<dyn BufRead + '_>>;
}

/// Searches an ordered list of directories for database files.
///
/// Absolute names are opened directly.
#[derive(Clone, Debug, Default)]
pub struct DirectorySource {
    roots: Vec<PathBuf>,
}

impl DirectorySource {
    pub fn new<I, P>(roots: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            roots: roots.into_iter().map(Into::into).collect(),
        }
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// First existing candidate path for `name`, if any.
    pub fn resolve(&self, name: &str) -> Option<PathBuf> {
        let path = Path::new(name);
        if path.is_absolute() {
            return path.is_file().then(|| path.to_path_buf());
        }
        self.roots
            .iter()
            .map(|root| root.join(path))
            .find(|candidate| candidate.is_file())
    }
}

impl DatabaseSource for DirectorySource {
    fn open(&self, name: &str) -> io::Result<Box<dyn BufRead + '_>> {
        let path = self.resolve(name).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("cheat database not found: {name}"),
            )
        })?;
        let file = File::open(&path)?;
        debug!("opened cheat database {}", path.display());
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Split a database list such as `"cheat.dat;extra.dat"` into file names.
///
/// Both `;` and `:` separate entries; empty entries are ignored.
pub fn split_file_list(list: &str) -> impl Iterator<Item = &str> {
    list.split([';', ':'])
        .map(str::trim)
        .filter(|name| !name.is_empty())
}

// ---------------------------------------------------------------------------
// Line parsing
// ---------------------------------------------------------------------------

/// One accepted database line.
#[derive(Debug)]
enum Record {
    /// Starts a new cheat.
    Master(Cheat),
    /// Continues the previous cheat, with the flags its code adds to it.
    Linked(SubCheat, CheatFlags),
}

/// Whether `line` is addressed to `driver`: the driver name followed by ':'.
fn matches_driver(line: &str, driver: &str) -> bool {
    !line.starts_with(';')
        && line.len() > driver.len()
        && line.starts_with(driver)
        && line.as_bytes()[driver.len()] == b':'
}

/// Leading hex digits of `token`, after an optional `0x`; trailing text is ignored.
fn parse_hex(token: &str) -> Option<u32> {
    let token = token.trim();
    let digits = token
        .strip_prefix("0x")
        .or_else(|| token.strip_prefix("0X"))
        .unwrap_or(token);
    let end = digits
        .find(|c: char| !c.is_ascii_hexdigit())
        .unwrap_or(digits.len());
    u32::from_str_radix(&digits[..end], 16).ok()
}

fn parse_dec<T: std::str::FromStr>(token: &str) -> Option<T> {
    token.trim().parse().ok()
}

/// Parse one line already known to be addressed to this driver.
fn parse_record<M: MachineInfo + ?Sized>(line: &str, info: &M) -> Option<Record> {
    // Consecutive separators collapse: an empty field is the same as a missing one.
    let mut fields = line.split(':').filter(|field| !field.is_empty());

    // Driver name, already matched.
    fields.next()?;

    #[cfg(feature = "code-patch")]
    let (crc, patch) = {
        let crc = parse_hex(fields.next()?)?;
        if !info.matches_crc(crc) {
            return None;
        }
        let patch = match fields.next()?.trim().chars().next() {
            Some('C') => PatchKind::Code,
            _ => PatchKind::Data,
        };
        (crc, patch)
    };

    let cpu: usize = parse_dec(fields.next()?)?;
    if cpu >= info.cpu_count() {
        return None;
    }
    let address = parse_hex(fields.next()?)? & info.address_mask(cpu);
    let data = (parse_hex(fields.next()?)? & 0xFF) as u8;
    #[cfg(feature = "code-patch")]
    let old_data = (parse_hex(fields.next()?)? & 0xFF) as u8;
    let mut code: u32 = parse_dec(fields.next()?)?;

    let linked = is_link_code(code);
    if linked {
        code -= LINK_START;
    }

    let mut subcheat = SubCheat::new(cpu, address, data);
    #[cfg(feature = "code-patch")]
    {
        subcheat.old_data = old_data;
    }
    let flags = subcheat.set_code(code, info.frames_per_second());

    if linked {
        return Some(Record::Linked(subcheat, flags));
    }

    let name = fields.next()?;
    let comment = fields.next().map(str::to_owned);
    let mut cheat = Cheat::with_master(name, comment, subcheat);
    cheat.add_code_flags(flags);
    #[cfg(feature = "code-patch")]
    {
        cheat.crc = crc;
        cheat.patch = patch;
    }
    Some(Record::Master(cheat))
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Load every record for `info`'s driver from `reader`, appending to `table`.
///
/// Returns the number of cheats added. Loading stops once the table is full;
/// continuation lines of the last cheat added are still attached.
pub fn load<R, M>(table: &mut CheatTable, mut reader: R, info: &M) -> usize
where
    R: BufRead,
    M: MachineInfo + ?Sized,
{
    let driver = info.driver_name();
    let mut added = 0;
    let mut last_master: Option<usize> = None;
    let mut buf = Vec::new();
    let mut line_no = 0usize;

    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                warn!("cheat database read failed after line {line_no}: {e}");
                break;
            }
        }
        line_no += 1;

        let text = String::from_utf8_lossy(&buf);
        let line = text.trim_end_matches(['\r', '\n']);
        if !matches_driver(line, driver) {
            continue;
        }

        match parse_record(line, info) {
            Some(Record::Master(cheat)) => {
                let Some(index) = table.push(cheat) else {
                    debug!("cheat table full at line {line_no}");
                    break;
                };
                last_master = Some(index);
                added += 1;
            }
            Some(Record::Linked(subcheat, flags)) => {
                let Some(cheat) = last_master.and_then(|index| table.get_mut(index)) else {
                    trace!("line {line_no}: linked record without a parent");
                    continue;
                };
                cheat.add_code_flags(flags);
                cheat.push_subcheat(subcheat);
            }
            None => {
                trace!("line {line_no}: malformed record skipped");
                // A rejected master must not collect the next continuation lines.
                last_master = None;
            }
        }
    }

    added
}

/// Open `name` through `source` and load it into `table`.
///
/// Unlike [`load_files`], a missing or unreadable file is an error.
pub fn load_file<S, M>(
    table: &mut CheatTable,
    source: &S,
    name: &str,
    info: &M,
) -> Result<usize, DatabaseError>
where
    S: DatabaseSource + ?Sized,
    M: MachineInfo + ?Sized,
{
    let reader = source.open(name).map_err(|source| DatabaseError::Io {
        name: name.to_owned(),
        source,
    })?;
    Ok(load(table, reader, info))
}

/// Load every database named in `list` (see [`split_file_list`]), in order.
///
/// Without `merge` the table is cleared first. Missing files contribute no
/// cheats. Returns the number of cheats added.
pub fn load_files<S, M>(
    table: &mut CheatTable,
    source: &S,
    list: &str,
    info: &M,
    merge: bool,
) -> usize
where
    S: DatabaseSource + ?Sized,
    M: MachineInfo + ?Sized,
{
    if !merge {
        table.clear();
    }
    let mut total = 0;
    for name in split_file_list(list) {
        match load_file(table, source, name, info) {
            Ok(count) => {
                debug!("{count} cheats for {} from {name}", info.driver_name());
                total += count;
            }
            Err(e) => debug!("{e}"),
        }
    }
    info!("loaded {total} cheats for {}", info.driver_name());
    total
}
