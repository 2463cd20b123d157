//! Command-line descriptions of memory contents: images to seed a board
//! with, byte ranges to watch, and search narrowing steps.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use phosphor_cheat::search::{EnergyComparison, SearchComparison};
use phosphor_cheat_machines::RamMachine;

/// `0x`-prefixed or bare hex address.
pub fn parse_address(text: &str) -> Result<u32, String> {
    let digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text);
    u32::from_str_radix(digits, 16).map_err(|e| format!("bad address {text:?}: {e}"))
}

/// Decimal byte, or hex with a `0x` prefix.
pub fn parse_byte(text: &str) -> Result<u8, String> {
    let parsed = match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(hex) => u8::from_str_radix(hex, 16),
        None => text.parse(),
    };
    parsed.map_err(|e| format!("bad byte {text:?}: {e}"))
}

fn parse_cpu(text: &str) -> Result<usize, String> {
    text.parse().map_err(|e| format!("bad CPU index {text:?}: {e}"))
}

/// A file copied into a CPU's address space: `cpu:address:path`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemoryImage {
    pub cpu: usize,
    pub address: u32,
    pub path: PathBuf,
}

impl MemoryImage {
    /// Copy the file into `machine`. Returns the bytes that landed in
    /// writable memory.
    pub fn load(&self, machine: &mut RamMachine) -> std::io::Result<usize> {
        let data = std::fs::read(&self.path)?;
        Ok(machine.load(self.cpu, self.address, &data))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FromStr for MemoryImage {
    type Err = String;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let mut fields = text.splitn(3, ':');
        match (fields.next(), fields.next(), fields.next()) {
            (Some(cpu), Some(address), Some(path)) if !path.is_empty() => Ok(Self {
                cpu: parse_cpu(cpu)?,
                address: parse_address(address)?,
                path: PathBuf::from(path),
            }),
            _ => Err(format!("expected cpu:address:path, got {text:?}")),
        }
    }
}

/// Bytes shown after a run: `cpu:address:length`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WatchSpec {
    pub cpu: usize,
    pub address: u32,
    pub length: u8,
}

impl FromStr for WatchSpec {
    type Err = String;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = text.split(':').collect();
        let [cpu, address, length] = fields.as_slice() else {
            return Err(format!("expected cpu:address:length, got {text:?}"));
        };
        let length = parse_byte(length)?;
        if length == 0 {
            return Err("watch length must be at least 1".to_owned());
        }
        Ok(Self {
            cpu: parse_cpu(cpu)?,
            address: parse_address(address)?,
            length,
        })
    }
}

/// Parse a comparison name.
///
/// `value:N`, `delta:+N`/`delta:-N`, `less`, `equal`, `greater`, `changed`,
/// `bits-same`, `bits-changed`, `same`, `different`.
pub fn parse_comparison(text: &str) -> Result<SearchComparison, String> {
    let comparison = match text.split_once(':') {
        Some(("value", value)) => SearchComparison::Value(parse_byte(value)?),
        Some(("delta", delta)) => {
            let delta: i16 = delta
                .trim_start_matches('+')
                .parse()
                .map_err(|e| format!("bad delta {delta:?}: {e}"))?;
            SearchComparison::Delta(delta)
        }
        Some(_) => return Err(format!("unknown comparison {text:?}")),
        None => match text {
            "less" => SearchComparison::Energy(EnergyComparison::Less),
            "equal" => SearchComparison::Energy(EnergyComparison::Equal),
            "greater" => SearchComparison::Energy(EnergyComparison::Greater),
            "changed" => SearchComparison::Energy(EnergyComparison::NotEqual),
            "bits-same" => SearchComparison::Bit { same: true },
            "bits-changed" => SearchComparison::Bit { same: false },
            "same" => SearchComparison::Byte { same: true },
            "different" => SearchComparison::Byte { same: false },
            _ => return Err(format!("unknown comparison {text:?}")),
        },
    };
    Ok(comparison)
}

/// One narrowing step, optionally preceded by loading a memory image
/// that stands in for the game having moved on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchStep {
    pub comparison: SearchComparison,
    pub image: Option<MemoryImage>,
}

impl FromStr for SearchStep {
    type Err = String;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let (comparison, image) = match text.split_once('@') {
            Some((comparison, image)) => (comparison, Some(image.parse()?)),
            None => (text, None),
        };
        Ok(Self {
            comparison: parse_comparison(comparison)?,
            image,
        })
    }
}
