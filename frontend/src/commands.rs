//! Handlers for each subcommand.

use anyhow::{Context, Result, bail};
use log::{info, warn};
use phosphor_cheat::cheat::Cheat;
use phosphor_cheat::cheat::database::DirectorySource;
use phosphor_cheat::core::{MachineInfo, format_address};
use phosphor_cheat::engine::CheatEngine;
use phosphor_cheat::search::{
    ByteRangeTable, MAX_SEARCH_RESULTS, MemorySearch, RestoreStatus, SearchStart,
};
use phosphor_cheat::watch::{WatchLabel, Watchpoint};
use phosphor_cheat_machines::{MachineEntry, RamMachine, registry};

use crate::config::Config;
use crate::memory_image::{MemoryImage, SearchStep, WatchSpec};

fn find_machine(name: &str) -> Result<&'static MachineEntry> {
    registry::find(name).with_context(|| {
        let names: Vec<_> = registry::all().iter().map(|e| e.name).collect();
        format!("unknown machine {name:?} (available: {})", names.join(", "))
    })
}

fn load_images(machine: &mut RamMachine, images: &[MemoryImage]) -> Result<()> {
    for image in images {
        let stored = image
            .load(machine)
            .with_context(|| format!("cannot read image {}", image.path().display()))?;
        info!(
            "{}: {stored} bytes at CPU{}:{:04X}",
            image.path().display(),
            image.cpu,
            image.address
        );
    }
    Ok(())
}

/// Engine for `machine` with the configured databases loaded.
fn start_engine(config: &Config, source: &DirectorySource, machine: &RamMachine) -> CheatEngine {
    let mut engine = CheatEngine::new(config.cheat_config());
    let loaded = engine.init(source, machine);
    if loaded == 0 {
        warn!(
            "no cheats for {} in {:?} (searched {:?})",
            machine.driver_name(),
            config.cheat_files,
            source.roots()
        );
    }
    engine
}

pub fn machines() {
    for entry in registry::all() {
        let layout = entry.layout;
        println!(
            "{:<10} {} ({:.2} fps, {} writable bytes)",
            entry.name,
            layout.name,
            layout.fps,
            layout.total_bytes()
        );
        for (index, cpu) in layout.cpus.iter().enumerate() {
            println!("  CPU{index} {} ({}-bit)", cpu.label, cpu.address_bits);
            for region in cpu.regions {
                println!(
                    "    {}-{} {:?} {}",
                    format_address(region.start, cpu.address_bits),
                    format_address(region.end, cpu.address_bits),
                    region.kind,
                    region.label
                );
            }
        }
    }
}

fn describe(cheat: &Cheat) -> String {
    let marker = if cheat.is_comment() {
        '#'
    } else if cheat.is_watch() {
        'W'
    } else if cheat.is_active() {
        '*'
    } else {
        ' '
    };
    match &cheat.comment {
        Some(comment) => format!("{marker} {} ({comment})", cheat.name),
        None => format!("{marker} {}", cheat.name),
    }
}

pub fn list(config: &Config, source: &DirectorySource, machine_name: &str) -> Result<()> {
    let machine = find_machine(machine_name)?.create();
    let engine = start_engine(config, source, &machine);
    for (index, cheat) in engine.table().iter().enumerate() {
        println!("{index:3} {}", describe(cheat));
        for sub in cheat.subcheats() {
            println!(
                "      CPU{} {} = {:02X} code {}",
                sub.cpu,
                format_address(sub.address, machine.address_bits(sub.cpu)),
                sub.data,
                sub.code
            );
        }
    }
    println!("{} cheats", engine.table().len());
    Ok(())
}

fn snapshot(machine: &mut RamMachine) -> Result<Vec<ByteRangeTable>> {
    (0..machine.cpu_count())
        .map(|cpu| -> Result<ByteRangeTable> {
            let mut table = ByteRangeTable::build(&machine.write_regions(cpu), None)?;
            table.backup(machine, cpu);
            Ok(table)
        })
        .collect()
}

pub fn run(
    config: &Config,
    source: &DirectorySource,
    machine_name: &str,
    enable: &[usize],
    frames: u32,
    images: &[MemoryImage],
    watches: &[WatchSpec],
) -> Result<()> {
    let mut machine = find_machine(machine_name)?.create();
    load_images(&mut machine, images)?;
    let mut engine = start_engine(config, source, &machine);

    for &index in enable {
        match engine.set_status(index, true, &mut machine) {
            Some(_) => info!("enabled {}", describe_index(&engine, index)),
            None => warn!("cheat {index} cannot be enabled"),
        }
    }
    for watch in config.watchpoints()? {
        engine.watches_mut().add(watch);
    }
    for spec in watches {
        let watch =
            Watchpoint::new(spec.cpu, spec.address, spec.length).with_label(WatchLabel::Address);
        if engine.watches_mut().add(watch).is_none() {
            warn!("no free watch slot for CPU{}:{:04X}", spec.cpu, spec.address);
        }
    }

    let before = snapshot(&mut machine)?;
    let mut pokes = 0;
    for _ in 0..frames {
        pokes += engine.do_cheat(&mut machine);
    }
    println!("{frames} frames, {pokes} writes");

    for line in engine.watches().display_lines(&mut machine) {
        println!("{}", line.text);
    }
    for (cpu, table) in before.iter().enumerate() {
        let bits = machine.address_bits(cpu);
        for range in table.ranges() {
            for (offset, &old) in range.data().iter().enumerate() {
                let address = range.address_of(offset);
                let new = machine.peek(cpu, address);
                if new != old {
                    println!("CPU{cpu} {} {old:02X} -> {new:02X}", format_address(address, bits));
                }
            }
        }
    }
    engine.stop();
    Ok(())
}

fn describe_index(engine: &CheatEngine, index: usize) -> String {
    engine
        .table()
        .get(index)
        .map_or_else(|| index.to_string(), |cheat| format!("{index} ({})", cheat.name))
}

pub fn search(
    config: &Config,
    machine_name: &str,
    cpu: usize,
    value: Option<u8>,
    images: &[MemoryImage],
    steps: &[SearchStep],
    restore: bool,
) -> Result<()> {
    let mut machine = find_machine(machine_name)?.create();
    if cpu >= machine.cpu_count() {
        bail!("{machine_name} has no CPU{cpu}");
    }
    load_images(&mut machine, images)?;

    let settings = config.cheat_config();
    let mut search = MemorySearch::new(settings.search_speed, settings.search_memory_limit);
    let start = value.map_or(SearchStart::Any, SearchStart::Value);
    let found = search.start_search(&mut machine, cpu, start)?;
    println!("start {start}: {found} candidates");

    for step in steps {
        if let Some(image) = &step.image {
            load_images(&mut machine, std::slice::from_ref(image))?;
        }
        let left = search.continue_search(&mut machine, step.comparison)?;
        println!("{:?}: {left} candidates", step.comparison);
    }

    if restore {
        match search.restore_previous() {
            RestoreStatus::Ready => println!("previous results restored"),
            status => println!("{status}"),
        }
    }

    let bits = machine.address_bits(cpu);
    for result in search.results().take(MAX_SEARCH_RESULTS) {
        println!("{}", result.format(bits));
    }
    let total = search.candidate_count();
    if total > MAX_SEARCH_RESULTS {
        println!("... {} more", total - MAX_SEARCH_RESULTS);
    }
    Ok(())
}
