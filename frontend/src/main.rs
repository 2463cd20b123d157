use anyhow::Result;
use clap::Parser;
use phosphor_cheat::cheat::database::DirectorySource;

mod cli;
mod commands;
mod config;
mod memory_image;

use cli::{Cli, Command};
use config::Config;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Cli::parse();

    let config = Config::resolve(args.config.as_deref())?;
    let source = DirectorySource::new(args.db_dirs.iter().chain(&config.database_dirs).cloned());

    match args.command {
        Command::Machines => commands::machines(),
        Command::List { machine } => commands::list(&config, &source, &machine)?,
        Command::Run {
            machine,
            enable,
            frames,
            images,
            watches,
        } => commands::run(&config, &source, &machine, &enable, frames, &images, &watches)?,
        Command::Search {
            machine,
            cpu,
            value,
            images,
            steps,
            restore,
        } => commands::search(&config, &machine, cpu, value, &images, &steps, restore)?,
    }
    Ok(())
}
