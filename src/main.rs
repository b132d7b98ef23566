mod cli;
mod console;
mod logging;

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Commands};
use colored::*;
use console::ConsoleReporter;
use dotenv::dotenv;
use download_cleaner::config::{self, AppConfig};
use download_cleaner::progress::RunReporter;
use download_cleaner::{CleanerEngine, Scheduler};
use std::process;
use tracing::{debug, error, info};

fn main() {
    dotenv().ok();

    let _guard = logging::init_logger();

    let args = Cli::parse();

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(err) => {
            error!("Error loading configuration: {:#}", err);
            process::exit(1);
        }
    };
    debug!("config: {:?}", config);

    match args.command.unwrap_or(Commands::Watch) {
        Commands::Watch => run_watch(config),
        Commands::Once => {
            if let Err(err) = run_once(config) {
                error!("Error: {:#}", err);
                process::exit(1);
            }
        }
        Commands::PrintConfig => {
            println!("Configuration: {:?}", config);
        }
    }
}

fn load_config(args: &Cli) -> anyhow::Result<AppConfig> {
    let config = config::load_configuration(args.folder.clone())
        .context("watch_folder must be set in Config.toml, CLEANER_WATCH_FOLDER or --folder")?;
    config.validate()?;
    Ok(config)
}

fn print_banner(config: &AppConfig) {
    println!(
        "{} watching {} every {}s",
        "download-cleaner".bold(),
        config.watch_folder.display().to_string().cyan(),
        config.interval_secs
    );
}

fn run_watch(config: AppConfig) -> ! {
    print_banner(&config);
    info!("Scheduling runs every {}s", config.interval_secs);

    let scheduler = Scheduler::from_config(&config);
    let engine = CleanerEngine::new(config);
    scheduler.run_forever(&engine, &ConsoleReporter)
}

fn run_once(config: AppConfig) -> anyhow::Result<()> {
    print_banner(&config);

    let engine = CleanerEngine::new(config);
    let reporter = ConsoleReporter;
    engine
        .run_once(&reporter)
        .map_err(|err| {
            reporter.on_run_failed(&err);
            err
        })
        .with_context(|| format!("cleaning {} failed", engine.root().display()))?;
    Ok(())
}
