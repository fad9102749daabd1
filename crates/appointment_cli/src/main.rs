//! Command-line driver for `appointment_core`.
//!
//! # Responsibility
//! - Time both store strategies on the same workload.
//! - Replay the add/duplicate/delete scenario against a chosen strategy.
//! - Move store snapshots in and out of a SQLite file.

use anyhow::{bail, Context, Result};
use appointment_core::db::open_db;
use appointment_core::{
    compare_strategies, core_version, default_log_level, init_logging, new_store, now_epoch_ms,
    AppointmentDraft, AppointmentService, AppointmentStore, ComparisonPlan,
    SqliteAppointmentRepository, StoreKind,
};
use clap::{Args, Parser, Subcommand};
use log::info;
use std::path::PathBuf;

const DAY_MS: i64 = 24 * 60 * 60 * 1000;

#[derive(Debug, Parser)]
#[command(name = "appointments")]
#[command(about = "Appointment store CLI")]
struct Cli {
    /// Absolute directory for rotating log files; logging is off when unset.
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Time add/delete workloads on the list- and map-backed stores.
    Compare(CompareArgs),
    /// Run the add, duplicate add, delete, repeat delete scenario.
    Scenario(StoreArgs),
    /// Schedule generated appointments and save them to a snapshot file.
    Export(ExportArgs),
    /// Load a snapshot file into a store and print its contents.
    Import(ImportArgs),
    Version,
}

#[derive(Debug, Args)]
struct CompareArgs {
    #[arg(long, default_value_t = 1000)]
    adds: usize,
    #[arg(long, default_value_t = 500)]
    deletes: usize,
}

#[derive(Debug, Args)]
struct StoreArgs {
    #[arg(long, default_value = "map")]
    store: StoreKind,
}

#[derive(Debug, Args)]
struct ExportArgs {
    #[arg(long)]
    db: PathBuf,
    #[arg(long, default_value = "list")]
    store: StoreKind,
    #[arg(long, default_value_t = 5)]
    count: usize,
}

#[derive(Debug, Args)]
struct ImportArgs {
    #[arg(long)]
    db: PathBuf,
    #[arg(long, default_value = "list")]
    store: StoreKind,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = log_level(&cli);
        let log_dir = log_dir
            .to_str()
            .context("log directory must be valid UTF-8")?;
        init_logging(level, log_dir)?;
    }

    match cli.command {
        Command::Compare(args) => run_compare(&args),
        Command::Scenario(args) => run_scenario(args.store),
        Command::Export(args) => run_export(&args),
        Command::Import(args) => run_import(&args),
        Command::Version => {
            println!("appointment_core version={}", core_version());
            Ok(())
        }
    }
}

fn log_level(cli: &Cli) -> &str {
    cli.log_level.as_deref().unwrap_or(default_log_level())
}

fn run_compare(args: &CompareArgs) -> Result<()> {
    let plan = ComparisonPlan {
        add_count: args.adds,
        delete_count: args.deletes,
    };
    let report = compare_strategies(&plan)?;

    for timing in &report.timings {
        println!(
            "{:<4} add={:>10} ns  delete={:>10} ns  remaining={}",
            timing.kind,
            timing.add_elapsed.as_nanos(),
            timing.delete_elapsed.as_nanos(),
            timing.final_size
        );
    }
    if !report.equivalent {
        bail!("strategies diverged after replaying the same workload");
    }
    println!("strategies agree on final membership");
    Ok(())
}

fn run_scenario(kind: StoreKind) -> Result<()> {
    let mut service = AppointmentService::new(new_store(kind));
    let date = now_epoch_ms() + DAY_MS;

    let first = service.schedule(AppointmentDraft::new("A1", date, "x"))?;
    println!("added {} size={}", first.id(), service.count());

    match service.schedule(AppointmentDraft::new("A1", date + DAY_MS, "again")) {
        Ok(_) => bail!("duplicate id was accepted"),
        Err(err) => println!("rejected: {err} size={}", service.count()),
    }

    service.cancel("A1")?;
    println!("deleted A1 size={}", service.count());

    match service.cancel("A1") {
        Ok(_) => bail!("second delete unexpectedly succeeded"),
        Err(err) => println!("rejected: {err}"),
    }
    Ok(())
}

fn run_export(args: &ExportArgs) -> Result<()> {
    let mut service = AppointmentService::new(new_store(args.store));
    let now = now_epoch_ms();
    for index in 0..args.count {
        let offset = i64::try_from(index + 1).context("count is too large")?;
        service
            .schedule_with_generated_id(now + offset * DAY_MS, format!("Appointment {index}"))?;
    }

    let conn = open_db(&args.db)
        .with_context(|| format!("failed to open `{}`", args.db.display()))?;
    let saved = SqliteAppointmentRepository::new(&conn).save_store(service.store())?;
    info!("event=cli_export module=cli status=ok rows={saved}");
    println!("saved {saved} appointments to {}", args.db.display());
    Ok(())
}

fn run_import(args: &ImportArgs) -> Result<()> {
    let conn = open_db(&args.db)
        .with_context(|| format!("failed to open `{}`", args.db.display()))?;
    let mut store = new_store(args.store);
    let report = SqliteAppointmentRepository::new(&conn).load_into(&mut store)?;

    println!(
        "loaded={} expired={} invalid={} conflicting={}",
        report.loaded, report.expired, report.invalid, report.conflicting
    );
    for appointment in store.list() {
        println!(
            "{:<10} {} {}",
            appointment.id(),
            appointment.date(),
            appointment.description()
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{log_level, Cli, Command};
    use appointment_core::{default_log_level, StoreKind};
    use clap::Parser;

    #[test]
    fn log_level_falls_back_to_build_default() {
        let cli = Cli::try_parse_from(["appointments", "--log-dir", "/tmp/logs", "version"])
            .expect("parse");
        assert_eq!(log_level(&cli), default_log_level());

        let cli = Cli::try_parse_from(["appointments", "version", "--log-level", "warn"])
            .expect("parse");
        assert_eq!(log_level(&cli), "warn");
    }

    #[test]
    fn scenario_store_accepts_aliases() {
        let cli = Cli::try_parse_from(["appointments", "scenario", "--store", "hashmap"])
            .expect("parse");
        match cli.command {
            Command::Scenario(args) => assert_eq!(args.store, StoreKind::Map),
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
