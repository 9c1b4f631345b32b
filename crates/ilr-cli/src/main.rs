use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use ilr_cli::commands::{day, init, report, status, trips, util, visas};
use ilr_cli::{Cli, CliConfig, Commands, PolicyArg};
use ilr_core::{NoVisaPolicy, Timeline};
use ilr_data::{DataStore, DataSummary};

/// Load config and data files, building the classified timeline.
fn open_timeline(config_path: Option<&Path>) -> Result<(Timeline, DataSummary, CliConfig)> {
    let config = CliConfig::load_from(config_path).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    let store = DataStore::new(&config.data_dir);
    let (core_config, trip_records, visa_records) =
        store.load_all().context("failed to load data files")?;
    let summary = DataSummary::new(&trip_records, &visa_records);
    let timeline =
        Timeline::build(core_config, trip_records, visa_records).context("data validation failed")?;
    Ok((timeline, summary, config))
}

fn resolve_policy(arg: Option<PolicyArg>, config: &CliConfig) -> NoVisaPolicy {
    arg.map_or(config.no_visa_policy, NoVisaPolicy::from)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    match &cli.command {
        Some(Commands::Init) => {
            let config = CliConfig::load_from(cli.config.as_deref())
                .context("failed to load configuration")?;
            let store = DataStore::new(&config.data_dir);
            init::run(&store)?;
        }
        Some(Commands::Status {
            as_of,
            json,
            no_visa_policy,
        }) => {
            let (timeline, summary, config) = open_timeline(cli.config.as_deref())?;
            let policy = resolve_policy(*no_visa_policy, &config);
            let as_of = util::resolve_as_of(as_of.as_deref())?;
            status::run(&mut io::stdout(), &timeline, &summary, policy, as_of, *json)?;
        }
        Some(Commands::Report {
            year,
            month,
            as_of,
            visa,
            detailed,
            json,
            no_visa_policy,
        }) => {
            let (timeline, _summary, config) = open_timeline(cli.config.as_deref())?;
            let period = if let Some(raw) = month {
                let (year, month) = util::parse_month(raw)?;
                report::Period::Month { year, month }
            } else if let Some(year) = year {
                report::Period::Year(*year)
            } else {
                report::Period::Global
            };
            let options = report::ReportOptions {
                period,
                as_of: util::resolve_as_of(as_of.as_deref())?,
                visa_ids: visa.clone(),
                policy: resolve_policy(*no_visa_policy, &config),
                detailed: *detailed,
                json: *json,
            };
            report::run(&mut io::stdout(), &timeline, &options)?;
        }
        Some(Commands::Day { date }) => {
            let (timeline, _summary, config) = open_timeline(cli.config.as_deref())?;
            let date = util::parse_day(date)?;
            day::run(&mut io::stdout(), &timeline, date, config.no_visa_policy)?;
        }
        Some(Commands::Trips { json }) => {
            let (timeline, summary, _config) = open_timeline(cli.config.as_deref())?;
            trips::run(&mut io::stdout(), &timeline, &summary, *json)?;
        }
        Some(Commands::Visas { json }) => {
            let (timeline, _summary, _config) = open_timeline(cli.config.as_deref())?;
            visas::run(&mut io::stdout(), &timeline, *json)?;
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}
