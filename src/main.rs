use clap::Parser;
use sensor_rollup::cli::{self, Cli, Commands};
use sensor_rollup::config::RollupConfig;
use sensor_rollup::core::aggregation::JobKind;
use tracing::{debug, error, trace};

fn main() {
    let cli = Cli::parse();

    // A broken config is reported after logging is up, not here
    let config = RollupConfig::load(cli.config.as_deref());

    let log_level = match cli.verbose {
        0 => config
            .as_ref()
            .ok()
            .and_then(|c| c.log_level.clone())
            .unwrap_or_else(|| "info".to_string()),
        1 => "debug".to_string(),
        _ => "trace".to_string(),
    };

    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_target(cli.verbose >= 2)
        .with_thread_ids(cli.verbose >= 2)
        .with_writer(std::io::stderr)
        .init();

    debug!("sensor-rollup started with verbosity level: {}", cli.verbose);
    trace!("Full CLI args: {:?}", std::env::args().collect::<Vec<_>>());

    let result = config
        .map_err(anyhow::Error::from)
        .and_then(|mut config| match &cli.command {
            Commands::Count(args) => {
                cli::apply_overrides(&mut config, args);
                cli::run_job(JobKind::Count, args, &config)
            }
            Commands::Mean(args) => {
                cli::apply_overrides(&mut config, args);
                cli::run_job(JobKind::Mean, args, &config)
            }
            Commands::Config => cli::show_config(&config),
        });

    if let Err(e) = result {
        error!("Fatal error: {:#}", e);
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
