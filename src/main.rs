// Cafe Queue Simulator - Main Entry Point
//
// You can run it via Cargo:
//
// ```console
// $ cargo build --release
// $ ./target/release/cafe-sim
// ```
//
// Or with custom configuration:
//
// ```console
// $ ./target/release/cafe-sim --replicas 100 --peak-arrival-rate 4.0 --output-format json --verbose
// ```

use anyhow::{Context, Result};
use cafe_queue_simulator::simulation::{
    LoggingConfig, LoggingGuard, SimulationOrchestrator, SimulationReport, SimulationResult,
};
use cafe_queue_simulator::types::config::CliArgs;
use cafe_queue_simulator::types::{OutputFormat, SimulationConfig};
use clap::Parser;
use std::io::{self, IsTerminal};
use std::process;
use tracing::{error, info, Level};

fn main() {
    // Parse CLI arguments first to check for special flags
    let args = CliArgs::parse();

    if args.print_config {
        match SimulationConfig::default().print_json() {
            Ok(json) => {
                println!("{}", json);
                return;
            }
            Err(e) => {
                eprintln!("Failed to serialize default configuration: {}", e);
                process::exit(1);
            }
        }
    }

    let (verbose, debug, dry_run) = (args.verbose, args.debug, args.dry_run);

    // Load configuration from CLI arguments and optional config file
    let config = match load_config(args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} error: {}", e.category(), e);
            process::exit(1);
        }
    };

    let _guard = match init_logging(&config, verbose, debug) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run(config, dry_run) {
        error!("Simulation failed: {:#}", e);
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

/// Merge the configuration sources and validate the result
fn load_config(args: CliArgs) -> SimulationResult<SimulationConfig> {
    let config = SimulationConfig::from_cli_args(args)?;
    config.validate()?;
    Ok(config)
}

fn init_logging(
    config: &SimulationConfig,
    verbose: bool,
    debug: bool,
) -> Result<LoggingGuard, Box<dyn std::error::Error + Send + Sync>> {
    let level = if debug {
        Level::DEBUG
    } else if verbose {
        Level::INFO
    } else {
        Level::WARN
    };

    let mut logging = LoggingConfig::new().with_level(level);
    if debug {
        logging = logging.with_span_events();
    }
    if config.log_format == OutputFormat::Json {
        logging = logging.with_json_format();
    }
    if !io::stderr().is_terminal() {
        logging = logging.without_ansi();
    }
    if let Some(dir) = &config.log_directory {
        logging = logging.with_file_logging(dir.clone());
    }
    logging.init()
}

fn run(config: SimulationConfig, dry_run: bool) -> Result<()> {
    info!("Configuration loaded and validated successfully");

    if dry_run {
        eprintln!("Configuration validation successful!");
        eprintln!("Dry run mode - simulation will not be executed.");
        print_configuration_summary(&config);
        return Ok(());
    }

    print_startup_banner(&config);

    let output_format = config.output_format;
    let orchestrator = SimulationOrchestrator::new(config).context("Failed to initialize simulation")?;
    let report = orchestrator.run().context("Simulation run failed")?;

    print_report(&report, output_format)?;
    eprintln!(
        "Completed {} replicas in {:.2} seconds (run {})",
        report.replicas, report.elapsed_seconds, report.run_id
    );

    info!("Cafe Queue Simulator completed successfully");
    Ok(())
}

/// Write the report to stdout
fn print_report(report: &SimulationReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => print!("{}", report),
        OutputFormat::Json => {
            let json = report.to_json().context("Failed to serialize report")?;
            println!("{}", json);
        }
    }
    Ok(())
}

/// Print startup banner and configuration summary
fn print_startup_banner(config: &SimulationConfig) {
    eprintln!("Cafe Queue Simulator");
    eprintln!("====================");
    eprintln!("Monte-Carlo replicas of a cashier and drinks bar pipeline");
    eprintln!();

    print_configuration_summary(config);
}

/// Print configuration summary
fn print_configuration_summary(config: &SimulationConfig) {
    eprintln!("Configuration:");
    eprintln!("  Replicas: {}", config.replicas);
    eprintln!(
        "  Horizon: {} minutes in ticks of {} minutes ({} ticks)",
        config.total_minutes,
        config.tick_minutes,
        config.total_ticks()
    );
    eprintln!(
        "  Servers: {} cashiers, {} hot bar, {} cold bar",
        config.cashiers, config.hot_baristas, config.cold_baristas
    );
    eprintln!(
        "  Arrivals: {:.2}/min, rush {:.2}/min from minute {} to {}",
        config.arrivals.base_rate,
        config.arrivals.peak_rate,
        config.arrivals.peak_start,
        config.arrivals.peak_end
    );
    eprintln!(
        "  Queues: capacity {}, abandonment above {}",
        config.queue_capacity, config.abandonment_threshold
    );
    eprintln!("  Products: {}", config.products.iter().map(|p| p.name.as_str()).collect::<Vec<_>>().join(", "));
    eprintln!("  Base Seed: {} (stride {})", config.base_seed, config.seed_stride);
    eprintln!("  Task Ordering: {}", config.ordering);
    match config.threads {
        Some(threads) => eprintln!("  Worker Threads: {}", threads),
        None => eprintln!("  Worker Threads: one per core"),
    }
    eprintln!("  Output Format: {}", config.output_format);
    eprintln!("  Log Format: {}", config.log_format);
    eprintln!();
}
