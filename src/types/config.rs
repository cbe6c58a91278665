//! Configuration structures for the cafe simulator
//!
//! This module contains the simulation configuration structure, the command
//! line interface, partial configuration files and validation logic.

use super::{ArrivalCurve, OutputFormat, ProductCatalog, StageKind, TaskOrdering};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Compiled-in defaults of the cafe model
pub mod defaults {
    /// Simulated minutes per replica
    pub const TOTAL_MINUTES: f64 = 180.0;
    /// Minutes per tick
    pub const TICK_MINUTES: f64 = 0.25;
    /// Monte-Carlo replicas per run
    pub const REPLICAS: usize = 24;
    /// Cashier pool size
    pub const CASHIERS: usize = 2;
    /// Hot bar pool size
    pub const HOT_BARISTAS: usize = 2;
    /// Cold bar pool size
    pub const COLD_BARISTAS: usize = 1;
    /// Queue length above which waiting customers walk away
    pub const ABANDONMENT_THRESHOLD: usize = 50;
    /// Hard capacity of every queue
    pub const QUEUE_CAPACITY: usize = 4096;
    /// Seed of replica 0
    pub const BASE_SEED: u64 = 1_234_567;
    /// Seed increment between consecutive replicas
    pub const SEED_STRIDE: u64 = 7_919;
    /// Checkout rate (one customer every half minute)
    pub const CASHIER_RATE: f64 = 1.0 / 0.50;
    /// Rate used when a stage has no rate for a product
    pub const FALLBACK_RATE: f64 = 1.0;
    /// Longest horizon, in ticks, a replica may run
    pub const MAX_TICKS: usize = 10_000_000;
}

/// Command line arguments structure
#[derive(Debug, Clone, Parser)]
#[command(
    name = "cafe-sim",
    version = "0.1.0",
    about = "Cafe Queue Simulator - Monte-Carlo replicas of a cafe service pipeline",
    long_about = "Simulates customers flowing through cashiers and then a hot or cold drinks bar, in fixed time steps, across many independent replicas run in parallel. Reports average revenue per replica, average wait per order, throughput and abandonment rate.

EXAMPLES:
    # Run with the built-in cafe model
    cafe-sim

    # Use a configuration file
    cafe-sim --config cafe.json

    # Override specific settings
    cafe-sim --replicas 100 --cashiers 3 --peak-arrival-rate 4.0

    # Generate configuration template
    cafe-sim --print-config > my-cafe.json

    # Reproducible per-customer traces
    cafe-sim --ordering sequential

CONFIGURATION:
    Configuration can be provided via:
    1. Command line arguments (highest priority)
    2. Configuration file (--config flag)
    3. Default values (lowest priority)

    The product catalog can only be changed through a configuration file.
    Supported configuration file formats: JSON (.json)"
)]
pub struct CliArgs {
    /// Configuration file path (JSON format)
    #[arg(
        short,
        long,
        help = "Configuration file path (JSON format)",
        long_help = "Path to a JSON configuration file. CLI arguments will override file settings."
    )]
    pub config: Option<String>,

    /// Number of independent replicas
    #[arg(long, help = "Number of Monte-Carlo replicas")]
    pub replicas: Option<usize>,

    /// Simulated minutes per replica
    #[arg(long, help = "Simulated minutes per replica")]
    pub total_minutes: Option<f64>,

    /// Minutes per tick
    #[arg(long, help = "Minutes per simulation tick")]
    pub tick_minutes: Option<f64>,

    /// Cashier pool size
    #[arg(long, help = "Number of cashiers")]
    pub cashiers: Option<usize>,

    /// Hot bar pool size
    #[arg(long, help = "Number of hot bar baristas")]
    pub hot_baristas: Option<usize>,

    /// Cold bar pool size
    #[arg(long, help = "Number of cold bar baristas")]
    pub cold_baristas: Option<usize>,

    /// Queue length above which customers abandon
    #[arg(long, help = "Queue length above which customers abandon")]
    pub abandonment_threshold: Option<usize>,

    /// Hard queue capacity
    #[arg(long, help = "Hard capacity of each queue")]
    pub queue_capacity: Option<usize>,

    /// Arrival rate outside the rush window
    #[arg(long, help = "Customers per minute outside the rush")]
    pub base_arrival_rate: Option<f64>,

    /// Arrival rate inside the rush window
    #[arg(long, help = "Customers per minute during the rush")]
    pub peak_arrival_rate: Option<f64>,

    /// Base random seed
    #[arg(long, help = "Base random seed (replica i uses seed + i * stride)")]
    pub seed: Option<u64>,

    /// Worker threads
    #[arg(long, help = "Worker threads (default: one per core)")]
    pub threads: Option<usize>,

    /// Scheduling of the four per-tick tasks
    #[arg(
        long,
        help = "Per-tick task ordering (concurrent or sequential)",
        long_help = "concurrent forks the four per-tick tasks onto the worker pool. sequential runs them in pipeline order, which makes every replica reproducible customer by customer."
    )]
    pub ordering: Option<TaskOrdering>,

    /// Output format for the report
    #[arg(long, help = "Output format (text or json)")]
    pub output_format: Option<OutputFormat>,

    /// Directory for JSON log files
    #[arg(long, help = "Also write JSON logs to a daily rolling file in this directory")]
    pub log_dir: Option<String>,

    /// Console log format
    #[arg(long, help = "Console log format (text or json)")]
    pub log_format: Option<OutputFormat>,

    /// Enable verbose logging
    #[arg(short, long, help = "Enable verbose logging")]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(short, long, help = "Enable debug logging")]
    pub debug: bool,

    /// Dry run mode - validate configuration without running simulation
    #[arg(long, help = "Validate configuration without running simulation")]
    pub dry_run: bool,

    /// Print default configuration and exit
    #[arg(long, help = "Print default configuration in JSON format and exit")]
    pub print_config: bool,
}

/// Configuration file structure (allows partial configuration)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConfigFile {
    /// Simulated minutes per replica
    pub total_minutes: Option<f64>,
    /// Minutes per tick
    pub tick_minutes: Option<f64>,
    /// Number of replicas
    pub replicas: Option<usize>,
    /// Cashier pool size
    pub cashiers: Option<usize>,
    /// Hot bar pool size
    pub hot_baristas: Option<usize>,
    /// Cold bar pool size
    pub cold_baristas: Option<usize>,
    /// Queue length above which customers abandon
    pub abandonment_threshold: Option<usize>,
    /// Hard queue capacity
    pub queue_capacity: Option<usize>,
    /// Seed of replica 0
    pub base_seed: Option<u64>,
    /// Seed increment between replicas
    pub seed_stride: Option<u64>,
    /// Checkout rate per cashier
    pub cashier_rate: Option<f64>,
    /// Rate used when a stage has no rate for a product
    pub fallback_rate: Option<f64>,
    /// Arrival rate curve
    pub arrivals: Option<ArrivalCurve>,
    /// Product catalog
    pub products: Option<ProductCatalog>,
    /// Worker threads
    pub threads: Option<usize>,
    /// Per-tick task ordering
    pub ordering: Option<TaskOrdering>,
    /// Report output format
    pub output_format: Option<OutputFormat>,
    /// Directory for JSON log files
    pub log_directory: Option<String>,
    /// Console log format
    pub log_format: Option<OutputFormat>,
}

/// Configuration for the cafe simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Simulated minutes per replica
    pub total_minutes: f64,
    /// Minutes per tick
    pub tick_minutes: f64,
    /// Number of independent replicas
    pub replicas: usize,
    /// Cashier pool size
    pub cashiers: usize,
    /// Hot bar pool size
    pub hot_baristas: usize,
    /// Cold bar pool size
    pub cold_baristas: usize,
    /// Queue length above which waiting customers walk away
    pub abandonment_threshold: usize,
    /// Hard capacity of every queue
    pub queue_capacity: usize,
    /// Seed of replica 0
    pub base_seed: u64,
    /// Seed increment between consecutive replicas
    pub seed_stride: u64,
    /// Checkout rate per cashier, customers per minute
    pub cashier_rate: f64,
    /// Rate used when a stage has no usable rate for a product
    pub fallback_rate: f64,
    /// Arrival rate curve
    pub arrivals: ArrivalCurve,
    /// Product catalog
    pub products: ProductCatalog,
    /// Worker threads; `None` lets rayon pick
    pub threads: Option<usize>,
    /// Per-tick task ordering
    pub ordering: TaskOrdering,
    /// Report output format
    pub output_format: OutputFormat,
    /// Directory for JSON log files
    pub log_directory: Option<String>,
    /// Console log format
    pub log_format: OutputFormat,
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    /// Configuration file read error
    #[error("Failed to read configuration file: {0}")]
    ReadError(#[from] std::io::Error),

    /// JSON parsing error
    #[error("Failed to parse JSON configuration: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Unsupported configuration file format
    #[error("Unsupported configuration file format: {0} (supported: .json)")]
    UnsupportedFormat(String),
}

/// Validation errors for simulation configuration
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigValidationError {
    /// Replica count is zero
    #[error("Replica count must be greater than 0, got {0}")]
    InvalidReplicaCount(usize),

    /// Horizon or tick is not a positive finite number
    #[error("Invalid duration for {field}: {value} (must be positive and finite)")]
    InvalidDuration {
        /// Name of the offending field
        field: String,
        /// The invalid value
        value: f64,
    },

    /// Tick does not fit into the horizon
    #[error("Tick of {tick} minutes is longer than the {total} minute horizon")]
    TickExceedsHorizon {
        /// Tick length in minutes
        tick: f64,
        /// Horizon in minutes
        total: f64,
    },

    /// Horizon splits into more ticks than a replica may run
    #[error("Horizon of {ticks} ticks exceeds the maximum of {max}")]
    TooManyTicks {
        /// Horizon divided by tick length
        ticks: f64,
        /// Largest accepted tick count
        max: usize,
    },

    /// No cashiers
    #[error("At least one cashier is required")]
    NoCashiers,

    /// Queue capacity is zero
    #[error("Queue capacity must be greater than 0")]
    InvalidQueueCapacity,

    /// Abandonment threshold cannot be reached before the queue fills
    #[error("Abandonment threshold ({threshold}) must be below queue capacity ({capacity})")]
    ThresholdExceedsCapacity {
        /// Abandonment threshold
        threshold: usize,
        /// Queue capacity
        capacity: usize,
    },

    /// A rate is out of range
    #[error("Invalid rate for {field}: {value}")]
    InvalidRate {
        /// Name of the offending field
        field: String,
        /// The invalid rate
        value: f64,
    },

    /// Rush window ends before it starts
    #[error("Rush window ends ({end}) before it starts ({start})")]
    InvalidRushWindow {
        /// Rush start minute
        start: f64,
        /// Rush end minute
        end: f64,
    },

    /// Empty product catalog
    #[error("Product catalog is empty")]
    EmptyCatalog,

    /// Product has an invalid price or weight
    #[error("Invalid {field} for product '{product}': {value}")]
    InvalidProduct {
        /// Product name
        product: String,
        /// Name of the offending field
        field: String,
        /// The invalid value
        value: f64,
    },

    /// Order mix weights sum to zero
    #[error("Product mix weights must sum to a positive value")]
    EmptyProductMix,

    /// Products are routed to a bar with no servers
    #[error("{stage} has no servers but receives {share:.3} of orders")]
    UnservedStage {
        /// Stage without servers
        stage: StageKind,
        /// Share of the order mix routed to it
        share: f64,
    },

    /// Zero worker threads requested
    #[error("Thread count must be greater than 0")]
    InvalidThreadCount,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            total_minutes: defaults::TOTAL_MINUTES,
            tick_minutes: defaults::TICK_MINUTES,
            replicas: defaults::REPLICAS,
            cashiers: defaults::CASHIERS,
            hot_baristas: defaults::HOT_BARISTAS,
            cold_baristas: defaults::COLD_BARISTAS,
            abandonment_threshold: defaults::ABANDONMENT_THRESHOLD,
            queue_capacity: defaults::QUEUE_CAPACITY,
            base_seed: defaults::BASE_SEED,
            seed_stride: defaults::SEED_STRIDE,
            cashier_rate: defaults::CASHIER_RATE,
            fallback_rate: defaults::FALLBACK_RATE,
            arrivals: ArrivalCurve::default(),
            products: ProductCatalog::default(),
            threads: None,
            ordering: TaskOrdering::default(),
            output_format: OutputFormat::default(),
            log_directory: None,
            log_format: OutputFormat::default(),
        }
    }
}

impl SimulationConfig {
    /// Create configuration from parsed CLI arguments
    pub fn from_cli_args(args: CliArgs) -> Result<Self, ConfigError> {
        let mut config = match &args.config {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        config.apply_cli_overrides(args);
        Ok(config)
    }

    /// Load configuration from a JSON file, merged over the defaults
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => {
                let content = fs::read_to_string(path)?;
                let config_file: ConfigFile = serde_json::from_str(&content)?;
                Ok(Self::from_config_file(config_file))
            }
            Some(ext) => Err(ConfigError::UnsupportedFormat(ext.to_string())),
            None => Err(ConfigError::UnsupportedFormat("no extension".to_string())),
        }
    }

    /// Create configuration from a config file, merging with defaults
    fn from_config_file(file: ConfigFile) -> Self {
        let defaults = Self::default();

        Self {
            total_minutes: file.total_minutes.unwrap_or(defaults.total_minutes),
            tick_minutes: file.tick_minutes.unwrap_or(defaults.tick_minutes),
            replicas: file.replicas.unwrap_or(defaults.replicas),
            cashiers: file.cashiers.unwrap_or(defaults.cashiers),
            hot_baristas: file.hot_baristas.unwrap_or(defaults.hot_baristas),
            cold_baristas: file.cold_baristas.unwrap_or(defaults.cold_baristas),
            abandonment_threshold: file
                .abandonment_threshold
                .unwrap_or(defaults.abandonment_threshold),
            queue_capacity: file.queue_capacity.unwrap_or(defaults.queue_capacity),
            base_seed: file.base_seed.unwrap_or(defaults.base_seed),
            seed_stride: file.seed_stride.unwrap_or(defaults.seed_stride),
            cashier_rate: file.cashier_rate.unwrap_or(defaults.cashier_rate),
            fallback_rate: file.fallback_rate.unwrap_or(defaults.fallback_rate),
            arrivals: file.arrivals.unwrap_or(defaults.arrivals),
            products: file.products.unwrap_or(defaults.products),
            threads: file.threads.or(defaults.threads),
            ordering: file.ordering.unwrap_or(defaults.ordering),
            output_format: file.output_format.unwrap_or(defaults.output_format),
            log_directory: file.log_directory.or(defaults.log_directory),
            log_format: file.log_format.unwrap_or(defaults.log_format),
        }
    }

    /// Apply CLI argument overrides to configuration
    fn apply_cli_overrides(&mut self, args: CliArgs) {
        if let Some(value) = args.replicas {
            self.replicas = value;
        }
        if let Some(value) = args.total_minutes {
            self.total_minutes = value;
        }
        if let Some(value) = args.tick_minutes {
            self.tick_minutes = value;
        }
        if let Some(value) = args.cashiers {
            self.cashiers = value;
        }
        if let Some(value) = args.hot_baristas {
            self.hot_baristas = value;
        }
        if let Some(value) = args.cold_baristas {
            self.cold_baristas = value;
        }
        if let Some(value) = args.abandonment_threshold {
            self.abandonment_threshold = value;
        }
        if let Some(value) = args.queue_capacity {
            self.queue_capacity = value;
        }
        if let Some(value) = args.base_arrival_rate {
            self.arrivals.base_rate = value;
        }
        if let Some(value) = args.peak_arrival_rate {
            self.arrivals.peak_rate = value;
        }
        if let Some(value) = args.seed {
            self.base_seed = value;
        }
        if let Some(value) = args.threads {
            self.threads = Some(value);
        }
        if let Some(value) = args.ordering {
            self.ordering = value;
        }
        if let Some(value) = args.output_format {
            self.output_format = value;
        }
        if let Some(value) = args.log_dir {
            self.log_directory = Some(value);
        }
        if let Some(value) = args.log_format {
            self.log_format = value;
        }
    }

    /// Save configuration to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Print configuration as JSON
    pub fn print_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Number of ticks in the horizon, rounded to the nearest whole tick
    pub fn total_ticks(&self) -> usize {
        (self.total_minutes / self.tick_minutes + 0.5).floor() as usize
    }

    /// Server pool size of a stage
    pub fn pool_size(&self, stage: StageKind) -> usize {
        match stage {
            StageKind::Cashier => self.cashiers,
            StageKind::HotBar => self.hot_baristas,
            StageKind::ColdBar => self.cold_baristas,
        }
    }

    /// Seed used by replica `index`
    pub fn replica_seed(&self, index: usize) -> u64 {
        self.base_seed.wrapping_add(self.seed_stride.wrapping_mul(index as u64))
    }

    /// Validate the configuration parameters
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.replicas == 0 {
            return Err(ConfigValidationError::InvalidReplicaCount(self.replicas));
        }

        Self::validate_duration("total_minutes", self.total_minutes)?;
        Self::validate_duration("tick_minutes", self.tick_minutes)?;
        if self.tick_minutes > self.total_minutes {
            return Err(ConfigValidationError::TickExceedsHorizon {
                tick: self.tick_minutes,
                total: self.total_minutes,
            });
        }
        let ticks = self.total_minutes / self.tick_minutes;
        if !ticks.is_finite() || ticks > defaults::MAX_TICKS as f64 {
            return Err(ConfigValidationError::TooManyTicks { ticks, max: defaults::MAX_TICKS });
        }

        if self.cashiers == 0 {
            return Err(ConfigValidationError::NoCashiers);
        }

        if self.queue_capacity == 0 {
            return Err(ConfigValidationError::InvalidQueueCapacity);
        }
        if self.abandonment_threshold >= self.queue_capacity {
            return Err(ConfigValidationError::ThresholdExceedsCapacity {
                threshold: self.abandonment_threshold,
                capacity: self.queue_capacity,
            });
        }

        Self::validate_positive_rate("cashier_rate", self.cashier_rate)?;
        Self::validate_positive_rate("fallback_rate", self.fallback_rate)?;
        Self::validate_arrival_rate("arrivals.base_rate", self.arrivals.base_rate)?;
        Self::validate_arrival_rate("arrivals.peak_rate", self.arrivals.peak_rate)?;
        if self.arrivals.peak_end < self.arrivals.peak_start {
            return Err(ConfigValidationError::InvalidRushWindow {
                start: self.arrivals.peak_start,
                end: self.arrivals.peak_end,
            });
        }

        self.validate_products()?;

        for stage in [StageKind::HotBar, StageKind::ColdBar] {
            if self.pool_size(stage) > 0 {
                continue;
            }
            if let Some(bar) = stage.bar() {
                let share = self.products.bar_share(bar);
                if share > 0.0 {
                    return Err(ConfigValidationError::UnservedStage { stage, share });
                }
            }
        }

        if self.threads == Some(0) {
            return Err(ConfigValidationError::InvalidThreadCount);
        }

        Ok(())
    }

    fn validate_products(&self) -> Result<(), ConfigValidationError> {
        if self.products.is_empty() {
            return Err(ConfigValidationError::EmptyCatalog);
        }

        for product in self.products.iter() {
            let checks = [("price", product.price), ("mix_weight", product.mix_weight)];
            for (field, value) in checks {
                if !value.is_finite() || value < 0.0 {
                    return Err(ConfigValidationError::InvalidProduct {
                        product: product.name.clone(),
                        field: field.to_string(),
                        value,
                    });
                }
            }
        }

        let total_weight: f64 = self.products.mix_weights().iter().sum();
        if total_weight <= 0.0 {
            return Err(ConfigValidationError::EmptyProductMix);
        }
        Ok(())
    }

    fn validate_duration(field: &str, value: f64) -> Result<(), ConfigValidationError> {
        if !value.is_finite() || value <= 0.0 {
            return Err(ConfigValidationError::InvalidDuration { field: field.to_string(), value });
        }
        Ok(())
    }

    fn validate_positive_rate(field: &str, value: f64) -> Result<(), ConfigValidationError> {
        if !value.is_finite() || value <= 0.0 {
            return Err(ConfigValidationError::InvalidRate { field: field.to_string(), value });
        }
        Ok(())
    }

    fn validate_arrival_rate(field: &str, value: f64) -> Result<(), ConfigValidationError> {
        if !value.is_finite() || value < 0.0 {
            return Err(ConfigValidationError::InvalidRate { field: field.to_string(), value });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Bar, Product};

    #[test]
    fn test_simulation_config_default() {
        let config = SimulationConfig::default();

        assert_eq!(config.total_minutes, 180.0);
        assert_eq!(config.tick_minutes, 0.25);
        assert_eq!(config.replicas, 24);
        assert_eq!(config.cashiers, 2);
        assert_eq!(config.hot_baristas, 2);
        assert_eq!(config.cold_baristas, 1);
        assert_eq!(config.abandonment_threshold, 50);
        assert_eq!(config.queue_capacity, 4096);
        assert_eq!(config.cashier_rate, 2.0);
        assert_eq!(config.ordering, TaskOrdering::Concurrent);
        assert_eq!(config.output_format, OutputFormat::Text);
        assert!(config.threads.is_none());
        config.validate().unwrap();
    }

    #[test]
    fn test_total_ticks_rounding() {
        let mut config = SimulationConfig::default();
        assert_eq!(config.total_ticks(), 720);

        config.total_minutes = 1.0;
        config.tick_minutes = 0.3;
        assert_eq!(config.total_ticks(), 3);
    }

    #[test]
    fn test_replica_seeds_are_distinct() {
        let config = SimulationConfig::default();
        assert_eq!(config.replica_seed(0), 1_234_567);
        assert_eq!(config.replica_seed(1), 1_234_567 + 7_919);
        assert_ne!(config.replica_seed(2), config.replica_seed(3));
    }

    #[test]
    fn test_cli_parsing() {
        let args = vec!["test", "--replicas", "8", "--ordering", "sequential", "--output-format", "json"];
        let cli_args = CliArgs::try_parse_from(args).unwrap();
        assert_eq!(cli_args.replicas, Some(8));
        assert_eq!(cli_args.ordering, Some(TaskOrdering::Sequential));
        assert_eq!(cli_args.output_format, Some(OutputFormat::Json));

        let config = SimulationConfig::from_cli_args(cli_args).unwrap();
        assert_eq!(config.replicas, 8);
        assert_eq!(config.ordering, TaskOrdering::Sequential);
    }

    #[test]
    fn test_cli_rejects_unknown_ordering() {
        let args = vec!["test", "--ordering", "shuffled"];
        assert!(CliArgs::try_parse_from(args).is_err());
    }

    #[test]
    fn test_validation_rejects_zero_replicas() {
        let config = SimulationConfig { replicas: 0, ..Default::default() };
        assert_eq!(config.validate(), Err(ConfigValidationError::InvalidReplicaCount(0)));
    }

    #[test]
    fn test_validation_rejects_bad_durations() {
        let config = SimulationConfig { tick_minutes: 0.0, ..Default::default() };
        assert!(matches!(config.validate(), Err(ConfigValidationError::InvalidDuration { .. })));

        let config = SimulationConfig { total_minutes: f64::NAN, ..Default::default() };
        assert!(matches!(config.validate(), Err(ConfigValidationError::InvalidDuration { .. })));

        let config = SimulationConfig { total_minutes: 0.1, ..Default::default() };
        assert!(matches!(config.validate(), Err(ConfigValidationError::TickExceedsHorizon { .. })));
    }

    #[test]
    fn test_validation_rejects_unbounded_tick_count() {
        let config = SimulationConfig { tick_minutes: 1e-300, replicas: 1, ..Default::default() };
        assert!(matches!(
            config.validate(),
            Err(ConfigValidationError::TooManyTicks { max: defaults::MAX_TICKS, .. })
        ));

        let config = SimulationConfig { total_minutes: 1e300, ..Default::default() };
        assert!(matches!(config.validate(), Err(ConfigValidationError::TooManyTicks { .. })));

        // Exactly at the limit is still accepted
        let config = SimulationConfig {
            total_minutes: defaults::MAX_TICKS as f64 * 0.25,
            tick_minutes: 0.25,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_threshold_above_capacity() {
        let config = SimulationConfig { queue_capacity: 10, ..Default::default() };
        assert!(matches!(
            config.validate(),
            Err(ConfigValidationError::ThresholdExceedsCapacity { threshold: 50, capacity: 10 })
        ));
    }

    #[test]
    fn test_validation_rejects_unserved_bar() {
        let config = SimulationConfig { cold_baristas: 0, ..Default::default() };
        assert!(matches!(
            config.validate(),
            Err(ConfigValidationError::UnservedStage { stage: StageKind::ColdBar, .. })
        ));

        // A catalog without cold products needs no cold bar.
        let config = SimulationConfig {
            cold_baristas: 0,
            products: ProductCatalog::new(vec![Product::new("tea", 12.0, 1.0, Bar::Hot, 0.5)]),
            ..Default::default()
        };
        config.validate().unwrap();
    }

    #[test]
    fn test_validation_rejects_bad_rates() {
        let mut config = SimulationConfig::default();
        config.arrivals.base_rate = -1.0;
        assert!(matches!(config.validate(), Err(ConfigValidationError::InvalidRate { .. })));

        let config = SimulationConfig { fallback_rate: 0.0, ..Default::default() };
        assert!(matches!(config.validate(), Err(ConfigValidationError::InvalidRate { .. })));

        let mut config = SimulationConfig::default();
        config.arrivals.peak_start = 100.0;
        config.arrivals.peak_end = 50.0;
        assert!(matches!(config.validate(), Err(ConfigValidationError::InvalidRushWindow { .. })));
    }

    #[test]
    fn test_zero_arrival_rates_are_valid() {
        let mut config = SimulationConfig::default();
        config.arrivals = ArrivalCurve::constant(0.0);
        config.validate().unwrap();
    }

    #[test]
    fn test_validation_rejects_empty_mix() {
        let config = SimulationConfig {
            products: ProductCatalog::new(vec![Product::new("tea", 12.0, 0.0, Bar::Hot, 0.5)]),
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigValidationError::EmptyProductMix));

        let config = SimulationConfig { products: ProductCatalog::new(vec![]), ..Default::default() };
        assert_eq!(config.validate(), Err(ConfigValidationError::EmptyCatalog));
    }

    #[test]
    fn test_config_file_loading() {
        use std::io::Write;
        use tempfile::Builder;

        let mut temp_file = Builder::new().suffix(".json").tempfile().unwrap();
        let config_json = r#"{
            "replicas": 4,
            "cashiers": 3,
            "arrivals": { "base_rate": 1.0, "peak_rate": 5.0, "peak_start": 30.0, "peak_end": 60.0 },
            "ordering": "sequential"
        }"#;
        temp_file.write_all(config_json.as_bytes()).unwrap();

        let config = SimulationConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.replicas, 4);
        assert_eq!(config.cashiers, 3);
        assert_eq!(config.arrivals.peak_rate, 5.0);
        assert_eq!(config.ordering, TaskOrdering::Sequential);
        // Unspecified fields keep their defaults
        assert_eq!(config.hot_baristas, 2);
        assert_eq!(config.products, ProductCatalog::default());
    }

    #[test]
    fn test_config_file_errors() {
        let missing = SimulationConfig::from_file("/definitely/not/here.json");
        assert!(matches!(missing, Err(ConfigError::FileNotFound(_))));

        let temp_file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        let unsupported = SimulationConfig::from_file(temp_file.path());
        assert!(matches!(unsupported, Err(ConfigError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cafe.json");
        let config = SimulationConfig { replicas: 7, ..Default::default() };
        config.save_to_file(&path).unwrap();

        let reloaded = SimulationConfig::from_file(&path).unwrap();
        assert_eq!(reloaded.replicas, 7);
        assert_eq!(reloaded.arrivals, config.arrivals);
        for (saved, loaded) in config.products.iter().zip(reloaded.products.iter()) {
            assert_eq!(saved.name, loaded.name);
            assert!((saved.bar_rate - loaded.bar_rate).abs() < 1e-12);
        }
    }
}
