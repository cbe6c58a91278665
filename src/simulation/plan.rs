//! Validated, precomputed inputs shared read-only by every replica

use crate::service::{ArrivalProcess, ServiceRates};
use crate::simulation::SimulationResult;
use crate::types::{ProductCatalog, SimulationConfig, StageKind};
use tracing::debug;

/// Everything a replica needs that does not change during a run
#[derive(Debug, Clone)]
pub struct SimulationPlan {
    config: SimulationConfig,
    total_ticks: usize,
    arrivals: ArrivalProcess,
    cashier_rates: ServiceRates,
    hot_bar_rates: ServiceRates,
    cold_bar_rates: ServiceRates,
}

impl SimulationPlan {
    /// Validate `config` and precompute rate tables
    pub fn new(config: SimulationConfig) -> SimulationResult<Self> {
        config.validate()?;

        let total_ticks = config.total_ticks();
        let arrivals = ArrivalProcess::new(
            &config.arrivals,
            &config.products,
            total_ticks,
            config.tick_minutes,
            config.abandonment_threshold,
        )?;
        let rates_for = |stage: StageKind| {
            ServiceRates::new(config.products.rate_table(stage, config.cashier_rate), config.fallback_rate)
        };
        let cashier_rates = rates_for(StageKind::Cashier);
        let hot_bar_rates = rates_for(StageKind::HotBar);
        let cold_bar_rates = rates_for(StageKind::ColdBar);

        debug!(
            total_ticks,
            expected_arrivals = arrivals.expected_arrivals(),
            "Prepared simulation plan"
        );

        Ok(Self { config, total_ticks, arrivals, cashier_rates, hot_bar_rates, cold_bar_rates })
    }

    /// The validated configuration
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// The product catalog
    pub fn catalog(&self) -> &ProductCatalog {
        &self.config.products
    }

    /// Ticks per replica
    pub fn total_ticks(&self) -> usize {
        self.total_ticks
    }

    /// Minutes per tick
    pub fn tick_minutes(&self) -> f64 {
        self.config.tick_minutes
    }

    /// Simulated minute at the start of `tick`
    pub fn tick_time(&self, tick: usize) -> f64 {
        tick as f64 * self.config.tick_minutes
    }

    /// The arrival process
    pub fn arrivals(&self) -> &ArrivalProcess {
        &self.arrivals
    }

    /// Service rates of a stage
    pub fn rates(&self, stage: StageKind) -> &ServiceRates {
        match stage {
            StageKind::Cashier => &self.cashier_rates,
            StageKind::HotBar => &self.hot_bar_rates,
            StageKind::ColdBar => &self.cold_bar_rates,
        }
    }
}
