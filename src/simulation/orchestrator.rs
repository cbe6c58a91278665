//! Main simulation orchestrator
//!
//! Runs every replica on a dedicated worker pool and reduces their outcomes
//! into a [`SimulationReport`].

use crate::simulation::{
    GlobalTotals, ReplicaDriver, ReplicaOutcome, SimulationError, SimulationPlan, SimulationReport,
    SimulationResult, SummaryMetrics,
};
use crate::types::{RunId, SimulationConfig};
use chrono::Utc;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::time::Instant;
use tracing::{info, instrument};

/// Coordinates a full multi-replica run
#[derive(Debug)]
pub struct SimulationOrchestrator {
    plan: SimulationPlan,
    pool: ThreadPool,
    run_id: RunId,
}

impl SimulationOrchestrator {
    /// Validate `config` and start the worker pool
    #[instrument(skip(config), fields(replicas = config.replicas, threads = ?config.threads))]
    pub fn new(config: SimulationConfig) -> SimulationResult<Self> {
        let plan = SimulationPlan::new(config)?;

        let mut builder = ThreadPoolBuilder::new().thread_name(|i| format!("replica-{}", i));
        if let Some(threads) = plan.config().threads {
            builder = builder.num_threads(threads);
        }
        let pool = builder.build().map_err(|e| SimulationError::thread_pool(e.to_string()))?;

        let run_id = RunId::new();
        info!(
            %run_id,
            replicas = plan.config().replicas,
            total_ticks = plan.total_ticks(),
            workers = pool.current_num_threads(),
            "Initialized simulation orchestrator"
        );

        Ok(Self { plan, pool, run_id })
    }

    /// Identifier of this run
    pub fn run_id(&self) -> RunId {
        self.run_id
    }

    /// The validated plan
    pub fn plan(&self) -> &SimulationPlan {
        &self.plan
    }

    /// Number of worker threads
    pub fn worker_count(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Run every replica and reduce the results
    ///
    /// Replicas run in parallel; their outcomes are collected in replica
    /// order and folded sequentially so the floating point totals do not
    /// depend on which replica finished first.
    #[instrument(skip(self), fields(run_id = %self.run_id))]
    pub fn run(&self) -> SimulationResult<SimulationReport> {
        let config = self.plan.config();
        let started_at = Utc::now();
        let clock = Instant::now();

        info!(replicas = config.replicas, ordering = %config.ordering, "Starting replicas");

        let plan = &self.plan;
        let outcomes: Vec<ReplicaOutcome> = self.pool.install(|| {
            (0..config.replicas)
                .into_par_iter()
                .map(|index| ReplicaDriver::new(plan, index).map(ReplicaDriver::run))
                .collect::<SimulationResult<Vec<_>>>()
        })?;

        let totals = GlobalTotals::from_outcomes(&outcomes);
        let metrics = SummaryMetrics::from_totals(&totals, config.replicas, config.total_minutes);
        let elapsed_seconds = clock.elapsed().as_secs_f64();

        info!(
            completions = totals.completions,
            abandonments = totals.abandonments,
            arrivals = totals.arrivals,
            elapsed_seconds,
            "All replicas finished"
        );

        Ok(SimulationReport {
            run_id: self.run_id,
            started_at,
            elapsed_seconds,
            replicas: config.replicas,
            total_minutes: config.total_minutes,
            ordering: config.ordering,
            totals,
            metrics,
            outcomes,
        })
    }
}
