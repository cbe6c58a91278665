//! Statistics collection and reporting
//!
//! Replicas report a [`ReplicaOutcome`]; outcomes fold into [`GlobalTotals`],
//! from which [`SummaryMetrics`] are derived. [`SimulationReport`] wraps the
//! lot with run metadata for output.

use crate::simulation::SimulationResult;
use crate::types::{RunId, TaskOrdering};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Final counters of one replica
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ReplicaOutcome {
    /// Replica index
    pub replica: usize,
    /// Seed of the replica's random stream
    pub seed: u64,
    /// Revenue of completed orders
    pub revenue: f64,
    /// Summed minutes waited before each server admission
    pub wait_time: f64,
    /// Orders completed at a bar
    pub completions: u64,
    /// Customers rejected by a full queue or evicted by the threshold
    pub abandonments: u64,
    /// Customers who entered the cafe
    pub arrivals: u64,
    /// Customers still queued or in service when the horizon ended
    pub in_system: u64,
}

impl ReplicaOutcome {
    /// Whether every arrival is accounted for
    pub fn is_conserved(&self) -> bool {
        self.arrivals == self.completions + self.abandonments + self.in_system
    }
}

/// Counters summed over all replicas
///
/// `merge` is associative and commutative on the integer counters; the
/// floating point sums depend on fold order, which the orchestrator keeps
/// fixed by folding in replica index order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GlobalTotals {
    /// Total revenue
    pub revenue: f64,
    /// Total minutes waited
    pub wait_time: f64,
    /// Total completed orders
    pub completions: u64,
    /// Total abandonments
    pub abandonments: u64,
    /// Total arrivals
    pub arrivals: u64,
    /// Total customers left in the system at the horizon
    pub in_system: u64,
}

impl GlobalTotals {
    /// Fold another set of totals into this one
    pub fn merge(mut self, other: GlobalTotals) -> Self {
        self.revenue += other.revenue;
        self.wait_time += other.wait_time;
        self.completions += other.completions;
        self.abandonments += other.abandonments;
        self.arrivals += other.arrivals;
        self.in_system += other.in_system;
        self
    }

    /// Sum outcomes in the order given
    pub fn from_outcomes<'a>(outcomes: impl IntoIterator<Item = &'a ReplicaOutcome>) -> Self {
        outcomes.into_iter().map(GlobalTotals::from).fold(GlobalTotals::default(), GlobalTotals::merge)
    }
}

impl From<&ReplicaOutcome> for GlobalTotals {
    fn from(outcome: &ReplicaOutcome) -> Self {
        Self {
            revenue: outcome.revenue,
            wait_time: outcome.wait_time,
            completions: outcome.completions,
            abandonments: outcome.abandonments,
            arrivals: outcome.arrivals,
            in_system: outcome.in_system,
        }
    }
}

/// The four headline metrics of a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryMetrics {
    /// Mean revenue per replica
    pub avg_revenue_per_replica: f64,
    /// Mean minutes waited per completed order
    pub avg_wait_minutes_per_order: f64,
    /// Completed orders per simulated minute per replica
    pub throughput_orders_per_minute: f64,
    /// Abandonments over abandonments plus completions
    pub abandonment_rate: f64,
}

impl SummaryMetrics {
    /// Derive metrics from totals over `replicas` runs of `total_minutes`
    pub fn from_totals(totals: &GlobalTotals, replicas: usize, total_minutes: f64) -> Self {
        let replicas = replicas as f64;
        let completions = totals.completions as f64;
        let handled = (totals.completions + totals.abandonments) as f64;
        let exposure = replicas * total_minutes;

        Self {
            avg_revenue_per_replica: ratio(totals.revenue, replicas),
            avg_wait_minutes_per_order: ratio(totals.wait_time, completions),
            throughput_orders_per_minute: ratio(completions, exposure),
            abandonment_rate: ratio(totals.abandonments as f64, handled),
        }
    }
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

/// Everything a run produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationReport {
    /// Identifier of this run
    pub run_id: RunId,
    /// Wall-clock start of the run
    pub started_at: DateTime<Utc>,
    /// Wall-clock duration of the run in seconds
    pub elapsed_seconds: f64,
    /// Number of replicas
    pub replicas: usize,
    /// Simulated minutes per replica
    pub total_minutes: f64,
    /// How the tasks of a tick were ordered
    pub ordering: TaskOrdering,
    /// Summed counters
    pub totals: GlobalTotals,
    /// Derived metrics
    pub metrics: SummaryMetrics,
    /// Per-replica outcomes in replica order
    pub outcomes: Vec<ReplicaOutcome>,
}

impl SimulationReport {
    /// The four summary lines printed by the binary
    pub fn summary_lines(&self) -> Vec<String> {
        vec![
            format!("avg_revenue_per_replica: {:.2}", self.metrics.avg_revenue_per_replica),
            format!("avg_wait_minutes_per_order: {:.3}", self.metrics.avg_wait_minutes_per_order),
            format!("throughput_orders_per_minute: {:.3}", self.metrics.throughput_orders_per_minute),
            format!("abandonment_rate: {:.3}", self.metrics.abandonment_rate),
        ]
    }

    /// Pretty-printed JSON form of the report
    pub fn to_json(&self) -> SimulationResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Whether every replica's arrivals are accounted for
    pub fn is_conserved(&self) -> bool {
        self.outcomes.iter().all(ReplicaOutcome::is_conserved)
    }
}

impl fmt::Display for SimulationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in self.summary_lines() {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}
