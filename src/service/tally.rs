//! Per-task subtotals
//!
//! Each task of a tick counts into its own [`StageTally`] and hands it to the
//! replica once at the end of its work, so the replica's shared counters are
//! locked once per task per tick instead of once per customer.

use serde::{Deserialize, Serialize};

/// What one task contributed during one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StageTally {
    /// Revenue of orders completed
    pub revenue: f64,
    /// Minutes customers waited before being admitted to a server
    pub wait_time: f64,
    /// Orders completed
    pub completions: u64,
    /// Customers who left without being served
    pub abandonments: u64,
    /// Customers who entered the cafe
    pub arrivals: u64,
}

impl StageTally {
    /// Whether nothing was counted
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Add another tally into this one
    pub fn merge(&mut self, other: &StageTally) {
        self.revenue += other.revenue;
        self.wait_time += other.wait_time;
        self.completions += other.completions;
        self.abandonments += other.abandonments;
        self.arrivals += other.arrivals;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_empty() {
        assert!(StageTally::default().is_empty());
    }

    #[test]
    fn test_merge_adds_fields() {
        let mut total = StageTally { revenue: 10.0, wait_time: 1.5, completions: 1, ..Default::default() };
        total.merge(&StageTally { revenue: 5.0, abandonments: 2, arrivals: 3, ..Default::default() });

        assert_eq!(total.revenue, 15.0);
        assert_eq!(total.wait_time, 1.5);
        assert_eq!(total.completions, 1);
        assert_eq!(total.abandonments, 2);
        assert_eq!(total.arrivals, 3);
        assert!(!total.is_empty());
    }
}
