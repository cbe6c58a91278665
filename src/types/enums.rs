//! Enumeration types for the cafe simulator
//!
//! This module contains the enumeration types used throughout the simulation:
//! service stages, bars, per-tick task ordering and report output formats.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The three service stages of the cafe pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageKind {
    /// Checkout counter; every customer passes through it first
    Cashier,
    /// Hot drinks bar
    HotBar,
    /// Cold drinks bar
    ColdBar,
}

impl StageKind {
    /// All stages in pipeline order
    pub const ALL: [StageKind; 3] = [StageKind::Cashier, StageKind::HotBar, StageKind::ColdBar];

    /// Whether customers leave the system after this stage
    pub fn is_terminal(self) -> bool {
        !matches!(self, StageKind::Cashier)
    }

    /// The bar this stage serves, if it is a bar stage
    pub fn bar(self) -> Option<Bar> {
        match self {
            StageKind::Cashier => None,
            StageKind::HotBar => Some(Bar::Hot),
            StageKind::ColdBar => Some(Bar::Cold),
        }
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StageKind::Cashier => write!(f, "Cashier"),
            StageKind::HotBar => write!(f, "Hot Bar"),
            StageKind::ColdBar => write!(f, "Cold Bar"),
        }
    }
}

impl FromStr for StageKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cashier" | "checkout" => Ok(StageKind::Cashier),
            "hot bar" | "hotbar" | "hot_bar" | "hot" => Ok(StageKind::HotBar),
            "cold bar" | "coldbar" | "cold_bar" | "cold" => Ok(StageKind::ColdBar),
            _ => Err(format!("Unknown stage: {}", s)),
        }
    }
}

/// Bar that prepares a product after checkout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bar {
    /// Espresso machine and kettles
    Hot,
    /// Blenders
    Cold,
}

impl Bar {
    /// The service stage that owns this bar
    pub fn stage(self) -> StageKind {
        match self {
            Bar::Hot => StageKind::HotBar,
            Bar::Cold => StageKind::ColdBar,
        }
    }
}

impl fmt::Display for Bar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bar::Hot => write!(f, "Hot"),
            Bar::Cold => write!(f, "Cold"),
        }
    }
}

impl FromStr for Bar {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "hot" => Ok(Bar::Hot),
            "cold" => Ok(Bar::Cold),
            _ => Err(format!("Unknown bar: {}", s)),
        }
    }
}

/// How the four tasks of a tick are scheduled
///
/// `Concurrent` forks all four tasks onto the worker pool; their relative
/// order on the shared queues is unspecified, so per-customer routing can
/// differ between runs. `Sequential` runs them in pipeline order
/// (arrivals, cashier, hot bar, cold bar) on the calling thread, which makes
/// every replica bit-reproducible for a given seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskOrdering {
    /// Fork-join the four tasks every tick
    #[default]
    Concurrent,
    /// Run the four tasks one after another in pipeline order
    Sequential,
}

impl fmt::Display for TaskOrdering {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskOrdering::Concurrent => write!(f, "concurrent"),
            TaskOrdering::Sequential => write!(f, "sequential"),
        }
    }
}

impl FromStr for TaskOrdering {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "concurrent" | "parallel" => Ok(TaskOrdering::Concurrent),
            "sequential" | "ordered" => Ok(TaskOrdering::Sequential),
            _ => Err(format!("Unknown task ordering: {}", s)),
        }
    }
}

/// Output formats for the final report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// Four summary lines
    #[default]
    Text,
    /// Full report as pretty-printed JSON
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_kind_terminal() {
        assert!(!StageKind::Cashier.is_terminal());
        assert!(StageKind::HotBar.is_terminal());
        assert!(StageKind::ColdBar.is_terminal());
    }

    #[test]
    fn test_stage_bar_mapping() {
        assert_eq!(StageKind::Cashier.bar(), None);
        for bar in [Bar::Hot, Bar::Cold] {
            assert_eq!(bar.stage().bar(), Some(bar));
        }
    }

    #[test]
    fn test_stage_kind_from_str() {
        assert_eq!("cashier".parse::<StageKind>().unwrap(), StageKind::Cashier);
        assert_eq!("hot bar".parse::<StageKind>().unwrap(), StageKind::HotBar);
        assert_eq!("cold_bar".parse::<StageKind>().unwrap(), StageKind::ColdBar);
        assert!("kitchen".parse::<StageKind>().is_err());
    }

    #[test]
    fn test_task_ordering_from_str() {
        assert_eq!("concurrent".parse::<TaskOrdering>().unwrap(), TaskOrdering::Concurrent);
        assert_eq!("Sequential".parse::<TaskOrdering>().unwrap(), TaskOrdering::Sequential);
        assert!("random".parse::<TaskOrdering>().is_err());
    }

    #[test]
    fn test_output_format_display() {
        assert_eq!(format!("{}", OutputFormat::Text), "text");
        assert_eq!(format!("{}", OutputFormat::Json), "json");
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!("csv".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_enum_serialization() {
        let json = serde_json::to_string(&StageKind::HotBar).unwrap();
        assert_eq!(json, "\"hot_bar\"");
        let ordering: TaskOrdering = serde_json::from_str("\"sequential\"").unwrap();
        assert_eq!(ordering, TaskOrdering::Sequential);
        let bar: Bar = serde_json::from_str("\"cold\"").unwrap();
        assert_eq!(bar, Bar::Cold);
    }
}
