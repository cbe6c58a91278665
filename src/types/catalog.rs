//! Product catalog and arrival-rate curve
//!
//! The catalog lists what the cafe sells: price, share of the order mix, the
//! bar that prepares it and that bar's service rate. The arrival curve gives
//! the customer arrival rate (customers per minute) at any simulated minute.

use super::{Bar, StageKind};
use serde::{Deserialize, Serialize};
use std::collections::TryReserveError;

/// One item on the menu
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Display name
    pub name: String,
    /// Price charged when the order is completed
    pub price: f64,
    /// Relative weight in the order mix
    pub mix_weight: f64,
    /// Bar that prepares this product
    pub bar: Bar,
    /// Service rate at that bar, in orders per minute
    pub bar_rate: f64,
}

impl Product {
    /// Create a product from its mean preparation time in minutes
    pub fn new(name: impl Into<String>, price: f64, mix_weight: f64, bar: Bar, mean_minutes: f64) -> Self {
        Self { name: name.into(), price, mix_weight, bar, bar_rate: 1.0 / mean_minutes }
    }
}

/// Ordered list of products; customers refer to products by index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductCatalog {
    products: Vec<Product>,
}

impl ProductCatalog {
    /// Create a catalog from a product list
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    /// Number of products
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalog has no products
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Iterate over the products in index order
    pub fn iter(&self) -> impl Iterator<Item = &Product> {
        self.products.iter()
    }

    /// Product at `index`
    pub fn get(&self, index: usize) -> Option<&Product> {
        self.products.get(index)
    }

    /// Price of the product at `index`, zero for an unknown index
    pub fn price(&self, index: usize) -> f64 {
        self.get(index).map_or(0.0, |p| p.price)
    }

    /// Bar for the product at `index`
    ///
    /// Unknown products go to the hot bar, whose rate table then applies the
    /// fallback rate.
    pub fn bar(&self, index: usize) -> Bar {
        self.get(index).map_or(Bar::Hot, |p| p.bar)
    }

    /// Order-mix weights in index order
    pub fn mix_weights(&self) -> Vec<f64> {
        self.products.iter().map(|p| p.mix_weight).collect()
    }

    /// Normalised order-mix probabilities
    pub fn mix_probabilities(&self) -> Vec<f64> {
        let total: f64 = self.products.iter().map(|p| p.mix_weight).sum();
        if total <= 0.0 {
            return vec![0.0; self.products.len()];
        }
        self.products.iter().map(|p| p.mix_weight / total).collect()
    }

    /// Per-product service rates for a stage
    ///
    /// The cashier serves every product at `cashier_rate`; a bar serves only
    /// its own products and carries a zero rate for the others.
    pub fn rate_table(&self, stage: StageKind, cashier_rate: f64) -> Vec<f64> {
        match stage.bar() {
            None => vec![cashier_rate; self.products.len()],
            Some(bar) => self
                .products
                .iter()
                .map(|p| if p.bar == bar { p.bar_rate } else { 0.0 })
                .collect(),
        }
    }

    /// Share of the order mix that is routed to `bar`
    pub fn bar_share(&self, bar: Bar) -> f64 {
        let probabilities = self.mix_probabilities();
        self.products
            .iter()
            .zip(probabilities)
            .filter(|(p, _)| p.bar == bar)
            .map(|(_, share)| share)
            .sum()
    }
}

impl Default for ProductCatalog {
    fn default() -> Self {
        Self::new(vec![
            Product::new("espresso", 15.0, 0.18, Bar::Hot, 0.7),
            Product::new("americano", 15.0, 0.18, Bar::Hot, 0.6),
            Product::new("latte", 22.0, 0.24, Bar::Hot, 1.2),
            Product::new("tea", 12.0, 0.15, Bar::Hot, 0.5),
            Product::new("frappe", 26.0, 0.15, Bar::Cold, 1.0),
            Product::new("smoothie", 28.0, 0.10, Bar::Cold, 1.1),
        ])
    }
}

/// Piecewise-constant arrival rate with one rush window
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArrivalCurve {
    /// Customers per minute outside the rush window
    pub base_rate: f64,
    /// Customers per minute inside the rush window
    pub peak_rate: f64,
    /// First minute of the rush window (inclusive)
    pub peak_start: f64,
    /// Last minute of the rush window (inclusive)
    pub peak_end: f64,
}

impl ArrivalCurve {
    /// A curve with the same rate over the whole horizon
    pub fn constant(rate: f64) -> Self {
        Self { base_rate: rate, peak_rate: rate, peak_start: 0.0, peak_end: 0.0 }
    }

    /// Customers per minute at simulated minute `t`
    pub fn rate_at(&self, t: f64) -> f64 {
        if t >= self.peak_start && t <= self.peak_end {
            self.peak_rate
        } else {
            self.base_rate
        }
    }

    /// Rate for every tick of the horizon, sampled at each tick's start
    ///
    /// The table is reserved up front so an oversized horizon fails instead
    /// of aborting the process.
    pub fn per_tick(&self, total_ticks: usize, tick_minutes: f64) -> Result<Vec<f64>, TryReserveError> {
        let mut rates = Vec::new();
        rates.try_reserve_exact(total_ticks)?;
        rates.extend((0..total_ticks).map(|i| self.rate_at(i as f64 * tick_minutes)));
        Ok(rates)
    }
}

impl Default for ArrivalCurve {
    fn default() -> Self {
        Self { base_rate: 1.2, peak_rate: 2.8, peak_start: 60.0, peak_end: 120.0 }
    }
}
