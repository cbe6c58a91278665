//! Customers flowing through the cafe

use crate::types::StageKind;
use serde::{Deserialize, Serialize};

/// One customer and their order
///
/// Immutable once created except for the checkout stamp, which the cashier
/// stage writes exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    arrived_at: f64,
    product: usize,
    checkout_finished_at: Option<f64>,
}

impl Customer {
    /// A customer arriving at minute `arrived_at` who orders `product`
    pub fn new(arrived_at: f64, product: usize) -> Self {
        Self { arrived_at, product, checkout_finished_at: None }
    }

    /// Minute the customer entered the cafe
    pub fn arrived_at(&self) -> f64 {
        self.arrived_at
    }

    /// Index of the ordered product in the catalog
    pub fn product(&self) -> usize {
        self.product
    }

    /// Minute the customer left the cashier, if they have
    pub fn checkout_finished_at(&self) -> Option<f64> {
        self.checkout_finished_at
    }

    /// Record the end of checkout
    pub fn stamp_checkout(&mut self, at: f64) {
        debug_assert!(self.checkout_finished_at.is_none(), "checkout stamped twice");
        self.checkout_finished_at.get_or_insert(at);
    }

    /// Minute from which the customer has been waiting for `stage`
    pub fn eligible_since(&self, stage: StageKind) -> f64 {
        match stage {
            StageKind::Cashier => self.arrived_at,
            StageKind::HotBar | StageKind::ColdBar => {
                self.checkout_finished_at.unwrap_or(self.arrived_at)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_customer_has_no_checkout() {
        let customer = Customer::new(3.5, 2);
        assert_eq!(customer.arrived_at(), 3.5);
        assert_eq!(customer.product(), 2);
        assert!(customer.checkout_finished_at().is_none());
        assert_eq!(customer.eligible_since(StageKind::Cashier), 3.5);
    }

    #[test]
    fn test_checkout_stamp_sets_bar_eligibility() {
        let mut customer = Customer::new(1.0, 0);
        customer.stamp_checkout(2.25);
        assert_eq!(customer.checkout_finished_at(), Some(2.25));
        assert_eq!(customer.eligible_since(StageKind::Cashier), 1.0);
        assert_eq!(customer.eligible_since(StageKind::HotBar), 2.25);
        assert_eq!(customer.eligible_since(StageKind::ColdBar), 2.25);
    }
}
