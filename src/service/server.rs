//! Servers: cashiers and baristas

use super::{BoundedQueue, Customer};

/// A customer being served and the service time still owed to them
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InService {
    /// The customer at the counter
    pub customer: Customer,
    /// Minutes of service left
    pub remaining: f64,
}

/// One cashier or barista
///
/// A server holds at most one customer; it is busy exactly when it holds one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Server {
    current: Option<InService>,
}

impl Server {
    /// An idle server
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a customer is being served
    pub fn is_busy(&self) -> bool {
        self.current.is_some()
    }

    /// Customer being served, if any
    pub fn customer(&self) -> Option<&Customer> {
        self.current.as_ref().map(|s| &s.customer)
    }

    /// Minutes of service left; zero when idle
    pub fn remaining(&self) -> f64 {
        self.current.map_or(0.0, |s| s.remaining)
    }

    /// Take the next customer from `queue` if this server is idle
    ///
    /// `service_time` is asked for the new customer's service duration.
    /// Returns a copy of the admitted customer.
    pub fn admit<F>(&mut self, queue: &BoundedQueue, service_time: F) -> Option<Customer>
    where
        F: FnOnce(&Customer) -> f64,
    {
        if self.is_busy() {
            return None;
        }
        let customer = queue.dequeue()?;
        let remaining = service_time(&customer);
        self.current = Some(InService { customer, remaining });
        Some(customer)
    }

    /// Work for `tick` minutes; returns the customer if their service ended
    pub fn advance(&mut self, tick: f64) -> Option<Customer> {
        let service = self.current.as_mut()?;
        service.remaining -= tick;
        if service.remaining <= 0.0 {
            self.current.take().map(|s| s.customer)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn queue_with(products: &[usize]) -> BoundedQueue {
        let queue = BoundedQueue::with_capacity(8).unwrap();
        for &product in products {
            queue.enqueue(Customer::new(0.0, product)).unwrap();
        }
        queue
    }

    #[test]
    fn test_idle_server() {
        let mut server = Server::new();
        assert!(!server.is_busy());
        assert_eq!(server.remaining(), 0.0);
        assert!(server.customer().is_none());
        assert!(server.advance(0.25).is_none());
    }

    #[test]
    fn test_admit_from_empty_queue() {
        let mut server = Server::new();
        let queue = queue_with(&[]);
        assert!(server.admit(&queue, |_| 1.0).is_none());
        assert!(!server.is_busy());
    }

    #[test]
    fn test_service_runs_down() {
        let mut server = Server::new();
        let queue = queue_with(&[3]);
        let admitted = server.admit(&queue, |_| 0.6).unwrap();
        assert_eq!(admitted.product(), 3);
        assert!(server.is_busy());

        assert!(server.advance(0.25).is_none());
        assert!(server.advance(0.25).is_none());
        assert!((server.remaining() - 0.1).abs() < 1e-12);

        let done = server.advance(0.25).unwrap();
        assert_eq!(done.product(), 3);
        assert!(!server.is_busy());
    }

    #[test]
    fn test_exact_finish_on_tick_boundary() {
        let mut server = Server::new();
        let queue = queue_with(&[0]);
        server.admit(&queue, |_| 0.5).unwrap();
        assert!(server.advance(0.25).is_none());
        assert!(server.advance(0.25).is_some());
    }

    #[test]
    fn test_busy_server_holds_one_customer() {
        let mut server = Server::new();
        let queue = queue_with(&[1, 2]);
        server.admit(&queue, |_| 1.0).unwrap();

        assert!(server.admit(&queue, |_| 1.0).is_none());
        assert_eq!(server.customer().map(|c| c.product()), Some(1));
        // The second customer was never taken off the queue
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_service_time_sees_customer() {
        let mut server = Server::new();
        let queue = queue_with(&[4]);
        server.admit(&queue, |c| c.product() as f64).unwrap();
        assert_eq!(server.remaining(), 4.0);
    }
}
