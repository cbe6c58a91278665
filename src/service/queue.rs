//! Bounded concurrent FIFO queues
//!
//! A [`BoundedQueue`] is a fixed-capacity ring buffer behind a mutex. The
//! lock is held only for the buffer mutation itself; callers decide what a
//! rejected enqueue means (usually an abandonment).

use super::Customer;
use crate::simulation::{SimulationError, SimulationResult};
use crate::types::{Bar, StageKind};
use parking_lot::Mutex;

#[derive(Debug)]
struct Ring {
    slots: Vec<Option<Customer>>,
    head: usize,
    tail: usize,
    len: usize,
}

impl Ring {
    fn push(&mut self, customer: Customer) -> Result<(), Customer> {
        if self.len == self.slots.len() {
            return Err(customer);
        }
        self.slots[self.tail] = Some(customer);
        self.tail = (self.tail + 1) % self.slots.len();
        self.len += 1;
        Ok(())
    }

    fn pop(&mut self) -> Option<Customer> {
        if self.len == 0 {
            return None;
        }
        let customer = self.slots[self.head].take();
        self.head = (self.head + 1) % self.slots.len();
        self.len -= 1;
        customer
    }
}

/// Fixed-capacity FIFO queue safe to share between the tasks of a tick
///
/// # Example
/// ```
/// use cafe_queue_simulator::service::{BoundedQueue, Customer};
///
/// let queue = BoundedQueue::with_capacity(1).unwrap();
/// assert!(queue.enqueue(Customer::new(0.0, 0)).is_ok());
/// assert!(queue.enqueue(Customer::new(0.0, 1)).is_err());
/// assert_eq!(queue.dequeue().map(|c| c.product()), Some(0));
/// assert!(queue.dequeue().is_none());
/// ```
#[derive(Debug)]
pub struct BoundedQueue {
    ring: Mutex<Ring>,
    capacity: usize,
}

impl BoundedQueue {
    /// Allocate a queue holding at most `capacity` customers
    pub fn with_capacity(capacity: usize) -> SimulationResult<Self> {
        let mut slots = Vec::new();
        slots
            .try_reserve_exact(capacity)
            .map_err(|_| SimulationError::allocation("queue buffer", capacity))?;
        slots.resize(capacity, None);

        Ok(Self { ring: Mutex::new(Ring { slots, head: 0, tail: 0, len: 0 }), capacity })
    }

    /// Append a customer; a full queue hands the customer back untouched
    pub fn enqueue(&self, customer: Customer) -> Result<(), Customer> {
        self.ring.lock().push(customer)
    }

    /// Remove the oldest customer
    pub fn dequeue(&self) -> Option<Customer> {
        self.ring.lock().pop()
    }

    /// Number of waiting customers
    pub fn len(&self) -> usize {
        self.ring.lock().len
    }

    /// Whether no customer is waiting
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of waiting customers
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Evict the oldest customers while more than `threshold` are waiting
    ///
    /// Each eviction takes the lock separately, so another task may dequeue
    /// in between. Returns the number of evicted customers.
    pub fn drain_over(&self, threshold: usize) -> usize {
        let mut evicted = 0;
        while self.len() > threshold {
            if self.dequeue().is_none() {
                break;
            }
            evicted += 1;
        }
        evicted
    }
}

/// The three queues of one replica
#[derive(Debug)]
pub struct QueueSet {
    /// Customers waiting to order
    pub cashier: BoundedQueue,
    /// Paid orders waiting for the hot bar
    pub hot_bar: BoundedQueue,
    /// Paid orders waiting for the cold bar
    pub cold_bar: BoundedQueue,
}

impl QueueSet {
    /// Allocate three queues of the same capacity
    pub fn new(capacity: usize) -> SimulationResult<Self> {
        Ok(Self {
            cashier: BoundedQueue::with_capacity(capacity)?,
            hot_bar: BoundedQueue::with_capacity(capacity)?,
            cold_bar: BoundedQueue::with_capacity(capacity)?,
        })
    }

    /// Input queue of a stage
    pub fn for_stage(&self, stage: StageKind) -> &BoundedQueue {
        match stage {
            StageKind::Cashier => &self.cashier,
            StageKind::HotBar => &self.hot_bar,
            StageKind::ColdBar => &self.cold_bar,
        }
    }

    /// Input queue of a bar
    pub fn for_bar(&self, bar: Bar) -> &BoundedQueue {
        self.for_stage(bar.stage())
    }

    /// All queues in pipeline order
    pub fn iter(&self) -> impl Iterator<Item = &BoundedQueue> {
        [&self.cashier, &self.hot_bar, &self.cold_bar].into_iter()
    }

    /// Customers waiting across all queues
    pub fn total_len(&self) -> usize {
        self.iter().map(BoundedQueue::len).sum()
    }
}
