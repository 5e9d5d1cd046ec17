//! Monotonic request generations.
//!
//! Each pagination request takes a [`Ticket`] before it starts. A response may
//! only commit tracker state while its ticket is still the newest one issued;
//! anything older resolved out of order and is discarded.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// A ticket identifying one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

impl Ticket {
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// Shared generation counter.
///
/// Clones observe the same counter, so a ticket issued through any clone
/// supersedes tickets issued through the others.
#[derive(Debug, Clone, Default)]
pub struct RequestGeneration {
    current: Arc<AtomicU64>,
}

impl RequestGeneration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a new ticket, superseding every earlier one.
    pub fn next_ticket(&self) -> Ticket {
        Ticket(self.current.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Whether `ticket` is still the newest ticket issued.
    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.current.load(Ordering::SeqCst) == ticket.0
    }

    /// The newest ticket value issued so far (0 before the first request).
    pub fn current(&self) -> u64 {
        self.current.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_generation_starts_at_zero() {
        let generation = RequestGeneration::new();
        assert_eq!(generation.current(), 0);
    }

    #[test]
    fn test_newer_ticket_supersedes() {
        let generation = RequestGeneration::new();
        let first = generation.next_ticket();
        assert!(generation.is_current(first));

        let second = generation.next_ticket();
        assert!(!generation.is_current(first));
        assert!(generation.is_current(second));
        assert!(second > first);
    }

    #[test]
    fn test_clone_shares_counter() {
        let generation = RequestGeneration::new();
        let other = generation.clone();

        let ticket = generation.next_ticket();
        other.next_ticket();

        assert!(!generation.is_current(ticket));
        assert_eq!(generation.current(), 2);
    }
}
