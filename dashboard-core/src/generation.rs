use std::sync::atomic::{AtomicU64, Ordering};

/// Per-component request counter used to drop responses that arrive after a
/// newer request was started.
#[derive(Debug, Default)]
pub struct Generation(AtomicU64);

/// Identifies one request issued by a [`Generation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

impl Generation {
    pub fn issue(&self) -> Ticket {
        Ticket(self.0.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.0.load(Ordering::SeqCst) == ticket.0
    }
}
