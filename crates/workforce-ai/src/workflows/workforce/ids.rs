use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic id allocator owned by a collection.
///
/// Seeded past the largest id already present so fixtures and imports keep
/// their ids; never hands out the same value twice.
#[derive(Debug)]
pub struct IdSequence {
    next: AtomicU64,
}

impl IdSequence {
    pub fn starting_after<I>(existing: I) -> Self
    where
        I: IntoIterator<Item = u64>,
    {
        let max = existing.into_iter().max().unwrap_or(0);
        Self {
            next: AtomicU64::new(max + 1),
        }
    }

    pub fn next_id(&self) -> u64 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }

    pub fn peek(&self) -> u64 {
        self.next.load(Ordering::Relaxed)
    }
}

impl Default for IdSequence {
    fn default() -> Self {
        Self::starting_after(std::iter::empty())
    }
}

impl Clone for IdSequence {
    fn clone(&self) -> Self {
        Self {
            next: AtomicU64::new(self.peek()),
        }
    }
}
