//! Discrete weighted choice
//!
//! Cumulative-weight table plus one uniform integer draw. Zero-weight
//! entries are never picked.

use rand::Rng;

#[derive(Debug, Clone, Default)]
pub struct WeightedChoice<T> {
    items: Vec<T>,
    /// Running totals, strictly increasing
    cumulative: Vec<u32>,
}

impl<T: Copy> WeightedChoice<T> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            cumulative: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            cumulative: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, item: T, weight: u32) {
        if weight == 0 {
            return;
        }
        let total = self.total().saturating_add(weight);
        self.items.push(item);
        self.cumulative.push(total);
    }

    pub fn total(&self) -> u32 {
        self.cumulative.last().copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Item owning `roll` in `[0, total)`. Ties cannot happen: each roll maps
    /// to exactly one half-open interval, earlier entries first.
    pub fn pick(&self, roll: u32) -> Option<T> {
        if roll >= self.total() {
            return None;
        }
        let i = self.cumulative.partition_point(|&c| c <= roll);
        self.items.get(i).copied()
    }

    /// One uniform draw
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<T> {
        let total = self.total();
        if total == 0 {
            return None;
        }
        self.pick(rng.random_range(0..total))
    }
}
