use std::collections::VecDeque;

/// Number of samples the traffic sparkline keeps.
pub const HISTORY_CAPACITY: usize = 40;

/// Rolling window of total-traffic samples, oldest first.
#[derive(Debug, Clone)]
pub struct TrafficHistory {
    samples: VecDeque<u64>,
    capacity: usize,
}

impl Default for TrafficHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl TrafficHistory {
    pub fn new() -> Self {
        Self::with_capacity(HISTORY_CAPACITY)
    }

    /// A window of `capacity` samples (at least one).
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append the newest sample, evicting the oldest when full.
    pub fn push(&mut self, value: u64) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(value);
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn latest(&self) -> Option<u64> {
        self.samples.back().copied()
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = u64> + '_ {
        self.samples.iter().copied()
    }

    pub fn as_vec(&self) -> Vec<u64> {
        self.iter().collect()
    }
}
