use std::collections::VecDeque;

/// Count-bounded window over the most recent values.
///
/// Statistics are recomputed over the current contents on every call;
/// nothing is carried incrementally between pushes.
#[derive(Debug, Clone)]
pub struct RollingWindow {
    window: VecDeque<f64>,
    capacity: usize,
}

impl RollingWindow {
    /// A capacity of 0 is treated as 1. Storage grows with what is pushed,
    /// so the capacity may far exceed the data available.
    pub fn new(capacity: usize) -> Self {
        Self {
            window: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    pub fn push(&mut self, value: f64) {
        self.window.push_back(value);
        self.evict_old();
    }

    pub fn latest(&self) -> Option<f64> {
        self.window.back().copied()
    }

    fn evict_old(&mut self) {
        while self.window.len() > self.capacity {
            self.window.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.window.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.window.len() == self.capacity
    }

    pub fn mean(&self) -> Option<f64> {
        if self.window.is_empty() {
            return None;
        }
        Some(self.window.iter().sum::<f64>() / self.window.len() as f64)
    }

    /// Population standard deviation (divides by n, not n - 1).
    pub fn population_std_dev(&self) -> Option<f64> {
        let mean = self.mean()?;
        let n = self.window.len() as f64;
        let variance = self.window.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        Some(variance.sqrt())
    }
}
