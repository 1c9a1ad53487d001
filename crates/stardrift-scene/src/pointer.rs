//! Bounded history of recent pointer positions.

use std::collections::VecDeque;

use stardrift_core::PointerSample;

/// Number of samples kept in the trail.
pub const TRAIL_CAPACITY: usize = 10;

/// FIFO of pointer samples, oldest first, most recent last.
#[derive(Debug, Clone)]
pub struct PointerTrail {
    samples: VecDeque<PointerSample>,
    capacity: usize,
}

impl Default for PointerTrail {
    fn default() -> Self {
        Self::new()
    }
}

impl PointerTrail {
    pub fn new() -> Self {
        Self::with_capacity(TRAIL_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity + 1),
            capacity: capacity.max(1),
        }
    }

    /// Append a sample, evicting the oldest once over capacity.
    pub fn push(&mut self, sample: PointerSample) {
        self.samples.push_back(sample);
        while self.samples.len() > self.capacity {
            self.samples.pop_front();
        }
    }

    pub fn latest(&self) -> Option<PointerSample> {
        self.samples.back().copied()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = &PointerSample> {
        self.samples.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evicts_oldest() {
        let mut trail = PointerTrail::new();
        for i in 0..15 {
            trail.push(PointerSample::new(i as f32, 0.0));
        }
        assert_eq!(trail.len(), TRAIL_CAPACITY);
        assert_eq!(trail.iter().next().map(|s| s.x), Some(5.0));
        assert_eq!(trail.latest().map(|s| s.x), Some(14.0));
    }

    #[test]
    fn test_empty_trail_has_no_latest() {
        let trail = PointerTrail::new();
        assert!(trail.latest().is_none());
        assert!(trail.is_empty());
    }
}
