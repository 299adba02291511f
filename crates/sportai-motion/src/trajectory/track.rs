//! Bounded per-joint sample buffer.

use std::collections::VecDeque;

use sportai_models::JointSample;

/// Ring buffer of one joint's samples with FIFO eviction.
#[derive(Debug, Clone)]
pub struct JointTrack {
    samples: VecDeque<JointSample>,
    capacity: usize,
}

impl JointTrack {
    /// Create an empty track holding at most `capacity` samples.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a sample, evicting the oldest once full.
    ///
    /// A sample for the frame already at the back is ignored: repeated ticks
    /// on a paused frame must not stack up. Returns whether it was stored.
    pub fn push(&mut self, sample: JointSample) -> bool {
        if self.samples.back().is_some_and(|last| last.frame_index == sample.frame_index) {
            return false;
        }
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
        true
    }

    /// Number of stored samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Maximum number of stored samples.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Stored samples, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &JointSample> {
        self.samples.iter()
    }

    /// Owned copy of the stored samples, oldest first.
    pub fn to_vec(&self) -> Vec<JointSample> {
        self.samples.iter().copied().collect()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }
}
