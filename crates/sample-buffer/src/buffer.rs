//! Time-Ordered Ring Buffer Implementation

use crate::{BufferError, OpennessSample};
use tracing::{debug, warn};

/// Fixed-capacity ring buffer of openness samples ordered by timestamp.
///
/// Samples must arrive with non-decreasing timestamps. That ordering lets
/// pruning advance the head pointer and lets window lookups binary search.
#[derive(Debug, Clone)]
pub struct SampleBuffer {
    /// Pre-allocated storage
    storage: Box<[OpennessSample]>,
    /// Index of the oldest sample
    head: usize,
    /// Number of stored samples
    len: usize,
    /// Samples lost to overwrite since the last clear
    overwritten: usize,
}

impl SampleBuffer {
    /// Create a new buffer with given capacity.
    ///
    /// Storage is reserved up front; a capacity the allocator cannot
    /// satisfy is reported instead of aborting.
    pub fn new(capacity: usize) -> Result<Self, BufferError> {
        if capacity == 0 {
            return Err(BufferError::ZeroCapacity);
        }
        let mut storage = Vec::new();
        storage
            .try_reserve_exact(capacity)
            .map_err(|_| BufferError::AllocationFailed { capacity })?;
        storage.resize(capacity, OpennessSample::default());

        Ok(Self {
            storage: storage.into_boxed_slice(),
            head: 0,
            len: 0,
            overwritten: 0,
        })
    }

    /// Append a sample (overwrites oldest if full).
    ///
    /// Rejects samples whose timestamp precedes the newest stored sample;
    /// equal timestamps are accepted.
    pub fn push(&mut self, sample: OpennessSample) -> Result<(), BufferError> {
        if let Some(last) = self.last() {
            if sample.timestamp_ms < last.timestamp_ms {
                return Err(BufferError::TimestampRegression {
                    last_ms: last.timestamp_ms,
                    attempted_ms: sample.timestamp_ms,
                });
            }
        }

        let capacity = self.capacity();
        if self.len == capacity {
            self.storage[self.head] = sample;
            self.head = (self.head + 1) % capacity;
            self.overwritten += 1;
            if self.overwritten == 1 {
                warn!(capacity, "Sample buffer full, overwriting oldest samples");
            }
        } else {
            self.storage[(self.head + self.len) % capacity] = sample;
            self.len += 1;
        }

        Ok(())
    }

    /// Drop every sample with `timestamp_ms <= cutoff_ms`. Returns the number dropped.
    pub fn prune_through(&mut self, cutoff_ms: u64) -> usize {
        let stale = self.partition_point(cutoff_ms);
        if stale > 0 {
            self.head = (self.head + stale) % self.capacity();
            self.len -= stale;
            debug!(stale, remaining = self.len, "Pruned stale samples");
        }
        stale
    }

    /// Logical index of the first sample with `timestamp_ms > cutoff_ms`.
    ///
    /// Equals `len()` when every sample is at or before the cutoff.
    pub fn partition_point(&self, cutoff_ms: u64) -> usize {
        let (mut lo, mut hi) = (0, self.len);
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            if self.storage[self.physical(mid)].timestamp_ms <= cutoff_ms {
                lo = mid + 1;
            } else {
                hi = mid;
            }
        }
        lo
    }

    /// Sample at logical index (0 = oldest)
    pub fn get(&self, index: usize) -> Option<&OpennessSample> {
        if index < self.len {
            Some(&self.storage[self.physical(index)])
        } else {
            None
        }
    }

    /// Newest stored sample
    pub fn last(&self) -> Option<&OpennessSample> {
        self.len.checked_sub(1).and_then(|i| self.get(i))
    }

    /// Iterate samples oldest first
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &OpennessSample> + ExactSizeIterator + '_ {
        (0..self.len).map(move |i| &self.storage[self.physical(i)])
    }

    /// Get the number of samples currently in the buffer
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if buffer is empty
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Get the buffer capacity
    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    /// Samples lost to overwrite since the last clear
    pub fn overwritten(&self) -> usize {
        self.overwritten
    }

    /// Clear the buffer
    pub fn clear(&mut self) {
        self.head = 0;
        self.len = 0;
        self.overwritten = 0;
    }

    fn physical(&self, index: usize) -> usize {
        (self.head + index) % self.capacity()
    }
}
