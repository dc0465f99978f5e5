use std::{collections::VecDeque, sync::Arc};

use crate::record::{Batch, Record};

/// The most recent records, newest first, never longer than `capacity`.
#[derive(Debug)]
pub struct HistoryBuffer {
    capacity: usize,
    items:    VecDeque<Arc<Record>>,
}

impl HistoryBuffer {
    pub fn new(capacity: usize) -> Self {
        Self { capacity, items: VecDeque::with_capacity(capacity) }
    }

    /// Puts `batch` in front as one run, keeping its internal order, then
    /// drops whatever no longer fits from the back.
    pub fn insert_batch(&mut self, batch: &[Arc<Record>]) {
        if batch.is_empty() { return; }
        // entries past capacity would be truncated right away
        let keep = batch.len().min(self.capacity);
        for rec in batch[..keep].iter().rev() {
            self.items.push_front(Arc::clone(rec));
        }
        self.items.truncate(self.capacity);
    }

    /// Independent copy, front to back.
    pub fn snapshot(&self) -> Batch {
        self.items.iter().cloned().collect()
    }

    pub fn len(&self) -> usize { self.items.len() }
    pub fn is_empty(&self) -> bool { self.items.is_empty() }
    pub fn capacity(&self) -> usize { self.capacity }
}
