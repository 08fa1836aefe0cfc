// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! The step queue (spec §4.2): a min-priority queue, stable with respect to
//! insertion order within equal priorities, keyed by integer priority over
//! opaque payloads (step filenames or deferred callables).
//!
//! Kept sorted as a `Vec<QueueEntry>` rather than a heap: the queue is
//! small (one entry per step in the index, rarely more than a few hundred),
//! insertion is a binary search, and `delete`/`update` need positional
//! bounds (`lower`/`upper`) that a heap can't offer cheaply.

use agent_core::QueuePayload;
use std::collections::HashMap;

/// A single queue slot: a payload at a priority, tagged with its insertion
/// sequence so that equal-priority entries stay FIFO.
#[derive(Debug, Clone)]
struct QueueEntry {
    payload: QueuePayload,
    priority: i64,
    seq: u64,
}

/// The priority queue itself.
#[derive(Debug, Default)]
pub struct PriorityQueue {
    entries: Vec<QueueEntry>,
    /// payload → priority, for `delete`/`update`'s fast lookup. Two
    /// distinct payloads with equal key are not supported (spec §4.2).
    index: HashMap<String, i64>,
    next_seq: u64,
}

impl PriorityQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Binary-search insertion maintaining sort order by `(priority, seq)`.
    /// `lower`/`upper` optionally bound the search range (used by `update`
    /// to avoid a full scan); out-of-range bounds are clamped, never a
    /// panic.
    pub fn insert(
        &mut self,
        payload: QueuePayload,
        priority: i64,
        lower: Option<usize>,
        upper: Option<usize>,
    ) {
        let lo = lower.unwrap_or(0).min(self.entries.len());
        let hi = upper.unwrap_or(self.entries.len()).min(self.entries.len()).max(lo);
        let seq = self.next_seq;
        self.next_seq += 1;

        let pos = self.entries[lo..hi].partition_point(|e| e.priority <= priority) + lo;
        self.index.insert(payload.as_key().to_string(), priority);
        self.entries.insert(
            pos,
            QueueEntry {
                payload,
                priority,
                seq,
            },
        );
    }

    /// Removes and returns the minimum-priority entry. `None` if empty.
    pub fn pop(&mut self) -> Option<QueuePayload> {
        if self.entries.is_empty() {
            return None;
        }
        let entry = self.entries.remove(0);
        self.index.remove(entry.payload.as_key());
        Some(entry.payload)
    }

    /// Removes the first queue entry whose payload equals the given one,
    /// using the payload→priority index to avoid a full scan for the
    /// priority, then a scan within that priority band for the exact slot.
    pub fn delete(&mut self, payload: &QueuePayload) -> Option<usize> {
        let key = payload.as_key();
        let priority = *self.index.get(key)?;
        let pos = self
            .entries
            .iter()
            .position(|e| e.priority == priority && e.payload.as_key() == key)?;
        self.entries.remove(pos);
        self.index.remove(key);
        Some(pos)
    }

    /// `delete` then `insert` with a search window bounded by the
    /// direction of the priority change (spec §4.2).
    pub fn update(&mut self, payload: QueuePayload, new_priority: i64) {
        let old_priority = self.index.get(payload.as_key()).copied();
        self.delete(&payload);

        let (lower, upper) = match old_priority {
            Some(old) if new_priority >= old => {
                let lo = self.entries.partition_point(|e| e.priority < old);
                (Some(lo), None)
            }
            Some(old) => {
                let hi = self.entries.partition_point(|e| e.priority <= old);
                (None, Some(hi))
            }
            None => (None, None),
        };
        self.insert(payload, new_priority, lower, upper);
    }

    /// Snapshot of payloads in pop order, without mutating the queue.
    pub fn iter(&self) -> impl Iterator<Item = &QueuePayload> {
        self.entries.iter().map(|e| &e.payload)
    }
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
