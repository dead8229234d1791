//! Prompt queuing and delivery.
//!
//! Confirmed selections are queued and handed to the connection once per
//! tick, strictly in the order they were confirmed.

mod delivery;

use std::collections::VecDeque;

use crate::selector::ProcessingMode;

pub use delivery::{deliver, DeliveryReport};

/// Prompt waiting for the next drain.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchItem {
    pub mode: ProcessingMode,
    pub payload: String,
    /// Frame time of the confirm that produced the item.
    pub enqueued_at: f64,
}

impl DispatchItem {
    pub fn new(mode: ProcessingMode, payload: impl Into<String>, enqueued_at: f64) -> Self {
        Self {
            mode,
            payload: payload.into(),
            enqueued_at,
        }
    }
}

/// Unbounded FIFO. Payloads are short and confirms are human-paced.
#[derive(Debug, Default)]
pub struct PromptDispatchQueue {
    pending: VecDeque<DispatchItem>,
}

impl PromptDispatchQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue(&mut self, item: DispatchItem) {
        self.pending.push_back(item);
    }

    /// Remove and return everything queued, oldest first.
    pub fn drain(&mut self) -> Vec<DispatchItem> {
        self.pending.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drain_returns_items_in_insertion_order() {
        let mut queue = PromptDispatchQueue::new();
        for payload in ["a", "b", "c"] {
            queue.enqueue(DispatchItem::new(ProcessingMode::Scene, payload, 1.0));
        }
        let drained = queue.drain();
        let payloads: Vec<&str> = drained.iter().map(|item| item.payload.as_str()).collect();
        assert_eq!(payloads, vec!["a", "b", "c"]);
        assert!(queue.is_empty());
        assert!(queue.drain().is_empty());
    }

    #[test]
    fn identical_items_are_not_coalesced() {
        let mut queue = PromptDispatchQueue::new();
        queue.enqueue(DispatchItem::new(ProcessingMode::Scene, "same", 1.0));
        queue.enqueue(DispatchItem::new(ProcessingMode::Scene, "same", 1.0));
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.drain().len(), 2);
    }
}
