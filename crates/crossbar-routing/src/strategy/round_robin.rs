use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::model::LangModel;
use crate::strategy::Strategy;

/// Cycle through healthy models evenly
///
/// The cursor indexes the healthy snapshot of the moment, not the full
/// model list: when a model drops out the remaining candidates shift down
/// and the cursor keeps advancing, which preserves even rotation over time
/// at the cost of an occasional skip right after the set changes.
#[derive(Default)]
pub struct RoundRobin {
    next: AtomicUsize,
}

impl RoundRobin {
    /// Create a cursor starting at the first candidate
    pub fn new() -> Self {
        Self::default()
    }
}

impl Strategy for RoundRobin {
    fn pick(&self, healthy: &[Arc<LangModel>]) -> Option<Arc<LangModel>> {
        if healthy.is_empty() {
            return None;
        }

        let index = self.next.fetch_add(1, Ordering::Relaxed) % healthy.len();
        healthy.get(index).cloned()
    }

    fn name(&self) -> &'static str {
        "round_robin"
    }
}
