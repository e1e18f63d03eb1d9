use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::model::LangModel;
use crate::strategy::Strategy;

/// Smooth weighted round-robin
///
/// Classic smooth-weighting scheme: every candidate's running score grows
/// by its weight on each pick, the highest score wins (ties go to the
/// earliest candidate in list order), and the winner's score drops by the
/// sum of all candidate weights. Weights [5, 1, 1] produce the interleaved
/// AABACAA pattern rather than five As in a row.
///
/// Scores are keyed by model id so they survive the healthy set shifting
/// between picks.
#[derive(Default)]
pub struct WeightedRoundRobin {
    scores: Mutex<HashMap<String, i64>>,
}

impl WeightedRoundRobin {
    /// Create with all scores at zero
    pub fn new() -> Self {
        Self::default()
    }
}

impl Strategy for WeightedRoundRobin {
    fn pick(&self, healthy: &[Arc<LangModel>]) -> Option<Arc<LangModel>> {
        let mut scores = self.scores.lock().expect("score lock poisoned");

        let mut total_weight: i64 = 0;
        let mut winner: Option<(usize, i64)> = None;

        for (index, model) in healthy.iter().enumerate() {
            let weight = i64::from(model.weight());
            total_weight += weight;

            let score = scores.entry(model.id().to_owned()).or_insert(0);
            *score += weight;

            match winner {
                Some((_, best)) if *score <= best => {}
                _ => winner = Some((index, *score)),
            }
        }

        let (index, _) = winner?;
        let model = &healthy[index];

        if let Some(score) = scores.get_mut(model.id()) {
            *score -= total_weight;
        }

        Some(Arc::clone(model))
    }

    fn name(&self) -> &'static str {
        "weighted_round_robin"
    }
}
