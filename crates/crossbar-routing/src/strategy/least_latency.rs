use std::sync::Arc;

use crate::model::LangModel;
use crate::strategy::Strategy;

/// Pick the model with the lowest per-token latency estimate
///
/// A model whose estimator has not warmed up ranks as the lowest possible
/// latency, so cold models are explored until they have enough samples to
/// be compared honestly. Ties resolve to the first candidate in list order.
pub struct LeastLatency;

impl Strategy for LeastLatency {
    fn pick(&self, healthy: &[Arc<LangModel>]) -> Option<Arc<LangModel>> {
        let mut best: Option<(&Arc<LangModel>, f64)> = None;

        for model in healthy {
            let (value, warmed_up) = model.latency().estimate();
            let rank = if warmed_up { value } else { f64::NEG_INFINITY };

            match best {
                Some((_, best_rank)) if rank >= best_rank => {}
                _ => best = Some((model, rank)),
            }
        }

        best.map(|(model, _)| Arc::clone(model))
    }

    fn name(&self) -> &'static str {
        "least_latency"
    }
}
