use std::sync::Arc;

use crate::model::LangModel;
use crate::strategy::Strategy;

/// Always pick the first healthy model in config order
///
/// Later models only serve while every model before them is unhealthy.
pub struct Priority;

impl Strategy for Priority {
    fn pick(&self, healthy: &[Arc<LangModel>]) -> Option<Arc<LangModel>> {
        healthy.first().cloned()
    }

    fn name(&self) -> &'static str {
        "priority"
    }
}
