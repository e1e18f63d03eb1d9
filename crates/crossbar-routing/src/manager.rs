//! Registry of configured routers

use std::sync::Arc;

use crossbar_config::RoutersConfig;
use indexmap::IndexMap;

use crate::router::LangRouter;

/// Owns every configured router and resolves requests by router id
///
/// Built once at startup; the map is read-only afterwards, so lookups need
/// no locking.
pub struct RouterManager {
    language: IndexMap<String, Arc<LangRouter>>,
}

impl RouterManager {
    /// Build all routers from configuration
    ///
    /// Config validation has already guaranteed unique router ids and
    /// non-empty model lists.
    pub fn from_config(config: &RoutersConfig) -> anyhow::Result<Self> {
        let mut language = IndexMap::with_capacity(config.language.len());

        for router_config in &config.language {
            let router = LangRouter::from_config(router_config)?;
            tracing::info!(
                router = %router.id(),
                strategy = router.strategy_name(),
                models = router.models().len(),
                "language router configured"
            );
            language.insert(router.id().to_owned(), Arc::new(router));
        }

        Ok(Self { language })
    }

    /// Look up a language router by id
    pub fn language(&self, router_id: &str) -> Option<Arc<LangRouter>> {
        self.language.get(router_id).cloned()
    }

    /// All language routers, in config order
    pub fn language_routers(&self) -> impl Iterator<Item = &Arc<LangRouter>> {
        self.language.values()
    }
}
