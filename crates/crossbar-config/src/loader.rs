use std::collections::HashSet;
use std::path::Path;

use crate::Config;

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Reads the file, expands `{{ env.VAR }}` placeholders, then
    /// deserializes and validates the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, environment variable
    /// expansion fails, TOML parsing fails, or validation fails
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config file {}: {e}", path.display()))?;

        Self::from_str(&raw)
    }

    /// Parse and validate configuration from a raw TOML string
    ///
    /// # Errors
    ///
    /// Returns an error if environment variable expansion fails, TOML
    /// parsing fails, or validation fails
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(raw: &str) -> anyhow::Result<Self> {
        let expanded =
            crate::env::expand_env(raw).map_err(|e| anyhow::anyhow!("config variable expansion failed: {e}"))?;

        let config: Self = toml::from_str(&expanded).map_err(|e| anyhow::anyhow!("failed to parse config: {e}"))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate that the configuration is internally consistent
    ///
    /// # Errors
    ///
    /// Returns an error if router definitions are missing, duplicated, or
    /// carry out-of-range tuning values
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.routers.language.is_empty() {
            anyhow::bail!("at least one language router must be configured");
        }

        let mut router_ids = HashSet::new();

        for router in &self.routers.language {
            if !router_ids.insert(router.id.as_str()) {
                anyhow::bail!("duplicate router id '{}'", router.id);
            }

            if router.models.is_empty() {
                anyhow::bail!("router '{}' has no models", router.id);
            }

            if router.retry.max_attempts == Some(0) {
                anyhow::bail!("router '{}' retry.max_attempts must be at least 1", router.id);
            }

            if let Some(ref timeout) = router.retry.attempt_timeout {
                parse_duration_field(timeout, &router.id, "retry.attempt_timeout")?;
            }

            let mut model_ids = HashSet::new();

            for model in &router.models {
                if !model_ids.insert(model.id.as_str()) {
                    anyhow::bail!("router '{}' has duplicate model id '{}'", router.id, model.id);
                }

                if model.weight == 0 {
                    anyhow::bail!("model '{}' weight must be at least 1", model.id);
                }

                if model.error_budget.budget == 0 {
                    anyhow::bail!("model '{}' error_budget.budget must be at least 1", model.id);
                }

                let time_per_token =
                    parse_duration_field(&model.error_budget.time_per_token, &model.id, "error_budget.time_per_token")?;
                if time_per_token.is_zero() {
                    anyhow::bail!("model '{}' error_budget.time_per_token must be positive", model.id);
                }

                if model.latency.decay <= 0.0 || model.latency.decay >= 1.0 {
                    anyhow::bail!(
                        "model '{}' latency.decay must be in (0, 1), got {}",
                        model.id,
                        model.latency.decay
                    );
                }

                if let Some(ref interval) = model.latency.update_interval {
                    parse_duration_field(interval, &model.id, "latency.update_interval")?;
                }
            }
        }

        Ok(())
    }
}

fn parse_duration_field(value: &str, owner: &str, field: &str) -> anyhow::Result<std::time::Duration> {
    duration_str::parse(value).map_err(|e| anyhow::anyhow!("'{owner}' has invalid {field} '{value}': {e}"))
}
