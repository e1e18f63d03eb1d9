//! Health-aware model routing for crossbar
//!
//! A [`LangRouter`] owns a list of candidate models behind one logical
//! endpoint. Per request it filters the list down to healthy candidates,
//! lets the configured strategy pick one, invokes it, and fails over to
//! alternates when the pick errors recoverably. Each [`LangModel`] tracks
//! its own health (rate-limit cooldowns plus a token-bucket error budget)
//! and a warm-up-aware moving average of per-token latency.

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

pub mod error;
pub mod health;
pub mod latency;
pub mod manager;
pub mod model;
pub mod router;
pub mod strategy;

pub use error::RouterError;
pub use health::{RateLimitTracker, TokenBucket};
pub use latency::MovingAverage;
pub use manager::RouterManager;
pub use model::LangModel;
pub use router::LangRouter;
pub use strategy::Strategy;
