//! Per-model health primitives
//!
//! A model is healthy when it is not inside a rate-limit cooldown and its
//! error budget still has tokens. Both trackers are cheap, mutex-guarded
//! state machines observed on every routing attempt.

use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Token-bucket error budget with lazy, time-based refill
///
/// The bucket starts full. Each provider failure takes one token; tokens
/// grow back at a fixed rate up to capacity. An empty bucket is the signal
/// that a model has burned its budget and should leave rotation.
#[derive(Debug)]
pub struct TokenBucket {
    capacity: u64,
    refill_interval: Duration,
    state: Mutex<BucketState>,
}

#[derive(Debug)]
struct BucketState {
    tokens: u64,
    last_refill: Instant,
}

impl TokenBucket {
    /// Create a full bucket
    ///
    /// `refill_interval` is the time needed to earn back one token; it must
    /// be non-zero (enforced by config validation).
    pub fn new(capacity: u64, refill_interval: Duration) -> Self {
        Self {
            capacity,
            refill_interval,
            state: Mutex::new(BucketState {
                tokens: capacity,
                last_refill: Instant::now(),
            }),
        }
    }

    /// Take `n` tokens if available
    ///
    /// Returns false and leaves the bucket untouched when fewer than `n`
    /// tokens remain after refilling.
    pub fn take(&self, n: u64) -> bool {
        let mut state = self.state.lock().expect("bucket lock poisoned");
        self.refill(&mut state);

        if state.tokens >= n {
            state.tokens -= n;
            true
        } else {
            false
        }
    }

    /// Whether at least one token remains
    pub fn has_tokens(&self) -> bool {
        let mut state = self.state.lock().expect("bucket lock poisoned");
        self.refill(&mut state);
        state.tokens > 0
    }

    /// Credit tokens earned since the last refill
    ///
    /// Advances `last_refill` only by the whole intervals consumed so the
    /// fractional remainder keeps accruing toward the next token.
    fn refill(&self, state: &mut BucketState) {
        let interval = self.refill_interval.as_nanos();
        let elapsed = state.last_refill.elapsed().as_nanos();
        let new_tokens = elapsed / interval;

        if new_tokens > 0 {
            let earned = u64::try_from(new_tokens).unwrap_or(u64::MAX);
            state.tokens = self.capacity.min(state.tokens.saturating_add(earned));

            // new_tokens * interval <= elapsed, so this cannot pass `now`
            let consumed = u64::try_from(new_tokens * interval).unwrap_or(u64::MAX);
            state.last_refill += Duration::from_nanos(consumed);
        }
    }
}

/// Tracks a provider-imposed rate-limit cooldown
///
/// Holds an optional reset instant; the flag clears itself once the
/// cooldown elapses. Absence of a reset instant means not limited, which
/// is distinct from a zero-duration cooldown that has already expired.
#[derive(Debug, Default)]
pub struct RateLimitTracker {
    reset_at: Mutex<Option<Instant>>,
}

impl RateLimitTracker {
    /// Create an unlimited tracker
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a cooldown lasting `duration` from now
    pub fn set_limited(&self, duration: Duration) {
        let mut reset_at = self.reset_at.lock().expect("rate limit lock poisoned");
        *reset_at = Some(Instant::now() + duration);
    }

    /// Whether the model is currently inside a cooldown
    pub fn limited(&self) -> bool {
        let mut reset_at = self.reset_at.lock().expect("rate limit lock poisoned");

        match *reset_at {
            Some(instant) if instant > Instant::now() => true,
            Some(_) => {
                *reset_at = None;
                false
            }
            None => false,
        }
    }
}
