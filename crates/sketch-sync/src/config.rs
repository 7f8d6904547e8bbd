//! Configuration for the hub and clients.

use std::time::Duration;

use feature_engine::RebuildConfig;
use uuid::Uuid;

/// Configuration for a [`SyncHub`](crate::SyncHub).
#[derive(Debug, Clone)]
pub struct HubConfig {
    /// Per-subscriber buffer of undelivered updates. Slow subscribers that
    /// fall further behind skip the oldest updates.
    pub broadcast_capacity: usize,
    /// Tolerances for the authoritative rebuild.
    pub rebuild: RebuildConfig,
}

impl HubConfig {
    /// Set the per-subscriber buffer, at least 1.
    pub fn with_broadcast_capacity(mut self, capacity: usize) -> Self {
        self.broadcast_capacity = capacity.max(1);
        self
    }

    pub fn with_rebuild(mut self, rebuild: RebuildConfig) -> Self {
        self.rebuild = rebuild;
        self
    }
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            broadcast_capacity: 256,
            rebuild: RebuildConfig::default(),
        }
    }
}

/// Configuration for a [`SyncClient`](crate::SyncClient).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Identifier stamped on every published update.
    pub client_id: String,
    pub connect_timeout: Duration,
    pub publish_timeout: Duration,
}

impl ClientConfig {
    /// A config with a fresh dash-free client id.
    pub fn new() -> Self {
        Self {
            client_id: Uuid::new_v4().simple().to_string(),
            connect_timeout: Duration::from_secs(5),
            publish_timeout: Duration::from_secs(5),
        }
    }

    /// Use `client_id`, or keep the generated one when it is blank.
    pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
        let client_id = client_id.into();
        if !client_id.trim().is_empty() {
            self.client_id = client_id;
        }
        self
    }

    /// Set the connect deadline.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set the publish deadline.
    pub fn with_publish_timeout(mut self, timeout: Duration) -> Self {
        self.publish_timeout = timeout;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Backoff schedule for callers that want to retry connecting.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of attempts, including the first.
    pub max_attempts: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    /// Multiplier for exponential backoff.
    pub backoff_multiplier: f64,
}

impl RetryConfig {
    /// Allow `max_attempts` attempts with the default backoff.
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(30),
            backoff_multiplier: 2.0,
        }
    }

    /// Creates a configuration with no retries.
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            initial_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            backoff_multiplier: 1.0,
        }
    }

    pub fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    pub fn with_backoff_multiplier(mut self, multiplier: f64) -> Self {
        self.backoff_multiplier = multiplier;
        self
    }

    /// Delay before attempt `attempt` (0-indexed). The first attempt is
    /// immediate.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }
        let exponent = i32::try_from(attempt - 1).unwrap_or(i32::MAX);
        let secs = self.initial_delay.as_secs_f64() * self.backoff_multiplier.powi(exponent);
        if !secs.is_finite() || secs >= self.max_delay.as_secs_f64() {
            return self.max_delay;
        }
        Duration::from_secs_f64(secs)
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self::new(3)
    }
}
