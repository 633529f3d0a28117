use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Capacity of each session's outbound queue.
pub const DEFAULT_QUEUE_CAPACITY: usize = 256;

/// Largest accepted outbound queue capacity.
pub const MAX_QUEUE_CAPACITY: usize = 1 << 20;

/// What an enqueue does when the recipient's outbound queue is full.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeliveryPolicy {
    /// Wait for room in the queue. A stalled receiver stalls whoever is
    /// sending to it, but nothing is lost while the receiver is alive.
    #[default]
    Backpressure,
    /// Never wait. The envelope that does not fit is dropped with a warning.
    DropNewest,
}

impl fmt::Display for DeliveryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Backpressure => f.write_str("backpressure"),
            Self::DropNewest => f.write_str("drop-newest"),
        }
    }
}

impl FromStr for DeliveryPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "backpressure" => Ok(Self::Backpressure),
            "drop-newest" => Ok(Self::DropNewest),
            other => Err(ConfigError::UnknownDeliveryPolicy(other.to_string())),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown delivery policy '{0}' (expected 'backpressure' or 'drop-newest')")]
    UnknownDeliveryPolicy(String),

    #[error("queue capacity must be at least 1")]
    ZeroQueueCapacity,

    #[error("queue capacity {0} exceeds the maximum of {MAX_QUEUE_CAPACITY}")]
    QueueCapacityTooLarge(usize),
}

/// Runtime settings of the relay.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind (default `"0.0.0.0"`).
    pub host: String,
    /// Port to bind (default `3000`, `0` picks a free port).
    pub port: u16,
    /// Outbound queue capacity per session.
    pub queue_capacity: usize,
    pub delivery: DeliveryPolicy,
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.queue_capacity == 0 {
            return Err(ConfigError::ZeroQueueCapacity);
        }
        if self.queue_capacity > MAX_QUEUE_CAPACITY {
            return Err(ConfigError::QueueCapacityTooLarge(self.queue_capacity));
        }
        Ok(())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 3000,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            delivery: DeliveryPolicy::Backpressure,
        }
    }
}
