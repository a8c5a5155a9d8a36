use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use crate::domain::{Classification, DatacenterStatus, Notification, StockTarget};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("fetch error: {0}")]
    Fetch(String),
    #[error("storage error: {0}")]
    Storage(String),
    #[error("notifier error: {0}")]
    Notifier(String),
    #[error("invalid config: {0}")]
    Config(String),
}

pub type AppResult<T> = Result<T, AppError>;

/// What a single check cycle ended up doing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    NoStock,
    Notified(Classification),
    CoolingDown {
        classification: Classification,
        remaining: Duration,
    },
    /// No messaging credentials configured; nothing sent, nothing recorded.
    SendSkipped(Classification),
    SendFailed {
        classification: Classification,
        reason: String,
    },
}

/// Fetch the per-datacenter availability for a target.
#[async_trait]
pub trait StockProvider: Send + Sync {
    async fn fetch(&self, target: &StockTarget) -> AppResult<Vec<DatacenterStatus>>;
}

/// Single-value store holding the instant of the last successful notification.
#[async_trait]
pub trait CooldownStore: Send + Sync {
    async fn read(&self) -> AppResult<Option<DateTime<Utc>>>;
    async fn write(&self, at: DateTime<Utc>) -> AppResult<()>;
    /// Must succeed when nothing is stored.
    async fn clear(&self) -> AppResult<()>;
}

/// Deliver notifications.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, notification: &Notification) -> AppResult<()>;
}
