use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::application::{AppError, AppResult, CooldownStore};

/// Process-local cooldown state. Clones share the same slot.
#[derive(Clone, Default)]
pub struct InMemoryCooldownStore {
    inner: Arc<Mutex<Option<DateTime<Utc>>>>,
}

impl InMemoryCooldownStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_last_notified(last: Option<DateTime<Utc>>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(last)),
        }
    }

    pub fn last_notified(&self) -> Option<DateTime<Utc>> {
        self.inner.lock().ok().and_then(|v| *v)
    }
}

#[async_trait]
impl CooldownStore for InMemoryCooldownStore {
    async fn read(&self) -> AppResult<Option<DateTime<Utc>>> {
        let inner = self
            .inner
            .lock()
            .map_err(|_| AppError::Storage("lock poisoned".into()))?;
        Ok(*inner)
    }

    async fn write(&self, at: DateTime<Utc>) -> AppResult<()> {
        let mut inner = self
            .inner
            .lock()
            .map_err(|_| AppError::Storage("lock poisoned".into()))?;
        *inner = Some(at);
        Ok(())
    }

    async fn clear(&self) -> AppResult<()> {
        let mut inner = self
            .inner
            .lock()
            .map_err(|_| AppError::Storage("lock poisoned".into()))?;
        *inner = None;
        Ok(())
    }
}
