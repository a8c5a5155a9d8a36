use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::application::{AppError, AppResult, StockProvider};
use crate::domain::{DatacenterStatus, StockTarget};

/// Serves a scripted response; used by tests and `--fake-status` dry runs.
#[derive(Clone, Default)]
pub struct FakeStockProvider {
    response: Arc<Mutex<Option<Vec<DatacenterStatus>>>>,
}

impl FakeStockProvider {
    pub fn new(entries: Vec<DatacenterStatus>) -> Self {
        Self {
            response: Arc::new(Mutex::new(Some(entries))),
        }
    }

    /// Every fetch fails as if the API were unreachable.
    pub fn unreachable() -> Self {
        Self::default()
    }

    pub fn set_entries(&self, entries: Vec<DatacenterStatus>) {
        if let Ok(mut response) = self.response.lock() {
            *response = Some(entries);
        }
    }
}

#[async_trait]
impl StockProvider for FakeStockProvider {
    async fn fetch(&self, _target: &StockTarget) -> AppResult<Vec<DatacenterStatus>> {
        let response = self
            .response
            .lock()
            .map_err(|_| AppError::Fetch("lock poisoned".into()))?;
        response
            .clone()
            .ok_or_else(|| AppError::Fetch("api unreachable".into()))
    }
}
