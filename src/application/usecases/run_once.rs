use chrono::{DateTime, Utc};

use crate::application::usecases::HandleClassificationUseCase;
use crate::application::{AppResult, CycleOutcome, StockProvider};
use crate::domain::{StockTarget, classify};

pub struct RunOnceUseCase<'a> {
    pub target: &'a StockTarget,
    pub provider: &'a dyn StockProvider,
    pub handle_classification: HandleClassificationUseCase<'a>,
}

impl<'a> RunOnceUseCase<'a> {
    pub async fn execute(&self) -> AppResult<CycleOutcome> {
        self.execute_at(Utc::now()).await
    }

    /// A fetch error aborts the cycle before the cooldown state is touched.
    pub async fn execute_at(&self, now: DateTime<Utc>) -> AppResult<CycleOutcome> {
        tracing::info!(
            plan = self.target.plan_code(),
            region = self.target.region(),
            "checking linux stock for {}",
            self.target
        );

        let entries = self.provider.fetch(self.target).await?;
        let classification = classify(&entries, self.target.region());
        tracing::debug!(%classification, entries = entries.len(), "classified");

        Ok(self
            .handle_classification
            .execute(classification, now)
            .await)
    }
}
