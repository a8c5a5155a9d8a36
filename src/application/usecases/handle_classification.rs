use chrono::{DateTime, Utc};

use crate::application::{CycleOutcome, NotificationGate, Notifier};
use crate::domain::{
    CallToAction, Classification, GateDecision, MessageTemplates, Notification, StockTarget,
    format_message,
};

/// Gate -> format -> send -> commit for an already resolved classification.
pub struct HandleClassificationUseCase<'a> {
    pub target: &'a StockTarget,
    pub gate: NotificationGate<'a>,
    /// `None` when messaging credentials are not configured.
    pub notifier: Option<&'a dyn Notifier>,
    pub templates: &'a MessageTemplates,
    pub call_to_action: Option<CallToAction>,
}

impl<'a> HandleClassificationUseCase<'a> {
    pub async fn execute(
        &self,
        classification: Classification,
        now: DateTime<Utc>,
    ) -> CycleOutcome {
        let remaining = match self.gate.decide(classification, now).await {
            GateDecision::SuppressNone => {
                tracing::info!("no linux stock available in {}", self.target.region());
                return CycleOutcome::NoStock;
            }
            GateDecision::SuppressCooldown { remaining } => remaining,
            GateDecision::Send => return self.send(classification, now).await,
        };

        tracing::info!(
            "{} still reported for {} but in cooldown period, message not sent",
            classification,
            self.target
        );
        CycleOutcome::CoolingDown {
            classification,
            remaining,
        }
    }

    async fn send(&self, classification: Classification, now: DateTime<Utc>) -> CycleOutcome {
        let Some(text) = format_message(
            classification,
            self.target.plan_code(),
            self.target.region(),
            self.templates,
        ) else {
            return CycleOutcome::NoStock;
        };
        tracing::info!("{text}");

        let Some(notifier) = self.notifier else {
            tracing::error!("messaging credentials not configured, notification not sent");
            return CycleOutcome::SendSkipped(classification);
        };

        let notification = Notification {
            text,
            call_to_action: self.call_to_action.clone(),
        };
        match notifier.notify(&notification).await {
            Ok(()) => {
                tracing::info!(%classification, "notification sent");
                self.gate.commit(now).await;
                CycleOutcome::Notified(classification)
            }
            Err(e) => {
                tracing::error!(%classification, "failed to send notification: {e}");
                CycleOutcome::SendFailed {
                    classification,
                    reason: e.to_string(),
                }
            }
        }
    }
}
