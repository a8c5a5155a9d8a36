use chrono::{DateTime, Utc};

use crate::application::CooldownStore;
use crate::domain::{Classification, CooldownPolicy, GateDecision, format_remaining};

/// Applies [`CooldownPolicy`] against the persisted cooldown state.
///
/// Store failures never abort a cycle: an unreadable state is treated as
/// absent, and failed writes or clears are only logged.
pub struct NotificationGate<'a> {
    pub store: &'a dyn CooldownStore,
    pub policy: CooldownPolicy,
}

impl<'a> NotificationGate<'a> {
    pub async fn decide(&self, classification: Classification, now: DateTime<Utc>) -> GateDecision {
        if !classification.is_actionable() {
            match self.store.clear().await {
                Ok(()) => tracing::info!("no stock, cooldown cleared"),
                Err(e) => tracing::warn!("failed to clear cooldown state: {e}"),
            }
            return GateDecision::SuppressNone;
        }

        let last = self.last_notified(now).await;
        let decision = self.policy.decide(classification, last, now);
        if let GateDecision::SuppressCooldown { remaining } = &decision {
            tracing::info!(
                %classification,
                "cooldown active, next notification in {}",
                format_remaining(*remaining)
            );
        }
        decision
    }

    /// Record a successful send at `now`.
    pub async fn commit(&self, now: DateTime<Utc>) {
        if let Err(e) = self.store.write(now).await {
            tracing::warn!("failed to record notification time: {e}");
        }
    }

    async fn last_notified(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self.store.read().await {
            Ok(Some(last)) if last > now => {
                tracing::warn!(%last, "stored notification time is in the future, ignoring it");
                None
            }
            Ok(last) => last,
            Err(e) => {
                tracing::warn!("failed to read cooldown state, assuming none: {e}");
                None
            }
        }
    }
}
