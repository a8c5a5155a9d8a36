use chrono::{DateTime, Duration, Utc};

use super::Classification;

pub const DEFAULT_COOLDOWN_SECONDS: u64 = 12 * 60 * 60;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CooldownPolicy {
    pub cooldown: Duration,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GateDecision {
    Send,
    SuppressCooldown { remaining: Duration },
    SuppressNone,
}

impl Default for CooldownPolicy {
    fn default() -> Self {
        Self::from_seconds(DEFAULT_COOLDOWN_SECONDS)
    }
}

impl CooldownPolicy {
    pub fn from_seconds(seconds: u64) -> Self {
        let seconds = i64::try_from(seconds)
            .unwrap_or(i64::MAX)
            .min(i64::MAX / 1_000);
        Self {
            cooldown: Duration::seconds(seconds),
        }
    }

    /// Pure gate decision. Clearing/committing state is left to the caller.
    pub fn decide(
        &self,
        classification: Classification,
        last_notified: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> GateDecision {
        if !classification.is_actionable() {
            return GateDecision::SuppressNone;
        }
        let Some(last) = last_notified else {
            return GateDecision::Send;
        };
        let elapsed = now.signed_duration_since(last);
        if elapsed >= self.cooldown {
            GateDecision::Send
        } else {
            GateDecision::SuppressCooldown {
                remaining: self.cooldown - elapsed,
            }
        }
    }
}

/// "5h 12m"
pub fn format_remaining(remaining: Duration) -> String {
    let total = remaining.num_seconds().max(0);
    format!("{}h {}m", total / 3600, (total % 3600) / 60)
}
