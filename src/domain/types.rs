use std::fmt;

use serde::{Deserialize, Serialize};

pub const DEFAULT_SUBSIDIARY: &str = "WE";

/// One plan code watched in one datacenter.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StockTarget {
    plan_code: String,
    region: String,
    subsidiary: String,
}

impl StockTarget {
    pub fn new(plan_code: &str, region: &str) -> Result<Self, StockTargetError> {
        let plan_code = plan_code.trim();
        let region = region.trim();
        if plan_code.is_empty() {
            return Err(StockTargetError::MissingPlan);
        }
        if region.is_empty() {
            return Err(StockTargetError::MissingRegion);
        }
        Ok(Self {
            plan_code: plan_code.to_string(),
            region: region.to_string(),
            subsidiary: DEFAULT_SUBSIDIARY.to_string(),
        })
    }

    pub fn with_subsidiary(mut self, subsidiary: &str) -> Self {
        let subsidiary = subsidiary.trim();
        if !subsidiary.is_empty() {
            self.subsidiary = subsidiary.to_string();
        }
        self
    }

    pub fn plan_code(&self) -> &str {
        &self.plan_code
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn subsidiary(&self) -> &str {
        &self.subsidiary
    }

    /// Key under which the cooldown of this target is stored.
    pub fn scope_key(&self) -> String {
        format!("{}@{}", self.plan_code, self.region)
    }
}

impl fmt::Display for StockTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} in {}", self.plan_code, self.region)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum StockTargetError {
    #[error("target plan code is empty")]
    MissingPlan,
    #[error("target region is empty")]
    MissingRegion,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_blank_plan_or_region() {
        assert_eq!(
            StockTarget::new("  ", "SGP1"),
            Err(StockTargetError::MissingPlan)
        );
        assert_eq!(
            StockTarget::new("vps-2025-model1", ""),
            Err(StockTargetError::MissingRegion)
        );
    }

    #[test]
    fn blank_subsidiary_keeps_default() {
        let t = StockTarget::new("vps-2025-model1", "SGP1")
            .unwrap()
            .with_subsidiary(" ");
        assert_eq!(t.subsidiary(), "WE");
        assert_eq!(t.scope_key(), "vps-2025-model1@SGP1");
    }
}
