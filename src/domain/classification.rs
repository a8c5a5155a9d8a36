use std::fmt;

use serde::{Deserialize, Serialize};

pub const STATUS_OUT_OF_STOCK: &str = "out-of-stock";
pub const STATUS_PREORDER_ALLOWED: &str = "out-of-stock-preorder-allowed";

/// One entry of the `datacenters` array returned by the order-rule endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatacenterStatus {
    pub datacenter: String,
    #[serde(rename = "linuxStatus", default)]
    pub linux_status: Option<String>,
}

impl DatacenterStatus {
    pub fn new(datacenter: &str, linux_status: &str) -> Self {
        Self {
            datacenter: datacenter.to_string(),
            linux_status: Some(linux_status.to_string()),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Classification {
    None,
    Preorder,
    Available,
}

impl Classification {
    pub fn is_actionable(self) -> bool {
        !matches!(self, Classification::None)
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Classification::None => write!(f, "none"),
            Classification::Preorder => write!(f, "preorder"),
            Classification::Available => write!(f, "available"),
        }
    }
}

/// Resolve the stock state of `target_region`.
///
/// Every entry for the region is inspected; a single in-stock entry wins
/// over any number of preorder entries, so the result does not depend on
/// the order of `entries`. A missing status counts as out of stock.
pub fn classify(entries: &[DatacenterStatus], target_region: &str) -> Classification {
    let mut found_stock = false;
    let mut found_preorder = false;

    for entry in entries.iter().filter(|e| e.datacenter == target_region) {
        let status = entry.linux_status.as_deref().unwrap_or(STATUS_OUT_OF_STOCK);
        if status == STATUS_PREORDER_ALLOWED {
            found_preorder = true;
        } else if status != STATUS_OUT_OF_STOCK {
            found_stock = true;
        } else {
            continue;
        }
        tracing::info!(region = target_region, status, "region reports linux status");
    }

    if found_stock {
        Classification::Available
    } else if found_preorder {
        Classification::Preorder
    } else {
        Classification::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn available_beats_preorder_in_any_order() {
        let a = DatacenterStatus::new("SGP1", STATUS_PREORDER_ALLOWED);
        let b = DatacenterStatus::new("SGP1", "available-now");
        assert_eq!(
            classify(&[a.clone(), b.clone()], "SGP1"),
            Classification::Available
        );
        assert_eq!(classify(&[b, a], "SGP1"), Classification::Available);
    }

    #[test]
    fn missing_status_counts_as_out_of_stock() {
        let entry = DatacenterStatus {
            datacenter: "WAW1".into(),
            linux_status: None,
        };
        assert_eq!(classify(&[entry], "WAW1"), Classification::None);
    }

    #[test]
    fn region_match_is_exact() {
        let entries = vec![DatacenterStatus::new("sgp1", "available-now")];
        assert_eq!(classify(&entries, "SGP1"), Classification::None);
    }
}
