use serde::{Deserialize, Serialize};

use super::{Classification, STATUS_PREORDER_ALLOWED};

pub const DEFAULT_BUTTON_TEXT: &str = "Order Now 🛒";
pub const DEFAULT_BUTTON_URL: &str = "https://www.ovhcloud.com/asia/vps/";

/// Custom message bodies; `{plan}` and `{region}` are substituted literally.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageTemplates {
    pub available: Option<String>,
    pub preorder: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallToAction {
    pub label: String,
    pub url: String,
}

impl CallToAction {
    /// Each half falls back to its own default; blank counts as unset.
    pub fn resolve(label: Option<&str>, url: Option<&str>) -> Self {
        Self {
            label: non_blank(label).unwrap_or(DEFAULT_BUTTON_TEXT).to_string(),
            url: non_blank(url).unwrap_or(DEFAULT_BUTTON_URL).to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub text: String,
    pub call_to_action: Option<CallToAction>,
}

/// Render the message for `classification`, or `None` when there is nothing
/// to announce.
pub fn format_message(
    classification: Classification,
    plan: &str,
    region: &str,
    templates: &MessageTemplates,
) -> Option<String> {
    let custom = match classification {
        Classification::None => return None,
        Classification::Available => templates.available.as_deref(),
        Classification::Preorder => templates.preorder.as_deref(),
    };

    let text = match non_blank(custom) {
        Some(template) => template.replace("{plan}", plan).replace("{region}", region),
        None if classification == Classification::Available => {
            format!("STOCK FOUND (Linux)!\n\nPlan: {plan}\nLocation: {region}")
        }
        None => format!(
            "PREORDER AVAILABLE (Linux)!\n\nPlan: {plan}\nLocation: {region}\nStatus: {STATUS_PREORDER_ALLOWED}"
        ),
    };
    Some(text)
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
