use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::application::{AppError, AppResult};
use crate::domain::{DEFAULT_COOLDOWN_SECONDS, MessageTemplates, StockTarget};
use crate::infrastructure::file_store::DEFAULT_STATE_FILE;
use crate::infrastructure::ovh_provider::DEFAULT_OVH_API_BASE;
use crate::infrastructure::telegram_notifier::DEFAULT_TELEGRAM_API_BASE;

pub const DEFAULT_HTTP_TIMEOUT_SECONDS: u64 = 10;

/// Optional YAML file; every key can also come from the environment, which
/// takes precedence.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub target_plan: Option<String>,
    pub target_region: Option<String>,
    pub subsidiary: Option<String>,
    pub notification_message: Option<String>,
    pub preorder_notification_message: Option<String>,
    pub button_text: Option<String>,
    pub button_url: Option<String>,
    pub telegram_bot_token: Option<String>,
    pub telegram_chat_id: Option<String>,
    pub state_file: Option<String>,
    pub database_url: Option<String>,
    pub cooldown_seconds: Option<u64>,
    pub http_timeout_seconds: Option<u64>,
    pub ovh_api_base: Option<String>,
    pub telegram_api_base: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TelegramCredentials {
    pub bot_token: String,
    pub chat_id: String,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub target: StockTarget,
    pub templates: MessageTemplates,
    pub button_text: Option<String>,
    pub button_url: Option<String>,
    pub telegram: Option<TelegramCredentials>,
    pub state_file: PathBuf,
    pub database_url: Option<String>,
    pub cooldown_seconds: u64,
    pub http_timeout: Duration,
    pub ovh_api_base: String,
    pub telegram_api_base: String,
}

impl FileConfig {
    pub fn load_from_file(path: &str) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let raw = expand_env(&raw, |k| std::env::var(k).ok());
        let cfg: FileConfig = serde_yaml::from_str(&raw)?;
        Ok(cfg)
    }
}

impl Config {
    /// Environment on top of the optional config file.
    pub fn load(path: Option<&str>) -> anyhow::Result<Self> {
        let file = match path {
            Some(p) => FileConfig::load_from_file(p)?,
            None => FileConfig::default(),
        };
        Ok(Self::resolve(file, |k| std::env::var(k).ok())?)
    }

    pub fn resolve(file: FileConfig, env: impl Fn(&str) -> Option<String>) -> AppResult<Self> {
        let get = |key: &str, fallback: Option<String>| non_blank(env(key)).or(non_blank(fallback));

        let (Some(plan), Some(region)) = (
            get("TARGET_PLAN", file.target_plan),
            get("TARGET_REGION", file.target_region),
        ) else {
            return Err(AppError::Config(
                "TARGET_PLAN and TARGET_REGION must both be set".into(),
            ));
        };
        let mut target =
            StockTarget::new(&plan, &region).map_err(|e| AppError::Config(e.to_string()))?;
        if let Some(subsidiary) = get("OVH_SUBSIDIARY", file.subsidiary) {
            target = target.with_subsidiary(&subsidiary);
        }

        let telegram = match (
            get("TELEGRAM_BOT_TOKEN", file.telegram_bot_token),
            get("TELEGRAM_CHAT_ID", file.telegram_chat_id),
        ) {
            (Some(bot_token), Some(chat_id)) => Some(TelegramCredentials { bot_token, chat_id }),
            (None, None) => None,
            _ => {
                tracing::warn!(
                    "only one of TELEGRAM_BOT_TOKEN / TELEGRAM_CHAT_ID is set, telegram disabled"
                );
                None
            }
        };

        let cooldown_seconds = numeric(&env, "COOLDOWN_SECONDS", file.cooldown_seconds)?
            .unwrap_or(DEFAULT_COOLDOWN_SECONDS);
        let http_timeout_seconds =
            numeric(&env, "HTTP_TIMEOUT_SECONDS", file.http_timeout_seconds)?
                .unwrap_or(DEFAULT_HTTP_TIMEOUT_SECONDS);
        if http_timeout_seconds == 0 {
            return Err(AppError::Config("HTTP_TIMEOUT_SECONDS must be > 0".into()));
        }

        Ok(Self {
            target,
            templates: MessageTemplates {
                available: get("NOTIFICATION_MESSAGE", file.notification_message),
                preorder: get(
                    "PREORDER_NOTIFICATION_MESSAGE",
                    file.preorder_notification_message,
                ),
            },
            button_text: get("BUTTON_TEXT", file.button_text),
            button_url: get("BUTTON_URL", file.button_url),
            telegram,
            state_file: get("STATE_FILE", file.state_file)
                .unwrap_or_else(|| DEFAULT_STATE_FILE.to_string())
                .into(),
            database_url: get("DATABASE_URL", file.database_url),
            cooldown_seconds,
            http_timeout: Duration::from_secs(http_timeout_seconds),
            ovh_api_base: get("OVH_API_BASE", file.ovh_api_base)
                .unwrap_or_else(|| DEFAULT_OVH_API_BASE.to_string()),
            telegram_api_base: get("TELEGRAM_API_BASE", file.telegram_api_base)
                .unwrap_or_else(|| DEFAULT_TELEGRAM_API_BASE.to_string()),
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn numeric(
    env: &impl Fn(&str) -> Option<String>,
    key: &str,
    fallback: Option<u64>,
) -> AppResult<Option<u64>> {
    match non_blank(env(key)) {
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| AppError::Config(format!("{key} must be a non-negative integer, got {raw:?}"))),
        None => Ok(fallback),
    }
}

/// very small ${VAR} expansion; unknown variables expand to nothing
pub fn expand_env(s: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find('}') {
            Some(end) => {
                out.push_str(&lookup(&after[..end]).unwrap_or_default());
                rest = &after[end + 1..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}
