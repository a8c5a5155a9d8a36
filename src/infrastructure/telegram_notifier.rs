use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::application::{AppError, AppResult, Notifier};
use crate::domain::{CallToAction, Notification};

pub const DEFAULT_TELEGRAM_API_BASE: &str = "https://api.telegram.org";

pub struct TelegramNotifier {
    client: reqwest::Client,
    endpoint: String,
    chat_id: String,
}

impl TelegramNotifier {
    pub fn new(api_base: &str, bot_token: &str, chat_id: &str, timeout: Duration) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Config(e.to_string()))?;
        Ok(Self {
            client,
            endpoint: format!(
                "{}/bot{}/sendMessage",
                api_base.trim_end_matches('/'),
                bot_token
            ),
            chat_id: chat_id.to_string(),
        })
    }
}

#[derive(Debug, Serialize)]
pub struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_markup: Option<InlineKeyboard<'a>>,
}

#[derive(Debug, Serialize)]
struct InlineKeyboard<'a> {
    inline_keyboard: [[InlineButton<'a>; 1]; 1],
}

#[derive(Debug, Serialize)]
struct InlineButton<'a> {
    text: &'a str,
    url: &'a str,
}

#[derive(Debug, Deserialize)]
struct SendMessageResp {
    ok: bool,
    description: Option<String>,
}

impl<'a> SendMessage<'a> {
    pub fn new(chat_id: &'a str, notification: &'a Notification) -> Self {
        Self {
            chat_id,
            text: &notification.text,
            reply_markup: notification.call_to_action.as_ref().map(single_button),
        }
    }
}

fn single_button(cta: &CallToAction) -> InlineKeyboard<'_> {
    InlineKeyboard {
        inline_keyboard: [[InlineButton {
            text: &cta.label,
            url: &cta.url,
        }]],
    }
}

/// A send only counts when the status is 2xx and the body says `ok: true`.
pub fn parse_send_response(status: StatusCode, body: &str) -> AppResult<()> {
    if !status.is_success() {
        return Err(AppError::Notifier(format!("telegram api {status}: {body}")));
    }

    let parsed: SendMessageResp = serde_json::from_str(body)
        .map_err(|e| AppError::Notifier(format!("unexpected telegram response: {e}")))?;
    if !parsed.ok {
        return Err(AppError::Notifier(format!(
            "telegram api rejected message: {}",
            parsed.description.as_deref().unwrap_or(body)
        )));
    }

    Ok(())
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn notify(&self, notification: &Notification) -> AppResult<()> {
        let payload = SendMessage::new(&self.chat_id, notification);

        let resp = self
            .client
            .post(&self.endpoint)
            .json(&payload)
            .send()
            .await
            .map_err(|e| AppError::Notifier(e.to_string()))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| AppError::Notifier(e.to_string()))?;

        parse_send_response(status, &body)
    }
}
