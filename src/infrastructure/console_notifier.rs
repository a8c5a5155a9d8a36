use async_trait::async_trait;

use crate::application::{AppResult, Notifier};
use crate::domain::Notification;

pub struct ConsoleNotifier;

impl ConsoleNotifier {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ConsoleNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Notifier for ConsoleNotifier {
    async fn notify(&self, notification: &Notification) -> AppResult<()> {
        match &notification.call_to_action {
            Some(cta) => println!(
                "NOTIFY: {}\n[{}]({})",
                notification.text, cta.label, cta.url
            ),
            None => println!("NOTIFY: {}", notification.text),
        }
        Ok(())
    }
}
