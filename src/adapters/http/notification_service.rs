use crate::domain::Email;
use crate::ports::notification_service::{NotificationService as NotificationServiceTrait, Result};
use async_trait::async_trait;
use std::time::Duration;

/// NotificationServiceのHTTP実装
///
/// 通知サービスの`POST {base_url}/send-email`にメールをJSONで送信する。
/// 2xx以外のステータスは配信失敗として扱う。
pub struct NotificationService {
    client: reqwest::Client,
    base_url: String,
    sender: String,
}

impl NotificationService {
    pub fn new(
        base_url: impl Into<String>,
        sender: impl Into<String>,
        timeout: Duration,
    ) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            sender: sender.into(),
        })
    }
}

#[async_trait]
impl NotificationServiceTrait for NotificationService {
    fn sender(&self) -> &str {
        &self.sender
    }

    async fn send_email(&self, email: Email) -> Result<()> {
        self.client
            .post(format!("{}/send-email", self.base_url))
            .json(&email)
            .send()
            .await?
            .error_for_status()?;

        tracing::debug!(subject = %email.subject, owner = %email.owner, "Email sent");
        Ok(())
    }
}
