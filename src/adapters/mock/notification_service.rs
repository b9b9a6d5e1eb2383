use crate::domain::Email;
use crate::ports::notification_service::{NotificationService as NotificationServiceTrait, Result};
use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

/// Mock implementation of NotificationService
///
/// Does not deliver anything. Records every email for assertions
/// and can be switched into a failing mode.
pub struct NotificationService {
    sender: String,
    sent: Mutex<Vec<Email>>,
    failing: AtomicBool,
}

impl NotificationService {
    pub fn new() -> Self {
        Self::with_sender("library@example.com")
    }

    pub fn with_sender(sender: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
            sent: Mutex::new(Vec::new()),
            failing: AtomicBool::new(false),
        }
    }

    /// Simulate an unreachable notification service
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Emails accepted so far, in send order
    pub fn sent_emails(&self) -> Vec<Email> {
        self.sent.lock().unwrap().clone()
    }
}

impl Default for NotificationService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NotificationServiceTrait for NotificationService {
    fn sender(&self) -> &str {
        &self.sender
    }

    /// Record the email (or fail when switched into failing mode)
    async fn send_email(&self, email: Email) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err("notification service unreachable".into());
        }
        tracing::debug!(subject = %email.subject, owner = %email.owner, "Mock email recorded");
        self.sent.lock().unwrap().push(email);
        Ok(())
    }
}
