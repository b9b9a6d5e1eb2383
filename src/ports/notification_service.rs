use crate::domain::{BookId, Email, Loan, UserId};
use async_trait::async_trait;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// 通知サービスポート
///
/// 利用者へのメール配信を抽象化する。
/// 実装は`send_email`と送信元アドレスのみを提供し、
/// ライフサイクル通知はそれらから組み立てられる。
#[async_trait]
pub trait NotificationService: Send + Sync {
    /// 送信元アドレス
    fn sender(&self) -> &str;

    /// メールを送信する
    async fn send_email(&self, email: Email) -> Result<()>;

    /// 貸出承認通知を送信する
    async fn notify_approval(&self, loan: &Loan) -> Result<()> {
        self.send_email(Email::loan_approved(self.sender(), loan))
            .await
    }

    /// 貸出却下通知を送信する
    async fn notify_rejection(&self, loan: &Loan) -> Result<()> {
        self.send_email(Email::loan_rejected(self.sender(), loan))
            .await
    }

    /// 貸出不可通知を送信する
    ///
    /// 貸出は作成されないため、申請内容から直接組み立てる。
    async fn notify_unavailability(
        &self,
        book_id: BookId,
        user_id: UserId,
        user_email: Option<&str>,
    ) -> Result<()> {
        self.send_email(Email::book_unavailable(
            self.sender(),
            book_id,
            user_id,
            user_email,
        ))
        .await
    }

    /// 返却確認通知を送信する
    async fn notify_return(&self, loan: &Loan) -> Result<()> {
        self.send_email(Email::loan_returned(self.sender(), loan))
            .await
    }
}
