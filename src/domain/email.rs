use serde::{Deserialize, Serialize};

use super::{BookId, Loan, UserId};

/// 通知メール
///
/// 永続化しない。通知ごとに組み立てて通知サービスに渡す。
/// `owner`には利用者IDを入れ、宛先が不明な場合は通知サービス側で解決する。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Email {
    pub owner: String,
    pub email_from: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_to: Option<String>,
    pub subject: String,
    pub text: String,
}

impl Email {
    fn for_user(
        from: &str,
        user_id: UserId,
        user_email: Option<&str>,
        subject: &str,
        text: String,
    ) -> Self {
        Self {
            owner: user_id.to_string(),
            email_from: from.to_string(),
            email_to: user_email.map(str::to_string),
            subject: subject.to_string(),
            text,
        }
    }

    /// 貸出承認通知
    pub fn loan_approved(from: &str, loan: &Loan) -> Self {
        let due = loan
            .due_date
            .map(|d| format!(" Please return it by {}.", d))
            .unwrap_or_default();

        Self::for_user(
            from,
            loan.user_id,
            loan.user_email.as_deref(),
            "Book loan approved",
            format!(
                "Your loan #{} of book {} was approved.{}",
                loan.loan_id, loan.book_id, due
            ),
        )
    }

    /// 貸出却下通知
    pub fn loan_rejected(from: &str, loan: &Loan) -> Self {
        Self::for_user(
            from,
            loan.user_id,
            loan.user_email.as_deref(),
            "Book loan rejected",
            format!(
                "Your loan #{} of book {} was rejected.",
                loan.loan_id, loan.book_id
            ),
        )
    }

    /// 貸出不可通知（貸出は作成されない）
    pub fn book_unavailable(
        from: &str,
        book_id: BookId,
        user_id: UserId,
        user_email: Option<&str>,
    ) -> Self {
        Self::for_user(
            from,
            user_id,
            user_email,
            "Book not available",
            format!("Book {} is not available for loan at the moment.", book_id),
        )
    }

    /// 返却確認通知
    pub fn loan_returned(from: &str, loan: &Loan) -> Self {
        let on = loan
            .return_date
            .map(|d| format!(" on {}", d))
            .unwrap_or_default();

        Self::for_user(
            from,
            loan.user_id,
            loan.user_email.as_deref(),
            "Book returned",
            format!("Book {} was returned{}. Thank you.", loan.book_id, on),
        )
    }
}
