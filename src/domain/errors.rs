use thiserror::Error;

use super::loan::LoanStatus;

/// 貸出申請の入力エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoanValidationError {
    /// 書籍IDが指定されていない
    #[error("book_id is required")]
    MissingBookId,
    /// 利用者IDが指定されていない
    #[error("user_id is required")]
    MissingUserId,
    /// 書籍IDと利用者IDの両方が指定されていない
    #[error("book_id and user_id are required")]
    MissingBookAndUserId,
}

/// 返却のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReturnLoanError {
    /// APPROVED以外の貸出は返却できない
    #[error("Cannot return a loan with status {0}")]
    NotApproved(LoanStatus),
}

/// 更新のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UpdateLoanError {
    /// 許可されていないステータス遷移
    #[error("Cannot change loan status from {from} to {to}")]
    InvalidTransition { from: LoanStatus, to: LoanStatus },
}
