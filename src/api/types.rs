use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{BookId, CreateLoan, Loan, LoanId, LoanStatus, UpdateLoan, UserId};

/// 貸出申請リクエスト（POST /loans）
///
/// 必須項目の欠落はJSONの段階ではなくワークフローの検証エラーとして扱うため、
/// すべて`Option`で受け取る。
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CreateLoanRequest {
    pub book_id: Option<i64>,
    pub user_id: Option<i64>,
    pub user_email: Option<String>,
}

impl CreateLoanRequest {
    pub fn to_command(&self, requested_on: NaiveDate) -> CreateLoan {
        CreateLoan {
            book_id: self.book_id.map(BookId::from_i64),
            user_id: self.user_id.map(UserId::from_i64),
            user_email: self.user_email.clone(),
            requested_on,
        }
    }
}

/// 貸出更新リクエスト（PUT /loans/:id）
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct UpdateLoanRequest {
    pub due_date: Option<NaiveDate>,
    pub status: Option<LoanStatus>,
    pub return_date: Option<NaiveDate>,
}

impl UpdateLoanRequest {
    pub fn to_command(&self, loan_id: LoanId, requested_on: NaiveDate) -> UpdateLoan {
        UpdateLoan {
            loan_id,
            due_date: self.due_date,
            status: self.status,
            return_date: self.return_date,
            requested_on,
        }
    }
}

/// 貸出レスポンス
#[derive(Debug, Serialize, Deserialize)]
pub struct LoanResponse {
    pub id: i64,
    pub book_id: i64,
    pub user_id: i64,
    pub user_email: Option<String>,
    pub loan_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub return_date: Option<NaiveDate>,
    pub status: LoanStatus,
    pub version: i32,
}

impl From<Loan> for LoanResponse {
    fn from(loan: Loan) -> Self {
        Self {
            id: loan.loan_id.value(),
            book_id: loan.book_id.value(),
            user_id: loan.user_id.value(),
            user_email: loan.user_email,
            loan_date: loan.loan_date,
            due_date: loan.due_date,
            return_date: loan.return_date,
            status: loan.status,
            version: loan.version,
        }
    }
}

/// エラーレスポンス
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
        }
    }
}
