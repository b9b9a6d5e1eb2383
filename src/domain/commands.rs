use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{BookId, LoanId, LoanStatus, UserId};

/// コマンド：貸出を申請する
///
/// 書籍IDと利用者IDは必須だが、未検証の入力をそのまま受け取るため`Option`で保持する。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateLoan {
    pub book_id: Option<BookId>,
    pub user_id: Option<UserId>,
    pub user_email: Option<String>,
    pub requested_on: NaiveDate,
}

/// コマンド：貸出を部分更新する
///
/// 指定されたフィールドのみ適用される。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateLoan {
    pub loan_id: LoanId,
    pub due_date: Option<NaiveDate>,
    pub status: Option<LoanStatus>,
    pub return_date: Option<NaiveDate>,
    pub requested_on: NaiveDate,
}

/// コマンド：書籍を返却する
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReturnLoan {
    pub loan_id: LoanId,
    pub returned_on: NaiveDate,
}
