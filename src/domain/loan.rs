use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use super::{
    BookId, CreateLoan, LoanId, LoanValidationError, ReturnLoanError, UpdateLoanError, UserId,
};

/// 貸出期間（日数）
pub const LOAN_PERIOD_DAYS: i64 = 14;

/// 貸出ステータス
///
/// 状態遷移：
/// - 新規申請 → APPROVED（永続化）または却下（永続化しない）
/// - APPROVED → RETURNED
/// - RETURNED, REJECTED からは遷移しない
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LoanStatus {
    /// 承認待ち
    Pending,
    /// 承認済み（貸出中）
    Approved,
    /// 却下
    Rejected,
    /// 返却済み
    Returned,
}

impl LoanStatus {
    /// 文字列表現を取得する
    pub fn as_str(&self) -> &'static str {
        match self {
            LoanStatus::Pending => "PENDING",
            LoanStatus::Approved => "APPROVED",
            LoanStatus::Rejected => "REJECTED",
            LoanStatus::Returned => "RETURNED",
        }
    }

    /// 要求された遷移が許可されるか
    ///
    /// RETURNEDへの遷移はAPPROVEDからのみ。
    /// それ以外は現在と同じステータスの指定（変更なし）のみ許可する。
    pub fn can_transition_to(&self, next: LoanStatus) -> bool {
        match next {
            LoanStatus::Returned => *self == LoanStatus::Approved,
            _ => *self == next,
        }
    }
}

impl std::fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for LoanStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "PENDING" => Ok(LoanStatus::Pending),
            "APPROVED" => Ok(LoanStatus::Approved),
            "REJECTED" => Ok(LoanStatus::Rejected),
            "RETURNED" => Ok(LoanStatus::Returned),
            _ => Err(format!("Invalid loan status: {}", s)),
        }
    }
}

/// 検証済みの貸出申請
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoanRequest {
    pub book_id: BookId,
    pub user_id: UserId,
    pub user_email: Option<String>,
}

/// 永続化前の貸出
///
/// IDとバージョンはレコードストアが採番する。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewLoan {
    pub book_id: BookId,
    pub user_id: UserId,
    pub user_email: Option<String>,
    pub loan_date: NaiveDate,
    pub due_date: NaiveDate,
    pub status: LoanStatus,
}

/// 貸出 - 1冊の書籍の1回の貸出
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Loan {
    // 識別子
    pub loan_id: LoanId,

    // 他コンテキストへの参照（IDのみ）
    pub book_id: BookId,
    pub user_id: UserId,

    // 通知用に非正規化した連絡先
    pub user_email: Option<String>,

    // 貸出管理の責務
    pub loan_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub return_date: Option<NaiveDate>,
    pub status: LoanStatus,

    // 楽観的排他制御用
    pub version: i32,
}

/// 純粋関数：貸出申請を検証する
///
/// 書籍IDと利用者IDは必須。空白のみのメールアドレスは未指定として扱う。
pub fn validate_request(cmd: &CreateLoan) -> Result<LoanRequest, LoanValidationError> {
    let (book_id, user_id) = match (cmd.book_id, cmd.user_id) {
        (Some(book_id), Some(user_id)) => (book_id, user_id),
        (None, Some(_)) => return Err(LoanValidationError::MissingBookId),
        (Some(_), None) => return Err(LoanValidationError::MissingUserId),
        (None, None) => return Err(LoanValidationError::MissingBookAndUserId),
    };

    let user_email = cmd
        .user_email
        .as_deref()
        .map(str::trim)
        .filter(|email| !email.is_empty())
        .map(str::to_string);

    Ok(LoanRequest {
        book_id,
        user_id,
        user_email,
    })
}

/// 純粋関数：貸出を承認する
///
/// ビジネスルール：
/// - 貸出日は承認日
/// - 返却期限は貸出日 + 14日間
/// - 状態はAPPROVED
pub fn approve_loan(request: LoanRequest, approved_on: NaiveDate) -> NewLoan {
    NewLoan {
        book_id: request.book_id,
        user_id: request.user_id,
        user_email: request.user_email,
        loan_date: approved_on,
        due_date: approved_on + Duration::days(LOAN_PERIOD_DAYS),
        status: LoanStatus::Approved,
    }
}

/// 純粋関数：書籍を返却する
///
/// APPROVEDの貸出のみ返却できる。返却日を記録し、状態をRETURNEDにする。
pub fn return_loan(loan: &Loan, returned_on: NaiveDate) -> Result<Loan, ReturnLoanError> {
    if loan.status != LoanStatus::Approved {
        return Err(ReturnLoanError::NotApproved(loan.status));
    }

    Ok(Loan {
        status: LoanStatus::Returned,
        return_date: Some(returned_on),
        ..loan.clone()
    })
}

/// 純粋関数：貸出を部分更新する
///
/// - `due_date`は常に上書き可能
/// - `status`は遷移が許可される場合のみ
/// - `return_date`は更新後の状態がRETURNEDの場合のみ適用
/// - RETURNEDへ遷移し返却日の指定がない場合は`updated_on`を返却日とする
pub fn apply_update(
    loan: &Loan,
    due_date: Option<NaiveDate>,
    status: Option<LoanStatus>,
    return_date: Option<NaiveDate>,
    updated_on: NaiveDate,
) -> Result<Loan, UpdateLoanError> {
    if let Some(next) = status {
        if !loan.status.can_transition_to(next) {
            return Err(UpdateLoanError::InvalidTransition {
                from: loan.status,
                to: next,
            });
        }
    }

    let mut updated = loan.clone();

    if let Some(due_date) = due_date {
        updated.due_date = Some(due_date);
    }
    if let Some(status) = status {
        updated.status = status;
    }
    if updated.status == LoanStatus::Returned {
        match return_date {
            Some(return_date) => updated.return_date = Some(return_date),
            None if loan.status != LoanStatus::Returned => {
                updated.return_date = Some(updated_on)
            }
            None => {}
        }
    }

    Ok(updated)
}
