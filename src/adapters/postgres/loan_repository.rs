use crate::domain::{BookId, Loan, LoanId, LoanStatus, NewLoan, UserId};
use crate::ports::loan_repository::{LoanRepository as LoanRepositoryTrait, Result};
use async_trait::async_trait;
use sqlx::{PgPool, Row, postgres::PgRow};
use std::str::FromStr;

const LOAN_COLUMNS: &str = r#"
    loan_id,
    book_id,
    user_id,
    user_email,
    loan_date,
    due_date,
    return_date,
    status,
    version
"#;

/// PostgreSQLの行データをLoanに変換する
///
/// statusの文字列からLoanStatusへの変換でエラーハンドリングを行う。
fn map_row_to_loan(row: &PgRow) -> Result<Loan> {
    let status_str: &str = row.get("status");
    let status = LoanStatus::from_str(status_str).map_err(|e| {
        Box::new(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
            as Box<dyn std::error::Error + Send + Sync>
    })?;

    Ok(Loan {
        loan_id: LoanId::from_i64(row.get("loan_id")),
        book_id: BookId::from_i64(row.get("book_id")),
        user_id: UserId::from_i64(row.get("user_id")),
        user_email: row.get("user_email"),
        loan_date: row.get("loan_date"),
        due_date: row.get("due_date"),
        return_date: row.get("return_date"),
        status,
        version: row.get("version"),
    })
}

/// LoanRepositoryのPostgreSQL実装
///
/// 更新は`version`列を条件にした楽観的排他制御で行う。
pub struct LoanRepository {
    pool: PgPool,
}

impl LoanRepository {
    /// PostgreSQLコネクションプールから新しいLoanRepositoryを作成
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LoanRepositoryTrait for LoanRepository {
    /// 貸出を挿入し、採番されたIDを含む行を返す
    async fn insert(&self, loan: NewLoan) -> Result<Loan> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO loans (book_id, user_id, user_email, loan_date, due_date, status)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {LOAN_COLUMNS}
            "#
        ))
        .bind(loan.book_id.value())
        .bind(loan.user_id.value())
        .bind(loan.user_email)
        .bind(loan.loan_date)
        .bind(loan.due_date)
        .bind(loan.status.as_str())
        .fetch_one(&self.pool)
        .await?;

        map_row_to_loan(&row)
    }

    async fn find_by_id(&self, loan_id: LoanId) -> Result<Option<Loan>> {
        let row = sqlx::query(&format!(
            "SELECT {LOAN_COLUMNS} FROM loans WHERE loan_id = $1"
        ))
        .bind(loan_id.value())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_row_to_loan).transpose()
    }

    async fn find_all(&self) -> Result<Vec<Loan>> {
        let rows = sqlx::query(&format!(
            "SELECT {LOAN_COLUMNS} FROM loans ORDER BY loan_id ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_row_to_loan).collect()
    }

    /// バージョンが一致する場合のみ更新（compare-and-swap）
    ///
    /// book_id, user_id, loan_dateは不変のため更新しない。
    async fn update(&self, loan: &Loan) -> Result<Option<Loan>> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE loans
            SET
                user_email = $3,
                due_date = $4,
                return_date = $5,
                status = $6,
                version = version + 1,
                updated_at = NOW()
            WHERE loan_id = $1 AND version = $2
            RETURNING {LOAN_COLUMNS}
            "#
        ))
        .bind(loan.loan_id.value())
        .bind(loan.version)
        .bind(loan.user_email.as_deref())
        .bind(loan.due_date)
        .bind(loan.return_date)
        .bind(loan.status.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_row_to_loan).transpose()
    }

    async fn delete(&self, loan_id: LoanId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM loans WHERE loan_id = $1")
            .bind(loan_id.value())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
