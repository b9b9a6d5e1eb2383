use crate::domain::{Loan, LoanId, NewLoan};
use async_trait::async_trait;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// 貸出レコードストアポート
///
/// 貸出レコードの永続化を抽象化する。操作間の唯一の真実の情報源。
#[async_trait]
pub trait LoanRepository: Send + Sync {
    /// 新しい貸出を保存する
    ///
    /// IDを採番し、バージョン1の貸出を返す。
    async fn insert(&self, loan: NewLoan) -> Result<Loan>;

    /// IDで貸出を取得する
    async fn find_by_id(&self, loan_id: LoanId) -> Result<Option<Loan>>;

    /// 全貸出をID順で取得する
    async fn find_all(&self) -> Result<Vec<Loan>>;

    /// 貸出を条件付きで更新する
    ///
    /// 保存済みのバージョンが`loan.version`と一致する場合のみ更新し、
    /// バージョンを1つ進めた貸出を返す。一致しない（または削除済みの）場合は`None`。
    async fn update(&self, loan: &Loan) -> Result<Option<Loan>>;

    /// 貸出を削除する
    ///
    /// 削除した場合は`true`、存在しなかった場合は`false`。
    async fn delete(&self, loan_id: LoanId) -> Result<bool>;
}
