use crate::domain::BookId;
use async_trait::async_trait;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// カタログサービスポート
///
/// 貸出コンテキストとカタログコンテキストの境界を維持する。
/// 貸出コンテキストはBookIDのみを知り、在庫の詳細は知らない。
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// 書籍が貸出可能か確認する
    ///
    /// エラーはカタログサービスに到達できないことを表す。
    async fn is_available_for_loan(&self, book_id: BookId) -> Result<bool>;

    /// 書籍の貸出可否を更新する
    ///
    /// 貸出承認時に`false`、返却時に`true`で呼ばれる。
    async fn update_availability(&self, book_id: BookId, available: bool) -> Result<()>;
}
