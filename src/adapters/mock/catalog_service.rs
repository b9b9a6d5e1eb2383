use crate::domain::value_objects::BookId;
use crate::ports::catalog_service::{CatalogService as CatalogServiceTrait, Result};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

/// CatalogServiceのモック実装
///
/// 書籍IDを保存することで状態を持ったテストをサポート。
/// 貸出可能な書籍を登録でき、貸出可否の更新履歴を記録する。
pub struct CatalogService {
    available_books: Mutex<HashSet<BookId>>,
    availability_updates: Mutex<Vec<(BookId, bool)>>,
    unreachable: AtomicBool,
}

impl CatalogService {
    pub fn new() -> Self {
        Self {
            available_books: Mutex::new(HashSet::new()),
            availability_updates: Mutex::new(Vec::new()),
            unreachable: AtomicBool::new(false),
        }
    }

    /// テスト用に貸出可能な書籍を登録
    pub fn add_available_book(&self, book_id: BookId) {
        self.available_books.lock().unwrap().insert(book_id);
    }

    /// カタログサービスの障害を模擬する
    pub fn set_unreachable(&self, unreachable: bool) {
        self.unreachable.store(unreachable, Ordering::SeqCst);
    }

    /// 記録された貸出可否の更新（呼び出し順）
    pub fn availability_updates(&self) -> Vec<(BookId, bool)> {
        self.availability_updates.lock().unwrap().clone()
    }

    fn check_reachable(&self) -> Result<()> {
        if self.unreachable.load(Ordering::SeqCst) {
            return Err("catalog service unreachable".into());
        }
        Ok(())
    }
}

impl Default for CatalogService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CatalogServiceTrait for CatalogService {
    /// 登録された書籍の中で貸出可能かチェック
    async fn is_available_for_loan(&self, book_id: BookId) -> Result<bool> {
        self.check_reachable()?;
        Ok(self.available_books.lock().unwrap().contains(&book_id))
    }

    /// 更新を記録し、登録状態に反映する
    async fn update_availability(&self, book_id: BookId, available: bool) -> Result<()> {
        self.check_reachable()?;
        self.availability_updates
            .lock()
            .unwrap()
            .push((book_id, available));

        let mut books = self.available_books.lock().unwrap();
        if available {
            books.insert(book_id);
        } else {
            books.remove(&book_id);
        }
        Ok(())
    }
}
