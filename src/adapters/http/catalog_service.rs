use crate::domain::value_objects::BookId;
use crate::ports::catalog_service::{CatalogService as CatalogServiceTrait, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// 最後の1冊は貸し出さない
const RESERVED_COPIES: i64 = 1;

/// 在庫数レスポンス
///
/// `{"availableCopies": n}`と数値のみの両方を受け付ける。
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum AvailabilityResponse {
    Object {
        #[serde(rename = "availableCopies", alias = "available_copies")]
        available_copies: i64,
    },
    Copies(i64),
}

impl AvailabilityResponse {
    fn available_copies(&self) -> i64 {
        match self {
            AvailabilityResponse::Object { available_copies } => *available_copies,
            AvailabilityResponse::Copies(copies) => *copies,
        }
    }
}

#[derive(Debug, Serialize)]
struct UpdateStatusRequest {
    available: bool,
}

/// CatalogServiceのHTTP実装
///
/// - `GET {base_url}/books/{id}/availability`
/// - `PUT {base_url}/books/{id}/status`
///
/// 在庫照会の404は貸出不可として扱う。それ以外の接続失敗、タイムアウト、
/// 2xx以外のステータスはすべてエラーになる。
pub struct CatalogService {
    client: reqwest::Client,
    base_url: String,
}

impl CatalogService {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn book_url(&self, book_id: BookId, path: &str) -> String {
        format!("{}/books/{}/{}", self.base_url, book_id, path)
    }
}

#[async_trait]
impl CatalogServiceTrait for CatalogService {
    async fn is_available_for_loan(&self, book_id: BookId) -> Result<bool> {
        let response = self
            .client
            .get(self.book_url(book_id, "availability"))
            .send()
            .await?;

        // カタログに存在しない書籍は貸出不可
        if response.status() == StatusCode::NOT_FOUND {
            tracing::debug!(book_id = %book_id, "Book unknown to catalog");
            return Ok(false);
        }

        let response: AvailabilityResponse = response.error_for_status()?.json().await?;

        let copies = response.available_copies();
        tracing::debug!(book_id = %book_id, copies, "Catalog availability");

        Ok(copies > RESERVED_COPIES)
    }

    async fn update_availability(&self, book_id: BookId, available: bool) -> Result<()> {
        self.client
            .put(self.book_url(book_id, "status"))
            .json(&UpdateStatusRequest { available })
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }
}
