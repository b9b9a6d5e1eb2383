use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use rusty_loan_service::adapters::memory::InMemoryLoanRepository;
use rusty_loan_service::adapters::mock::{CatalogService, NotificationService};
use rusty_loan_service::api::handlers::AppState;
use rusty_loan_service::api::router::create_router;
use rusty_loan_service::api::types::*;
use rusty_loan_service::application::loan::ServiceDependencies;
use rusty_loan_service::domain::{Loan, LoanStatus, NewLoan, value_objects::*};
use rusty_loan_service::ports::LoanRepository;
use rusty_loan_service::ports::loan_repository::Result as RepositoryResult;
use serde_json::json;
use std::sync::Arc;
use tower::ServiceExt;

// ============================================================================
// E2Eテスト用のヘルパー関数
// ============================================================================

/// 指定したレコードストアでルーターを組み立てる
fn create_app(
    loan_repository: Arc<dyn LoanRepository>,
    catalog_service: Arc<CatalogService>,
    notification_service: Arc<NotificationService>,
) -> axum::Router {
    let service_deps = ServiceDependencies {
        loan_repository,
        catalog_service,
        notification_service,
    };

    let app_state = Arc::new(AppState { service_deps });

    create_router(app_state)
}

/// E2Eテスト用のアプリケーションセットアップ
///
/// 実際のAPIルーターにインメモリのレコードストアとモックの外部サービスを注入する。
/// モックサービスをテスト側から操作できるように、引数で受け取ります。
fn setup_e2e_app(
    catalog_service: Arc<CatalogService>,
    notification_service: Arc<NotificationService>,
) -> axum::Router {
    create_app(
        Arc::new(InMemoryLoanRepository::new()),
        catalog_service,
        notification_service,
    )
}

/// 読み込みの直後に別のリクエストが同じ貸出を保存するレコードストア
struct RacingLoanRepository {
    inner: Arc<InMemoryLoanRepository>,
}

#[async_trait]
impl LoanRepository for RacingLoanRepository {
    async fn insert(&self, loan: NewLoan) -> RepositoryResult<Loan> {
        self.inner.insert(loan).await
    }

    async fn find_by_id(&self, loan_id: LoanId) -> RepositoryResult<Option<Loan>> {
        let loaded = self.inner.find_by_id(loan_id).await?;
        if let Some(loan) = &loaded {
            self.inner.update(loan).await?;
        }
        Ok(loaded)
    }

    async fn find_all(&self) -> RepositoryResult<Vec<Loan>> {
        self.inner.find_all().await
    }

    async fn update(&self, loan: &Loan) -> RepositoryResult<Option<Loan>> {
        self.inner.update(loan).await
    }

    async fn delete(&self, loan_id: LoanId) -> RepositoryResult<bool> {
        self.inner.delete(loan_id).await
    }
}

async fn send(
    app: &axum::Router,
    method: &str,
    uri: &str,
    body: Option<serde_json::Value>,
) -> Response {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    app.clone().oneshot(request).await.unwrap()
}

async fn read_json<T: serde::de::DeserializeOwned>(response: Response) -> T {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

// ============================================================================
// E2Eテスト: 正常系フロー
// ============================================================================

#[tokio::test]
async fn test_e2e_full_loan_flow() {
    // Arrange
    let catalog_service = Arc::new(CatalogService::new());
    let notification_service = Arc::new(NotificationService::new());
    catalog_service.add_available_book(BookId::from_i64(1));
    let app = setup_e2e_app(catalog_service.clone(), notification_service.clone());

    // Step 1: 貸出作成（POST /loans）
    let response = send(
        &app,
        "POST",
        "/loans",
        Some(json!({ "book_id": 1, "user_id": 2, "user_email": "reader@example.com" })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let created: LoanResponse = read_json(response).await;
    assert_eq!(created.book_id, 1);
    assert_eq!(created.user_id, 2);
    assert_eq!(created.status, LoanStatus::Approved);
    let loan_date = created.loan_date.unwrap();
    assert_eq!(created.due_date, Some(loan_date + chrono::Duration::days(14)));

    // Step 2: 貸出詳細取得（GET /loans/:id）
    let response = send(&app, "GET", &format!("/loans/{}", created.id), None).await;

    assert_eq!(response.status(), StatusCode::OK);
    let loan: LoanResponse = read_json(response).await;
    assert_eq!(loan.id, created.id);
    assert_eq!(loan.status, LoanStatus::Approved);

    // Step 3: 返却期限の変更（PUT /loans/:id）
    let response = send(
        &app,
        "PUT",
        &format!("/loans/{}", created.id),
        Some(json!({ "due_date": "2030-01-31" })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let updated: LoanResponse = read_json(response).await;
    assert_eq!(updated.due_date, chrono::NaiveDate::from_ymd_opt(2030, 1, 31));
    assert_eq!(updated.version, created.version + 1);

    // Step 4: 返却（POST /loans/:id/return）
    let response = send(&app, "POST", &format!("/loans/{}/return", created.id), None).await;

    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // 返却後の状態確認
    let response = send(&app, "GET", &format!("/loans/{}", created.id), None).await;
    let loan: LoanResponse = read_json(response).await;
    assert_eq!(loan.status, LoanStatus::Returned);
    assert!(loan.return_date.is_some());

    // Step 5: 二重返却は422
    let response = send(&app, "POST", &format!("/loans/{}/return", created.id), None).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let error: ErrorResponse = read_json(response).await;
    assert_eq!(error.error, "INVALID_LOAN_STATUS");

    // Step 6: 返却済みの貸出をRETURNEDに更新しようとすると422
    let response = send(
        &app,
        "PUT",
        &format!("/loans/{}", created.id),
        Some(json!({ "status": "RETURNED" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let error: ErrorResponse = read_json(response).await;
    assert_eq!(error.error, "INVALID_LOAN_STATUS");

    // 外部サービスの呼び出しを確認
    assert_eq!(
        catalog_service.availability_updates(),
        vec![(BookId::from_i64(1), false), (BookId::from_i64(1), true)]
    );
    assert_eq!(notification_service.sent_emails().len(), 2);
}

#[tokio::test]
async fn test_e2e_list_and_delete() {
    // Arrange: 2件の貸出を作成
    let catalog_service = Arc::new(CatalogService::new());
    let notification_service = Arc::new(NotificationService::new());
    catalog_service.add_available_book(BookId::from_i64(1));
    catalog_service.add_available_book(BookId::from_i64(2));
    let app = setup_e2e_app(catalog_service, notification_service);

    for book_id in [1, 2] {
        let response = send(
            &app,
            "POST",
            "/loans",
            Some(json!({ "book_id": book_id, "user_id": 7 })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    // Act: 一覧取得（GET /loans）
    let response = send(&app, "GET", "/loans", None).await;

    // Assert
    assert_eq!(response.status(), StatusCode::OK);
    let loans: Vec<LoanResponse> = read_json(response).await;
    assert_eq!(loans.len(), 2);
    assert!(loans.iter().all(|l| l.user_id == 7));

    // 削除（DELETE /loans/:id）
    let response = send(&app, "DELETE", &format!("/loans/{}", loans[0].id), None).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = send(&app, "GET", "/loans", None).await;
    let loans_after: Vec<LoanResponse> = read_json(response).await;
    assert_eq!(loans_after.len(), 1);
    assert_eq!(loans_after[0].id, loans[1].id);
}

// ============================================================================
// E2Eテスト: エラーケース
// ============================================================================

#[tokio::test]
async fn test_e2e_create_loan_missing_fields() {
    // Arrange
    let app = setup_e2e_app(
        Arc::new(CatalogService::new()),
        Arc::new(NotificationService::new()),
    );

    // Act: user_idなし
    let response = send(&app, "POST", "/loans", Some(json!({ "book_id": 1 }))).await;

    // Assert
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error: ErrorResponse = read_json(response).await;
    assert_eq!(error.error, "VALIDATION_ERROR");
    assert!(error.message.contains("user_id"));
}

#[tokio::test]
async fn test_e2e_create_loan_malformed_body() {
    let app = setup_e2e_app(
        Arc::new(CatalogService::new()),
        Arc::new(NotificationService::new()),
    );

    let response = send(&app, "POST", "/loans", Some(json!({ "book_id": "abc" }))).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error: ErrorResponse = read_json(response).await;
    assert_eq!(error.error, "BAD_REQUEST");
}

#[tokio::test]
async fn test_e2e_create_loan_book_not_available() {
    // Arrange: 書籍を登録しない
    let notification_service = Arc::new(NotificationService::new());
    let app = setup_e2e_app(Arc::new(CatalogService::new()), notification_service.clone());

    // Act
    let response = send(
        &app,
        "POST",
        "/loans",
        Some(json!({ "book_id": 42, "user_id": 7 })),
    )
    .await;

    // Assert
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let error: ErrorResponse = read_json(response).await;
    assert_eq!(error.error, "BOOK_NOT_AVAILABLE");
    assert!(error.message.contains("not available"));

    // 貸出は作成されない
    let response = send(&app, "GET", "/loans", None).await;
    let loans: Vec<LoanResponse> = read_json(response).await;
    assert!(loans.is_empty());
    assert_eq!(notification_service.sent_emails().len(), 1);
}

#[tokio::test]
async fn test_e2e_catalog_unavailable_maps_to_bad_gateway() {
    // Arrange
    let catalog_service = Arc::new(CatalogService::new());
    catalog_service.set_unreachable(true);
    let app = setup_e2e_app(catalog_service, Arc::new(NotificationService::new()));

    // Act
    let response = send(
        &app,
        "POST",
        "/loans",
        Some(json!({ "book_id": 1, "user_id": 2 })),
    )
    .await;

    // Assert: 原因はレスポンスに含めない
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let error: ErrorResponse = read_json(response).await;
    assert_eq!(error.error, "COLLABORATOR_UNAVAILABLE");
    assert!(!error.message.contains("unreachable"));
}

#[tokio::test]
async fn test_e2e_loan_not_found() {
    // Arrange
    let app = setup_e2e_app(
        Arc::new(CatalogService::new()),
        Arc::new(NotificationService::new()),
    );

    // Act & Assert: 存在しない貸出IDに対する各操作
    let response = send(&app, "GET", "/loans/999", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = send(
        &app,
        "PUT",
        "/loans/999",
        Some(json!({ "due_date": "2030-01-31" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = send(&app, "DELETE", "/loans/999", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = send(&app, "POST", "/loans/999/return", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let error: ErrorResponse = read_json(response).await;
    assert_eq!(error.error, "LOAN_NOT_FOUND");
}

#[tokio::test]
async fn test_e2e_concurrent_modification_maps_to_conflict() {
    // Arrange: 同じストアを共有する通常のアプリと競合が起きるアプリ
    let loan_repository = Arc::new(InMemoryLoanRepository::new());
    let catalog_service = Arc::new(CatalogService::new());
    let notification_service = Arc::new(NotificationService::new());
    catalog_service.add_available_book(BookId::from_i64(1));

    let app = create_app(
        loan_repository.clone(),
        catalog_service.clone(),
        notification_service.clone(),
    );
    let racing_app = create_app(
        Arc::new(RacingLoanRepository {
            inner: loan_repository,
        }),
        catalog_service,
        notification_service,
    );

    let response = send(
        &app,
        "POST",
        "/loans",
        Some(json!({ "book_id": 1, "user_id": 2 })),
    )
    .await;
    let created: LoanResponse = read_json(response).await;

    // Act: 更新と返却のどちらも読み込み後に先を越される
    let response = send(
        &racing_app,
        "PUT",
        &format!("/loans/{}", created.id),
        Some(json!({ "due_date": "2030-01-31" })),
    )
    .await;

    // Assert
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let error: ErrorResponse = read_json(response).await;
    assert_eq!(error.error, "CONCURRENT_MODIFICATION");

    let response = send(
        &racing_app,
        "POST",
        &format!("/loans/{}/return", created.id),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // 貸出は返却されていない
    let response = send(&app, "GET", &format!("/loans/{}", created.id), None).await;
    let loan: LoanResponse = read_json(response).await;
    assert_eq!(loan.status, LoanStatus::Approved);
}

#[tokio::test]
async fn test_e2e_health_check() {
    let app = setup_e2e_app(
        Arc::new(CatalogService::new()),
        Arc::new(NotificationService::new()),
    );

    let response = send(&app, "GET", "/health", None).await;

    assert_eq!(response.status(), StatusCode::OK);
}
