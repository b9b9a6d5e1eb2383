use crate::application::loan::{
    ServiceDependencies, create_loan as execute_create_loan, delete_loan as execute_delete_loan,
    get_loan as execute_get_loan, list_loans as execute_list_loans,
    return_loan as execute_return_loan, update_loan as execute_update_loan,
};
use crate::domain::{commands::ReturnLoan, value_objects::LoanId};
use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use chrono::{NaiveDate, Utc};
use std::sync::Arc;

use super::{
    error::ApiError,
    types::{CreateLoanRequest, LoanResponse, UpdateLoanRequest},
};

// ============================================================================
// State
// ============================================================================

/// ハンドラー間で共有されるアプリケーション状態
#[derive(Clone)]
pub struct AppState {
    pub service_deps: ServiceDependencies,
}

/// リクエストを処理する日（UTC）
fn today() -> NaiveDate {
    Utc::now().date_naive()
}

// ============================================================================
// Query handlers (GET)
// ============================================================================

/// GET /loans - 全貸出を取得
pub async fn list_loans(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<LoanResponse>>, ApiError> {
    let loans = execute_list_loans(&state.service_deps).await?;
    Ok(Json(loans.into_iter().map(LoanResponse::from).collect()))
}

/// GET /loans/:id - 貸出詳細をIDで取得
///
/// 見つからない場合は404を返す。
pub async fn get_loan_by_id(
    State(state): State<Arc<AppState>>,
    Path(loan_id): Path<i64>,
) -> Result<Json<LoanResponse>, ApiError> {
    let loan = execute_get_loan(&state.service_deps, LoanId::from_i64(loan_id)).await?;
    Ok(Json(LoanResponse::from(loan)))
}

// ============================================================================
// Command handlers (POST / PUT / DELETE)
// ============================================================================

/// POST /loans - 新しい貸出を申請
///
/// 強制されるビジネスルール:
/// - 書籍IDと利用者IDが指定されていること（400）
/// - 書籍が貸出可能であること（422、貸出は作成されない）
pub async fn create_loan(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateLoanRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<LoanResponse>), ApiError> {
    let Json(req) = payload?;
    let cmd = req.to_command(today());

    let loan = execute_create_loan(&state.service_deps, cmd).await?;

    Ok((StatusCode::CREATED, Json(LoanResponse::from(loan))))
}

/// PUT /loans/:id - 貸出を部分更新
///
/// 強制されるビジネスルール:
/// - 貸出が存在すること（404）
/// - RETURNEDへの変更はAPPROVEDの貸出のみ（422）
/// - 同時更新の検出（409）
pub async fn update_loan(
    State(state): State<Arc<AppState>>,
    Path(loan_id): Path<i64>,
    payload: Result<Json<UpdateLoanRequest>, JsonRejection>,
) -> Result<Json<LoanResponse>, ApiError> {
    let Json(req) = payload?;
    let cmd = req.to_command(LoanId::from_i64(loan_id), today());

    let loan = execute_update_loan(&state.service_deps, cmd).await?;

    Ok(Json(LoanResponse::from(loan)))
}

/// DELETE /loans/:id - 貸出を削除
pub async fn delete_loan(
    State(state): State<Arc<AppState>>,
    Path(loan_id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    execute_delete_loan(&state.service_deps, LoanId::from_i64(loan_id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /loans/:id/return - 書籍を返却
///
/// 強制されるビジネスルール:
/// - 貸出が存在すること（404）
/// - 貸出がAPPROVEDであること（422）
pub async fn return_loan(
    State(state): State<Arc<AppState>>,
    Path(loan_id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let cmd = ReturnLoan {
        loan_id: LoanId::from_i64(loan_id),
        returned_on: today(),
    };

    execute_return_loan(&state.service_deps, cmd).await?;

    Ok(StatusCode::NO_CONTENT)
}
