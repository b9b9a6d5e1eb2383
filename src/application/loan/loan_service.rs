use crate::domain::{self, commands::*, value_objects::*};
use crate::ports::*;
use std::sync::Arc;

use super::errors::{LoanApplicationError, Result};

/// サービスの依存関係
///
/// 関数型DDDの原則に従い、データ構造として定義。
/// 振る舞い（メソッド）は持たず、純粋な関数に依存関係を渡す。
/// テストではポートをインメモリ実装やモックに差し替える。
#[derive(Clone)]
pub struct ServiceDependencies {
    pub loan_repository: Arc<dyn LoanRepository>,
    pub catalog_service: Arc<dyn CatalogService>,
    pub notification_service: Arc<dyn NotificationService>,
}

/// レコードストアから貸出を読み込むヘルパー関数
///
/// # エラー
/// - RepositoryError: 読み込み失敗
/// - LoanNotFound: 貸出が存在しない
async fn load_loan(
    loan_repository: &Arc<dyn LoanRepository>,
    loan_id: LoanId,
) -> Result<domain::Loan> {
    loan_repository
        .find_by_id(loan_id)
        .await
        .map_err(LoanApplicationError::RepositoryError)?
        .ok_or(LoanApplicationError::LoanNotFound)
}

/// 読み込んだバージョンを条件に貸出を保存するヘルパー関数
///
/// 読み込み後に他のリクエストが更新していた場合は`ConcurrentModification`。
async fn save_loan(
    loan_repository: &Arc<dyn LoanRepository>,
    loan: &domain::Loan,
) -> Result<domain::Loan> {
    loan_repository
        .update(loan)
        .await
        .map_err(LoanApplicationError::RepositoryError)?
        .ok_or(LoanApplicationError::ConcurrentModification)
}

/// 書籍を貸し出す（純粋な関数）
///
/// ビジネスルール：
/// - 書籍IDと利用者IDが指定されていること
/// - 書籍が貸出可能であること（不可の場合は貸出不可通知を送り、何も保存しない）
/// - 貸出期間は14日間
///
/// # 副作用の順序
///
/// 保存 → カタログ更新 → 承認通知。
/// カタログ更新前に失敗しても、APPROVEDの貸出は残り復旧可能。
///
/// # 引数
/// * `deps` - サービスの依存関係
/// * `cmd` - 貸出申請コマンド
///
/// # 戻り値
/// 成功時は保存された貸出
pub async fn create_loan(deps: &ServiceDependencies, cmd: CreateLoan) -> Result<domain::Loan> {
    // 1. 入力検証（副作用なし）
    let request = domain::loan::validate_request(&cmd)
        .map_err(|e| LoanApplicationError::Validation(e.to_string()))?;

    // 2. 書籍の貸出可能性確認
    let available = deps
        .catalog_service
        .is_available_for_loan(request.book_id)
        .await
        .map_err(LoanApplicationError::catalog)?;

    if !available {
        tracing::info!(
            book_id = %request.book_id,
            user_id = %request.user_id,
            "Book not available, loan rejected"
        );

        // 却下された申請は保存しない
        deps.notification_service
            .notify_unavailability(
                request.book_id,
                request.user_id,
                request.user_email.as_deref(),
            )
            .await
            .map_err(LoanApplicationError::notification)?;

        return Err(LoanApplicationError::BookNotAvailable);
    }

    // 3. ドメイン層の純粋関数で承認
    let new_loan = domain::loan::approve_loan(request, cmd.requested_on);

    // 4. レコードストアに保存
    let loan = deps
        .loan_repository
        .insert(new_loan)
        .await
        .map_err(LoanApplicationError::RepositoryError)?;

    tracing::info!(loan_id = %loan.loan_id, book_id = %loan.book_id, "Loan approved");

    // 5. カタログ上で貸出中にする
    if let Err(e) = deps
        .catalog_service
        .update_availability(loan.book_id, false)
        .await
    {
        tracing::error!(loan_id = %loan.loan_id, "Loan saved but catalog update failed: {}", e);
        return Err(LoanApplicationError::catalog(e));
    }

    // 6. 承認通知
    deps.notification_service
        .notify_approval(&loan)
        .await
        .map_err(LoanApplicationError::notification)?;

    Ok(loan)
}

/// IDで貸出を取得する
pub async fn get_loan(deps: &ServiceDependencies, loan_id: LoanId) -> Result<domain::Loan> {
    load_loan(&deps.loan_repository, loan_id).await
}

/// 全貸出を取得する
pub async fn list_loans(deps: &ServiceDependencies) -> Result<Vec<domain::Loan>> {
    deps.loan_repository
        .find_all()
        .await
        .map_err(LoanApplicationError::RepositoryError)
}

/// 貸出を部分更新する（純粋な関数）
///
/// ビジネスルール：
/// - 貸出が存在すること
/// - RETURNEDへの変更はAPPROVEDの貸出のみ
/// - 返却日は更新後の状態がRETURNEDの場合のみ反映
///
/// 外部サービスは呼び出さない。
pub async fn update_loan(deps: &ServiceDependencies, cmd: UpdateLoan) -> Result<domain::Loan> {
    // 1. レコードストアから貸出を読み込む
    let loan = load_loan(&deps.loan_repository, cmd.loan_id).await?;

    // 2. ドメイン層の純粋関数を呼び出し
    let updated = domain::loan::apply_update(
        &loan,
        cmd.due_date,
        cmd.status,
        cmd.return_date,
        cmd.requested_on,
    )
    .map_err(|e| LoanApplicationError::InvalidLoanStatus(e.to_string()))?;

    // 3. 条件付きで保存
    save_loan(&deps.loan_repository, &updated).await
}

/// 書籍を返却する（純粋な関数）
///
/// ビジネスルール：
/// - 貸出が存在すること
/// - 貸出がAPPROVEDであること
///
/// # 副作用の順序
///
/// 保存 → カタログ更新 → 返却通知。
/// カタログ更新や通知が失敗した場合、貸出は既にRETURNEDで保存されている。
pub async fn return_loan(deps: &ServiceDependencies, cmd: ReturnLoan) -> Result<domain::Loan> {
    // 1. レコードストアから貸出を読み込む
    let loan = load_loan(&deps.loan_repository, cmd.loan_id).await?;

    // 2. ドメイン層の純粋関数を呼び出し
    let returned = domain::loan::return_loan(&loan, cmd.returned_on)
        .map_err(|e| LoanApplicationError::InvalidLoanStatus(e.to_string()))?;

    // 3. 条件付きで保存
    let saved = save_loan(&deps.loan_repository, &returned).await?;

    tracing::info!(loan_id = %saved.loan_id, book_id = %saved.book_id, "Loan returned");

    // 4. カタログ上で貸出可能に戻す
    if let Err(e) = deps
        .catalog_service
        .update_availability(saved.book_id, true)
        .await
    {
        tracing::error!(loan_id = %saved.loan_id, "Loan returned but catalog update failed: {}", e);
        return Err(LoanApplicationError::catalog(e));
    }

    // 5. 返却通知
    deps.notification_service
        .notify_return(&saved)
        .await
        .map_err(LoanApplicationError::notification)?;

    Ok(saved)
}

/// 貸出を削除する
///
/// 存在しない場合は`LoanNotFound`。
pub async fn delete_loan(deps: &ServiceDependencies, loan_id: LoanId) -> Result<()> {
    let loan = load_loan(&deps.loan_repository, loan_id).await?;

    let deleted = deps
        .loan_repository
        .delete(loan.loan_id)
        .await
        .map_err(LoanApplicationError::RepositoryError)?;

    // 読み込み後に別のリクエストが削除した
    if !deleted {
        return Err(LoanApplicationError::LoanNotFound);
    }

    tracing::info!(loan_id = %loan_id, "Loan deleted");
    Ok(())
}
