use thiserror::Error;

/// 外部協調サービスの種別
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collaborator {
    Catalog,
    Notification,
}

impl std::fmt::Display for Collaborator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Collaborator::Catalog => f.write_str("Catalog"),
            Collaborator::Notification => f.write_str("Notification"),
        }
    }
}

/// 貸出管理アプリケーション層のエラー
#[derive(Debug, Error)]
pub enum LoanApplicationError {
    /// 必須項目の欠落など入力の不備
    #[error("Validation error: {0}")]
    Validation(String),

    /// 貸出が見つからない
    #[error("Loan not found")]
    LoanNotFound,

    /// 書籍が貸出不可
    #[error("Book is not available for loan")]
    BookNotAvailable,

    /// 貸出の状態が不正（例: APPROVEDを期待したがRETURNEDだった）
    #[error("Invalid loan status: {0}")]
    InvalidLoanStatus(String),

    /// 読み込み後に他のリクエストが貸出を更新した
    #[error("Loan was modified concurrently")]
    ConcurrentModification,

    /// カタログサービスまたは通知サービスに到達できない
    #[error("{collaborator} service unavailable")]
    CollaboratorUnavailable {
        collaborator: Collaborator,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// レコードストアのエラー
    #[error("Loan repository error")]
    RepositoryError(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl LoanApplicationError {
    pub(super) fn catalog(source: Box<dyn std::error::Error + Send + Sync>) -> Self {
        LoanApplicationError::CollaboratorUnavailable {
            collaborator: Collaborator::Catalog,
            source,
        }
    }

    pub(super) fn notification(source: Box<dyn std::error::Error + Send + Sync>) -> Self {
        LoanApplicationError::CollaboratorUnavailable {
            collaborator: Collaborator::Notification,
            source,
        }
    }
}

/// アプリケーション層の Result型
pub type Result<T> = std::result::Result<T, LoanApplicationError>;
