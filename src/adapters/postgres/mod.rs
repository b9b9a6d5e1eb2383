pub mod loan_repository;

// パブリックに型を再エクスポート
pub use loan_repository::LoanRepository as PostgresLoanRepository;
