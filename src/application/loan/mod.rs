mod errors;
mod loan_service;

pub use errors::{Collaborator, LoanApplicationError, Result};
pub use loan_service::{
    ServiceDependencies, create_loan, delete_loan, get_loan, list_loans, return_loan, update_loan,
};
