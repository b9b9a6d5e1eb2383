use crate::domain::{Loan, LoanId, NewLoan};
use crate::ports::loan_repository::{LoanRepository as LoanRepositoryTrait, Result};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

/// LoanRepositoryのインメモリ実装
///
/// データベースなしでサービスを起動する場合とテストで使用する。
/// 条件付き更新はMutex内で比較と書き込みを行う。
pub struct LoanRepository {
    state: Mutex<State>,
}

struct State {
    next_id: i64,
    loans: BTreeMap<LoanId, Loan>,
}

impl LoanRepository {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                next_id: 1,
                loans: BTreeMap::new(),
            }),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>> {
        self.state
            .lock()
            .map_err(|_| "in-memory loan store lock poisoned".into())
    }

    /// 任意の状態の貸出を直接登録する
    ///
    /// `loan.loan_id`をそのまま使い、以降の採番はそれより大きい値から行う。
    pub fn seed(&self, loan: Loan) -> Result<()> {
        let mut state = self.lock()?;
        state.next_id = state.next_id.max(loan.loan_id.value() + 1);
        state.loans.insert(loan.loan_id, loan);
        Ok(())
    }
}

impl Default for LoanRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LoanRepositoryTrait for LoanRepository {
    async fn insert(&self, loan: NewLoan) -> Result<Loan> {
        let mut state = self.lock()?;
        let loan_id = LoanId::from_i64(state.next_id);
        state.next_id += 1;

        let loan = Loan {
            loan_id,
            book_id: loan.book_id,
            user_id: loan.user_id,
            user_email: loan.user_email,
            loan_date: Some(loan.loan_date),
            due_date: Some(loan.due_date),
            return_date: None,
            status: loan.status,
            version: 1,
        };
        state.loans.insert(loan_id, loan.clone());
        Ok(loan)
    }

    async fn find_by_id(&self, loan_id: LoanId) -> Result<Option<Loan>> {
        let state = self.lock()?;
        Ok(state.loans.get(&loan_id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Loan>> {
        let state = self.lock()?;
        Ok(state.loans.values().cloned().collect())
    }

    async fn update(&self, loan: &Loan) -> Result<Option<Loan>> {
        let mut state = self.lock()?;
        match state.loans.get_mut(&loan.loan_id) {
            Some(stored) if stored.version == loan.version => {
                *stored = Loan {
                    version: loan.version + 1,
                    ..loan.clone()
                };
                Ok(Some(stored.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn delete(&self, loan_id: LoanId) -> Result<bool> {
        let mut state = self.lock()?;
        Ok(state.loans.remove(&loan_id).is_some())
    }
}
