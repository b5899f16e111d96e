//! Loan management service

use crate::{
    error::AppResult,
    models::loan::{CreateLoan, Loan},
    repository::Repository,
};

#[derive(Clone)]
pub struct LoansService {
    repository: Repository,
}

impl LoansService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Get loans for a user
    pub async fn user_loans(&self, user_id: i64) -> AppResult<Vec<Loan>> {
        self.repository.loans.list_for_user(user_id).await
    }

    /// Create a new loan (borrow a resource)
    pub async fn create_loan(&self, user_id: i64, loan: CreateLoan) -> AppResult<Loan> {
        // Verify user exists
        self.repository.users.get_by_id(user_id).await?;
        self.repository.loans.create(user_id, &loan).await
    }

    /// Return a borrowed resource
    pub async fn return_loan(&self, loan_id: i64, user_id: i64) -> AppResult<Loan> {
        self.repository.loans.return_loan(loan_id, user_id).await
    }
}
