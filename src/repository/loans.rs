//! Loans repository for database operations

use chrono::{Duration, Utc};
use sqlx::{Pool, Sqlite};

use crate::{
    error::{AppError, AppResult},
    models::{
        loan::{BorrowType, CreateLoan, Loan, LoanStatus},
        resource::{Resource, ResourceStatus},
    },
};

/// Due date offset for take-away loans
const LOAN_PERIOD_DAYS: i64 = 15;

#[derive(Clone)]
pub struct LoansRepository {
    pool: Pool<Sqlite>,
}

impl LoansRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    /// Get loan by ID
    pub async fn get_by_id(&self, id: i64) -> AppResult<Loan> {
        sqlx::query_as::<_, Loan>("SELECT * FROM loans WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Loan with id {} not found", id)))
    }

    /// Get all loans owned by a user
    pub async fn list_for_user(&self, user_id: i64) -> AppResult<Vec<Loan>> {
        let loans =
            sqlx::query_as::<_, Loan>("SELECT * FROM loans WHERE user_id = ? ORDER BY loan_date")
                .bind(user_id)
                .fetch_all(&self.pool)
                .await?;

        Ok(loans)
    }

    /// Create a new loan for an available resource.
    ///
    /// The availability check and the resource status flip are a single
    /// conditional UPDATE, executed in the same transaction as the loan
    /// insert, so two concurrent borrows of one resource cannot both succeed.
    pub async fn create(&self, user_id: i64, loan: &CreateLoan) -> AppResult<Loan> {
        let mut tx = self.pool.begin().await?;

        let resource = sqlx::query_as::<_, Resource>("SELECT * FROM resources WHERE id = ?")
            .bind(loan.resource_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Resource with id {} not found", loan.resource_id))
            })?;

        let flipped = sqlx::query("UPDATE resources SET status = ? WHERE id = ? AND status = ?")
            .bind(ResourceStatus::Borrowed)
            .bind(loan.resource_id)
            .bind(ResourceStatus::Available)
            .execute(&mut *tx)
            .await?;

        if flipped.rows_affected() == 0 {
            return Err(AppError::Unavailable(format!(
                "Resource \"{}\" is not available (status: {})",
                resource.title, resource.status
            )));
        }

        let loan_date = Utc::now();
        let return_date = match loan.borrow_type {
            BorrowType::TakeAway => Some(loan_date + Duration::days(LOAN_PERIOD_DAYS)),
            BorrowType::InPlace => None,
        };

        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO loans (user_id, resource_id, loan_date, return_date, status)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(user_id)
        .bind(loan.resource_id)
        .bind(loan_date)
        .bind(return_date)
        .bind(LoanStatus::Active)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        self.get_by_id(id).await
    }

    /// Return an active loan owned by the given user.
    ///
    /// The loan and resource updates share one transaction so the two rows
    /// cannot desynchronize.
    pub async fn return_loan(&self, loan_id: i64, user_id: i64) -> AppResult<Loan> {
        let mut tx = self.pool.begin().await?;

        let loan = sqlx::query_as::<_, Loan>("SELECT * FROM loans WHERE id = ?")
            .bind(loan_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Loan with id {} not found", loan_id)))?;

        if loan.user_id != user_id {
            return Err(AppError::Authorization(
                "Loan does not belong to the current user".to_string(),
            ));
        }

        if loan.status != LoanStatus::Active {
            return Err(AppError::Unavailable("Loan is already returned".to_string()));
        }

        let now = Utc::now();

        sqlx::query("UPDATE loans SET status = ?, return_date = ? WHERE id = ?")
            .bind(LoanStatus::Returned)
            .bind(now)
            .bind(loan_id)
            .execute(&mut *tx)
            .await?;

        // Only flip borrowed -> available; a resource disabled by an admin
        // while on loan stays disabled.
        sqlx::query("UPDATE resources SET status = ? WHERE id = ? AND status = ?")
            .bind(ResourceStatus::Available)
            .bind(loan.resource_id)
            .bind(ResourceStatus::Borrowed)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        self.get_by_id(loan_id).await
    }
}
