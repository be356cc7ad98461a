//! Defines the expense store trait.

use std::ops::Range;

use async_trait::async_trait;
use time::OffsetDateTime;

use crate::{
    Error,
    expense::{Expense, ExpenseId, ExpenseUpdate, NewExpense},
};

/// Handles the creation, retrieval, update and deletion of expenses.
///
/// Each method is a single call to the underlying store with no retries.
#[async_trait]
pub trait ExpenseStore: Send + Sync {
    /// Retrieve every expense in the order the store keeps them.
    async fn list(&self) -> Result<Vec<Expense>, Error>;

    /// Store a new expense and return it with its assigned ID.
    async fn create(&self, expense: NewExpense) -> Result<Expense, Error>;

    /// Overwrite the fields set in `update` on the expense with the ID `id`
    /// and return the updated expense.
    ///
    /// An empty update returns the expense unchanged.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if no expense has the ID `id`.
    async fn update_by_id(&self, id: ExpenseId, update: ExpenseUpdate) -> Result<Expense, Error>;

    /// Delete the expense with the ID `id`.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if no expense has the ID `id`.
    async fn delete_by_id(&self, id: ExpenseId) -> Result<(), Error>;

    /// Retrieve the expenses whose date falls within `range` (start
    /// inclusive, end exclusive).
    async fn find_by_date_range(&self, range: Range<OffsetDateTime>)
    -> Result<Vec<Expense>, Error>;
}
