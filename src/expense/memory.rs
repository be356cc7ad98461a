//! Implements an expense store that keeps expenses in memory.

use std::{
    ops::Range,
    sync::{Arc, Mutex, MutexGuard},
};

use async_trait::async_trait;
use time::OffsetDateTime;

use crate::{
    Error,
    expense::{Expense, ExpenseId, ExpenseStore, ExpenseUpdate, NewExpense},
};

/// Stores expenses in a vector in insertion order.
///
/// Clones share the same expenses. Intended as a stand-in for the document
/// store in tests.
#[derive(Debug, Default, Clone)]
pub struct InMemoryExpenseStore {
    expenses: Arc<Mutex<Vec<Expense>>>,
}

impl InMemoryExpenseStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<Expense>>, Error> {
        self.expenses.lock().map_err(|error| {
            tracing::error!("could not acquire the expense store lock: {error}");
            Error::Store("could not acquire the expense store lock".to_owned())
        })
    }
}

#[async_trait]
impl ExpenseStore for InMemoryExpenseStore {
    async fn list(&self) -> Result<Vec<Expense>, Error> {
        Ok(self.lock()?.clone())
    }

    async fn create(&self, expense: NewExpense) -> Result<Expense, Error> {
        let expense = expense.into_expense(ExpenseId::new());
        self.lock()?.push(expense.clone());

        Ok(expense)
    }

    async fn update_by_id(&self, id: ExpenseId, update: ExpenseUpdate) -> Result<Expense, Error> {
        let mut expenses = self.lock()?;
        let expense = expenses
            .iter_mut()
            .find(|expense| expense.id == id)
            .ok_or(Error::NotFound)?;

        update.apply_to(expense);

        Ok(expense.clone())
    }

    async fn delete_by_id(&self, id: ExpenseId) -> Result<(), Error> {
        let mut expenses = self.lock()?;
        let position = expenses
            .iter()
            .position(|expense| expense.id == id)
            .ok_or(Error::NotFound)?;

        expenses.remove(position);

        Ok(())
    }

    async fn find_by_date_range(
        &self,
        range: Range<OffsetDateTime>,
    ) -> Result<Vec<Expense>, Error> {
        Ok(self
            .lock()?
            .iter()
            .filter(|expense| range.contains(&expense.date))
            .cloned()
            .collect())
    }
}
