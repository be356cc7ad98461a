//! Implements a struct that holds the state of the REST server.

use std::sync::Arc;

use crate::expense::ExpenseStore;

/// The state of the REST server.
///
/// Built once at startup and cloned into each request handler.
#[derive(Clone)]
pub struct AppState {
    /// The store for managing [expenses](crate::expense::Expense).
    pub expense_store: Arc<dyn ExpenseStore>,
}

impl AppState {
    /// Create a new [AppState] that owns `expense_store`.
    pub fn new(expense_store: impl ExpenseStore + 'static) -> Self {
        Self {
            expense_store: Arc::new(expense_store),
        }
    }
}
