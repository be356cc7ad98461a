//! Expenses: the data model, the stores that hold them and the route handlers that serve them.

use std::sync::Arc;

use axum::extract::FromRef;

use crate::AppState;

mod core;
mod create_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod list_endpoint;
mod memory;
mod mongo;
mod monthly_endpoint;
mod range;
mod store;

pub use self::core::{Expense, ExpenseFields, ExpenseId, ExpenseUpdate, NewExpense};
pub use create_endpoint::create_expense_endpoint;
pub use delete_endpoint::{DeletedMessage, delete_expense_endpoint};
pub use edit_endpoint::edit_expense_endpoint;
pub use list_endpoint::list_expenses_endpoint;
pub use memory::InMemoryExpenseStore;
pub use mongo::{DEFAULT_DATABASE_URL, MongoExpenseStore};
pub use monthly_endpoint::get_monthly_expenses_endpoint;
pub use range::month_range;
pub use store::ExpenseStore;

/// The state needed by the expense route handlers.
#[derive(Clone)]
pub struct ExpenseState {
    /// The store for managing expenses.
    pub expense_store: Arc<dyn ExpenseStore>,
}

impl FromRef<AppState> for ExpenseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            expense_store: state.expense_store.clone(),
        }
    }
}
