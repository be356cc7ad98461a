//! Defines the endpoint for listing every expense.

use axum::{Json, extract::State};

use crate::{
    Error,
    expense::{Expense, ExpenseState},
};

/// A route handler for listing all expenses, in the order the store keeps them.
pub async fn list_expenses_endpoint(
    State(state): State<ExpenseState>,
) -> Result<Json<Vec<Expense>>, Error> {
    let expenses = state.expense_store.list().await?;

    Ok(Json(expenses))
}
