//! Defines the endpoint for updating an existing expense.

use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
};

use crate::{
    Error,
    expense::{Expense, ExpenseFields, ExpenseId, ExpenseState, ExpenseUpdate},
};

/// A route handler for replacing some of the fields of an expense, responds
/// with the updated expense.
///
/// Fields left out of the request body keep their current value. Responds
/// with 404 Not Found if the expense does not exist.
pub async fn edit_expense_endpoint(
    State(state): State<ExpenseState>,
    expense_id: Result<Path<String>, PathRejection>,
    body: Result<Json<ExpenseFields>, JsonRejection>,
) -> Result<Json<Expense>, Error> {
    let Path(expense_id) = expense_id?;
    let expense_id: ExpenseId = expense_id.parse()?;
    let Json(fields) = body?;
    let update = ExpenseUpdate::try_from(fields)?;

    let expense = state
        .expense_store
        .update_by_id(expense_id, update)
        .await?;
    tracing::info!("Updated expense {expense_id}");

    Ok(Json(expense))
}
