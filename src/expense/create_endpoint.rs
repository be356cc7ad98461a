//! Defines the endpoint for creating a new expense.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};

use crate::{
    Error,
    expense::{Expense, ExpenseFields, ExpenseState, NewExpense},
};

/// A route handler for creating a new expense, responds with the stored
/// expense and the status code 201 Created.
///
/// Missing or invalid fields and malformed JSON are rejected with 400 Bad Request.
pub async fn create_expense_endpoint(
    State(state): State<ExpenseState>,
    body: Result<Json<ExpenseFields>, JsonRejection>,
) -> Result<(StatusCode, Json<Expense>), Error> {
    let Json(fields) = body?;
    let new_expense = NewExpense::try_from(fields)?;

    let expense = state.expense_store.create(new_expense).await?;
    tracing::info!("Created expense {}", expense.id);

    Ok((StatusCode::CREATED, Json(expense)))
}
