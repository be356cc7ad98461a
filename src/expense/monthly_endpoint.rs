//! Defines the endpoint for listing the expenses in a calendar month.

use axum::{
    Json,
    extract::{Path, State, rejection::PathRejection},
};

use crate::{
    Error,
    expense::{Expense, ExpenseState, month_range},
};

/// A route handler for listing the expenses dated within the month `month`
/// (1 to 12) of `year`, in UTC.
pub async fn get_monthly_expenses_endpoint(
    State(state): State<ExpenseState>,
    params: Result<Path<(i32, u8)>, PathRejection>,
) -> Result<Json<Vec<Expense>>, Error> {
    let Path((year, month)) = params?;
    let range = month_range(year, month)?;

    let expenses = state.expense_store.find_by_date_range(range).await?;

    Ok(Json(expenses))
}
