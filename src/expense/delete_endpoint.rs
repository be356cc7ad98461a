//! Defines the endpoint for deleting an expense.

use axum::{
    Json,
    extract::{Path, State, rejection::PathRejection},
};
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    expense::{ExpenseId, ExpenseState},
};

/// The body of a successful delete response.
#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct DeletedMessage {
    /// A human readable confirmation.
    pub message: String,
}

/// A route handler for deleting an expense, responds with a confirmation message.
///
/// Responds with 404 Not Found if the expense does not exist, e.g. because it
/// was already deleted.
pub async fn delete_expense_endpoint(
    State(state): State<ExpenseState>,
    expense_id: Result<Path<String>, PathRejection>,
) -> Result<Json<DeletedMessage>, Error> {
    let Path(expense_id) = expense_id?;
    let expense_id: ExpenseId = expense_id.parse()?;

    state.expense_store.delete_by_id(expense_id).await?;
    tracing::info!("Deleted expense {expense_id}");

    Ok(Json(DeletedMessage {
        message: "Expense deleted successfully".to_owned(),
    }))
}

#[cfg(test)]
mod tests {
    use crate::{
        endpoints::{self, format_endpoint},
        expense::{DeletedMessage, ExpenseId, ExpenseStore},
        test_utils::{must_create_expense, must_create_test_server},
    };

    #[tokio::test]
    async fn can_delete_expense() {
        let (server, store) = must_create_test_server();
        let expense = must_create_expense(&server, "coffee", 4.5).await;
        let other = must_create_expense(&server, "bus", 3.2).await;

        let response = server
            .delete(&format_endpoint(endpoints::EXPENSE, expense.id))
            .await;

        response.assert_status_ok();
        assert_eq!(
            response.json::<DeletedMessage>(),
            DeletedMessage {
                message: "Expense deleted successfully".to_owned()
            }
        );
        assert_eq!(store.list().await.unwrap(), vec![other]);
    }

    #[tokio::test]
    async fn second_delete_is_not_found() {
        let (server, _) = must_create_test_server();
        let expense = must_create_expense(&server, "coffee", 4.5).await;
        let path = format_endpoint(endpoints::EXPENSE, expense.id);

        server.delete(&path).await.assert_status_ok();
        let response = server.delete(&path).await;

        response.assert_status_not_found();
        assert_eq!(response.text(), "Expense not found");
    }

    #[tokio::test]
    async fn missing_expense_is_not_found() {
        let (server, _) = must_create_test_server();

        server
            .delete(&format_endpoint(endpoints::EXPENSE, ExpenseId::new()))
            .await
            .assert_status_not_found();
    }

    #[tokio::test]
    async fn rejects_malformed_id() {
        let (server, _) = must_create_test_server();

        server
            .delete(&format_endpoint(endpoints::EXPENSE, "123"))
            .await
            .assert_status_bad_request();
    }
}
