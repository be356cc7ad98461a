#![allow(missing_docs)]

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::json;

use crate::{
    AppState, build_router, endpoints,
    expense::{Expense, InMemoryExpenseStore},
};

/// Create a test server backed by an empty in-memory store.
///
/// The returned store shares its expenses with the server.
#[track_caller]
pub(crate) fn must_create_test_server() -> (TestServer, InMemoryExpenseStore) {
    let store = InMemoryExpenseStore::new();
    let app = build_router(AppState::new(store.clone()));
    let server = TestServer::try_new(app).expect("Could not create test server.");

    (server, store)
}

/// Create an expense dated now through the API.
pub(crate) async fn must_create_expense(
    server: &TestServer,
    description: &str,
    amount: f64,
) -> Expense {
    let response = server
        .post(endpoints::EXPENSES)
        .json(&json!({
            "description": description,
            "amount": amount,
            "category": "test",
        }))
        .await;
    response.assert_status(StatusCode::CREATED);

    response.json::<Expense>()
}
