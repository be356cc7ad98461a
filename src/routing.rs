//! Application router configuration.

use axum::{
    Router, middleware,
    routing::{get, put},
};

use crate::{
    AppState, endpoints,
    expense::{
        create_expense_endpoint, delete_expense_endpoint, edit_expense_endpoint,
        get_monthly_expenses_endpoint, list_expenses_endpoint,
    },
    logging_middleware,
    not_found::get_404_not_found,
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::ROOT, get(get_liveness))
        .route(
            endpoints::EXPENSES,
            get(list_expenses_endpoint).post(create_expense_endpoint),
        )
        .route(
            endpoints::EXPENSE,
            put(edit_expense_endpoint).delete(delete_expense_endpoint),
        )
        .route(
            endpoints::MONTHLY_EXPENSES,
            get(get_monthly_expenses_endpoint),
        )
        .fallback(get_404_not_found)
        .layer(middleware::from_fn(logging_middleware))
        .with_state(state)
}

/// The root path '/' tells the client the server is up.
async fn get_liveness() -> &'static str {
    "Server is up and running!"
}
