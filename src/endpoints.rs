//! The API endpoints URIs.
//!
//! For endpoints that take parameters, e.g., '/api/expenses/{expense_id}', use [format_endpoint].

/// The root route which reports that the server is running.
pub const ROOT: &str = "/";
/// The route to list and create expenses.
pub const EXPENSES: &str = "/api/expenses";
/// The route to update or delete a single expense.
pub const EXPENSE: &str = "/api/expenses/{expense_id}";
/// The route to list the expenses in a calendar month.
pub const MONTHLY_EXPENSES: &str = "/api/expenses/monthly/{year}/{month}";

/// Replace the first parameter in `endpoint_path` with `value`.
///
/// A parameter starts with a left brace and ends with the next right brace.
/// For example, in the endpoint path '/api/expenses/{expense_id}',
/// '{expense_id}' is the parameter. Call repeatedly to fill in endpoints with
/// several parameters.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, value: impl std::fmt::Display) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_owned();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map_or(endpoint_path.len(), |end| param_start + end + 1);

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        value,
        &endpoint_path[param_end..]
    )
}

// These tests are here so that we know when we call `Uri::from_shared` it will not panic.
#[cfg(test)]
mod endpoints_tests {
    use axum::http::Uri;

    use crate::endpoints::{self, format_endpoint};

    fn assert_endpoint_is_valid_uri(uri: &str) {
        assert!(uri.parse::<Uri>().is_ok(), "{uri} is not a valid URI");
    }

    #[test]
    fn endpoints_are_valid_uris() {
        assert_endpoint_is_valid_uri(endpoints::ROOT);
        assert_endpoint_is_valid_uri(endpoints::EXPENSES);
        assert_endpoint_is_valid_uri(&format_endpoint(endpoints::EXPENSE, "abc"));
        assert_endpoint_is_valid_uri(&format_endpoint(
            &format_endpoint(endpoints::MONTHLY_EXPENSES, 2025),
            10,
        ));
    }

    #[test]
    fn replaces_parameter() {
        assert_eq!(
            format_endpoint(endpoints::EXPENSE, "68f1c0a2"),
            "/api/expenses/68f1c0a2"
        );
    }

    #[test]
    fn replaces_parameters_in_order() {
        let path = format_endpoint(&format_endpoint(endpoints::MONTHLY_EXPENSES, 2025), 3);

        assert_eq!(path, "/api/expenses/monthly/2025/3");
    }

    #[test]
    fn returns_path_without_parameter_unchanged() {
        assert_eq!(format_endpoint(endpoints::EXPENSES, 1), endpoints::EXPENSES);
    }

    #[test]
    fn unterminated_parameter_replaces_rest_of_path() {
        assert_eq!(format_endpoint("/foo/{bar", 1), "/foo/1");
    }
}
