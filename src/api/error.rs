use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// Every handler failure collapses into the same 500 with a static body.
/// Upstream and database detail goes to the log, never to the client;
/// callers depend on the flat contract.
#[derive(Debug)]
pub struct ApiError(anyhow::Error);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::error!("Request failed: {:#}", self.0);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Sorry, something went wrong",
        )
            .into_response()
    }
}

impl<E> From<E> for ApiError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
