use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use wayfind_core::RouteError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("route not found")]
    NotFound,
    #[error("route expired")]
    Expired,
    #[error(transparent)]
    Route(#[from] RouteError),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Expired => StatusCode::GONE,
            AppError::Route(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            AppError::BadRequest(_) => "bad_request",
            AppError::NotFound => "not_found",
            AppError::Expired => "expired",
            AppError::Route(e) => route_code(e),
            AppError::Internal(_) => "internal",
        }
    }
}

/// Stable machine-readable codes for engine failures, one per variant.
fn route_code(e: &RouteError) -> &'static str {
    match e {
        RouteError::NoProjection { .. } => "no_projection",
        RouteError::NoMatchingParking { .. } => "no_matching_parking",
        RouteError::AccessibleUnreachable { .. } => "accessible_unreachable",
        RouteError::UnsuitableParking { .. } => "unsuitable_parking",
        RouteError::LegFailed { .. } => "leg_failed",
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorPayload,
}

#[derive(Serialize)]
struct ErrorPayload {
    code: &'static str,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorPayload { code: self.code(), message: self.to_string() },
        };
        (self.status(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wayfind_core::VehicleType;

    #[test]
    fn route_errors_map_to_unprocessable() {
        let err = AppError::Route(RouteError::NoMatchingParking { vehicle: VehicleType::Car });
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.code(), "no_matching_parking");
    }

    #[test]
    fn store_outcomes_have_distinct_statuses() {
        assert_eq!(AppError::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::Expired.status(), StatusCode::GONE);
    }
}
