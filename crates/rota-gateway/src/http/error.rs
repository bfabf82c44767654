use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use rota_attribution::AttributionError;
use rota_core::RotaError;
use rota_source::SourceError;
use serde::Serialize;
use tracing::error;

/// JSON error body: `{"error": "...", "code": "..."}`.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub code: &'static str,
}

/// Handler error. Wraps [`RotaError`] and decides status and visibility.
#[derive(Debug)]
pub struct HttpError(pub RotaError);

impl HttpError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self(RotaError::InvalidRequest(msg.into()))
    }

    fn status(&self) -> StatusCode {
        match self.0 {
            RotaError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            RotaError::UpstreamUnavailable(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if self.0.is_client_safe() {
            self.0.to_string()
        } else {
            error!(error = %self.0, "request failed with internal error");
            "internal error".to_string()
        };
        let body = ErrorBody {
            error: message,
            code: self.0.code(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<RotaError> for HttpError {
    fn from(e: RotaError) -> Self {
        Self(e)
    }
}

impl From<SourceError> for HttpError {
    fn from(e: SourceError) -> Self {
        match e {
            SourceError::AllFailed { attempted } => Self(RotaError::UpstreamUnavailable(format!(
                "none of the {attempted} requested schedules could be fetched"
            ))),
            other => Self(RotaError::Internal(other.to_string())),
        }
    }
}

impl From<AttributionError> for HttpError {
    fn from(e: AttributionError) -> Self {
        // Precondition violations are defects: full detail goes to the log only.
        Self(RotaError::Internal(format!("attribution precondition violated: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        assert_eq!(HttpError::bad_request("x").status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            HttpError::from(SourceError::AllFailed { attempted: 2 }).status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            HttpError::from(AttributionError::NoSchedules).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
