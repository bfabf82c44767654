use thiserror::Error;

#[derive(Debug, Error)]
pub enum RotaError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl RotaError {
    /// Short error code string sent to clients in HTTP error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            RotaError::Config(_) => "CONFIG_ERROR",
            RotaError::InvalidRequest(_) => "INVALID_REQUEST",
            RotaError::UpstreamUnavailable(_) => "UPSTREAM_UNAVAILABLE",
            RotaError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Whether the message may be shown to the caller verbatim.
    ///
    /// Internal failures are reported with a generic message; the detail
    /// stays in server-side logs.
    pub fn is_client_safe(&self) -> bool {
        matches!(
            self,
            RotaError::InvalidRequest(_) | RotaError::UpstreamUnavailable(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, RotaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable() {
        assert_eq!(RotaError::InvalidRequest("x".into()).code(), "INVALID_REQUEST");
        assert_eq!(RotaError::Internal("x".into()).code(), "INTERNAL_ERROR");
        assert_eq!(
            RotaError::UpstreamUnavailable("x".into()).code(),
            "UPSTREAM_UNAVAILABLE"
        );
    }

    #[test]
    fn internal_errors_are_not_client_safe() {
        assert!(!RotaError::Internal("stack detail".into()).is_client_safe());
        assert!(!RotaError::Config("bad".into()).is_client_safe());
        assert!(RotaError::InvalidRequest("scheduleIds is empty".into()).is_client_safe());
    }
}
