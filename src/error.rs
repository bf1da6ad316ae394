use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Error: {0}")]
    GenericError(String),

    // Spotify rejected the bearer token; the session credential gets
    // cleared and the user has to re-authenticate.
    #[error("Spotify rejected the access token - re-authentication required")]
    Unauthorized,

    #[error("Upstream returned status {status}")]
    UpstreamError { status: u16 },

    #[error("JSON error: {source}")]
    JSONError {
        #[from]
        source: serde_json::Error,
    },

    #[error("HTTP error: {source}")]
    HTTPError {
        #[from]
        source: reqwest::Error,
    },
}

// 401 means the token is expired/invalid; 403 means Spotify won't serve
// this user at all (e.g. app not allowlisted) - both require re-auth.
// Everything else non-success is a generic, retry-able upstream failure.
pub fn classify_status(status: StatusCode) -> AppError {
    match status.as_u16() {
        401 | 403 => AppError::Unauthorized,
        code => AppError::UpstreamError { status: code },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_auth_rejections() {
        assert!(matches!(
            classify_status(StatusCode::UNAUTHORIZED),
            AppError::Unauthorized
        ));
        assert!(matches!(
            classify_status(StatusCode::FORBIDDEN),
            AppError::Unauthorized
        ));
    }

    #[test]
    fn classify_other_failures() {
        assert!(matches!(
            classify_status(StatusCode::NOT_FOUND),
            AppError::UpstreamError { status: 404 }
        ));
        assert!(matches!(
            classify_status(StatusCode::TOO_MANY_REQUESTS),
            AppError::UpstreamError { status: 429 }
        ));
        assert!(matches!(
            classify_status(StatusCode::INTERNAL_SERVER_ERROR),
            AppError::UpstreamError { status: 500 }
        ));
    }
}
