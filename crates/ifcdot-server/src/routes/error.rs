//! Error responses for the API.

use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use ifcdot_core::Error;
use tracing::error;

const UNREADABLE_MODEL: &str = "The file could not be read as an IFC model.";
const INTERNAL: &str = "Something went wrong while building the graph.";
const DOWNLOAD_FAILED: &str = "The example model could not be downloaded.";
const TOO_LARGE: &str = "The file exceeds the upload size limit.";

/// API error, rendered as `{"error": message}`.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    /// The upload is not a readable model. Detail is logged, not returned.
    Unprocessable,
    TooLarge,
    BadGateway,
    Internal,
}

impl ApiError {
    fn parts(&self) -> (StatusCode, &str) {
        match self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            Self::Unprocessable => (StatusCode::UNPROCESSABLE_ENTITY, UNREADABLE_MODEL),
            Self::TooLarge => (StatusCode::PAYLOAD_TOO_LARGE, TOO_LARGE),
            Self::BadGateway => (StatusCode::BAD_GATEWAY, DOWNLOAD_FAILED),
            Self::Internal => (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL),
        }
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match err {
            Error::InvalidInput(msg) => Self::BadRequest(msg),
            Error::NotFound(msg) => Self::NotFound(msg),
            Error::Parse { .. } | Error::Archive(_) => {
                error!("Model could not be loaded: {}", err);
                Self::Unprocessable
            }
            Error::Http(_) => {
                error!("Example download failed: {}", err);
                Self::BadGateway
            }
            other => {
                error!("Graph request failed: {}", other);
                Self::Internal
            }
        }
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            Self::TooLarge
        } else {
            Self::BadRequest(err.body_text())
        }
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(err: tokio::task::JoinError) -> Self {
        error!("Graph build task failed: {}", err);
        Self::Internal
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = self.parts();
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let parse: ApiError = Error::parse(12, "expected ')'").into();
        assert_eq!(parse.parts(), (StatusCode::UNPROCESSABLE_ENTITY, UNREADABLE_MODEL));

        let input: ApiError = Error::InvalidInput("not an entity id: \"x\"".into()).into();
        assert_eq!(input.parts().0, StatusCode::BAD_REQUEST);

        let io: ApiError = Error::Io(std::io::Error::other("disk")).into();
        assert_eq!(io.parts(), (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL));
    }

    #[test]
    fn test_parse_detail_is_not_exposed() {
        let err: ApiError = Error::parse(3, "secret detail").into();
        assert!(!err.parts().1.contains("secret"));
    }
}
