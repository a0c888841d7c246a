use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt;

/// Application-specific error types.
#[derive(Debug, Clone)]
pub enum AppError {
    /// Malformed or missing input (user-correctable).
    Validation(String),
    /// Credential mismatch. The message is deliberately generic so a failure
    /// never reveals whether the email matched.
    Auth(String),
    /// Required collection or record absent upstream.
    NotFound(String),
    /// The external document store failed for any other reason.
    Upstream {
        /// Summary of what failed.
        message: String,
        /// Diagnostic detail (upstream status/body), surfaced to the caller.
        details: Option<String>,
    },
    /// Error with context chain for better debugging.
    WithContext {
        /// The underlying source of the error.
        source: Box<AppError>,
        /// Additional context message.
        context: String,
    },
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Validation(msg) => write!(f, "Validation error: {}", msg),
            AppError::Auth(msg) => write!(f, "Authentication failed: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::Upstream { message, details } => match details {
                Some(d) => write!(f, "Upstream error: {} ({})", message, d),
                None => write!(f, "Upstream error: {}", message),
            },
            AppError::WithContext { source, context } => {
                write!(f, "{}: {}", context, source)
            }
        }
    }
}

impl IntoResponse for AppError {
    /// Converts the error into an HTTP response.
    ///
    /// Maps each error variant to an appropriate HTTP status code and JSON body.
    /// Every failure returns a structured message; nothing crashes the request
    /// handling path.
    fn into_response(self) -> Response {
        match self {
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": msg }))).into_response()
            }
            AppError::Auth(msg) => {
                tracing::warn!("Authentication failure: {}", msg);
                (StatusCode::UNAUTHORIZED, Json(json!({ "error": msg }))).into_response()
            }
            AppError::NotFound(msg) => {
                (StatusCode::NOT_FOUND, Json(json!({ "error": msg }))).into_response()
            }
            AppError::Upstream { message, details } => {
                tracing::error!("Upstream store error: {} ({:?})", message, details);
                let mut body = serde_json::Map::new();
                body.insert("error".to_string(), json!(message));
                if let Some(details) = details {
                    body.insert("details".to_string(), json!(details));
                }
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(serde_json::Value::Object(body)),
                )
                    .into_response()
            }
            AppError::WithContext { source, context } => {
                tracing::error!("Error with context: {} -> {}", context, source);
                match *source {
                    // The context labels the operation that failed; the
                    // underlying store message and diagnostic detail are
                    // surfaced rather than swallowed.
                    AppError::Upstream { message, details } => {
                        let mut body = serde_json::Map::new();
                        body.insert("error".to_string(), json!(context));
                        body.insert("message".to_string(), json!(message));
                        if let Some(details) = details {
                            body.insert("details".to_string(), json!(details));
                        }
                        (
                            StatusCode::INTERNAL_SERVER_ERROR,
                            Json(serde_json::Value::Object(body)),
                        )
                            .into_response()
                    }
                    // Delegate to underlying error's response
                    other => other.into_response(),
                }
            }
        }
    }
}

impl From<reqwest::Error> for AppError {
    /// Converts a transport-level `reqwest::Error` into an `AppError`.
    fn from(err: reqwest::Error) -> Self {
        AppError::Upstream {
            message: err.to_string(),
            details: None,
        }
    }
}

/// Extension trait for adding context to errors.
/// Similar to `anyhow::Context` but for our `AppError` type.
pub trait ResultExt<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T, AppError>;

    /// Add context lazily (only evaluated on error).
    #[allow(dead_code)]
    fn with_context<F>(self, f: F) -> Result<T, AppError>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for Result<T, AppError> {
    fn context(self, context: impl Into<String>) -> Result<T, AppError> {
        self.map_err(|e| AppError::WithContext {
            source: Box::new(e),
            context: context.into(),
        })
    }

    fn with_context<F>(self, f: F) -> Result<T, AppError>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| AppError::WithContext {
            source: Box::new(e),
            context: f(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_context_chain() {
        let err: Result<(), AppError> = Err(AppError::Upstream {
            message: "store unreachable".to_string(),
            details: None,
        });
        let err = err.context("Failed to create student").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Failed to create student: Upstream error: store unreachable"
        );
    }

    #[test]
    fn auth_error_display_keeps_message() {
        let err = AppError::Auth("Invalid email or password".to_string());
        assert_eq!(
            err.to_string(),
            "Authentication failed: Invalid email or password"
        );
    }
}
