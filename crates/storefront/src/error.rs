//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, AppError>`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::bag::BagError;
use crate::catalog::CatalogError;
use crate::checkout::CheckoutError;
use crate::store::StoreError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Catalog operation failed.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Bag operation failed.
    #[error("Bag error: {0}")]
    Bag(#[from] BagError),

    /// Checkout failed.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// Bag store failed outside a controller.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Catalog(CatalogError::UnknownCard(_)) | Self::Bag(BagError::NoSuchItem(_)) => {
                StatusCode::NOT_FOUND
            }
            Self::Bag(BagError::Empty)
            | Self::Checkout(CheckoutError::EmptyBag)
            | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Checkout(
                CheckoutError::SubmissionInProgress | CheckoutError::AlreadySubmitted,
            ) => StatusCode::CONFLICT,
            Self::Checkout(CheckoutError::Relay(_)) => StatusCode::BAD_GATEWAY,
            Self::Catalog(_)
            | Self::Bag(BagError::Store(_))
            | Self::Checkout(CheckoutError::Store(_))
            | Self::Store(_)
            | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show the client.
    fn public_message(&self) -> String {
        match self {
            Self::Catalog(CatalogError::UnknownCard(_)) => "Product not found".to_string(),
            Self::Bag(BagError::NoSuchItem(_)) => "Bag item not found".to_string(),
            Self::Bag(err @ BagError::Empty) => err.to_string(),
            Self::Checkout(
                err @ (CheckoutError::EmptyBag
                | CheckoutError::SubmissionInProgress
                | CheckoutError::AlreadySubmitted
                | CheckoutError::Relay(_)),
            ) => err.to_string(),
            Self::BadRequest(msg) => msg.clone(),
            // Don't expose internal error details to clients
            _ => "Internal server error".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Capture server errors to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        (status, self.public_message()).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::RelayError;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::BadRequest("invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: invalid input");

        let err = AppError::from(BagError::NoSuchItem(3));
        assert_eq!(err.to_string(), "Bag error: No bag item at position 3");
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            get_status(CatalogError::UnknownCard(99).into()),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(BagError::NoSuchItem(0).into()),
            StatusCode::NOT_FOUND
        );
        assert_eq!(get_status(BagError::Empty.into()), StatusCode::BAD_REQUEST);
        assert_eq!(
            get_status(CheckoutError::EmptyBag.into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(CheckoutError::SubmissionInProgress.into()),
            StatusCode::CONFLICT
        );
        assert_eq!(
            get_status(CheckoutError::AlreadySubmitted.into()),
            StatusCode::CONFLICT
        );
        assert_eq!(
            get_status(
                CheckoutError::Relay(RelayError::Rejected {
                    status: 500,
                    message: String::new(),
                })
                .into()
            ),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            get_status(AppError::Internal("test".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_details_are_hidden() {
        let err = AppError::Store(StoreError::Io(std::io::Error::other("disk on fire")));
        assert_eq!(err.public_message(), "Internal server error");

        let err = AppError::from(CheckoutError::Relay(RelayError::Rejected {
            status: 503,
            message: "upstream detail".to_string(),
        }));
        assert_eq!(
            err.public_message(),
            "There was an error processing your order. Please try again."
        );
    }
}
