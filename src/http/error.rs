use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::error::{AuthError, CartError, CatalogError, CheckoutError, OrderError};

/// Error type for HTTP handlers.
///
/// Bridges the domain errors onto status codes and the `{"error": "..."}`
/// body shape the API promises. Handlers return `Result<_, ApiError>` and
/// rely on the `From` impls below.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Server-side failures are logged in full but reported generically.
        let message = if self.status.is_server_error() {
            tracing::error!(status = %self.status, message = %self.message, "Internal server error");
            "Server error".to_string()
        } else {
            self.message
        };

        (self.status, Json(ErrorResponse { error: message })).into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        let status = match &err {
            AuthError::NotFound(_) => StatusCode::NOT_FOUND,
            AuthError::EmailTaken(_) | AuthError::InvalidCredentials | AuthError::ValidationError(_) => {
                StatusCode::BAD_REQUEST
            }
            AuthError::InvalidToken => StatusCode::FORBIDDEN,
            AuthError::ActorCommunicationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        // Validation messages are already user-facing; skip the enum prefix.
        let message = match err {
            AuthError::ValidationError(msg) => msg,
            other => other.to_string(),
        };
        Self::new(status, message)
    }
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::NotFound(_) => Self::not_found("Product not found"),
            CatalogError::ValidationError(msg) => Self::bad_request(msg),
            CatalogError::InsufficientStock { .. } => Self::bad_request(err.to_string()),
            CatalogError::ActorCommunicationError(msg) => Self::internal(msg),
        }
    }
}

impl From<CartError> for ApiError {
    fn from(err: CartError) -> Self {
        match err {
            CartError::ItemNotFound(_) => Self::not_found("Cart item not found"),
            CartError::InvalidQuantity(_) => Self::bad_request("Valid quantity is required"),
            CartError::ActorCommunicationError(msg) => Self::internal(msg),
        }
    }
}

impl From<OrderError> for ApiError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::ActorCommunicationError(msg) => Self::internal(msg),
        }
    }
}

impl From<CheckoutError> for ApiError {
    fn from(err: CheckoutError) -> Self {
        match &err {
            CheckoutError::EmptyCart
            | CheckoutError::ProductNotFound { .. }
            | CheckoutError::InsufficientStock { .. } => Self::bad_request(err.to_string()),
            CheckoutError::Persistence(_) => Self::internal(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checkout_errors_keep_their_shopper_facing_messages() {
        let err = ApiError::from(CheckoutError::InsufficientStock {
            product: "Widget".to_string(),
            available: 1,
            requested: 5,
        });
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(
            err.message,
            "Insufficient stock for Widget. Available: 1, Requested: 5"
        );

        let err = ApiError::from(CheckoutError::EmptyCart);
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "Cart is empty");
    }

    #[test]
    fn validation_errors_drop_the_domain_prefix() {
        let err = ApiError::from(AuthError::ValidationError(
            "Valid email is required".to_string(),
        ));
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "Valid email is required");
    }

    #[test]
    fn channel_failures_map_to_server_errors() {
        let err = ApiError::from(CartError::ActorCommunicationError("Actor closed".to_string()));
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
