//! Errors raised while fulfilling a conversation turn.
//!
//! Every variant aborts the current stage before the trip context is
//! rewritten, so a failed turn always leaves the inbound snapshot intact.

use thiserror::Error;

use crate::domain::foundation::ErrorCode;
use crate::ports::ProviderError;

/// Failure of a single stage.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FulfillmentError {
    /// The webhook payload lacks a required field or carries an unreadable one.
    #[error("Malformed webhook payload: {0}")]
    ClientPayload(String),

    /// The rider's account is not linked, so there is no token for the provider.
    #[error("Webhook payload carries no user access token")]
    MissingAccessToken,

    /// An address could not be turned into coordinates.
    #[error("Could not resolve address '{address}': {reason}")]
    Resolution { address: String, reason: String },

    /// A field an earlier stage should have written is absent.
    #[error("Trip context is missing '{field}'")]
    MissingContext { field: &'static str },

    /// An action parameter has an unusable value.
    #[error("Invalid value for '{field}': {reason}")]
    InvalidArgument { field: &'static str, reason: String },

    /// The ride provider failed or rejected the call.
    #[error("Ride provider error: {0}")]
    Provider(#[from] ProviderError),
}

impl FulfillmentError {
    pub fn client_payload(message: impl Into<String>) -> Self {
        FulfillmentError::ClientPayload(message.into())
    }

    pub fn resolution(address: impl Into<String>, reason: impl Into<String>) -> Self {
        FulfillmentError::Resolution {
            address: address.into(),
            reason: reason.into(),
        }
    }

    pub fn missing_context(field: &'static str) -> Self {
        FulfillmentError::MissingContext { field }
    }

    pub fn invalid_argument(field: &'static str, reason: impl Into<String>) -> Self {
        FulfillmentError::InvalidArgument {
            field,
            reason: reason.into(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            FulfillmentError::ClientPayload(_) => ErrorCode::InvalidPayload,
            FulfillmentError::MissingAccessToken => ErrorCode::MissingAccessToken,
            FulfillmentError::Resolution { .. } => ErrorCode::AddressNotResolved,
            FulfillmentError::MissingContext { .. } => ErrorCode::MissingContextField,
            FulfillmentError::InvalidArgument { .. } => ErrorCode::InvalidArgument,
            FulfillmentError::Provider(err) => err.code(),
        }
    }

    /// Apology spoken to the rider when the turn fails.
    pub fn user_message(&self) -> String {
        match self {
            FulfillmentError::ClientPayload(_) => {
                "Sorry, I couldn't understand that request. Please try again.".to_string()
            }
            FulfillmentError::MissingAccessToken => {
                "Please link your Uber account so I can book rides for you.".to_string()
            }
            FulfillmentError::Resolution { address, .. } => format!(
                "Sorry, I couldn't find '{}'. Could you give me a more specific address?",
                address
            ),
            FulfillmentError::MissingContext { .. } => {
                "Sorry, I lost track of your trip. Let's start over: where are you going?"
                    .to_string()
            }
            FulfillmentError::InvalidArgument { field, .. } => format!(
                "Sorry, that isn't a valid {}. Could you say it again?",
                field.replace('_', " ")
            ),
            FulfillmentError::Provider(ProviderError::Rejected { message, .. }) => format!(
                "Sorry, Uber couldn't complete that request: {}",
                message
            ),
            FulfillmentError::Provider(_) => {
                "Sorry, Uber isn't responding right now. Please try again in a moment."
                    .to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_context_displays_field() {
        let err = FulfillmentError::missing_context("fare_id");
        assert_eq!(err.to_string(), "Trip context is missing 'fare_id'");
        assert_eq!(err.code(), ErrorCode::MissingContextField);
    }

    #[test]
    fn provider_errors_keep_provider_code() {
        let err: FulfillmentError = ProviderError::rejected(422, "fare expired").into();
        assert_eq!(err.code(), ErrorCode::ProviderRejected);
        assert!(err.user_message().contains("fare expired"));

        let err: FulfillmentError = ProviderError::Timeout { timeout_secs: 10 }.into();
        assert_eq!(err.code(), ErrorCode::ProviderTimeout);
    }

    #[test]
    fn invalid_argument_message_names_field() {
        let err = FulfillmentError::invalid_argument("seat_count", "expected a whole number");
        assert_eq!(
            err.user_message(),
            "Sorry, that isn't a valid seat count. Could you say it again?"
        );
    }

    #[test]
    fn resolution_message_quotes_address() {
        let err = FulfillmentError::resolution("Nowhere Lane", "no results");
        assert!(err.user_message().contains("Nowhere Lane"));
        assert_eq!(err.code(), ErrorCode::AddressNotResolved);
    }
}
