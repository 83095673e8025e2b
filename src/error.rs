use reqwest::StatusCode;
use thiserror::Error;

/// Errors that can occur when talking to the marketplace API.
///
/// Query methods that return raw JSON never produce these; they collapse every
/// failure into `None`. Only construction and item-detail extraction fail loudly.
#[derive(Debug, Error)]
pub enum MarketplaceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("token endpoint answered {status} without an access_token")]
    MissingAccessToken { status: StatusCode },

    #[error("no result from {endpoint}")]
    NoResult { endpoint: String },

    #[error("response from {endpoint} is missing field `{field}`")]
    MissingField {
        endpoint: String,
        field: &'static str,
    },

    #[error("response from {endpoint} has field `{field}` of an unexpected type")]
    UnexpectedType {
        endpoint: String,
        field: &'static str,
    },

    #[error("missing required environment variables: {0}")]
    MissingEnv(String),
}

pub type Result<T> = std::result::Result<T, MarketplaceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_display() {
        let err = MarketplaceError::MissingField {
            endpoint: "items/MLB1".to_string(),
            field: "sold_quantity",
        };
        assert_eq!(
            err.to_string(),
            "response from items/MLB1 is missing field `sold_quantity`"
        );
    }

    #[test]
    fn test_missing_token_display() {
        let err = MarketplaceError::MissingAccessToken {
            status: StatusCode::BAD_REQUEST,
        };
        assert_eq!(
            err.to_string(),
            "token endpoint answered 400 Bad Request without an access_token"
        );
    }
}
