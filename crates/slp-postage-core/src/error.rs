//! Error types for postage resolution and transaction assembly.

/// Result type
pub type Result<T> = std::result::Result<T, Error>;

/// Postage core errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No cached, non-banned post office offers postage for the token
    #[error("No post office offers postage for token {0}")]
    NoPostageOffer(String),

    /// The size/dust classification and the output shape disagree.
    /// This is a logic defect, not a recoverable condition.
    #[error("Unhandled output shape: {0}")]
    UnhandledShape(String),

    /// The wallet could not supply enough token value
    #[error("Insufficient token funds: {0}")]
    InsufficientTokenFunds(String),

    /// Arithmetic overflow while combining amounts
    #[error("Amount overflow: {0}")]
    AmountOverflow(String),

    /// Malformed or unexpected token message
    #[error("Invalid token message: {0}")]
    InvalidMessage(String),
}

impl Error {
    /// Check if error is a user-facing error (vs internal logic defect)
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Error::NoPostageOffer(_) | Error::InsufficientTokenFunds(_)
        )
    }

    /// Get user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Error::NoPostageOffer(_) => {
                "No post office currently accepts this token as postage. Please try again later or fund the transaction yourself.".to_string()
            }
            Error::InsufficientTokenFunds(_) => {
                "You don't have enough of this token to cover the transfer and its postage.".to_string()
            }
            _ => self.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_error_detection() {
        assert!(Error::NoPostageOffer("test".to_string()).is_user_error());
        assert!(Error::InsufficientTokenFunds("test".to_string()).is_user_error());
        assert!(!Error::UnhandledShape("test".to_string()).is_user_error());
        assert!(!Error::AmountOverflow("test".to_string()).is_user_error());
    }

    #[test]
    fn test_user_messages() {
        let error = Error::NoPostageOffer("details".to_string());
        assert!(error.user_message().contains("post office"));

        let error = Error::InsufficientTokenFunds("details".to_string());
        assert!(error.user_message().contains("enough of this token"));
    }
}
