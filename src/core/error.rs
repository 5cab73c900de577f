//! Broker error types and failure classification

use thiserror::Error;

/// Errors produced anywhere in the login broker.
///
/// Every variant is terminal for the current login attempt; nothing is
/// retried automatically.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BrokerError {
	/// Network error during HTTP requests
	#[error("Network error: {0}")]
	Network(String),

	/// Endpoint discovery failed (non-200 response or malformed document)
	#[error("Discovery error: {0}")]
	Discovery(String),

	/// Callback `state` parameter missing or not matching the stored value
	#[error("State mismatch on callback: {0}")]
	CsrfMismatch(String),

	/// Authorization-code or verifier exchange failed
	#[error("Token exchange error: {0}")]
	TokenExchange(String),

	/// Token refresh failed
	#[error("Token refresh error: {0}")]
	TokenRefresh(String),

	/// User-info endpoint returned a non-success status
	#[error("UserInfo request failed ({status}): {body}")]
	UserInfo { status: u16, body: String },

	/// Raw profile could not be mapped to a normalized identity
	#[error("Identity mapping error: {0}")]
	Mapping(String),

	/// Error reported by the provider itself (e.g. user denied consent)
	#[error("Provider error: {0}")]
	Provider(String),

	/// Broker or provider misconfiguration
	#[error("Configuration error: {0}")]
	Configuration(String),

	/// State store or user store failure
	#[error("Storage error: {0}")]
	Storage(String),

	/// The social identity is already linked to a different local account
	/// than the one currently logged in
	#[error("This identity is already linked to another account")]
	AlreadyLinkedToOtherAccount,

	/// An explicit link request targets an identity owned by another account
	#[error("This identity is already linked elsewhere")]
	IdentityAlreadyLinkedElsewhere,

	/// Policy allows neither logging in an unlinked identity nor creating
	/// an account for it
	#[error("Cannot log in with this identity and account creation is not allowed")]
	CannotAuthenticateOrCreate,
}

/// How a failed callback should surface to the host application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureDisposition {
	/// Redirect to a generic error page, bypassing failed-login handling.
	/// Used for infrastructure and protocol failures that are not
	/// meaningful login attempts.
	GenericRedirect,
	/// Route through the host's standard failed-login flow so lockout and
	/// notification logic observes the attempt.
	FailedLogin,
}

impl BrokerError {
	/// Classifies this error into one of the two host-visible behaviors.
	pub fn disposition(&self) -> FailureDisposition {
		match self {
			BrokerError::AlreadyLinkedToOtherAccount
			| BrokerError::IdentityAlreadyLinkedElsewhere
			| BrokerError::CannotAuthenticateOrCreate => FailureDisposition::FailedLogin,
			_ => FailureDisposition::GenericRedirect,
		}
	}
}

impl From<reqwest::Error> for BrokerError {
	fn from(error: reqwest::Error) -> Self {
		BrokerError::Network(error.to_string())
	}
}

impl From<serde_json::Error> for BrokerError {
	fn from(error: serde_json::Error) -> Self {
		BrokerError::Mapping(error.to_string())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_error_display() {
		let error = BrokerError::Network("connection timed out".to_string());
		assert_eq!(error.to_string(), "Network error: connection timed out");

		let error = BrokerError::UserInfo {
			status: 403,
			body: "forbidden".to_string(),
		};
		assert_eq!(error.to_string(), "UserInfo request failed (403): forbidden");
	}

	#[test]
	fn test_policy_failures_route_through_failed_login() {
		assert_eq!(
			BrokerError::AlreadyLinkedToOtherAccount.disposition(),
			FailureDisposition::FailedLogin
		);
		assert_eq!(
			BrokerError::IdentityAlreadyLinkedElsewhere.disposition(),
			FailureDisposition::FailedLogin
		);
		assert_eq!(
			BrokerError::CannotAuthenticateOrCreate.disposition(),
			FailureDisposition::FailedLogin
		);
	}

	#[test]
	fn test_protocol_failures_route_to_generic_redirect() {
		let errors = [
			BrokerError::Network("x".into()),
			BrokerError::Discovery("x".into()),
			BrokerError::CsrfMismatch("x".into()),
			BrokerError::TokenExchange("x".into()),
			BrokerError::UserInfo {
				status: 500,
				body: "x".into(),
			},
			BrokerError::Mapping("x".into()),
			BrokerError::Provider("x".into()),
			BrokerError::Configuration("x".into()),
			BrokerError::Storage("x".into()),
		];
		for error in errors {
			assert_eq!(error.disposition(), FailureDisposition::GenericRedirect);
		}
	}

	#[test]
	fn test_error_from_serde_json() {
		let json_error = serde_json::from_str::<serde_json::Value>("{not json}").unwrap_err();
		let broker_error: BrokerError = json_error.into();
		assert!(matches!(broker_error, BrokerError::Mapping(_)));
	}
}
