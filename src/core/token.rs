//! Token types for the OAuth2 and OAuth1 flows

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::core::BrokerError;

/// Wire-format token endpoint response (RFC 6749 §5.1).
///
/// Providers disagree on encoding: most return JSON, some (GitHub) return
/// a form-encoded body. [`TokenResponse::from_body`] handles both.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
	/// Access token
	pub access_token: String,

	/// Token type (almost always "Bearer"; GitHub sends "bearer")
	#[serde(default = "default_token_type")]
	pub token_type: String,

	/// Lifetime in seconds
	#[serde(skip_serializing_if = "Option::is_none")]
	pub expires_in: Option<i64>,

	/// Refresh token, where the provider issues one
	#[serde(skip_serializing_if = "Option::is_none")]
	pub refresh_token: Option<String>,

	/// Granted scope
	#[serde(skip_serializing_if = "Option::is_none")]
	pub scope: Option<String>,

	/// OIDC ID token (opaque to the broker)
	#[serde(skip_serializing_if = "Option::is_none")]
	pub id_token: Option<String>,
}

fn default_token_type() -> String {
	"Bearer".to_string()
}

impl TokenResponse {
	/// Decodes a token endpoint response body.
	///
	/// The encoding is selected by the response content type: anything
	/// declaring JSON is parsed as JSON, everything else as
	/// `application/x-www-form-urlencoded`.
	pub fn from_body(content_type: &str, body: &str) -> Result<Self, BrokerError> {
		if content_type.contains("json") {
			serde_json::from_str(body)
				.map_err(|e| BrokerError::TokenExchange(format!("invalid JSON token response: {e}")))
		} else {
			Self::from_form(body)
		}
	}

	fn from_form(body: &str) -> Result<Self, BrokerError> {
		let pairs: Vec<(String, String)> = serde_urlencoded::from_str(body)
			.map_err(|e| BrokerError::TokenExchange(format!("invalid form token response: {e}")))?;

		let mut response = TokenResponse {
			access_token: String::new(),
			token_type: default_token_type(),
			expires_in: None,
			refresh_token: None,
			scope: None,
			id_token: None,
		};
		for (key, value) in pairs {
			match key.as_str() {
				"access_token" => response.access_token = value,
				"token_type" => response.token_type = value,
				"expires_in" => response.expires_in = value.parse().ok(),
				"refresh_token" => response.refresh_token = Some(value),
				"scope" => response.scope = Some(value),
				"id_token" => response.id_token = Some(value),
				_ => {}
			}
		}

		if response.access_token.is_empty() {
			return Err(BrokerError::TokenExchange(
				"token response carried no access_token".to_string(),
			));
		}
		Ok(response)
	}
}

/// A stored credential, persisted in the session-scoped token store for
/// the lifetime of the authenticated session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OAuthToken {
	/// Access token
	pub access_token: String,

	/// Refresh token, if issued
	pub refresh_token: Option<String>,

	/// Absolute expiry, derived from `expires_in` at creation time
	pub expires_at: Option<DateTime<Utc>>,

	/// Token type
	pub token_type: String,

	/// OAuth1 token secret; `None` for OAuth2 tokens
	pub token_secret: Option<String>,

	/// When the token was obtained
	pub created: DateTime<Utc>,
}

impl OAuthToken {
	/// Builds a stored token from a token endpoint response, stamping the
	/// creation time.
	pub fn from_response(response: &TokenResponse) -> Self {
		let created = Utc::now();
		Self {
			access_token: response.access_token.clone(),
			refresh_token: response.refresh_token.clone(),
			expires_at: response.expires_in.map(|secs| created + Duration::seconds(secs)),
			token_type: response.token_type.clone(),
			token_secret: None,
			created,
		}
	}

	/// Builds a stored OAuth1 token/secret pair.
	pub fn oauth1(access_token: String, token_secret: String) -> Self {
		Self {
			access_token,
			refresh_token: None,
			expires_at: None,
			token_type: "oauth1".to_string(),
			token_secret: Some(token_secret),
			created: Utc::now(),
		}
	}

	/// Whether the token is past its expiry. Tokens without an expiry
	/// never report expired.
	pub fn is_expired(&self) -> bool {
		match self.expires_at {
			Some(at) => Utc::now() > at,
			None => false,
		}
	}
}
