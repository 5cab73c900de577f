//! Provider configuration types

use serde::{Deserialize, Serialize};

/// Per-provider configuration.
///
/// Exactly one of the protocol sections (`oidc`, `oauth2`, `oauth1`) is
/// expected to be set; constructors in [`crate::providers`] guarantee
/// this. The struct is immutable after construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
	/// Provider name (e.g. "google", "github"); unique within a broker
	pub name: String,

	/// OAuth client ID (OAuth1: consumer key)
	pub client_id: String,

	/// OAuth client secret (OAuth1: consumer secret)
	pub client_secret: String,

	/// Redirect URI registered with the provider
	pub redirect_uri: String,

	/// Requested scopes, in order
	pub scopes: Vec<String>,

	/// OIDC discovery configuration
	#[serde(skip_serializing_if = "Option::is_none")]
	pub oidc: Option<OidcConfig>,

	/// Static OAuth2 endpoints
	#[serde(skip_serializing_if = "Option::is_none")]
	pub oauth2: Option<OAuth2Config>,

	/// OAuth1 endpoints (three-legged flow)
	#[serde(skip_serializing_if = "Option::is_none")]
	pub oauth1: Option<OAuth1Config>,

	/// Extra query parameters appended to the authorization URL
	/// (e.g. Twitch requires a `claims` parameter)
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub extra_auth_params: Vec<(String, String)>,

	/// Extra body parameters sent with the token exchange
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub extra_token_params: Vec<(String, String)>,
}

/// OIDC discovery configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OidcConfig {
	/// Full URL of the `.well-known/openid-configuration` document
	pub discovery_url: String,

	/// Send a nonce with the authorization request
	#[serde(default = "default_use_nonce")]
	pub use_nonce: bool,
}

/// Static OAuth2 endpoint configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OAuth2Config {
	/// Authorization endpoint URL
	pub authorization_endpoint: String,

	/// Token endpoint URL
	pub token_endpoint: String,

	/// UserInfo endpoint URL (optional)
	#[serde(skip_serializing_if = "Option::is_none")]
	pub userinfo_endpoint: Option<String>,
}

/// OAuth1 endpoint configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OAuth1Config {
	/// Request-token endpoint URL
	pub request_token_endpoint: String,

	/// User-facing authenticate/authorize URL
	pub authenticate_endpoint: String,

	/// Access-token endpoint URL
	pub access_token_endpoint: String,

	/// Credential-verification (profile) endpoint URL
	pub verify_credentials_endpoint: String,
}

fn default_use_nonce() -> bool {
	true
}

impl ProviderConfig {
	/// Check if this provider uses OIDC discovery
	pub fn is_oidc(&self) -> bool {
		self.oidc.is_some()
	}

	/// Check if this provider uses static OAuth2 endpoints
	pub fn is_oauth2_only(&self) -> bool {
		self.oauth2.is_some() && self.oidc.is_none()
	}

	/// Check if this provider uses the OAuth1 three-legged flow
	pub fn is_oauth1(&self) -> bool {
		self.oauth1.is_some()
	}
}

/// Per-provider account-linking policy.
///
/// All flags default to off; a deployment opts into each relaxation
/// explicitly. These are read-only inputs to the linking engine.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct LinkPolicy {
	/// Allow logging into an existing account whose email matches an
	/// unlinked identity
	pub allow_login_when_unlinked: bool,

	/// Allow creating a new local account for an unknown identity,
	/// subject to the host's registration toggle
	pub allow_account_creation: bool,

	/// Create accounts even when the host has registration disabled
	pub force_account_creation: bool,

	/// Accept an email the provider did not verify, both for matching an
	/// existing account and for marking a created account verified
	pub allow_verification_bypass: bool,
}
