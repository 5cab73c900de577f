//! Authorization redirect URL construction

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::RngCore;
use url::Url;

use crate::core::{BrokerError, ProviderConfig};
use crate::flow::pkce::CodeChallenge;

/// Generates an unguessable `state` value for CSRF protection.
///
/// The caller must persist it (via the state store) before redirecting;
/// the callback is rejected unless the returned value matches exactly.
pub fn generate_state() -> String {
	let mut bytes = [0u8; 32];
	rand::thread_rng().fill_bytes(&mut bytes);
	URL_SAFE_NO_PAD.encode(bytes)
}

/// Generates an OIDC nonce.
pub fn generate_nonce() -> String {
	generate_state()
}

/// Builds authorization redirect URLs from provider configuration.
pub struct AuthorizationFlow {
	config: ProviderConfig,
}

impl AuthorizationFlow {
	/// Creates a flow for one provider.
	pub fn new(config: ProviderConfig) -> Self {
		Self { config }
	}

	/// Composes the authorization URL.
	///
	/// # Arguments
	///
	/// * `authorization_endpoint` - resolved endpoint (static or discovered)
	/// * `state` - persisted CSRF state value
	/// * `nonce` - OIDC nonce, where the provider uses one
	/// * `code_challenge` - PKCE S256 challenge, when PKCE is enabled
	pub fn build_url(
		&self,
		authorization_endpoint: &str,
		state: &str,
		nonce: Option<&str>,
		code_challenge: Option<&CodeChallenge>,
	) -> Result<String, BrokerError> {
		let mut url = Url::parse(authorization_endpoint).map_err(|e| {
			BrokerError::Configuration(format!(
				"invalid authorization endpoint {authorization_endpoint}: {e}"
			))
		})?;

		{
			let mut query = url.query_pairs_mut();
			query
				.append_pair("response_type", "code")
				.append_pair("client_id", &self.config.client_id)
				.append_pair("redirect_uri", &self.config.redirect_uri)
				.append_pair("state", state);

			if !self.config.scopes.is_empty() {
				query.append_pair("scope", &self.config.scopes.join(" "));
			}
			if let Some(nonce) = nonce {
				query.append_pair("nonce", nonce);
			}
			if let Some(challenge) = code_challenge {
				query
					.append_pair("code_challenge", challenge.as_str())
					.append_pair("code_challenge_method", "S256");
			}
			for (key, value) in &self.config.extra_auth_params {
				query.append_pair(key, value);
			}
		}

		Ok(url.into())
	}
}
