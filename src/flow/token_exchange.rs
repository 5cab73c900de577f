//! Authorization-code token exchange

use tracing::debug;

use crate::core::{
	BrokerError, ClientAuthMethod, OAuth2Client, ProviderConfig, TokenResponse,
};
use crate::flow::pkce::CodeVerifier;

/// Exchanges authorization codes for tokens at a provider's token
/// endpoint.
pub struct TokenExchangeFlow {
	client: OAuth2Client,
	config: ProviderConfig,
	client_auth: ClientAuthMethod,
}

impl TokenExchangeFlow {
	/// Creates a token exchange flow.
	pub fn new(client: OAuth2Client, config: ProviderConfig, client_auth: ClientAuthMethod) -> Self {
		Self {
			client,
			config,
			client_auth,
		}
	}

	/// Performs the `authorization_code` grant.
	///
	/// Client credentials go in the Basic authorization header or the
	/// request body depending on the provider. Both JSON and
	/// form-encoded response bodies are accepted; any status outside
	/// `[200, 400)` fails the attempt.
	pub async fn exchange(
		&self,
		token_endpoint: &str,
		code: &str,
		code_verifier: Option<&CodeVerifier>,
	) -> Result<TokenResponse, BrokerError> {
		let mut params: Vec<(&str, &str)> = vec![
			("grant_type", "authorization_code"),
			("code", code),
			("redirect_uri", &self.config.redirect_uri),
		];
		if let Some(verifier) = code_verifier {
			params.push(("code_verifier", verifier.as_str()));
		}
		for (key, value) in &self.config.extra_token_params {
			params.push((key.as_str(), value.as_str()));
		}

		let mut request = self
			.client
			.client()
			.post(token_endpoint)
			.header("Accept", "application/json");
		match self.client_auth {
			ClientAuthMethod::BasicHeader => {
				request = request.basic_auth(&self.config.client_id, Some(&self.config.client_secret));
			}
			ClientAuthMethod::RequestBody => {
				params.push(("client_id", &self.config.client_id));
				params.push(("client_secret", &self.config.client_secret));
			}
		}

		let response = request
			.form(&params)
			.send()
			.await
			.map_err(|e| BrokerError::Network(e.to_string()))?;

		let status = response.status().as_u16();
		let content_type = response
			.headers()
			.get("content-type")
			.and_then(|v| v.to_str().ok())
			.unwrap_or("")
			.to_string();
		let body = response
			.text()
			.await
			.map_err(|e| BrokerError::Network(e.to_string()))?;

		if !(200..400).contains(&status) {
			debug!(provider = %self.config.name, status, "token exchange rejected");
			return Err(BrokerError::TokenExchange(format!(
				"token endpoint answered {status}: {body}"
			)));
		}

		debug!(provider = %self.config.name, "token exchange succeeded");
		TokenResponse::from_body(&content_type, &body)
	}
}
