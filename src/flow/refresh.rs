//! OAuth2 token refresh flow
//!
//! Refreshes access tokens using the `refresh_token` grant type.

use crate::core::{
	BrokerError, ClientAuthMethod, OAuth2Client, ProviderConfig, TokenResponse,
};

/// Token refresh flow handler.
pub struct RefreshFlow {
	client: OAuth2Client,
	config: ProviderConfig,
	client_auth: ClientAuthMethod,
}

impl RefreshFlow {
	/// Creates a token refresh flow.
	pub fn new(client: OAuth2Client, config: ProviderConfig, client_auth: ClientAuthMethod) -> Self {
		Self {
			client,
			config,
			client_auth,
		}
	}

	/// Refreshes an access token using a refresh token.
	///
	/// Same error handling as the code exchange: statuses outside
	/// `[200, 400)` and undecodable bodies fail the attempt, and nothing
	/// is retried.
	pub async fn refresh(
		&self,
		token_endpoint: &str,
		refresh_token: &str,
	) -> Result<TokenResponse, BrokerError> {
		let mut params: Vec<(&str, &str)> = vec![
			("grant_type", "refresh_token"),
			("refresh_token", refresh_token),
		];

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
			return Err(BrokerError::TokenRefresh(format!(
				"token refresh failed ({status}): {body}"
			)));
		}

		TokenResponse::from_body(&content_type, &body)
			.map_err(|e| BrokerError::TokenRefresh(e.to_string()))
	}
}
