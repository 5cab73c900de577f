//! User-info endpoint client

use tracing::debug;

use crate::core::{BrokerError, OAuth2Client, RawProfile};

/// Fetches provider user-info payloads with bearer authorization.
#[derive(Clone)]
pub struct UserInfoClient {
	client: OAuth2Client,
}

impl UserInfoClient {
	/// Creates a user-info client.
	pub fn new(client: OAuth2Client) -> Self {
		Self { client }
	}

	/// GETs the user-info endpoint with `Authorization: Bearer <token>`.
	///
	/// Any status of 300 or above fails the attempt with the status and
	/// body attached; transient and permanent failures are not
	/// distinguished and nothing is retried. The body is JSON-decoded
	/// but otherwise opaque at this layer.
	pub async fn fetch(
		&self,
		userinfo_endpoint: &str,
		access_token: &str,
	) -> Result<RawProfile, BrokerError> {
		let response = self
			.client
			.client()
			.get(userinfo_endpoint)
			.bearer_auth(access_token)
			.header("Accept", "application/json")
			.send()
			.await
			.map_err(|e| BrokerError::Network(e.to_string()))?;

		let status = response.status().as_u16();
		let body = response
			.text()
			.await
			.map_err(|e| BrokerError::Network(e.to_string()))?;

		if status >= 300 {
			debug!(status, "userinfo request rejected");
			return Err(BrokerError::UserInfo { status, body });
		}

		let value = serde_json::from_str(&body)
			.map_err(|e| BrokerError::Mapping(format!("profile body was not JSON: {e}")))?;
		Ok(RawProfile::new(value))
	}
}
