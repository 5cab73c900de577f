//! Three-legged OAuth1 flow (RFC 5849)
//!
//! Only one provider still speaks OAuth1, so the whole legacy protocol
//! is isolated here: request token, user redirect, verifier exchange,
//! and HMAC-SHA1 request signing for API calls.

use std::collections::HashMap;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::Utc;
use hmac::{Hmac, Mac};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use rand::RngCore;
use sha1::Sha1;
use url::Url;

use crate::core::{BrokerError, OAuth1Config, OAuth2Client, ProviderConfig, RawProfile};

type HmacSha1 = Hmac<Sha1>;

/// RFC 3986 unreserved characters stay bare; everything else is encoded.
const OAUTH1_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
	.remove(b'-')
	.remove(b'.')
	.remove(b'_')
	.remove(b'~');

fn encode(value: &str) -> String {
	utf8_percent_encode(value, OAUTH1_ENCODE_SET).to_string()
}

/// Temporary credentials from the request-token step.
#[derive(Debug, Clone)]
pub struct RequestToken {
	pub token: String,
	pub secret: String,
}

/// Access credentials from the verifier exchange.
#[derive(Debug, Clone)]
pub struct AccessToken {
	pub token: String,
	pub secret: String,
}

/// OAuth1 three-legged flow handler.
pub struct OAuth1Flow {
	client: OAuth2Client,
	config: ProviderConfig,
	endpoints: OAuth1Config,
}

impl OAuth1Flow {
	/// Creates an OAuth1 flow; fails when the config has no OAuth1
	/// endpoint section.
	pub fn new(client: OAuth2Client, config: ProviderConfig) -> Result<Self, BrokerError> {
		let endpoints = config.oauth1.clone().ok_or_else(|| {
			BrokerError::Configuration(format!(
				"provider {} has no OAuth1 endpoints",
				config.name
			))
		})?;
		Ok(Self {
			client,
			config,
			endpoints,
		})
	}

	/// Obtains a request token bound to the callback URL.
	pub async fn request_token(&self) -> Result<RequestToken, BrokerError> {
		let extra = [(
			"oauth_callback".to_string(),
			self.config.redirect_uri.clone(),
		)];
		let body = self
			.signed_request(
				reqwest::Method::POST,
				&self.endpoints.request_token_endpoint,
				None,
				&extra,
			)
			.await?;

		let fields = parse_form_fields(&body);
		let token = fields.get("oauth_token").cloned().ok_or_else(|| {
			BrokerError::TokenExchange("request token response missing oauth_token".to_string())
		})?;
		let secret = fields.get("oauth_token_secret").cloned().ok_or_else(|| {
			BrokerError::TokenExchange(
				"request token response missing oauth_token_secret".to_string(),
			)
		})?;
		Ok(RequestToken { token, secret })
	}

	/// The user-facing authenticate URL for a request token.
	pub fn authenticate_url(&self, request_token: &RequestToken) -> Result<String, BrokerError> {
		let mut url = Url::parse(&self.endpoints.authenticate_endpoint).map_err(|e| {
			BrokerError::Configuration(format!("invalid authenticate endpoint: {e}"))
		})?;
		url.query_pairs_mut()
			.append_pair("oauth_token", &request_token.token);
		Ok(url.into())
	}

	/// Exchanges the callback verifier for access credentials.
	pub async fn access_token(
		&self,
		request_token: &str,
		request_token_secret: &str,
		verifier: &str,
	) -> Result<AccessToken, BrokerError> {
		let extra = [("oauth_verifier".to_string(), verifier.to_string())];
		let body = self
			.signed_request(
				reqwest::Method::POST,
				&self.endpoints.access_token_endpoint,
				Some((request_token, request_token_secret)),
				&extra,
			)
			.await?;

		let fields = parse_form_fields(&body);
		let token = fields.get("oauth_token").cloned().ok_or_else(|| {
			BrokerError::TokenExchange("access token response missing oauth_token".to_string())
		})?;
		let secret = fields.get("oauth_token_secret").cloned().ok_or_else(|| {
			BrokerError::TokenExchange(
				"access token response missing oauth_token_secret".to_string(),
			)
		})?;
		Ok(AccessToken { token, secret })
	}

	/// Fetches the signed credential-verification profile.
	pub async fn fetch_profile(&self, access: &AccessToken) -> Result<RawProfile, BrokerError> {
		let body = self
			.signed_request(
				reqwest::Method::GET,
				&self.endpoints.verify_credentials_endpoint,
				Some((&access.token, &access.secret)),
				&[],
			)
			.await?;
		let value = serde_json::from_str(&body)
			.map_err(|e| BrokerError::Mapping(format!("profile body was not JSON: {e}")))?;
		Ok(RawProfile::new(value))
	}

	/// Sends one signed request and returns the response body.
	///
	/// Non-200 responses are parsed for a descriptive provider error
	/// (top-level `error` string, or the first entry of an `errors`
	/// array) and always fail the attempt.
	async fn signed_request(
		&self,
		method: reqwest::Method,
		url: &str,
		token: Option<(&str, &str)>,
		extra_oauth_params: &[(String, String)],
	) -> Result<String, BrokerError> {
		let header = self.authorization_header(method.as_str(), url, token, extra_oauth_params)?;

		let response = self
			.client
			.client()
			.request(method, url)
			.header("Authorization", header)
			.send()
			.await
			.map_err(|e| BrokerError::Network(e.to_string()))?;

		let status = response.status().as_u16();
		let body = response
			.text()
			.await
			.map_err(|e| BrokerError::Network(e.to_string()))?;

		if status != 200 {
			return Err(BrokerError::TokenExchange(describe_oauth1_error(
				status, &body,
			)));
		}
		Ok(body)
	}

	/// Builds the `OAuth ...` authorization header for a request.
	fn authorization_header(
		&self,
		method: &str,
		url: &str,
		token: Option<(&str, &str)>,
		extra_oauth_params: &[(String, String)],
	) -> Result<String, BrokerError> {
		let parsed = Url::parse(url)
			.map_err(|e| BrokerError::Configuration(format!("invalid OAuth1 endpoint {url}: {e}")))?;

		let mut nonce_bytes = [0u8; 16];
		rand::thread_rng().fill_bytes(&mut nonce_bytes);
		let nonce: String = nonce_bytes.iter().map(|b| format!("{b:02x}")).collect();

		let mut oauth_params: Vec<(String, String)> = vec![
			("oauth_consumer_key".to_string(), self.config.client_id.clone()),
			("oauth_nonce".to_string(), nonce),
			("oauth_signature_method".to_string(), "HMAC-SHA1".to_string()),
			(
				"oauth_timestamp".to_string(),
				Utc::now().timestamp().to_string(),
			),
			("oauth_version".to_string(), "1.0".to_string()),
		];
		if let Some((token, _)) = token {
			oauth_params.push(("oauth_token".to_string(), token.to_string()));
		}
		oauth_params.extend_from_slice(extra_oauth_params);

		let token_secret = token.map(|(_, secret)| secret).unwrap_or("");
		let signature = self.sign(method, &parsed, &oauth_params, token_secret);
		oauth_params.push(("oauth_signature".to_string(), signature));

		let header_params: Vec<String> = oauth_params
			.iter()
			.map(|(key, value)| format!("{}=\"{}\"", encode(key), encode(value)))
			.collect();
		Ok(format!("OAuth {}", header_params.join(", ")))
	}

	/// HMAC-SHA1 signature over the RFC 5849 base string.
	fn sign(
		&self,
		method: &str,
		url: &Url,
		oauth_params: &[(String, String)],
		token_secret: &str,
	) -> String {
		// Signature params: oauth params plus the URL query pairs,
		// sorted by encoded key then encoded value.
		let mut pairs: Vec<(String, String)> = oauth_params
			.iter()
			.map(|(k, v)| (encode(k), encode(v)))
			.collect();
		for (key, value) in url.query_pairs() {
			pairs.push((encode(&key), encode(&value)));
		}
		pairs.sort();

		let param_string = pairs
			.iter()
			.map(|(k, v)| format!("{k}={v}"))
			.collect::<Vec<_>>()
			.join("&");

		let mut base_url = url.clone();
		base_url.set_query(None);
		base_url.set_fragment(None);
		let base_string = format!(
			"{}&{}&{}",
			method.to_uppercase(),
			encode(base_url.as_str()),
			encode(&param_string)
		);

		let signing_key = format!(
			"{}&{}",
			encode(&self.config.client_secret),
			encode(token_secret)
		);
		let mut mac = HmacSha1::new_from_slice(signing_key.as_bytes())
			.expect("HMAC accepts any key length");
		mac.update(base_string.as_bytes());
		STANDARD.encode(mac.finalize().into_bytes())
	}
}

fn parse_form_fields(body: &str) -> HashMap<String, String> {
	serde_urlencoded::from_str::<Vec<(String, String)>>(body)
		.map(|pairs| pairs.into_iter().collect())
		.unwrap_or_default()
}

/// Extracts a human-readable message from an OAuth1 error body.
fn describe_oauth1_error(status: u16, body: &str) -> String {
	if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
		if let Some(message) = value.get("error").and_then(|v| v.as_str()) {
			return format!("provider rejected the request ({status}): {message}");
		}
		if let Some(message) = value
			.get("errors")
			.and_then(|v| v.get(0))
			.and_then(|e| e.get("message"))
			.and_then(|m| m.as_str())
		{
			return format!("provider rejected the request ({status}): {message}");
		}
	}
	format!("provider rejected the request ({status})")
}
