//! Mock OAuth2/OIDC/OAuth1 server for integration tests

use bytes::Bytes;
use http_body_util::Full;
use hyper::{Method, StatusCode};
use hyper::{Request, Response, body::Incoming};
use hyper_util::rt::TokioIo;
use janus_auth::TokenResponse;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

/// Error simulation mode
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum ErrorMode {
	Success,
	NetworkError,
	InvalidResponse,
	Unauthorized,
	ServerError,
}

/// Mock server state
struct MockServerState {
	error_mode: ErrorMode,
	token_response: Option<TokenResponse>,
	token_form_encoded: bool,
	userinfo_response: Option<serde_json::Value>,
	discovery_response: Option<String>,
	userinfo_enabled: bool,
	request_counts: HashMap<String, usize>,
}

/// Mock OAuth2/OIDC/OAuth1 server
pub struct MockOAuth2Server {
	state: Arc<Mutex<MockServerState>>,
	local_addr: SocketAddr,
}

impl MockOAuth2Server {
	/// Create a new mock server on an ephemeral port
	pub async fn new() -> Self {
		let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
		let local_addr = listener.local_addr().unwrap();

		let state = Arc::new(Mutex::new(MockServerState {
			error_mode: ErrorMode::Success,
			token_response: None,
			token_form_encoded: false,
			userinfo_response: None,
			discovery_response: None,
			userinfo_enabled: true,
			request_counts: HashMap::new(),
		}));

		let state_clone = state.clone();
		let base_url = format!("http://{}", local_addr);
		tokio::spawn(async move {
			let state = state_clone;
			loop {
				if let Ok((stream, _)) = listener.accept().await {
					let io = TokioIo::new(stream);
					let state = state.clone();
					let base_url = base_url.clone();

					tokio::spawn(async move {
						let mut service =
							hyper::service::service_fn(move |req: Request<Incoming>| {
								let state = state.clone();
								let base_url = base_url.clone();
								async move { handle_request(req, state, base_url).await }
							});

						let _ = hyper::server::conn::http1::Builder::new()
							.serve_connection(io, &mut service)
							.await;
					});
				}
			}
		});

		// Wait for the accept loop to come up
		tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;

		Self { state, local_addr }
	}

	/// Set error mode
	pub fn set_error_mode(&self, mode: ErrorMode) {
		self.state.lock().unwrap().error_mode = mode;
	}

	/// Set the token response
	pub fn set_token_response(&self, response: TokenResponse) {
		self.state.lock().unwrap().token_response = Some(response);
	}

	/// Answer the token endpoint form-encoded instead of JSON
	pub fn set_token_form_encoded(&self, enabled: bool) {
		self.state.lock().unwrap().token_form_encoded = enabled;
	}

	/// Set the userinfo (and OAuth1 verify) response body
	pub fn set_userinfo_response(&self, profile: serde_json::Value) {
		self.state.lock().unwrap().userinfo_response = Some(profile);
	}

	/// Disable the userinfo endpoint (404)
	pub fn disable_userinfo(&self) {
		self.state.lock().unwrap().userinfo_enabled = false;
	}

	/// Set a custom discovery document
	pub fn set_discovery_response(&self, discovery: &str) {
		self.state.lock().unwrap().discovery_response = Some(discovery.to_string());
	}

	/// Requests served for a path so far
	pub fn request_count(&self, path: &str) -> usize {
		self.state
			.lock()
			.unwrap()
			.request_counts
			.get(path)
			.copied()
			.unwrap_or(0)
	}

	pub fn base_url(&self) -> String {
		format!("http://{}", self.local_addr)
	}

	pub fn authorization_url(&self) -> String {
		format!("{}/authorize", self.base_url())
	}

	pub fn token_url(&self) -> String {
		format!("{}/token", self.base_url())
	}

	pub fn userinfo_url(&self) -> String {
		format!("{}/userinfo", self.base_url())
	}

	pub fn discovery_url(&self) -> String {
		format!("{}/.well-known/openid-configuration", self.base_url())
	}
}

fn full(body: impl Into<Bytes>) -> Full<Bytes> {
	Full::from(body.into())
}

/// Handle incoming requests
async fn handle_request(
	req: Request<Incoming>,
	state: Arc<Mutex<MockServerState>>,
	base_url: String,
) -> Result<Response<Full<Bytes>>, hyper::Error> {
	let path = req.uri().path().to_string();
	let method = req.method().clone();
	let mut state_guard = state.lock().unwrap();
	*state_guard.request_counts.entry(path.clone()).or_insert(0) += 1;

	match state_guard.error_mode {
		ErrorMode::NetworkError => {
			return Ok(Response::builder()
				.status(StatusCode::SERVICE_UNAVAILABLE)
				.body(Full::default())
				.unwrap());
		}
		ErrorMode::InvalidResponse => {
			return Ok(Response::builder()
				.status(StatusCode::OK)
				.header("Content-Type", "application/json")
				.body(full("{invalid json!!! not valid"))
				.unwrap());
		}
		ErrorMode::Unauthorized => {
			return Ok(Response::builder()
				.status(StatusCode::UNAUTHORIZED)
				.body(Full::default())
				.unwrap());
		}
		ErrorMode::ServerError => {
			return Ok(Response::builder()
				.status(StatusCode::INTERNAL_SERVER_ERROR)
				.body(Full::default())
				.unwrap());
		}
		ErrorMode::Success => {}
	}

	match (&method, path.as_str()) {
		// Authorization endpoint: immediate redirect back with a code
		(&Method::GET, "/authorize") => {
			let location = "http://localhost:8080/callback?code=test_code&state=unused";
			Ok(Response::builder()
				.status(StatusCode::FOUND)
				.header("Location", location)
				.body(Full::default())
				.unwrap())
		}

		// Token endpoint
		(&Method::POST, "/token") => {
			let token_response =
				state_guard
					.token_response
					.clone()
					.unwrap_or_else(|| TokenResponse {
						access_token: "test_access_token".to_string(),
						token_type: "Bearer".to_string(),
						expires_in: Some(3600),
						refresh_token: Some("test_refresh_token".to_string()),
						scope: Some("openid email profile".to_string()),
						id_token: None,
					});

			if state_guard.token_form_encoded {
				let body = format!(
					"access_token={}&token_type={}&scope=user",
					token_response.access_token, token_response.token_type
				);
				Ok(Response::builder()
					.status(StatusCode::OK)
					.header("Content-Type", "application/x-www-form-urlencoded")
					.body(full(body))
					.unwrap())
			} else {
				let json = serde_json::to_string(&token_response).unwrap();
				Ok(Response::builder()
					.status(StatusCode::OK)
					.header("Content-Type", "application/json")
					.body(full(json))
					.unwrap())
			}
		}

		// UserInfo endpoint
		(&Method::GET, "/userinfo") => {
			if !state_guard.userinfo_enabled {
				return Ok(Response::builder()
					.status(StatusCode::NOT_FOUND)
					.body(Full::default())
					.unwrap());
			}

			let profile = state_guard.userinfo_response.clone().unwrap_or_else(|| {
				serde_json::json!({
					"id": "123",
					"name": "A B",
					"email": "a@x.com",
					"verified": true
				})
			});
			Ok(Response::builder()
				.status(StatusCode::OK)
				.header("Content-Type", "application/json")
				.body(full(profile.to_string()))
				.unwrap())
		}

		// OIDC discovery endpoint
		(&Method::GET, "/.well-known/openid-configuration") => {
			let discovery = state_guard.discovery_response.clone().unwrap_or_else(|| {
				format!(
					r#"{{
						"issuer": "{base_url}",
						"authorization_endpoint": "{base_url}/authorize",
						"token_endpoint": "{base_url}/token",
						"jwks_uri": "{base_url}/jwks",
						"userinfo_endpoint": "{base_url}/userinfo",
						"response_types_supported": ["code"],
						"subject_types_supported": ["public"],
						"id_token_signing_alg_values_supported": ["RS256"]
					}}"#
				)
			});
			Ok(Response::builder()
				.status(StatusCode::OK)
				.header("Content-Type", "application/json")
				.body(full(discovery))
				.unwrap())
		}

		// OAuth1 request token endpoint
		(&Method::POST, "/oauth/request_token") => Ok(Response::builder()
			.status(StatusCode::OK)
			.header("Content-Type", "application/x-www-form-urlencoded")
			.body(full(
				"oauth_token=req_token&oauth_token_secret=req_secret&oauth_callback_confirmed=true",
			))
			.unwrap()),

		// OAuth1 access token endpoint
		(&Method::POST, "/oauth/access_token") => Ok(Response::builder()
			.status(StatusCode::OK)
			.header("Content-Type", "application/x-www-form-urlencoded")
			.body(full(
				"oauth_token=acc_token&oauth_token_secret=acc_secret&user_id=123&screen_name=ada",
			))
			.unwrap()),

		// OAuth1 credential verification endpoint
		(&Method::GET, "/verify_credentials") => {
			let profile = state_guard.userinfo_response.clone().unwrap_or_else(|| {
				serde_json::json!({
					"id_str": "123",
					"name": "A B",
					"screen_name": "ab",
					"email": "a@x.com"
				})
			});
			Ok(Response::builder()
				.status(StatusCode::OK)
				.header("Content-Type", "application/json")
				.body(full(profile.to_string()))
				.unwrap())
		}

		_ => Ok(Response::builder()
			.status(StatusCode::NOT_FOUND)
			.body(Full::default())
			.unwrap()),
	}
}
