//! Callback orchestrator
//!
//! [`AuthBroker`] owns the provider registry and sequences one inbound
//! callback: resolve endpoints, exchange the code, fetch the profile,
//! map it, and hand the normalized identity to the linking engine.
//! Failures carry an explicit [`FailureDisposition`] telling the host
//! whether to show a generic error page or run its failed-login flow.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::core::{
	BrokerError, LinkPolicy, NormalizedIdentity, OAuth2Client, OAuthToken, ProviderDescriptor,
};
use crate::flow::{
	AuthorizationFlow, CodeChallenge, CodeVerifier, OAuth1Flow, RefreshFlow, StateData,
	StateStore, TokenExchangeFlow, generate_nonce, generate_state,
};
use crate::linking::{AccountId, AccountLinker, LinkOutcome, UserStore};
use crate::oidc::{DiscoveryClient, ProviderEndpoints, UserInfoClient};

/// Broker-wide settings supplied by the host.
#[derive(Debug, Clone, Copy)]
pub struct BrokerSettings {
	/// Host's global self-registration toggle; per-provider
	/// `force_account_creation` overrides it
	pub registration_open: bool,
	/// Attach PKCE challenges to OAuth2 authorization requests
	pub use_pkce: bool,
}

impl Default for BrokerSettings {
	fn default() -> Self {
		Self {
			registration_open: true,
			use_pkce: false,
		}
	}
}

/// Query parameters of an inbound callback request, as handed over by
/// the host's dispatch.
pub type CallbackQuery = HashMap<String, String>;

/// The OAuth/OIDC login broker.
pub struct AuthBroker {
	providers: HashMap<String, ProviderDescriptor>,
	http: OAuth2Client,
	discovery: DiscoveryClient,
	userinfo: UserInfoClient,
	states: Arc<dyn StateStore>,
	linker: AccountLinker,
	settings: BrokerSettings,
}

impl AuthBroker {
	/// Creates a broker over the host's session-scoped state store and
	/// user store.
	pub fn new(
		states: Arc<dyn StateStore>,
		users: Arc<dyn UserStore>,
		settings: BrokerSettings,
	) -> Self {
		let http = OAuth2Client::new();
		Self {
			providers: HashMap::new(),
			discovery: DiscoveryClient::new(http.clone()),
			userinfo: UserInfoClient::new(http.clone()),
			http,
			states,
			linker: AccountLinker::new(users, settings.registration_open),
			settings,
		}
	}

	/// Registers a provider. A later registration under the same name
	/// replaces the earlier one.
	pub fn register(&mut self, descriptor: ProviderDescriptor) {
		self.providers
			.insert(descriptor.name().to_string(), descriptor);
	}

	/// Registered provider names, in no particular order.
	pub fn provider_names(&self) -> Vec<&str> {
		self.providers.keys().map(String::as_str).collect()
	}

	/// Providers currently usable for login.
	///
	/// A discovery-based provider whose endpoints cannot be resolved is
	/// omitted instead of surfacing an error; it reappears once its
	/// well-known document becomes reachable again.
	pub async fn available_providers(&self) -> Vec<String> {
		let mut names = Vec::new();
		for (name, descriptor) in &self.providers {
			if descriptor.config.is_oidc() {
				match self.resolve_endpoints(descriptor).await {
					Ok(_) => names.push(name.clone()),
					Err(error) => {
						warn!(provider = %name, %error, "provider hidden: endpoints unresolved");
					}
				}
			} else {
				names.push(name.clone());
			}
		}
		names.sort();
		names
	}

	/// Starts a login attempt: generates and persists the CSRF state,
	/// then returns the URL to redirect the browser to.
	pub async fn begin_login(
		&self,
		provider: &str,
		session_id: &str,
	) -> Result<String, BrokerError> {
		let descriptor = self.descriptor(provider)?;

		if descriptor.config.is_oauth1() {
			return self.begin_oauth1_login(descriptor, session_id).await;
		}

		let endpoints = self.resolve_endpoints(descriptor).await?;
		let state = generate_state();
		let mut data = StateData::new(state.clone());

		let nonce = descriptor
			.config
			.oidc
			.as_ref()
			.filter(|oidc| oidc.use_nonce)
			.map(|_| generate_nonce());
		data.nonce = nonce.clone();

		let challenge = if self.settings.use_pkce {
			let verifier = CodeVerifier::generate();
			let challenge = CodeChallenge::s256(&verifier);
			data.code_verifier = Some(verifier.as_str().to_string());
			Some(challenge)
		} else {
			None
		};

		self.store_state(provider, session_id, &data).await?;

		let flow = AuthorizationFlow::new(descriptor.config.clone());
		flow.build_url(
			&endpoints.authorization_endpoint,
			&state,
			nonce.as_deref(),
			challenge.as_ref(),
		)
	}

	/// Handles the provider callback for one login attempt.
	///
	/// `session_user` is the account already authenticated in this
	/// session, if any; its presence turns the attempt into an explicit
	/// link action. On success the obtained token is persisted in the
	/// session-scoped store.
	pub async fn handle_callback(
		&self,
		provider: &str,
		session_id: &str,
		query: &CallbackQuery,
		session_user: Option<AccountId>,
	) -> Result<LinkOutcome, BrokerError> {
		let descriptor = self.descriptor(provider)?;

		if let Some(error) = query.get("error") {
			let description = query
				.get("error_description")
				.map(String::as_str)
				.unwrap_or("");
			return Err(BrokerError::Provider(format!(
				"{error} {description}"
			)));
		}

		let identity = if descriptor.config.is_oauth1() {
			self.complete_oauth1(descriptor, session_id, query).await?
		} else {
			self.complete_oauth2(descriptor, session_id, query).await?
		};

		self.linker
			.resolve(provider, &identity, session_user, &descriptor.policy)
			.await
	}

	/// Refreshes the stored token for a provider, where one with a
	/// refresh token exists, and persists the replacement.
	pub async fn refresh_token(
		&self,
		provider: &str,
		session_id: &str,
	) -> Result<OAuthToken, BrokerError> {
		let descriptor = self.descriptor(provider)?;
		let stored = self
			.stored_token(provider, session_id)
			.await?
			.ok_or_else(|| BrokerError::TokenRefresh("no stored token".to_string()))?;
		let refresh_token = stored
			.refresh_token
			.ok_or_else(|| BrokerError::TokenRefresh("no refresh token issued".to_string()))?;

		let endpoints = self.resolve_endpoints(descriptor).await?;
		let flow = RefreshFlow::new(
			self.http.clone(),
			descriptor.config.clone(),
			descriptor.client_auth,
		);
		let response = flow
			.refresh(&endpoints.token_endpoint, &refresh_token)
			.await?;

		let mut token = OAuthToken::from_response(&response);
		// Providers may rotate or omit the refresh token; keep the old
		// one when none comes back
		if token.refresh_token.is_none() {
			token.refresh_token = Some(refresh_token);
		}
		self.store_token(provider, session_id, &token).await?;
		Ok(token)
	}

	/// The token stored for a provider in this session, if any.
	pub async fn stored_token(
		&self,
		provider: &str,
		session_id: &str,
	) -> Result<Option<OAuthToken>, BrokerError> {
		let raw = self.states.get(session_id, &token_key(provider)).await?;
		match raw {
			Some(json) => serde_json::from_str(&json)
				.map(Some)
				.map_err(|e| BrokerError::Storage(format!("stored token unreadable: {e}"))),
			None => Ok(None),
		}
	}

	/// Removes every social binding owned by an account.
	pub async fn unlink(&self, account_id: AccountId) -> Result<(), BrokerError> {
		self.linker.unlink_all(account_id).await
	}

	fn descriptor(&self, provider: &str) -> Result<&ProviderDescriptor, BrokerError> {
		self.providers.get(provider).ok_or_else(|| {
			BrokerError::Configuration(format!("provider {provider} is not registered"))
		})
	}

	/// The linking policy registered for a provider.
	pub fn policy(&self, provider: &str) -> Result<&LinkPolicy, BrokerError> {
		Ok(&self.descriptor(provider)?.policy)
	}

	async fn resolve_endpoints(
		&self,
		descriptor: &ProviderDescriptor,
	) -> Result<ProviderEndpoints, BrokerError> {
		if let Some(oauth2) = &descriptor.config.oauth2 {
			return Ok(ProviderEndpoints {
				authorization_endpoint: oauth2.authorization_endpoint.clone(),
				token_endpoint: oauth2.token_endpoint.clone(),
				userinfo_endpoint: oauth2.userinfo_endpoint.clone(),
			});
		}
		if let Some(oidc) = &descriptor.config.oidc {
			return self.discovery.resolve(&oidc.discovery_url).await;
		}
		Err(BrokerError::Configuration(format!(
			"provider {} has no OAuth2 or OIDC endpoints",
			descriptor.name()
		)))
	}

	async fn begin_oauth1_login(
		&self,
		descriptor: &ProviderDescriptor,
		session_id: &str,
	) -> Result<String, BrokerError> {
		let flow = OAuth1Flow::new(self.http.clone(), descriptor.config.clone())?;
		let request_token = flow.request_token().await?;

		// The request token plays the role of the CSRF state: the
		// callback must present the same token, and the secret is
		// needed for the verifier exchange.
		let mut data = StateData::new(request_token.token.clone());
		data.request_token_secret = Some(request_token.secret.clone());
		self.store_state(descriptor.name(), session_id, &data).await?;

		flow.authenticate_url(&request_token)
	}

	async fn complete_oauth1(
		&self,
		descriptor: &ProviderDescriptor,
		session_id: &str,
		query: &CallbackQuery,
	) -> Result<NormalizedIdentity, BrokerError> {
		let data = self.take_state(descriptor.name(), session_id).await?;

		let returned_token = query
			.get("oauth_token")
			.ok_or_else(|| BrokerError::CsrfMismatch("callback carried no oauth_token".into()))?;
		if *returned_token != data.state {
			return Err(BrokerError::CsrfMismatch(
				"oauth_token does not match the stored request token".into(),
			));
		}
		let verifier = query.get("oauth_verifier").ok_or_else(|| {
			BrokerError::TokenExchange("callback carried no oauth_verifier".into())
		})?;
		let secret = data.request_token_secret.as_deref().ok_or_else(|| {
			BrokerError::Storage("stored login state lost the request token secret".into())
		})?;

		let flow = OAuth1Flow::new(self.http.clone(), descriptor.config.clone())?;
		let access = flow.access_token(&data.state, secret, verifier).await?;

		let token = OAuthToken::oauth1(access.token.clone(), access.secret.clone());
		self.store_token(descriptor.name(), session_id, &token).await?;

		let profile = flow.fetch_profile(&access).await?;
		(descriptor.map_profile)(&profile)
	}

	async fn complete_oauth2(
		&self,
		descriptor: &ProviderDescriptor,
		session_id: &str,
		query: &CallbackQuery,
	) -> Result<NormalizedIdentity, BrokerError> {
		let data = self.take_state(descriptor.name(), session_id).await?;

		// CSRF gate first; a mismatch must never reach the token
		// exchange
		let returned_state = query
			.get("state")
			.ok_or_else(|| BrokerError::CsrfMismatch("callback carried no state".into()))?;
		if *returned_state != data.state {
			debug!(provider = %descriptor.name(), "state mismatch on callback");
			return Err(BrokerError::CsrfMismatch(
				"state does not match the value bound to this session".into(),
			));
		}

		let code = query.get("code").ok_or_else(|| {
			BrokerError::TokenExchange("callback carried no authorization code".into())
		})?;

		let endpoints = self.resolve_endpoints(descriptor).await?;
		let exchange = TokenExchangeFlow::new(
			self.http.clone(),
			descriptor.config.clone(),
			descriptor.client_auth,
		);
		let verifier = data.code_verifier.clone().map(CodeVerifier::from_raw);
		let response = exchange
			.exchange(&endpoints.token_endpoint, code, verifier.as_ref())
			.await?;

		let token = OAuthToken::from_response(&response);
		self.store_token(descriptor.name(), session_id, &token).await?;

		let userinfo_endpoint = endpoints.userinfo_endpoint.as_deref().ok_or_else(|| {
			BrokerError::Configuration(format!(
				"provider {} has no userinfo endpoint",
				descriptor.name()
			))
		})?;
		let profile = self
			.userinfo
			.fetch(userinfo_endpoint, &token.access_token)
			.await?;
		(descriptor.map_profile)(&profile)
	}

	async fn store_state(
		&self,
		provider: &str,
		session_id: &str,
		data: &StateData,
	) -> Result<(), BrokerError> {
		let json = serde_json::to_string(data)
			.map_err(|e| BrokerError::Storage(format!("login state unserializable: {e}")))?;
		self.states
			.put(session_id, &state_key(provider), &json)
			.await
	}

	/// Loads and removes the login state for one attempt. The state is
	/// single-use regardless of how validation turns out.
	async fn take_state(
		&self,
		provider: &str,
		session_id: &str,
	) -> Result<StateData, BrokerError> {
		let key = state_key(provider);
		let raw = self.states.get(session_id, &key).await?;
		self.states.remove(session_id, &key).await?;

		let data: StateData = match raw {
			Some(json) => serde_json::from_str(&json)
				.map_err(|e| BrokerError::Storage(format!("stored login state unreadable: {e}")))?,
			None => {
				return Err(BrokerError::CsrfMismatch(
					"no login state bound to this session".into(),
				));
			}
		};
		if data.is_expired() {
			return Err(BrokerError::CsrfMismatch("login state expired".into()));
		}
		Ok(data)
	}

	async fn store_token(
		&self,
		provider: &str,
		session_id: &str,
		token: &OAuthToken,
	) -> Result<(), BrokerError> {
		let json = serde_json::to_string(token)
			.map_err(|e| BrokerError::Storage(format!("token unserializable: {e}")))?;
		self.states
			.put(session_id, &token_key(provider), &json)
			.await
	}
}

fn state_key(provider: &str) -> String {
	format!("social_login.state.{provider}")
}

fn token_key(provider: &str) -> String {
	format!("social_login.token.{provider}")
}
