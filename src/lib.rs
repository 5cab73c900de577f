//! # Janus Auth
//!
//! Social login broker for Rust web applications: OAuth2, OpenID
//! Connect, and legacy OAuth1 authentication against third-party
//! identity providers, with a policy-driven engine that links provider
//! identities to local accounts.
//!
//! ## Supported providers
//!
//! Amazon, Discord, Facebook, GitHub, Google, LinkedIn, Microsoft,
//! PayPal, Spotify, Synology SSO, Twitch, Twitter (OAuth1), and Yahoo,
//! each as a thin adapter in [`providers`]. OIDC providers resolve
//! their endpoints through cached `.well-known` discovery.
//!
//! ## Architecture
//!
//! - [`core`]: configuration, shared HTTP client, error taxonomy,
//!   tokens, and the normalized identity record
//! - [`flow`]: authorization URL construction, code/token exchange,
//!   refresh, PKCE, CSRF state storage, and the OAuth1 three-legged flow
//! - [`oidc`]: endpoint discovery (cached, single-flight) and the
//!   user-info client
//! - [`providers`]: per-provider endpoint data and profile mappers
//! - [`linking`]: the account-linking decision engine and the user
//!   store contract
//! - [`backend`]: the [`AuthBroker`] orchestrator tying it all together
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use janus_auth::{AuthBroker, BrokerSettings, providers};
//! use janus_auth::flow::InMemoryStateStore;
//! use janus_auth::linking::InMemoryUserStore;
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut broker = AuthBroker::new(
//!         Arc::new(InMemoryStateStore::new()),
//!         Arc::new(InMemoryUserStore::new()),
//!         BrokerSettings::default(),
//!     );
//!     broker.register(providers::github::descriptor(
//!         "client_id".into(),
//!         "client_secret".into(),
//!         "https://example.com/callback".into(),
//!     ));
//!
//!     // Redirect the browser here
//!     let url = broker.begin_login("github", "session-1").await.unwrap();
//!
//!     // ...and on callback:
//!     // let outcome = broker.handle_callback("github", "session-1", &query, None).await;
//! }
//! ```
//!
//! ## Security notes
//!
//! Every authorization request carries a session-bound `state` value;
//! callbacks with a missing or mismatched `state` are rejected before
//! any token exchange happens. A `(provider, external id)` pair is
//! bound to at most one local account, and an email the provider did
//! not verify never reaches an existing account unless the provider's
//! policy explicitly allows the bypass.

pub mod backend;
pub mod core;
pub mod flow;
pub mod linking;
pub mod oidc;
pub mod providers;

pub use backend::{AuthBroker, BrokerSettings, CallbackQuery};
pub use crate::core::{
	BrokerError, ClientAuthMethod, FailureDisposition, LinkPolicy, NormalizedIdentity,
	OAuthToken, ProviderConfig, ProviderDescriptor, RawProfile, TokenResponse,
};
pub use flow::{InMemoryStateStore, StateStore};
pub use linking::{AccountId, AccountLinker, InMemoryUserStore, LinkOutcome, UserStore};
pub use oidc::{DiscoveryClient, ProviderEndpoints};
