//! Session-scoped state storage for CSRF protection and tokens
//!
//! The broker consumes the host's session store through [`StateStore`]:
//! an opaque key/value surface scoped by browser session. State records
//! carry their own TTL so an abandoned login attempt cannot be replayed
//! later.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::core::BrokerError;

/// Values persisted between the authorization redirect and the callback.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateData {
	/// Anti-CSRF `state` parameter
	pub state: String,
	/// OIDC nonce (optional)
	pub nonce: Option<String>,
	/// PKCE code verifier (optional)
	pub code_verifier: Option<String>,
	/// OAuth1 request-token secret (optional)
	pub request_token_secret: Option<String>,
	/// Expiration timestamp
	pub expires_at: DateTime<Utc>,
}

impl StateData {
	/// Creates state data with the default TTL (10 minutes).
	pub fn new(state: String) -> Self {
		Self::with_ttl(state, Duration::minutes(10))
	}

	/// Creates state data with a custom TTL.
	pub fn with_ttl(state: String, ttl: Duration) -> Self {
		Self {
			state,
			nonce: None,
			code_verifier: None,
			request_token_secret: None,
			expires_at: Utc::now() + ttl,
		}
	}

	/// Checks if the state has expired.
	pub fn is_expired(&self) -> bool {
		Utc::now() > self.expires_at
	}
}

/// Session-scoped key/value store contract.
///
/// The broker reads and writes values under `(session_id, key)`; session
/// lifecycle belongs to the host.
#[async_trait]
pub trait StateStore: Send + Sync {
	/// Stores a value.
	async fn put(&self, session_id: &str, key: &str, value: &str) -> Result<(), BrokerError>;

	/// Retrieves a value, `None` when absent.
	async fn get(&self, session_id: &str, key: &str) -> Result<Option<String>, BrokerError>;

	/// Removes a value; removing an absent key is not an error.
	async fn remove(&self, session_id: &str, key: &str) -> Result<(), BrokerError>;
}

/// In-memory state store for development and testing.
///
/// Not suitable for multi-instance deployments; production hosts supply
/// their session backend instead.
#[derive(Debug, Default)]
pub struct InMemoryStateStore {
	store: RwLock<HashMap<(String, String), String>>,
}

impl InMemoryStateStore {
	/// Creates an empty store.
	pub fn new() -> Self {
		Self {
			store: RwLock::new(HashMap::new()),
		}
	}
}

#[async_trait]
impl StateStore for InMemoryStateStore {
	async fn put(&self, session_id: &str, key: &str, value: &str) -> Result<(), BrokerError> {
		let mut store = self.store.write().await;
		store.insert(
			(session_id.to_string(), key.to_string()),
			value.to_string(),
		);
		Ok(())
	}

	async fn get(&self, session_id: &str, key: &str) -> Result<Option<String>, BrokerError> {
		let store = self.store.read().await;
		Ok(store
			.get(&(session_id.to_string(), key.to_string()))
			.cloned())
	}

	async fn remove(&self, session_id: &str, key: &str) -> Result<(), BrokerError> {
		let mut store = self.store.write().await;
		store.remove(&(session_id.to_string(), key.to_string()));
		Ok(())
	}
}
