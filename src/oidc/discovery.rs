//! OpenID Connect endpoint discovery
//!
//! Fetches and caches `.well-known/openid-configuration` documents.
//! Cache entries are keyed by the full well-known URL with a 24 hour
//! TTL; concurrent misses for the same key serialize behind a per-key
//! advisory lock so at most one fetch is in flight.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, warn};

use crate::core::{BrokerError, OAuth2Client};

/// Wait this long for another caller's in-flight fetch before fetching
/// directly. Failing open costs a duplicate idempotent GET, never
/// correctness.
const LOCK_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(15);

/// Resolved provider endpoints, from static config or discovery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderEndpoints {
	/// Authorization endpoint URL
	pub authorization_endpoint: String,
	/// Token endpoint URL
	pub token_endpoint: String,
	/// UserInfo endpoint URL (optional)
	pub userinfo_endpoint: Option<String>,
}

/// The subset of the discovery document the broker consumes.
#[derive(Debug, Clone, Deserialize)]
struct DiscoveryDocument {
	authorization_endpoint: String,
	token_endpoint: String,
	#[serde(default)]
	userinfo_endpoint: Option<String>,
}

/// Cached endpoints with expiration.
#[derive(Debug, Clone)]
struct CachedEndpoints {
	endpoints: ProviderEndpoints,
	expires_at: DateTime<Utc>,
}

impl CachedEndpoints {
	fn new(endpoints: ProviderEndpoints, ttl: Duration) -> Self {
		Self {
			endpoints,
			expires_at: Utc::now() + ttl,
		}
	}

	fn is_expired(&self) -> bool {
		Utc::now() > self.expires_at
	}
}

/// Discovery client with caching, keyed by well-known URL.
pub struct DiscoveryClient {
	client: OAuth2Client,
	cache: RwLock<HashMap<String, CachedEndpoints>>,
	locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
	cache_ttl: Duration,
}

impl DiscoveryClient {
	/// Creates a discovery client with the default TTL (24 hours).
	pub fn new(client: OAuth2Client) -> Self {
		Self::with_ttl(client, Duration::hours(24))
	}

	/// Creates a discovery client with a custom TTL.
	pub fn with_ttl(client: OAuth2Client, cache_ttl: Duration) -> Self {
		Self {
			client,
			cache: RwLock::new(HashMap::new()),
			locks: Mutex::new(HashMap::new()),
			cache_ttl,
		}
	}

	/// Resolves endpoints from a well-known URL, serving the cache when
	/// fresh.
	///
	/// A non-200 response or a malformed document yields
	/// [`BrokerError::Discovery`]; callers treat the provider as
	/// unavailable rather than failing the whole broker.
	pub async fn resolve(&self, well_known_url: &str) -> Result<ProviderEndpoints, BrokerError> {
		if let Some(endpoints) = self.cached(well_known_url).await {
			return Ok(endpoints);
		}

		// One fetch per key; losers of the race wait, then usually find
		// the cache populated. On lock-wait timeout, fetch directly.
		let lock = self.key_lock(well_known_url).await;
		let guard = tokio::time::timeout(LOCK_TIMEOUT, lock.lock()).await;
		if guard.is_err() {
			warn!(url = %well_known_url, "discovery lock wait timed out, fetching directly");
		} else if let Some(endpoints) = self.cached(well_known_url).await {
			return Ok(endpoints);
		}

		let endpoints = self.fetch(well_known_url).await?;
		let mut cache = self.cache.write().await;
		cache.insert(
			well_known_url.to_string(),
			CachedEndpoints::new(endpoints.clone(), self.cache_ttl),
		);
		Ok(endpoints)
	}

	/// Clears the cache.
	pub async fn clear_cache(&self) {
		let mut cache = self.cache.write().await;
		cache.clear();
	}

	async fn cached(&self, well_known_url: &str) -> Option<ProviderEndpoints> {
		let cache = self.cache.read().await;
		cache
			.get(well_known_url)
			.filter(|cached| !cached.is_expired())
			.map(|cached| cached.endpoints.clone())
	}

	async fn key_lock(&self, well_known_url: &str) -> Arc<Mutex<()>> {
		let mut locks = self.locks.lock().await;
		locks
			.entry(well_known_url.to_string())
			.or_insert_with(|| Arc::new(Mutex::new(())))
			.clone()
	}

	async fn fetch(&self, well_known_url: &str) -> Result<ProviderEndpoints, BrokerError> {
		debug!(url = %well_known_url, "fetching discovery document");
		let response = self
			.client
			.client()
			.get(well_known_url)
			.send()
			.await
			.map_err(|e| BrokerError::Discovery(format!("discovery request failed: {e}")))?;

		if response.status().as_u16() != 200 {
			return Err(BrokerError::Discovery(format!(
				"discovery request answered {}",
				response.status()
			)));
		}

		let document: DiscoveryDocument = response
			.json()
			.await
			.map_err(|e| BrokerError::Discovery(format!("malformed discovery document: {e}")))?;

		Ok(ProviderEndpoints {
			authorization_endpoint: document.authorization_endpoint,
			token_endpoint: document.token_endpoint,
			userinfo_endpoint: document.userinfo_endpoint,
		})
	}
}
