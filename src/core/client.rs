//! Shared HTTP client for all provider traffic

use std::time::Duration;

/// Default per-request timeout. Providers give no latency guarantees, so
/// the broker imposes its own bound instead of relying on transport
/// defaults.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Thin wrapper around a shared `reqwest::Client`.
///
/// One instance is created per broker and cloned into each flow; clones
/// share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct OAuth2Client {
	inner: reqwest::Client,
}

impl OAuth2Client {
	/// Creates a client with the broker's request timeout applied.
	pub fn new() -> Self {
		let inner = reqwest::Client::builder()
			.timeout(REQUEST_TIMEOUT)
			.build()
			.expect("failed to construct HTTP client");
		Self { inner }
	}

	/// Creates a client with a custom request timeout.
	pub fn with_timeout(timeout: Duration) -> Self {
		let inner = reqwest::Client::builder()
			.timeout(timeout)
			.build()
			.expect("failed to construct HTTP client");
		Self { inner }
	}

	/// Access the underlying `reqwest::Client`.
	pub fn client(&self) -> &reqwest::Client {
		&self.inner
	}
}

impl Default for OAuth2Client {
	fn default() -> Self {
		Self::new()
	}
}
