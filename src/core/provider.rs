//! Provider capability descriptor
//!
//! A provider is plain data plus one pure mapping function; the generic
//! flows in [`crate::flow`] do everything else. There is no per-provider
//! trait hierarchy.

use crate::core::config::{LinkPolicy, ProviderConfig};
use crate::core::identity::{NormalizedIdentity, RawProfile};
use crate::core::BrokerError;

/// Pure translation from a provider's raw user-info payload to the
/// normalized identity record.
pub type ProfileMapper = fn(&RawProfile) -> Result<NormalizedIdentity, BrokerError>;

/// How client credentials are presented at the token endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientAuthMethod {
	/// `client_id`/`client_secret` as body parameters
	RequestBody,
	/// HTTP Basic authorization header (PayPal, Spotify, Yahoo)
	BasicHeader,
}

/// Everything the broker needs to drive one provider.
#[derive(Debug, Clone)]
pub struct ProviderDescriptor {
	/// Immutable provider settings
	pub config: ProviderConfig,

	/// Account-linking policy for this provider
	pub policy: LinkPolicy,

	/// Token endpoint credential style
	pub client_auth: ClientAuthMethod,

	/// Raw-profile-to-identity mapper
	pub map_profile: ProfileMapper,
}

impl ProviderDescriptor {
	/// Provider name from the underlying config.
	pub fn name(&self) -> &str {
		&self.config.name
	}

	/// Replaces the linking policy. Descriptor constructors default to a
	/// fully closed policy; deployments relax it per provider.
	pub fn with_policy(mut self, policy: LinkPolicy) -> Self {
		self.policy = policy;
		self
	}
}
