//! Synology SSO Server OIDC provider

use crate::core::{
	BrokerError, ClientAuthMethod, LinkPolicy, NormalizedIdentity, OidcConfig, ProviderConfig,
	ProviderDescriptor, RawProfile,
};

/// Synology descriptor. Endpoints are discovered from the
/// deployment-specific SSO server base URL.
pub fn descriptor(
	client_id: String,
	client_secret: String,
	redirect_uri: String,
	sso_base_url: &str,
) -> ProviderDescriptor {
	let discovery_url = format!(
		"{}/webman/sso/.well-known/openid-configuration",
		sso_base_url.trim_end_matches('/')
	);

	ProviderDescriptor {
		config: ProviderConfig {
			name: "synology".to_string(),
			client_id,
			client_secret,
			redirect_uri,
			scopes: vec!["openid".to_string(), "email".to_string()],
			oidc: Some(OidcConfig {
				discovery_url,
				use_nonce: true,
			}),
			oauth2: None,
			oauth1: None,
			extra_auth_params: vec![],
			extra_token_params: vec![],
		},
		policy: LinkPolicy::default(),
		client_auth: ClientAuthMethod::RequestBody,
		map_profile,
	}
}

fn map_profile(profile: &RawProfile) -> Result<NormalizedIdentity, BrokerError> {
	// Accounts come from the deployment's own directory and are trusted
	NormalizedIdentity::new(
		profile.string(&["sub"]).unwrap_or_default(),
		profile.string(&["username", "name"]).unwrap_or_default(),
		profile.string(&["email"]).unwrap_or_default(),
		true,
		None,
		None,
	)
}
