//! Google OIDC provider

use crate::core::{
	BrokerError, ClientAuthMethod, LinkPolicy, NormalizedIdentity, OidcConfig, ProviderConfig,
	ProviderDescriptor, RawProfile,
};

/// Google descriptor, endpoints via OIDC discovery.
pub fn descriptor(
	client_id: String,
	client_secret: String,
	redirect_uri: String,
) -> ProviderDescriptor {
	ProviderDescriptor {
		config: ProviderConfig {
			name: "google".to_string(),
			client_id,
			client_secret,
			redirect_uri,
			scopes: vec![
				"openid".to_string(),
				"email".to_string(),
				"profile".to_string(),
			],
			oidc: Some(OidcConfig {
				discovery_url: "https://accounts.google.com/.well-known/openid-configuration"
					.to_string(),
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
	NormalizedIdentity::new(
		profile.string(&["sub", "id"]).unwrap_or_default(),
		profile.string(&["name"]).unwrap_or_default(),
		profile.string(&["email"]).unwrap_or_default(),
		profile.boolean("email_verified").unwrap_or(false),
		None,
		profile.string(&["picture"]),
	)
}
