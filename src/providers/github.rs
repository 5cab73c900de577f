//! GitHub OAuth2 provider

use crate::core::{
	BrokerError, ClientAuthMethod, LinkPolicy, NormalizedIdentity, OAuth2Config, ProviderConfig,
	ProviderDescriptor, RawProfile,
};

/// GitHub descriptor, static OAuth2 endpoints.
pub fn descriptor(
	client_id: String,
	client_secret: String,
	redirect_uri: String,
) -> ProviderDescriptor {
	ProviderDescriptor {
		config: ProviderConfig {
			name: "github".to_string(),
			client_id,
			client_secret,
			redirect_uri,
			scopes: vec!["read:user".to_string(), "user:email".to_string()],
			oidc: None,
			oauth2: Some(OAuth2Config {
				authorization_endpoint: "https://github.com/login/oauth/authorize".to_string(),
				token_endpoint: "https://github.com/login/oauth/access_token".to_string(),
				userinfo_endpoint: Some("https://api.github.com/user".to_string()),
			}),
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
	// GitHub accounts are treated as verified unconditionally; the API
	// only exposes addresses GitHub has already confirmed.
	NormalizedIdentity::new(
		profile.string(&["id"]).unwrap_or_default(),
		profile.string(&["name", "login"]).unwrap_or_default(),
		profile.string(&["email"]).unwrap_or_default(),
		true,
		None,
		profile.string(&["avatar_url"]),
	)
}
