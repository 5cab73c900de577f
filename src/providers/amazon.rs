//! Amazon (Login with Amazon) OAuth2 provider

use crate::core::{
	BrokerError, ClientAuthMethod, LinkPolicy, NormalizedIdentity, OAuth2Config, ProviderConfig,
	ProviderDescriptor, RawProfile,
};

/// Amazon descriptor, static OAuth2 endpoints.
pub fn descriptor(
	client_id: String,
	client_secret: String,
	redirect_uri: String,
) -> ProviderDescriptor {
	ProviderDescriptor {
		config: ProviderConfig {
			name: "amazon".to_string(),
			client_id,
			client_secret,
			redirect_uri,
			scopes: vec!["profile".to_string()],
			oidc: None,
			oauth2: Some(OAuth2Config {
				authorization_endpoint: "https://www.amazon.com/ap/oa".to_string(),
				token_endpoint: "https://api.amazon.com/auth/o2/token".to_string(),
				userinfo_endpoint: Some("https://api.amazon.com/user/profile".to_string()),
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
	// Amazon only releases the profile of a verified customer account
	NormalizedIdentity::new(
		profile.string(&["user_id"]).unwrap_or_default(),
		profile.string(&["name"]).unwrap_or_default(),
		profile.string(&["email"]).unwrap_or_default(),
		true,
		None,
		None,
	)
}
