//! Yahoo OAuth2 provider

use crate::core::{
	BrokerError, ClientAuthMethod, LinkPolicy, NormalizedIdentity, OAuth2Config, ProviderConfig,
	ProviderDescriptor, RawProfile,
};

/// Yahoo descriptor. The token endpoint requires HTTP Basic client
/// credentials.
pub fn descriptor(
	client_id: String,
	client_secret: String,
	redirect_uri: String,
) -> ProviderDescriptor {
	ProviderDescriptor {
		config: ProviderConfig {
			name: "yahoo".to_string(),
			client_id,
			client_secret,
			redirect_uri,
			scopes: vec![
				"openid".to_string(),
				"email".to_string(),
				"profile".to_string(),
			],
			oidc: None,
			oauth2: Some(OAuth2Config {
				authorization_endpoint: "https://api.login.yahoo.com/oauth2/request_auth"
					.to_string(),
				token_endpoint: "https://api.login.yahoo.com/oauth2/get_token".to_string(),
				userinfo_endpoint: Some(
					"https://api.login.yahoo.com/openid/v1/userinfo".to_string(),
				),
			}),
			oauth1: None,
			extra_auth_params: vec![],
			extra_token_params: vec![],
		},
		policy: LinkPolicy::default(),
		client_auth: ClientAuthMethod::BasicHeader,
		map_profile,
	}
}

fn map_profile(profile: &RawProfile) -> Result<NormalizedIdentity, BrokerError> {
	NormalizedIdentity::new(
		profile.string(&["sub"]).unwrap_or_default(),
		profile.string(&["name", "nickname"]).unwrap_or_default(),
		profile.string(&["email"]).unwrap_or_default(),
		profile.boolean("email_verified").unwrap_or(false),
		None,
		profile.string(&["picture"]),
	)
}
