//! LinkedIn OAuth2 provider (OpenID Connect profile)

use crate::core::{
	BrokerError, ClientAuthMethod, LinkPolicy, NormalizedIdentity, OAuth2Config, ProviderConfig,
	ProviderDescriptor, RawProfile,
};

/// LinkedIn descriptor, static endpoints speaking the OIDC userinfo
/// shape.
pub fn descriptor(
	client_id: String,
	client_secret: String,
	redirect_uri: String,
) -> ProviderDescriptor {
	ProviderDescriptor {
		config: ProviderConfig {
			name: "linkedin".to_string(),
			client_id,
			client_secret,
			redirect_uri,
			scopes: vec![
				"openid".to_string(),
				"profile".to_string(),
				"email".to_string(),
			],
			oidc: None,
			oauth2: Some(OAuth2Config {
				authorization_endpoint: "https://www.linkedin.com/oauth/v2/authorization"
					.to_string(),
				token_endpoint: "https://www.linkedin.com/oauth/v2/accessToken".to_string(),
				userinfo_endpoint: Some("https://api.linkedin.com/v2/userinfo".to_string()),
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
	NormalizedIdentity::new(
		profile.string(&["sub"]).unwrap_or_default(),
		profile.string(&["name"]).unwrap_or_default(),
		profile.string(&["email"]).unwrap_or_default(),
		profile.boolean("email_verified").unwrap_or(false),
		None,
		profile.string(&["picture"]),
	)
}
