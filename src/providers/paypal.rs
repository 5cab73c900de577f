//! PayPal OAuth2 provider

use crate::core::{
	BrokerError, ClientAuthMethod, LinkPolicy, NormalizedIdentity, OAuth2Config, ProviderConfig,
	ProviderDescriptor, RawProfile,
};

/// PayPal descriptor. The token endpoint requires HTTP Basic client
/// credentials.
pub fn descriptor(
	client_id: String,
	client_secret: String,
	redirect_uri: String,
) -> ProviderDescriptor {
	ProviderDescriptor {
		config: ProviderConfig {
			name: "paypal".to_string(),
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
				authorization_endpoint: "https://www.paypal.com/signin/authorize".to_string(),
				token_endpoint: "https://api-m.paypal.com/v1/oauth2/token".to_string(),
				userinfo_endpoint: Some(
					"https://api-m.paypal.com/v1/identity/openidconnect/userinfo?schema=openid"
						.to_string(),
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
	let verified = profile
		.boolean("verified")
		.or_else(|| profile.boolean("verified_account"))
		.unwrap_or(false);

	NormalizedIdentity::new(
		profile.string(&["user_id", "sub"]).unwrap_or_default(),
		profile.string(&["name"]).unwrap_or_default(),
		profile.string(&["email"]).unwrap_or_default(),
		verified,
		None,
		None,
	)
}
