//! Twitch OIDC provider

use crate::core::{
	BrokerError, ClientAuthMethod, LinkPolicy, NormalizedIdentity, OidcConfig, ProviderConfig,
	ProviderDescriptor, RawProfile,
};

/// Twitch descriptor, endpoints via OIDC discovery.
///
/// Twitch only releases email claims from the userinfo endpoint when the
/// authorization request names them in a `claims` parameter.
pub fn descriptor(
	client_id: String,
	client_secret: String,
	redirect_uri: String,
) -> ProviderDescriptor {
	let claims =
		r#"{"userinfo":{"email":null,"email_verified":null,"preferred_username":null,"picture":null}}"#;

	ProviderDescriptor {
		config: ProviderConfig {
			name: "twitch".to_string(),
			client_id,
			client_secret,
			redirect_uri,
			scopes: vec!["openid".to_string(), "user:read:email".to_string()],
			oidc: Some(OidcConfig {
				discovery_url: "https://id.twitch.tv/oauth2/.well-known/openid-configuration"
					.to_string(),
				use_nonce: true,
			}),
			oauth2: None,
			oauth1: None,
			extra_auth_params: vec![("claims".to_string(), claims.to_string())],
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
		profile.string(&["preferred_username"]).unwrap_or_default(),
		profile.string(&["email"]).unwrap_or_default(),
		profile.boolean("email_verified").unwrap_or(false),
		None,
		profile.string(&["picture"]),
	)
}
