//! Discord OAuth2 provider

use crate::core::{
	BrokerError, ClientAuthMethod, LinkPolicy, NormalizedIdentity, OAuth2Config, ProviderConfig,
	ProviderDescriptor, RawProfile,
};

/// Discord descriptor, static OAuth2 endpoints.
pub fn descriptor(
	client_id: String,
	client_secret: String,
	redirect_uri: String,
) -> ProviderDescriptor {
	ProviderDescriptor {
		config: ProviderConfig {
			name: "discord".to_string(),
			client_id,
			client_secret,
			redirect_uri,
			scopes: vec!["identify".to_string(), "email".to_string()],
			oidc: None,
			oauth2: Some(OAuth2Config {
				authorization_endpoint: "https://discord.com/api/oauth2/authorize".to_string(),
				token_endpoint: "https://discord.com/api/oauth2/token".to_string(),
				userinfo_endpoint: Some("https://discord.com/api/users/@me".to_string()),
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
	let id = profile.string(&["id"]).unwrap_or_default();
	// Avatar is a bare hash that has to be composed into a CDN URL
	let avatar = profile.string(&["avatar"]).map(|hash| {
		format!("https://cdn.discordapp.com/avatars/{id}/{hash}.png")
	});

	NormalizedIdentity::new(
		id,
		profile
			.string(&["global_name", "username"])
			.unwrap_or_default(),
		profile.string(&["email"]).unwrap_or_default(),
		profile.boolean("verified").unwrap_or(false),
		None,
		avatar,
	)
}
