//! Spotify OAuth2 provider

use crate::core::{
	BrokerError, ClientAuthMethod, LinkPolicy, NormalizedIdentity, OAuth2Config, ProviderConfig,
	ProviderDescriptor, RawProfile,
};

/// Spotify descriptor. The token endpoint requires HTTP Basic client
/// credentials.
pub fn descriptor(
	client_id: String,
	client_secret: String,
	redirect_uri: String,
) -> ProviderDescriptor {
	ProviderDescriptor {
		config: ProviderConfig {
			name: "spotify".to_string(),
			client_id,
			client_secret,
			redirect_uri,
			scopes: vec![
				"user-read-email".to_string(),
				"user-read-private".to_string(),
			],
			oidc: None,
			oauth2: Some(OAuth2Config {
				authorization_endpoint: "https://accounts.spotify.com/authorize".to_string(),
				token_endpoint: "https://accounts.spotify.com/api/token".to_string(),
				userinfo_endpoint: Some("https://api.spotify.com/v1/me".to_string()),
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
	// Spotify makes no claim about the email address
	NormalizedIdentity::new(
		profile.string(&["id"]).unwrap_or_default(),
		profile.string(&["display_name"]).unwrap_or_default(),
		profile.string(&["email"]).unwrap_or_default(),
		false,
		None,
		None,
	)
}
