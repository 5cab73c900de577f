//! Twitter OAuth1 provider
//!
//! The one remaining three-legged OAuth1 integration; everything
//! protocol-specific lives in [`crate::flow::oauth1`].

use crate::core::{
	BrokerError, ClientAuthMethod, LinkPolicy, NormalizedIdentity, OAuth1Config, ProviderConfig,
	ProviderDescriptor, RawProfile,
};

/// Twitter descriptor, static OAuth1 endpoints.
pub fn descriptor(
	consumer_key: String,
	consumer_secret: String,
	redirect_uri: String,
) -> ProviderDescriptor {
	ProviderDescriptor {
		config: ProviderConfig {
			name: "twitter".to_string(),
			client_id: consumer_key,
			client_secret: consumer_secret,
			redirect_uri,
			scopes: vec![],
			oidc: None,
			oauth2: None,
			oauth1: Some(OAuth1Config {
				request_token_endpoint: "https://api.twitter.com/oauth/request_token".to_string(),
				authenticate_endpoint: "https://api.twitter.com/oauth/authenticate".to_string(),
				access_token_endpoint: "https://api.twitter.com/oauth/access_token".to_string(),
				verify_credentials_endpoint:
					"https://api.twitter.com/1.1/account/verify_credentials.json?include_email=true&skip_status=true"
						.to_string(),
			}),
			extra_auth_params: vec![],
			extra_token_params: vec![],
		},
		policy: LinkPolicy::default(),
		client_auth: ClientAuthMethod::RequestBody,
		map_profile,
	}
}

fn map_profile(profile: &RawProfile) -> Result<NormalizedIdentity, BrokerError> {
	// Twitter does not state whether the address was ever confirmed
	NormalizedIdentity::new(
		profile.string(&["id_str", "id"]).unwrap_or_default(),
		profile.string(&["name", "screen_name"]).unwrap_or_default(),
		profile.string(&["email"]).unwrap_or_default(),
		false,
		None,
		profile.string(&["profile_image_url_https"]),
	)
}
