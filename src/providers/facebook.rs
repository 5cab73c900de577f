//! Facebook OAuth2 provider

use crate::core::{
	BrokerError, ClientAuthMethod, LinkPolicy, NormalizedIdentity, OAuth2Config, ProviderConfig,
	ProviderDescriptor, RawProfile,
};

/// Facebook descriptor, static Graph API endpoints.
pub fn descriptor(
	client_id: String,
	client_secret: String,
	redirect_uri: String,
) -> ProviderDescriptor {
	ProviderDescriptor {
		config: ProviderConfig {
			name: "facebook".to_string(),
			client_id,
			client_secret,
			redirect_uri,
			scopes: vec!["public_profile".to_string(), "email".to_string()],
			oidc: None,
			oauth2: Some(OAuth2Config {
				authorization_endpoint: "https://www.facebook.com/v19.0/dialog/oauth".to_string(),
				token_endpoint: "https://graph.facebook.com/v19.0/oauth/access_token".to_string(),
				userinfo_endpoint: Some(
					"https://graph.facebook.com/v19.0/me?fields=id,name,email,timezone".to_string(),
				),
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
	let email = profile.string(&["email"]).unwrap_or_default();
	// Facebook asserts nothing about the email. The Graph API only
	// returns an address the account has confirmed, so a non-empty
	// email is taken as verified. This inference is specific to
	// Facebook and must not be copied to other providers.
	let verified = !email.is_empty();
	let timezone = profile.string(&["timezone"]);

	NormalizedIdentity::new(
		profile.string(&["id"]).unwrap_or_default(),
		profile.string(&["name"]).unwrap_or_default(),
		email,
		verified,
		timezone.as_deref(),
		None,
	)
}
