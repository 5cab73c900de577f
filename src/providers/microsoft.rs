//! Microsoft (Entra ID) OIDC provider

use crate::core::{
	BrokerError, ClientAuthMethod, LinkPolicy, NormalizedIdentity, OidcConfig, ProviderConfig,
	ProviderDescriptor, RawProfile,
};

/// Microsoft descriptor for the multi-tenant "common" endpoint.
pub fn descriptor(
	client_id: String,
	client_secret: String,
	redirect_uri: String,
) -> ProviderDescriptor {
	descriptor_for_tenant(client_id, client_secret, redirect_uri, "common".to_string())
}

/// Microsoft descriptor pinned to a directory tenant.
pub fn descriptor_for_tenant(
	client_id: String,
	client_secret: String,
	redirect_uri: String,
	tenant: String,
) -> ProviderDescriptor {
	let discovery_url = format!(
		"https://login.microsoftonline.com/{tenant}/v2.0/.well-known/openid-configuration"
	);

	ProviderDescriptor {
		config: ProviderConfig {
			name: "microsoft".to_string(),
			client_id,
			client_secret,
			redirect_uri,
			scopes: vec![
				"openid".to_string(),
				"email".to_string(),
				"profile".to_string(),
			],
			oidc: Some(OidcConfig {
				discovery_url,
				use_nonce: true,
			}),
			oauth2: None,
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
		profile
			.string(&["email", "preferred_username"])
			.unwrap_or_default(),
		profile.boolean("email_verified").unwrap_or(false),
		None,
		profile.string(&["picture"]),
	)
}
