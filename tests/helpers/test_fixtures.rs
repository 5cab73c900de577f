//! Descriptor fixtures pointed at the mock server

use janus_auth::core::{
	ClientAuthMethod, LinkPolicy, NormalizedIdentity, OAuth1Config, OAuth2Config, OidcConfig,
	ProviderConfig, ProviderDescriptor, RawProfile,
};
use janus_auth::BrokerError;

use super::mock_server::MockOAuth2Server;

/// Mapper for the mock server's default profile shape:
/// `{id, name, email, verified}` (or the OIDC `sub`/`email_verified`
/// spelling).
pub fn map_test_profile(profile: &RawProfile) -> Result<NormalizedIdentity, BrokerError> {
	NormalizedIdentity::new(
		profile.string(&["id", "id_str", "sub"]).unwrap_or_default(),
		profile.string(&["name"]).unwrap_or_default(),
		profile.string(&["email"]).unwrap_or_default(),
		profile
			.boolean("verified")
			.or_else(|| profile.boolean("email_verified"))
			.unwrap_or(false),
		None,
		None,
	)
}

/// Static-endpoint OAuth2 descriptor against the mock server.
pub fn oauth2_descriptor(server: &MockOAuth2Server, policy: LinkPolicy) -> ProviderDescriptor {
	ProviderDescriptor {
		config: ProviderConfig {
			name: "mockoauth".to_string(),
			client_id: "test_client_id".to_string(),
			client_secret: "test_client_secret".to_string(),
			redirect_uri: "http://localhost:8080/callback".to_string(),
			scopes: vec!["user".to_string()],
			oidc: None,
			oauth2: Some(OAuth2Config {
				authorization_endpoint: server.authorization_url(),
				token_endpoint: server.token_url(),
				userinfo_endpoint: Some(server.userinfo_url()),
			}),
			oauth1: None,
			extra_auth_params: vec![],
			extra_token_params: vec![],
		},
		policy,
		client_auth: ClientAuthMethod::RequestBody,
		map_profile: map_test_profile,
	}
}

/// Discovery-based OIDC descriptor against the mock server.
pub fn oidc_descriptor(server: &MockOAuth2Server, policy: LinkPolicy) -> ProviderDescriptor {
	ProviderDescriptor {
		config: ProviderConfig {
			name: "mockoidc".to_string(),
			client_id: "test_client_id".to_string(),
			client_secret: "test_client_secret".to_string(),
			redirect_uri: "http://localhost:8080/callback".to_string(),
			scopes: vec!["openid".to_string(), "email".to_string()],
			oidc: Some(OidcConfig {
				discovery_url: server.discovery_url(),
				use_nonce: true,
			}),
			oauth2: None,
			oauth1: None,
			extra_auth_params: vec![],
			extra_token_params: vec![],
		},
		policy,
		client_auth: ClientAuthMethod::RequestBody,
		map_profile: map_test_profile,
	}
}

/// OAuth1 descriptor against the mock server.
pub fn oauth1_descriptor(server: &MockOAuth2Server, policy: LinkPolicy) -> ProviderDescriptor {
	ProviderDescriptor {
		config: ProviderConfig {
			name: "mockoauth1".to_string(),
			client_id: "consumer_key".to_string(),
			client_secret: "consumer_secret".to_string(),
			redirect_uri: "http://localhost:8080/callback".to_string(),
			scopes: vec![],
			oidc: None,
			oauth2: None,
			oauth1: Some(OAuth1Config {
				request_token_endpoint: format!("{}/oauth/request_token", server.base_url()),
				authenticate_endpoint: format!("{}/oauth/authenticate", server.base_url()),
				access_token_endpoint: format!("{}/oauth/access_token", server.base_url()),
				verify_credentials_endpoint: format!("{}/verify_credentials", server.base_url()),
			}),
			extra_auth_params: vec![],
			extra_token_params: vec![],
		},
		policy,
		client_auth: ClientAuthMethod::RequestBody,
		map_profile: map_test_profile,
	}
}

/// Policy that admits unlinked logins and account creation.
pub fn open_policy() -> LinkPolicy {
	LinkPolicy {
		allow_login_when_unlinked: true,
		allow_account_creation: true,
		force_account_creation: false,
		allow_verification_bypass: false,
	}
}
