//! PKCE (RFC 7636) verifier and challenge

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::RngCore;
use sha2::{Digest, Sha256};

/// PKCE code verifier: 32 random octets, base64url-encoded (43 chars).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeVerifier(String);

impl CodeVerifier {
	/// Generates a fresh random verifier.
	pub fn generate() -> Self {
		let mut bytes = [0u8; 32];
		rand::thread_rng().fill_bytes(&mut bytes);
		Self(URL_SAFE_NO_PAD.encode(bytes))
	}

	/// Wraps a verifier restored from the state store.
	pub fn from_raw(raw: String) -> Self {
		Self(raw)
	}

	/// The verifier string sent with the token exchange.
	pub fn as_str(&self) -> &str {
		&self.0
	}
}

/// PKCE S256 code challenge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeChallenge(String);

impl CodeChallenge {
	/// Derives the S256 challenge for a verifier.
	pub fn s256(verifier: &CodeVerifier) -> Self {
		let digest = Sha256::digest(verifier.as_str().as_bytes());
		Self(URL_SAFE_NO_PAD.encode(digest))
	}

	/// The challenge string embedded in the authorization URL.
	pub fn as_str(&self) -> &str {
		&self.0
	}
}
