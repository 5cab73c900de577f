//! Provider adapters
//!
//! One module per identity provider, each exposing a `descriptor()`
//! constructor (endpoints, scopes, credential style) and a private
//! profile mapper. Adding a provider means adding a file here; nothing
//! else in the broker changes.

pub mod amazon;
pub mod discord;
pub mod facebook;
pub mod github;
pub mod google;
pub mod linkedin;
pub mod microsoft;
pub mod paypal;
pub mod spotify;
pub mod synology;
pub mod twitch;
pub mod twitter;
pub mod yahoo;

use crate::core::ProviderDescriptor;

/// Builds the descriptor for a provider by name.
///
/// Covers the providers whose constructor takes the common
/// `(client_id, client_secret, redirect_uri)` triple; `synology`
/// (base URL) and `microsoft` tenant pinning need their specific
/// constructors.
pub fn by_name(
	name: &str,
	client_id: String,
	client_secret: String,
	redirect_uri: String,
) -> Option<ProviderDescriptor> {
	let descriptor = match name {
		"amazon" => amazon::descriptor(client_id, client_secret, redirect_uri),
		"discord" => discord::descriptor(client_id, client_secret, redirect_uri),
		"facebook" => facebook::descriptor(client_id, client_secret, redirect_uri),
		"github" => github::descriptor(client_id, client_secret, redirect_uri),
		"google" => google::descriptor(client_id, client_secret, redirect_uri),
		"linkedin" => linkedin::descriptor(client_id, client_secret, redirect_uri),
		"microsoft" => microsoft::descriptor(client_id, client_secret, redirect_uri),
		"paypal" => paypal::descriptor(client_id, client_secret, redirect_uri),
		"spotify" => spotify::descriptor(client_id, client_secret, redirect_uri),
		"twitch" => twitch::descriptor(client_id, client_secret, redirect_uri),
		"twitter" => twitter::descriptor(client_id, client_secret, redirect_uri),
		"yahoo" => yahoo::descriptor(client_id, client_secret, redirect_uri),
		_ => return None,
	};
	Some(descriptor)
}
