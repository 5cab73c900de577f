//! Core types: configuration, HTTP client, errors, tokens, identities

pub mod client;
pub mod config;
pub mod error;
pub mod identity;
pub mod provider;
pub mod timezone;
pub mod token;

pub use client::OAuth2Client;
pub use config::{LinkPolicy, OAuth1Config, OAuth2Config, OidcConfig, ProviderConfig};
pub use error::{BrokerError, FailureDisposition};
pub use identity::{NormalizedIdentity, RawProfile};
pub use provider::{ClientAuthMethod, ProfileMapper, ProviderDescriptor};
pub use timezone::normalize_timezone;
pub use token::{OAuthToken, TokenResponse};
