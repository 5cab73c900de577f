//! OpenID Connect support: discovery and user-info

pub mod discovery;
pub mod userinfo;

pub use discovery::{DiscoveryClient, ProviderEndpoints};
pub use userinfo::UserInfoClient;
