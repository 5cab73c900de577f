//! OAuth1/OAuth2 flow implementations

pub mod authorization;
pub mod oauth1;
pub mod pkce;
pub mod refresh;
pub mod state;
pub mod token_exchange;

pub use authorization::{AuthorizationFlow, generate_nonce, generate_state};
pub use oauth1::{AccessToken, OAuth1Flow, RequestToken};
pub use pkce::{CodeChallenge, CodeVerifier};
pub use refresh::RefreshFlow;
pub use state::{InMemoryStateStore, StateData, StateStore};
pub use token_exchange::TokenExchangeFlow;
