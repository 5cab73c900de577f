//! Account linking: decision engine and user store contract

pub mod engine;
pub mod store;

pub use engine::{AccountLinker, LinkOutcome};
pub use store::{AccountId, AccountRecord, InMemoryUserStore, LinkedIdentity, UserStore};
