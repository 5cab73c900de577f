//! Account-linking decision core
//!
//! Decides, for one normalized identity and one requesting session,
//! whether to log in an existing linked account, attach the identity to
//! an account, create a new account, or reject the attempt. Bindings
//! are created here and nowhere else.

use std::sync::Arc;

use tracing::debug;

use crate::core::{BrokerError, LinkPolicy, NormalizedIdentity};
use crate::linking::store::{AccountId, UserStore};

/// Successful outcome of a linking decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkOutcome {
	/// An existing account was authenticated
	LoggedIn(AccountId),
	/// A new account was created and authenticated
	CreatedAndLoggedIn(AccountId),
	/// The identity was attached to the already-authenticated account
	Linked(AccountId),
}

impl LinkOutcome {
	/// The local account the outcome refers to.
	pub fn account_id(&self) -> AccountId {
		match self {
			LinkOutcome::LoggedIn(id)
			| LinkOutcome::CreatedAndLoggedIn(id)
			| LinkOutcome::Linked(id) => *id,
		}
	}
}

/// The linking decision engine. Stateless across attempts; all state
/// lives in the user store.
pub struct AccountLinker {
	store: Arc<dyn UserStore>,
	/// Host-wide registration toggle; `force_account_creation` in a
	/// provider policy overrides it.
	registration_open: bool,
}

impl AccountLinker {
	/// Creates a linker over a user store.
	pub fn new(store: Arc<dyn UserStore>, registration_open: bool) -> Self {
		Self {
			store,
			registration_open,
		}
	}

	/// Runs the decision table for one login attempt.
	///
	/// Evaluated in order, first match wins:
	///
	/// 1. The identity is already linked: log that account in, unless a
	///    different account is currently in session.
	/// 2. Anonymous session, email matches an existing account: link and
	///    log in, if policy admits unlinked logins and the email is
	///    trustworthy.
	/// 3. Anonymous session, no matching account: create account and
	///    link, if policy admits creation.
	/// 4. Authenticated session, no existing link: attach the identity
	///    to the session's account.
	pub async fn resolve(
		&self,
		provider: &str,
		identity: &NormalizedIdentity,
		session_user: Option<AccountId>,
		policy: &LinkPolicy,
	) -> Result<LinkOutcome, BrokerError> {
		let existing = self
			.store
			.find_by_linked_identity(provider, identity.external_id())
			.await?;

		if let Some(account_id) = existing {
			if let Some(session_account) = session_user {
				if session_account != account_id {
					debug!(provider, "identity already linked to a different account");
					return Err(BrokerError::AlreadyLinkedToOtherAccount);
				}
			}
			debug!(provider, %account_id, "logging in linked account");
			return Ok(LinkOutcome::LoggedIn(account_id));
		}

		if let Some(session_account) = session_user {
			// Explicit "link my account" action from a logged-in user
			self.store
				.create_link(session_account, provider, identity.external_id())
				.await?;
			debug!(provider, account_id = %session_account, "linked identity to session account");
			return Ok(LinkOutcome::Linked(session_account));
		}

		// Anonymous session: fresh login attempt
		let matching_account = self.store.find_by_email(identity.email()).await?;

		if let Some(account_id) = matching_account {
			let email_trustworthy =
				identity.verified_by_provider() || policy.allow_verification_bypass;
			if policy.allow_login_when_unlinked && email_trustworthy {
				self.store
					.create_link(account_id, provider, identity.external_id())
					.await?;
				debug!(provider, %account_id, "auto-linked matching account by email");
				return Ok(LinkOutcome::LoggedIn(account_id));
			}
			// An unverified or policy-blocked email must never reach an
			// existing account, and creating a duplicate account for it
			// is worse. Reject.
			debug!(provider, "matching account exists but policy forbids unlinked login");
			return Err(BrokerError::CannotAuthenticateOrCreate);
		}

		let creation_allowed = (policy.allow_account_creation && self.registration_open)
			|| policy.force_account_creation;
		if creation_allowed {
			let email_verified = identity.verified_by_provider()
				|| (policy.allow_verification_bypass && !identity.email().is_empty());
			let account_id = self
				.store
				.create_account(identity.display_name(), identity.email(), email_verified)
				.await?;
			self.store
				.create_link(account_id, provider, identity.external_id())
				.await?;
			debug!(provider, %account_id, "created account for new identity");
			return Ok(LinkOutcome::CreatedAndLoggedIn(account_id));
		}

		debug!(provider, "policy admits neither login nor account creation");
		Err(BrokerError::CannotAuthenticateOrCreate)
	}

	/// Removes every social binding owned by an account (user-initiated
	/// unlink or account deletion).
	pub async fn unlink_all(&self, account_id: AccountId) -> Result<(), BrokerError> {
		self.store.delete_links_for_account(account_id).await
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::linking::store::InMemoryUserStore;

	fn identity(verified: bool) -> NormalizedIdentity {
		NormalizedIdentity::new("ext-1", "Ada Lovelace", "ada@example.com", verified, None, None)
			.unwrap()
	}

	fn open_policy() -> LinkPolicy {
		LinkPolicy {
			allow_login_when_unlinked: true,
			allow_account_creation: true,
			force_account_creation: false,
			allow_verification_bypass: false,
		}
	}

	#[tokio::test]
	async fn test_existing_link_logs_in() {
		let store = Arc::new(InMemoryUserStore::new());
		let account = store.create_account("Ada", "ada@example.com", true).await.unwrap();
		store.create_link(account, "github", "ext-1").await.unwrap();
		let linker = AccountLinker::new(store, true);

		let outcome = linker
			.resolve("github", &identity(true), None, &open_policy())
			.await
			.unwrap();
		assert_eq!(outcome, LinkOutcome::LoggedIn(account));
	}

	#[tokio::test]
	async fn test_existing_link_with_other_session_account_fails() {
		let store = Arc::new(InMemoryUserStore::new());
		let owner = store.create_account("Ada", "ada@example.com", true).await.unwrap();
		let intruder = store.create_account("Eve", "eve@example.com", true).await.unwrap();
		store.create_link(owner, "github", "ext-1").await.unwrap();
		let linker = AccountLinker::new(store, true);

		let result = linker
			.resolve("github", &identity(true), Some(intruder), &open_policy())
			.await;
		assert!(matches!(result, Err(BrokerError::AlreadyLinkedToOtherAccount)));
	}

	#[tokio::test]
	async fn test_logged_in_user_links_fresh_identity() {
		let store = Arc::new(InMemoryUserStore::new());
		let account = store.create_account("Ada", "ada@example.com", true).await.unwrap();
		let linker = AccountLinker::new(store.clone(), true);

		let outcome = linker
			.resolve("github", &identity(true), Some(account), &open_policy())
			.await
			.unwrap();
		assert_eq!(outcome, LinkOutcome::Linked(account));
		assert_eq!(store.links_for_account(account).await.len(), 1);
	}

	#[tokio::test]
	async fn test_email_match_auto_links() {
		let store = Arc::new(InMemoryUserStore::new());
		let account = store.create_account("Ada", "ADA@example.com", true).await.unwrap();
		let linker = AccountLinker::new(store.clone(), true);

		let outcome = linker
			.resolve("github", &identity(true), None, &open_policy())
			.await
			.unwrap();
		assert_eq!(outcome, LinkOutcome::LoggedIn(account));
		assert_eq!(store.links_for_account(account).await.len(), 1);
	}

	#[tokio::test]
	async fn test_unverified_email_match_is_rejected_without_bypass() {
		let store = Arc::new(InMemoryUserStore::new());
		store.create_account("Ada", "ada@example.com", true).await.unwrap();
		let linker = AccountLinker::new(store.clone(), true);

		let result = linker
			.resolve("github", &identity(false), None, &open_policy())
			.await;
		assert!(matches!(result, Err(BrokerError::CannotAuthenticateOrCreate)));
		// No duplicate account was created either
		assert_eq!(store.account_count().await, 1);
	}

	#[tokio::test]
	async fn test_unverified_email_match_links_with_bypass() {
		let store = Arc::new(InMemoryUserStore::new());
		let account = store.create_account("Ada", "ada@example.com", true).await.unwrap();
		let linker = AccountLinker::new(store, true);

		let mut policy = open_policy();
		policy.allow_verification_bypass = true;
		let outcome = linker
			.resolve("github", &identity(false), None, &policy)
			.await
			.unwrap();
		assert_eq!(outcome, LinkOutcome::LoggedIn(account));
	}

	#[tokio::test]
	async fn test_new_identity_creates_account() {
		let store = Arc::new(InMemoryUserStore::new());
		let linker = AccountLinker::new(store.clone(), true);

		let outcome = linker
			.resolve("github", &identity(true), None, &open_policy())
			.await
			.unwrap();
		let account_id = match outcome {
			LinkOutcome::CreatedAndLoggedIn(id) => id,
			other => panic!("expected account creation, got {other:?}"),
		};

		let record = store.account(account_id).await.unwrap();
		assert_eq!(record.name, "Ada Lovelace");
		assert_eq!(record.email, "ada@example.com");
		assert!(record.email_verified);
		assert_eq!(store.links_for_account(account_id).await.len(), 1);
	}

	#[tokio::test]
	async fn test_creation_blocked_by_closed_registration() {
		let store = Arc::new(InMemoryUserStore::new());
		let linker = AccountLinker::new(store, false);

		let result = linker
			.resolve("github", &identity(true), None, &open_policy())
			.await;
		assert!(matches!(result, Err(BrokerError::CannotAuthenticateOrCreate)));
	}

	#[tokio::test]
	async fn test_force_creation_overrides_closed_registration() {
		let store = Arc::new(InMemoryUserStore::new());
		let linker = AccountLinker::new(store, false);

		let mut policy = open_policy();
		policy.force_account_creation = true;
		let outcome = linker
			.resolve("github", &identity(true), None, &policy)
			.await
			.unwrap();
		assert!(matches!(outcome, LinkOutcome::CreatedAndLoggedIn(_)));
	}

	#[tokio::test]
	async fn test_creation_disallowed_by_policy() {
		let store = Arc::new(InMemoryUserStore::new());
		let linker = AccountLinker::new(store, true);

		let mut policy = open_policy();
		policy.allow_account_creation = false;
		// Regardless of the verified flag
		for verified in [true, false] {
			let result = linker
				.resolve("github", &identity(verified), None, &policy)
				.await;
			assert!(matches!(result, Err(BrokerError::CannotAuthenticateOrCreate)));
		}
	}

	#[tokio::test]
	async fn test_created_account_unverified_without_provider_assertion() {
		let store = Arc::new(InMemoryUserStore::new());
		let linker = AccountLinker::new(store.clone(), true);

		let mut policy = open_policy();
		policy.allow_login_when_unlinked = false;
		let outcome = linker
			.resolve("github", &identity(false), None, &policy)
			.await
			.unwrap();
		let record = store.account(outcome.account_id()).await.unwrap();
		assert!(!record.email_verified);
	}

	#[tokio::test]
	async fn test_unlink_all() {
		let store = Arc::new(InMemoryUserStore::new());
		let account = store.create_account("Ada", "ada@example.com", true).await.unwrap();
		store.create_link(account, "github", "ext-1").await.unwrap();
		let linker = AccountLinker::new(store.clone(), true);

		linker.unlink_all(account).await.unwrap();
		assert!(store.links_for_account(account).await.is_empty());
	}
}
