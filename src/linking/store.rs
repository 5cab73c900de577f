//! User store contract and linked-identity records
//!
//! The broker consumes the host's user database through [`UserStore`]:
//! lookup by email or linked identity, account creation, and link
//! management. The in-memory implementation backs tests and examples.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::core::BrokerError;

/// Local account identifier.
pub type AccountId = Uuid;

/// Persistent binding between a provider identity and a local account.
///
/// Each `(provider, external_id)` pair maps to at most one account; one
/// account may carry several links, one per provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkedIdentity {
	pub provider: String,
	pub external_id: String,
	pub account_id: AccountId,
	pub linked_at: DateTime<Utc>,
}

/// Host user database contract.
#[async_trait]
pub trait UserStore: Send + Sync {
	/// Account bound to `(provider, external_id)`, if any.
	async fn find_by_linked_identity(
		&self,
		provider: &str,
		external_id: &str,
	) -> Result<Option<AccountId>, BrokerError>;

	/// Account whose email matches, compared case-insensitively and
	/// exactly (no fuzzy matching).
	async fn find_by_email(&self, email: &str) -> Result<Option<AccountId>, BrokerError>;

	/// Creates a local account.
	async fn create_account(
		&self,
		name: &str,
		email: &str,
		email_verified: bool,
	) -> Result<AccountId, BrokerError>;

	/// Creates a `(provider, external_id)` binding.
	///
	/// Fails with [`BrokerError::IdentityAlreadyLinkedElsewhere`] when
	/// the pair is already bound to a different account; rebinding to
	/// the same account is a no-op.
	async fn create_link(
		&self,
		account_id: AccountId,
		provider: &str,
		external_id: &str,
	) -> Result<(), BrokerError>;

	/// Removes every binding owned by an account.
	async fn delete_links_for_account(&self, account_id: AccountId) -> Result<(), BrokerError>;
}

/// Account fields the in-memory store keeps.
#[derive(Debug, Clone)]
pub struct AccountRecord {
	pub name: String,
	pub email: String,
	pub email_verified: bool,
}

/// In-memory user store for development and testing.
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
	accounts: RwLock<HashMap<AccountId, AccountRecord>>,
	links: RwLock<HashMap<(String, String), LinkedIdentity>>,
}

impl InMemoryUserStore {
	/// Creates an empty store.
	pub fn new() -> Self {
		Self::default()
	}

	/// Account record by id.
	pub async fn account(&self, account_id: AccountId) -> Option<AccountRecord> {
		self.accounts.read().await.get(&account_id).cloned()
	}

	/// Every link owned by an account.
	pub async fn links_for_account(&self, account_id: AccountId) -> Vec<LinkedIdentity> {
		self.links
			.read()
			.await
			.values()
			.filter(|link| link.account_id == account_id)
			.cloned()
			.collect()
	}

	/// Number of accounts in the store.
	pub async fn account_count(&self) -> usize {
		self.accounts.read().await.len()
	}
}

#[async_trait]
impl UserStore for InMemoryUserStore {
	async fn find_by_linked_identity(
		&self,
		provider: &str,
		external_id: &str,
	) -> Result<Option<AccountId>, BrokerError> {
		let links = self.links.read().await;
		Ok(links
			.get(&(provider.to_string(), external_id.to_string()))
			.map(|link| link.account_id))
	}

	async fn find_by_email(&self, email: &str) -> Result<Option<AccountId>, BrokerError> {
		if email.is_empty() {
			return Ok(None);
		}
		let accounts = self.accounts.read().await;
		Ok(accounts
			.iter()
			.find(|(_, record)| record.email.eq_ignore_ascii_case(email))
			.map(|(id, _)| *id))
	}

	async fn create_account(
		&self,
		name: &str,
		email: &str,
		email_verified: bool,
	) -> Result<AccountId, BrokerError> {
		let id = Uuid::new_v4();
		let mut accounts = self.accounts.write().await;
		accounts.insert(
			id,
			AccountRecord {
				name: name.to_string(),
				email: email.to_string(),
				email_verified,
			},
		);
		Ok(id)
	}

	async fn create_link(
		&self,
		account_id: AccountId,
		provider: &str,
		external_id: &str,
	) -> Result<(), BrokerError> {
		let key = (provider.to_string(), external_id.to_string());
		let mut links = self.links.write().await;
		if let Some(existing) = links.get(&key) {
			if existing.account_id != account_id {
				return Err(BrokerError::IdentityAlreadyLinkedElsewhere);
			}
			return Ok(());
		}
		links.insert(
			key,
			LinkedIdentity {
				provider: provider.to_string(),
				external_id: external_id.to_string(),
				account_id,
				linked_at: Utc::now(),
			},
		);
		Ok(())
	}

	async fn delete_links_for_account(&self, account_id: AccountId) -> Result<(), BrokerError> {
		let mut links = self.links.write().await;
		links.retain(|_, link| link.account_id != account_id);
		Ok(())
	}
}
