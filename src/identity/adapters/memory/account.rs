//! In-memory repository for user accounts.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::identity::{
    domain::{EmailAddress, UserAccount, UserId},
    ports::{UserAccountRepository, UserAccountRepositoryError, UserAccountRepositoryResult},
};

/// Thread-safe in-memory user account repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserAccountRepository {
    state: Arc<RwLock<InMemoryAccountState>>,
}

#[derive(Debug, Default)]
struct InMemoryAccountState {
    accounts: HashMap<UserId, UserAccount>,
    email_index: HashMap<EmailAddress, UserId>,
}

impl InMemoryUserAccountRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned(err: impl ToString) -> UserAccountRepositoryError {
    UserAccountRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl UserAccountRepository for InMemoryUserAccountRepository {
    async fn store(&self, account: &UserAccount) -> UserAccountRepositoryResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;

        if state.accounts.contains_key(&account.id()) {
            return Err(UserAccountRepositoryError::DuplicateAccount(account.id()));
        }
        if state.email_index.contains_key(account.email()) {
            return Err(UserAccountRepositoryError::DuplicateEmail(
                account.email().clone(),
            ));
        }

        state
            .email_index
            .insert(account.email().clone(), account.id());
        state.accounts.insert(account.id(), account.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: UserId) -> UserAccountRepositoryResult<Option<UserAccount>> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state.accounts.get(&id).cloned())
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> UserAccountRepositoryResult<Option<UserAccount>> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state
            .email_index
            .get(email)
            .and_then(|id| state.accounts.get(id))
            .cloned())
    }

    async fn count(&self) -> UserAccountRepositoryResult<u64> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(u64::try_from(state.accounts.len()).unwrap_or(u64::MAX))
    }
}
