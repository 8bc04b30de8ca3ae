use async_trait::async_trait;

use crate::domain::account::errors::AccountError;
use crate::domain::account::models::Account;
use crate::domain::account::models::AccountChanges;
use crate::domain::account::models::AccountFilter;
use crate::domain::account::models::AccountId;
use crate::domain::account::models::AccountPatch;
use crate::domain::account::models::AccountQuery;
use crate::domain::account::models::Actor;
use crate::domain::account::models::CreateAccountCommand;
use crate::domain::account::models::LoginCommand;
use crate::domain::account::models::LoginOutcome;
use crate::domain::account::models::RegisterCommand;
use crate::domain::account::profile::ProfileView;
use crate::domain::pagination::Page;
use crate::domain::pagination::PageRequest;

/// Port for account directory operations.
#[async_trait]
pub trait AccountDirectoryPort: Send + Sync + 'static {
    /// Self-service registration.
    ///
    /// No role policy applies: the requested role is stored as given,
    /// including admin.
    ///
    /// # Arguments
    /// * `command` - Validated account fields
    ///
    /// # Returns
    /// Created active account
    ///
    /// # Errors
    /// * `AccountAlreadyExists` - Email or username is already taken
    /// * `Database` - Database operation failed
    async fn register(&self, command: RegisterCommand) -> Result<Account, AccountError>;

    /// Verify credentials and issue a token.
    ///
    /// # Arguments
    /// * `command` - Email and plaintext password
    ///
    /// # Returns
    /// Fresh token and the account with its login timestamp set
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown email or wrong password
    /// * `InactiveAccount` - Credentials valid but account inactive
    async fn login(&self, command: LoginCommand) -> Result<LoginOutcome, AccountError>;

    /// Profile of the authenticated account.
    ///
    /// # Errors
    /// * `NotFound` - Account no longer exists
    async fn get_profile(&self, id: &AccountId) -> Result<ProfileView, AccountError>;

    /// Retrieve account by identifier.
    ///
    /// # Errors
    /// * `NotFound` - Account does not exist
    async fn get_account(&self, id: &AccountId) -> Result<Account, AccountError>;

    /// Filtered listing, newest first.
    ///
    /// # Arguments
    /// * `query` - Search, role and status filters
    /// * `page` - Page window
    ///
    /// # Returns
    /// Requested page and total matching count
    async fn list_accounts(
        &self,
        query: AccountQuery,
        page: PageRequest,
    ) -> Result<Page<Account>, AccountError>;

    /// Create an account on behalf of `actor`.
    ///
    /// # Errors
    /// * `UnknownActor` / `InactiveAccount` - Actor is gone or disabled
    /// * `Forbidden` - Actor may not create the requested role
    /// * `AccountAlreadyExists` - Email or username is already taken
    async fn create_account(
        &self,
        actor: Actor,
        command: CreateAccountCommand,
    ) -> Result<Account, AccountError>;

    /// Apply a partial update on behalf of `actor`.
    ///
    /// # Errors
    /// * `UnknownActor` / `InactiveAccount` - Actor is gone or disabled
    /// * `NotFound` - Target does not exist
    /// * `Forbidden` - Actor may not make this change
    /// * `EmailAlreadyExists` / `UsernameAlreadyExists` - Held by another account
    async fn update_account(
        &self,
        actor: Actor,
        id: &AccountId,
        patch: AccountPatch,
    ) -> Result<Account, AccountError>;

    /// Delete an account on behalf of `actor`.
    ///
    /// # Errors
    /// * `UnknownActor` / `InactiveAccount` - Actor is gone or disabled
    /// * `NotFound` - Target does not exist
    /// * `Forbidden` - Target is protected from this actor
    async fn delete_account(&self, actor: Actor, id: &AccountId) -> Result<(), AccountError>;

    /// Create the configured administrator unless its email or username is
    /// already held. A concurrent insert counts as already held.
    ///
    /// # Returns
    /// Whether an account was created
    async fn ensure_bootstrap_admin(
        &self,
        command: CreateAccountCommand,
    ) -> Result<bool, AccountError>;
}

/// Persistence operations for account aggregate.
#[async_trait]
pub trait AccountRepository: Send + Sync + 'static {
    /// First account matching `filter`.
    ///
    /// # Returns
    /// Optional account entity (None if nothing matches)
    ///
    /// # Errors
    /// * `Database` - Database operation failed
    async fn find_one(&self, filter: AccountFilter) -> Result<Option<Account>, AccountError>;

    /// Persist new account to storage.
    ///
    /// # Errors
    /// * `EmailAlreadyExists` / `UsernameAlreadyExists` - Unique constraint hit
    /// * `Database` - Database operation failed
    async fn insert(&self, account: Account) -> Result<Account, AccountError>;

    /// Write only the present fields of `changes`.
    ///
    /// # Errors
    /// * `NotFound` - Account does not exist
    /// * `EmailAlreadyExists` / `UsernameAlreadyExists` - Unique constraint hit
    /// * `Database` - Database operation failed
    async fn update_fields(
        &self,
        id: &AccountId,
        changes: AccountChanges,
    ) -> Result<(), AccountError>;

    /// Remove account from storage.
    ///
    /// # Errors
    /// * `NotFound` - Account does not exist
    /// * `Database` - Database operation failed
    async fn delete(&self, id: &AccountId) -> Result<(), AccountError>;

    /// Number of accounts matching `query`.
    async fn count(&self, query: AccountQuery) -> Result<u64, AccountError>;

    /// Accounts matching `query`, `created_at` descending, windowed by `page`.
    async fn find_page(
        &self,
        query: AccountQuery,
        page: PageRequest,
    ) -> Result<Vec<Account>, AccountError>;
}
