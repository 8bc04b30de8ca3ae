use std::sync::Arc;

use async_trait::async_trait;
use auth::AuthenticationError;
use auth::Authenticator;
use auth::Role;
use chrono::Utc;

use crate::domain::account::errors::AccountError;
use crate::domain::account::models::Account;
use crate::domain::account::models::AccountChanges;
use crate::domain::account::models::AccountFilter;
use crate::domain::account::models::AccountId;
use crate::domain::account::models::AccountPatch;
use crate::domain::account::models::AccountQuery;
use crate::domain::account::models::AccountStatus;
use crate::domain::account::models::Actor;
use crate::domain::account::models::CreateAccountCommand;
use crate::domain::account::models::LoginCommand;
use crate::domain::account::models::LoginOutcome;
use crate::domain::account::models::RegisterCommand;
use crate::domain::account::ports::AccountDirectoryPort;
use crate::domain::account::ports::AccountRepository;
use crate::domain::account::profile::ProfileView;
use crate::domain::pagination::Page;
use crate::domain::pagination::PageRequest;

/// Account lifecycle service.
///
/// Every mutation on behalf of another account goes through the role policy
/// using the actor's stored role.
pub struct AccountDirectory<R>
where
    R: AccountRepository,
{
    repository: Arc<R>,
    authenticator: Arc<Authenticator>,
}

impl<R> AccountDirectory<R>
where
    R: AccountRepository,
{
    /// Create a new account directory with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - Account persistence implementation
    /// * `authenticator` - Shared password hasher and token issuer
    pub fn new(repository: Arc<R>, authenticator: Arc<Authenticator>) -> Self {
        Self {
            repository,
            authenticator,
        }
    }

    async fn find_account(&self, id: &AccountId) -> Result<Account, AccountError> {
        self.repository
            .find_one(AccountFilter::Id(*id))
            .await?
            .ok_or(AccountError::NotFound(id.to_string()))
    }

    /// Re-load the actor and replace the token role with the stored one.
    async fn resolve_actor(&self, actor: Actor) -> Result<Actor, AccountError> {
        let stored = self
            .repository
            .find_one(AccountFilter::Id(actor.id))
            .await?
            .ok_or(AccountError::UnknownActor)?;

        if !stored.is_active() {
            tracing::warn!(actor_id = %actor.id, "Inactive account attempted a privileged action");
            return Err(AccountError::InactiveAccount);
        }

        if stored.role != actor.role {
            tracing::info!(
                actor_id = %actor.id,
                token_role = %actor.role,
                stored_role = %stored.role,
                "Token role is stale, using stored role"
            );
        }

        Ok(Actor {
            id: stored.id,
            role: stored.role,
        })
    }

    async fn insert_new(&self, command: CreateAccountCommand) -> Result<Account, AccountError> {
        let taken = self
            .repository
            .find_one(AccountFilter::EmailOrUsername {
                email: command.email.as_str().to_string(),
                username: command.username.as_str().to_string(),
            })
            .await?;
        if taken.is_some() {
            return Err(AccountError::AccountAlreadyExists);
        }

        let password_hash = self
            .authenticator
            .hash_password(command.password.as_str())
            .map_err(|e| AccountError::Internal(format!("Password hashing failed: {}", e)))?;

        let now = Utc::now();
        let account = Account {
            id: AccountId::new(),
            name: command.name,
            email: command.email,
            username: command.username,
            password_hash,
            role: command.role,
            status: AccountStatus::Active,
            phone: command.phone,
            department: command.department,
            bio: command.bio,
            profile_image: None,
            social_links: None,
            last_login: None,
            created_at: now,
            updated_at: now,
        };

        self.repository.insert(account).await
    }
}

#[async_trait]
impl<R> AccountDirectoryPort for AccountDirectory<R>
where
    R: AccountRepository,
{
    async fn register(&self, command: RegisterCommand) -> Result<Account, AccountError> {
        let account = self.insert_new(command).await?;

        tracing::info!(account_id = %account.id, role = %account.role, "Account registered");

        Ok(account)
    }

    async fn login(&self, command: LoginCommand) -> Result<LoginOutcome, AccountError> {
        let mut account = self
            .repository
            .find_one(AccountFilter::Email(command.email))
            .await?
            .ok_or(AccountError::InvalidCredentials)?;

        let result = self
            .authenticator
            .authenticate(
                &command.password,
                &account.password_hash,
                &account.id.to_string(),
                account.role,
            )
            .map_err(|e| match e {
                AuthenticationError::InvalidCredentials => AccountError::InvalidCredentials,
                AuthenticationError::JwtError(e) => AccountError::Internal(e.to_string()),
            })?;

        if !account.is_active() {
            return Err(AccountError::InactiveAccount);
        }

        let changes = AccountChanges::login(Utc::now());
        changes.apply_to(&mut account);

        let repository = Arc::clone(&self.repository);
        let account_id = account.id;
        tokio::spawn(async move {
            if let Err(e) = repository.update_fields(&account_id, changes).await {
                tracing::warn!(account_id = %account_id, error = %e, "Failed to record last login");
            }
        });

        tracing::info!(account_id = %account.id, "Account logged in");

        Ok(LoginOutcome {
            token: result.access_token,
            account,
        })
    }

    async fn get_profile(&self, id: &AccountId) -> Result<ProfileView, AccountError> {
        self.find_account(id).await.map(ProfileView::from)
    }

    async fn get_account(&self, id: &AccountId) -> Result<Account, AccountError> {
        self.find_account(id).await
    }

    async fn list_accounts(
        &self,
        query: AccountQuery,
        page: PageRequest,
    ) -> Result<Page<Account>, AccountError> {
        let total = self.repository.count(query.clone()).await?;
        let items = self.repository.find_page(query, page).await?;

        Ok(Page {
            items,
            total,
            request: page,
        })
    }

    async fn create_account(
        &self,
        actor: Actor,
        command: CreateAccountCommand,
    ) -> Result<Account, AccountError> {
        let actor = self.resolve_actor(actor).await?;

        if !auth::policy::can_create(actor.role, command.role) {
            tracing::warn!(
                actor_id = %actor.id,
                actor_role = %actor.role,
                target_role = %command.role,
                "Account creation denied"
            );
            return Err(AccountError::Forbidden);
        }

        let account = self.insert_new(command).await?;

        tracing::info!(
            actor_id = %actor.id,
            account_id = %account.id,
            role = %account.role,
            "Account created"
        );

        Ok(account)
    }

    async fn update_account(
        &self,
        actor: Actor,
        id: &AccountId,
        patch: AccountPatch,
    ) -> Result<Account, AccountError> {
        let actor = self.resolve_actor(actor).await?;
        let mut account = self.find_account(id).await?;

        if !auth::policy::can_update(actor.role, account.role, patch.role) {
            tracing::warn!(
                actor_id = %actor.id,
                actor_role = %actor.role,
                target_id = %id,
                target_role = %account.role,
                "Account update denied"
            );
            return Err(AccountError::Forbidden);
        }

        if let Some(email) = &patch.email {
            let taken = self
                .repository
                .find_one(AccountFilter::EmailExcluding {
                    email: email.as_str().to_string(),
                    excluded: *id,
                })
                .await?;
            if taken.is_some() {
                return Err(AccountError::EmailAlreadyExists(email.to_string()));
            }
        }

        if let Some(username) = &patch.username {
            let taken = self
                .repository
                .find_one(AccountFilter::UsernameExcluding {
                    username: username.as_str().to_string(),
                    excluded: *id,
                })
                .await?;
            if taken.is_some() {
                return Err(AccountError::UsernameAlreadyExists(username.to_string()));
            }
        }

        let changes = AccountChanges::from_patch(patch, Utc::now().max(account.created_at));
        self.repository.update_fields(id, changes.clone()).await?;
        changes.apply_to(&mut account);

        tracing::info!(actor_id = %actor.id, account_id = %id, "Account updated");

        Ok(account)
    }

    async fn delete_account(&self, actor: Actor, id: &AccountId) -> Result<(), AccountError> {
        let actor = self.resolve_actor(actor).await?;
        let account = self.find_account(id).await?;

        if !auth::policy::can_delete(actor.role, account.role) {
            tracing::warn!(
                actor_id = %actor.id,
                actor_role = %actor.role,
                target_id = %id,
                target_role = %account.role,
                "Account deletion denied"
            );
            return Err(AccountError::Forbidden);
        }

        self.repository.delete(id).await?;

        tracing::info!(actor_id = %actor.id, account_id = %id, "Account deleted");

        Ok(())
    }

    async fn ensure_bootstrap_admin(
        &self,
        command: CreateAccountCommand,
    ) -> Result<bool, AccountError> {
        // Either field may have been edited since the admin was seeded
        let existing = self
            .repository
            .find_one(AccountFilter::EmailOrUsername {
                email: command.email.as_str().to_string(),
                username: command.username.as_str().to_string(),
            })
            .await?;
        if existing.is_some() {
            tracing::debug!(email = %command.email, "Bootstrap admin already present");
            return Ok(false);
        }

        let account = match self
            .insert_new(CreateAccountCommand {
                role: Role::Admin,
                ..command
            })
            .await
        {
            Ok(account) => account,
            Err(e) if e.is_conflict() => {
                tracing::debug!(error = %e, "Bootstrap admin inserted concurrently");
                return Ok(false);
            }
            Err(e) => return Err(e),
        };

        tracing::info!(account_id = %account.id, email = %account.email, "Bootstrap admin created");

        Ok(true)
    }
}
