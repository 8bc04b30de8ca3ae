#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use auth::Authenticator;
use auth::Role;
use serde_json::json;
use tokio::sync::RwLock;
use venue_admin::account::errors::AccountError;
use venue_admin::domain::account::models::Account;
use venue_admin::domain::account::models::AccountChanges;
use venue_admin::domain::account::models::AccountFilter;
use venue_admin::domain::account::models::AccountId;
use venue_admin::domain::account::models::AccountQuery;
use venue_admin::domain::account::models::CreateAccountCommand;
use venue_admin::domain::account::models::DisplayName;
use venue_admin::domain::account::models::EmailAddress;
use venue_admin::domain::account::models::Password;
use venue_admin::domain::account::models::Username;
use venue_admin::domain::account::ports::AccountDirectoryPort;
use venue_admin::domain::account::ports::AccountRepository;
use venue_admin::domain::account::service::AccountDirectory;
use venue_admin::domain::pagination::PageRequest;
use venue_admin::inbound::http::router::create_router;

pub const JWT_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";
pub const ADMIN_EMAIL: &str = "admin@venue.test";
pub const ADMIN_PASSWORD: &str = "admin-password";

/// Account store kept in memory, enforcing the same uniqueness rules as the
/// database schema.
#[derive(Default)]
pub struct InMemoryAccountRepository {
    accounts: RwLock<Vec<Account>>,
}

impl InMemoryAccountRepository {
    fn check_unique(
        accounts: &[Account],
        id: AccountId,
        email: Option<&EmailAddress>,
        username: Option<&Username>,
    ) -> Result<(), AccountError> {
        for other in accounts.iter().filter(|a| a.id != id) {
            if let Some(email) = email {
                if &other.email == email {
                    return Err(AccountError::EmailAlreadyExists(email.to_string()));
                }
            }
            if let Some(username) = username {
                if &other.username == username {
                    return Err(AccountError::UsernameAlreadyExists(username.to_string()));
                }
            }
        }
        Ok(())
    }

    fn matching(accounts: &[Account], query: &AccountQuery) -> Vec<Account> {
        let mut matching: Vec<Account> = accounts
            .iter()
            .filter(|a| query.matches(a))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        matching
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn find_one(&self, filter: AccountFilter) -> Result<Option<Account>, AccountError> {
        let accounts = self.accounts.read().await;
        Ok(accounts.iter().find(|a| filter.matches(a)).cloned())
    }

    async fn insert(&self, account: Account) -> Result<Account, AccountError> {
        let mut accounts = self.accounts.write().await;
        Self::check_unique(
            &accounts,
            account.id,
            Some(&account.email),
            Some(&account.username),
        )?;
        accounts.push(account.clone());
        Ok(account)
    }

    async fn update_fields(
        &self,
        id: &AccountId,
        changes: AccountChanges,
    ) -> Result<(), AccountError> {
        let mut accounts = self.accounts.write().await;
        Self::check_unique(
            &accounts,
            *id,
            changes.email.as_ref(),
            changes.username.as_ref(),
        )?;
        let account = accounts
            .iter_mut()
            .find(|a| a.id == *id)
            .ok_or(AccountError::NotFound(id.to_string()))?;
        changes.apply_to(account);
        Ok(())
    }

    async fn delete(&self, id: &AccountId) -> Result<(), AccountError> {
        let mut accounts = self.accounts.write().await;
        let before = accounts.len();
        accounts.retain(|a| a.id != *id);
        if accounts.len() == before {
            return Err(AccountError::NotFound(id.to_string()));
        }
        Ok(())
    }

    async fn count(&self, query: AccountQuery) -> Result<u64, AccountError> {
        let accounts = self.accounts.read().await;
        Ok(Self::matching(&accounts, &query).len() as u64)
    }

    async fn find_page(
        &self,
        query: AccountQuery,
        page: PageRequest,
    ) -> Result<Vec<Account>, AccountError> {
        let accounts = self.accounts.read().await;
        Ok(Self::matching(&accounts, &query)
            .into_iter()
            .skip(page.skip() as usize)
            .take(page.limit() as usize)
            .collect())
    }
}

/// Command the harness seeds its administrator with
pub fn bootstrap_admin_command() -> CreateAccountCommand {
    CreateAccountCommand {
        name: DisplayName::new("Test Admin".to_string()).unwrap(),
        email: EmailAddress::new(ADMIN_EMAIL.to_string()).unwrap(),
        username: Username::new("admin".to_string()).unwrap(),
        password: Password::new(ADMIN_PASSWORD.to_string()).unwrap(),
        role: Role::Admin,
        phone: None,
        department: None,
        bio: None,
    }
}

/// Test application that spawns a real server
pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub api_client: reqwest::Client,
    pub authenticator: Arc<Authenticator>,
    pub repository: Arc<InMemoryAccountRepository>,
    pub directory: Arc<dyn AccountDirectoryPort>,
}

impl TestApp {
    /// Spawn the application in a background task with a seeded administrator
    pub async fn spawn() -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let repository = Arc::new(InMemoryAccountRepository::default());
        let authenticator = Arc::new(Authenticator::new(JWT_SECRET, 24));
        let directory: Arc<dyn AccountDirectoryPort> = Arc::new(AccountDirectory::new(
            Arc::clone(&repository),
            Arc::clone(&authenticator),
        ));

        directory
            .ensure_bootstrap_admin(bootstrap_admin_command())
            .await
            .expect("Failed to seed admin");

        let router = create_router(Arc::clone(&directory), Arc::clone(&authenticator), &[]);

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            port,
            api_client: reqwest::Client::new(),
            authenticator,
            repository,
            directory,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/v1{}", self.address, path)
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(self.url(path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(self.url(path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Helper to make POST request with Bearer token
    pub fn post_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.post(path).bearer_auth(token)
    }

    /// Helper to make PUT request with Bearer token
    pub fn put_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client.put(self.url(path)).bearer_auth(token)
    }

    /// Helper to make DELETE request with Bearer token
    pub fn delete_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client.delete(self.url(path)).bearer_auth(token)
    }

    /// Log in and return the issued token
    pub async fn login(&self, email: &str, password: &str) -> String {
        let response = self
            .post("/auth/login")
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), reqwest::StatusCode::OK, "login failed");

        let body: serde_json::Value = response.json().await.expect("Failed to parse response");
        body["token"].as_str().unwrap().to_string()
    }

    pub async fn admin_token(&self) -> String {
        self.login(ADMIN_EMAIL, ADMIN_PASSWORD).await
    }

    /// Register an account through the public endpoint and return its id
    pub async fn register(&self, username: &str, role: &str) -> String {
        let response = self
            .post("/auth/register")
            .json(&json!({
                "name": format!("{} tester", username),
                "email": format!("{}@venue.test", username),
                "username": username,
                "password": "secret1",
                "role": role,
            }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), reqwest::StatusCode::CREATED);

        let body: serde_json::Value = response.json().await.expect("Failed to parse response");
        body["id"].as_str().unwrap().to_string()
    }

    /// Register an account and log in as it
    pub async fn token_for(&self, username: &str, role: &str) -> (String, String) {
        let id = self.register(username, role).await;
        let token = self
            .login(&format!("{}@venue.test", username), "secret1")
            .await;
        (id, token)
    }
}
