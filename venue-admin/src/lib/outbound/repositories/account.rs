use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::types::Json;
use sqlx::PgPool;
use sqlx::Postgres;
use sqlx::QueryBuilder;
use uuid::Uuid;

use crate::account::errors::AccountError;
use crate::domain::account::models::Account;
use crate::domain::account::models::AccountChanges;
use crate::domain::account::models::AccountFilter;
use crate::domain::account::models::AccountId;
use crate::domain::account::models::AccountQuery;
use crate::domain::account::models::DisplayName;
use crate::domain::account::models::EmailAddress;
use crate::domain::account::models::SocialLinks;
use crate::domain::account::models::Username;
use crate::domain::account::ports::AccountRepository;
use crate::domain::pagination::PageRequest;

const SELECT_ACCOUNT: &str = r#"
    SELECT id, name, email, username, password_hash, role, status,
           phone, department, bio, profile_image, social_links,
           last_login, created_at, updated_at
    FROM accounts
"#;

const EMAIL_CONSTRAINT: &str = "accounts_email_key";
const USERNAME_CONSTRAINT: &str = "accounts_username_key";

pub struct PostgresAccountRepository {
    pool: PgPool,
}

impl PostgresAccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct AccountRow {
    id: Uuid,
    name: String,
    email: String,
    username: String,
    password_hash: String,
    role: String,
    status: String,
    phone: Option<String>,
    department: Option<String>,
    bio: Option<String>,
    profile_image: Option<String>,
    social_links: Option<Json<SocialLinks>>,
    last_login: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<AccountRow> for Account {
    type Error = AccountError;

    fn try_from(row: AccountRow) -> Result<Self, Self::Error> {
        let id = row.id;
        let corrupt = |field: &str, e: String| {
            AccountError::Internal(format!("Stored account {} has invalid {}: {}", id, field, e))
        };

        Ok(Account {
            id: AccountId(row.id),
            name: DisplayName::new(row.name).map_err(|e| corrupt("name", e.to_string()))?,
            email: EmailAddress::new(row.email).map_err(|e| corrupt("email", e.to_string()))?,
            username: Username::new(row.username)
                .map_err(|e| corrupt("username", e.to_string()))?,
            password_hash: row.password_hash,
            role: row.role.parse().map_err(|e: auth::ParseRoleError| corrupt("role", e.to_string()))?,
            status: row
                .status
                .parse()
                .map_err(|e: crate::account::errors::ParseStatusError| {
                    corrupt("status", e.to_string())
                })?,
            phone: row.phone,
            department: row.department,
            bio: row.bio,
            profile_image: row.profile_image,
            social_links: row.social_links.map(|links| links.0),
            last_login: row.last_login,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Translate a write failure, naming the duplicated value on unique violations.
fn map_write_error(e: sqlx::Error, email: Option<&str>, username: Option<&str>) -> AccountError {
    match e.as_database_error() {
        Some(db_err) if db_err.is_unique_violation() => match db_err.constraint() {
            Some(EMAIL_CONSTRAINT) => {
                AccountError::EmailAlreadyExists(email.unwrap_or_default().to_string())
            }
            Some(USERNAME_CONSTRAINT) => {
                AccountError::UsernameAlreadyExists(username.unwrap_or_default().to_string())
            }
            _ => AccountError::AccountAlreadyExists,
        },
        _ => AccountError::Database(e.to_string()),
    }
}

/// Escape `%`, `_` and `\` so user input matches literally inside `LIKE`.
fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: AccountFilter) {
    builder.push(" WHERE ");
    match filter {
        AccountFilter::Id(id) => {
            builder.push("id = ").push_bind(id.0);
        }
        AccountFilter::Email(email) => {
            builder.push("email = ").push_bind(email);
        }
        AccountFilter::EmailOrUsername { email, username } => {
            builder
                .push("(email = ")
                .push_bind(email)
                .push(" OR username = ")
                .push_bind(username)
                .push(")");
        }
        AccountFilter::EmailExcluding { email, excluded } => {
            builder
                .push("email = ")
                .push_bind(email)
                .push(" AND id <> ")
                .push_bind(excluded.0);
        }
        AccountFilter::UsernameExcluding { username, excluded } => {
            builder
                .push("username = ")
                .push_bind(username)
                .push(" AND id <> ")
                .push_bind(excluded.0);
        }
    }
}

fn push_query(builder: &mut QueryBuilder<'_, Postgres>, query: AccountQuery) {
    builder.push(" WHERE TRUE");

    if let Some(search) = query.search {
        let pattern = format!("%{}%", escape_like(&search));
        builder
            .push(" AND (name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR email ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR username ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
    if let Some(role) = query.role {
        builder.push(" AND role = ").push_bind(role.as_str());
    }
    if let Some(status) = query.status {
        builder.push(" AND status = ").push_bind(status.as_str());
    }
}

#[async_trait]
impl AccountRepository for PostgresAccountRepository {
    async fn find_one(&self, filter: AccountFilter) -> Result<Option<Account>, AccountError> {
        let mut builder = QueryBuilder::<Postgres>::new(SELECT_ACCOUNT);
        push_filter(&mut builder, filter);
        builder.push(" LIMIT 1");

        let row = builder
            .build_query_as::<AccountRow>()
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AccountError::Database(e.to_string()))?;

        row.map(Account::try_from).transpose()
    }

    async fn insert(&self, account: Account) -> Result<Account, AccountError> {
        sqlx::query(
            r#"
            INSERT INTO accounts (
                id, name, email, username, password_hash, role, status,
                phone, department, bio, profile_image, social_links,
                last_login, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            "#,
        )
        .bind(account.id.0)
        .bind(account.name.as_str())
        .bind(account.email.as_str())
        .bind(account.username.as_str())
        .bind(&account.password_hash)
        .bind(account.role.as_str())
        .bind(account.status.as_str())
        .bind(&account.phone)
        .bind(&account.department)
        .bind(&account.bio)
        .bind(&account.profile_image)
        .bind(account.social_links.clone().map(Json))
        .bind(account.last_login)
        .bind(account.created_at)
        .bind(account.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            map_write_error(
                e,
                Some(account.email.as_str()),
                Some(account.username.as_str()),
            )
        })?;

        Ok(account)
    }

    async fn update_fields(
        &self,
        id: &AccountId,
        changes: AccountChanges,
    ) -> Result<(), AccountError> {
        let mut builder = QueryBuilder::<Postgres>::new("UPDATE accounts SET ");
        let mut fields = builder.separated(", ");

        if let Some(name) = &changes.name {
            fields.push("name = ");
            fields.push_bind_unseparated(name.as_str().to_string());
        }
        if let Some(email) = &changes.email {
            fields.push("email = ");
            fields.push_bind_unseparated(email.as_str().to_string());
        }
        if let Some(username) = &changes.username {
            fields.push("username = ");
            fields.push_bind_unseparated(username.as_str().to_string());
        }
        if let Some(phone) = &changes.phone {
            fields.push("phone = ");
            fields.push_bind_unseparated(phone.clone());
        }
        if let Some(department) = &changes.department {
            fields.push("department = ");
            fields.push_bind_unseparated(department.clone());
        }
        if let Some(bio) = &changes.bio {
            fields.push("bio = ");
            fields.push_bind_unseparated(bio.clone());
        }
        if let Some(profile_image) = &changes.profile_image {
            fields.push("profile_image = ");
            fields.push_bind_unseparated(profile_image.clone());
        }
        if let Some(social_links) = &changes.social_links {
            fields.push("social_links = ");
            fields.push_bind_unseparated(social_links.clone().map(Json));
        }
        if let Some(role) = changes.role {
            fields.push("role = ");
            fields.push_bind_unseparated(role.as_str());
        }
        if let Some(status) = changes.status {
            fields.push("status = ");
            fields.push_bind_unseparated(status.as_str());
        }
        if let Some(last_login) = changes.last_login {
            fields.push("last_login = ");
            fields.push_bind_unseparated(last_login);
        }
        fields.push("updated_at = ");
        fields.push_bind_unseparated(changes.updated_at);

        builder.push(" WHERE id = ").push_bind(id.0);

        let result = builder.build().execute(&self.pool).await.map_err(|e| {
            map_write_error(
                e,
                changes.email.as_ref().map(EmailAddress::as_str),
                changes.username.as_ref().map(Username::as_str),
            )
        })?;

        if result.rows_affected() == 0 {
            return Err(AccountError::NotFound(id.to_string()));
        }

        Ok(())
    }

    async fn delete(&self, id: &AccountId) -> Result<(), AccountError> {
        let result = sqlx::query("DELETE FROM accounts WHERE id = $1")
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(|e| AccountError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(AccountError::NotFound(id.to_string()));
        }

        Ok(())
    }

    async fn count(&self, query: AccountQuery) -> Result<u64, AccountError> {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM accounts");
        push_query(&mut builder, query);

        let total = builder
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AccountError::Database(e.to_string()))?;

        Ok(total.max(0) as u64)
    }

    async fn find_page(
        &self,
        query: AccountQuery,
        page: PageRequest,
    ) -> Result<Vec<Account>, AccountError> {
        let mut builder = QueryBuilder::<Postgres>::new(SELECT_ACCOUNT);
        push_query(&mut builder, query);
        builder
            .push(" ORDER BY created_at DESC, id DESC LIMIT ")
            .push_bind(i64::from(page.limit()))
            .push(" OFFSET ")
            .push_bind(page.skip() as i64);

        let rows = builder
            .build_query_as::<AccountRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AccountError::Database(e.to_string()))?;

        rows.into_iter().map(Account::try_from).collect()
    }
}
