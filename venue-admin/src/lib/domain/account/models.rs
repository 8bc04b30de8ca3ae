use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use auth::Role;
use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::account::errors::AccountIdError;
use crate::domain::account::errors::EmailError;
use crate::domain::account::errors::NameError;
use crate::domain::account::errors::ParseStatusError;
use crate::domain::account::errors::PasswordRuleError;
use crate::domain::account::errors::UsernameError;

/// Social network name to profile link.
pub type SocialLinks = BTreeMap<String, String>;

/// Account aggregate entity.
///
/// The password hash is held here for verification only and never leaves the
/// service through any response type.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    pub id: AccountId,
    pub name: DisplayName,
    pub email: EmailAddress,
    pub username: Username,
    pub password_hash: String,
    pub role: Role,
    pub status: AccountStatus,
    pub phone: Option<String>,
    pub department: Option<String>,
    pub bio: Option<String>,
    pub profile_image: Option<String>,
    pub social_links: Option<SocialLinks>,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    pub fn is_active(&self) -> bool {
        self.status == AccountStatus::Active
    }
}

/// Account unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AccountId(pub Uuid);

impl AccountId {
    /// Generate a new random account ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an account ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, AccountIdError> {
        Uuid::parse_str(s)
            .map(AccountId)
            .map_err(|e| AccountIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for AccountId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Account activity status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccountStatus {
    Active,
    Inactive,
}

impl AccountStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountStatus::Active => "active",
            AccountStatus::Inactive => "inactive",
        }
    }
}

impl fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(AccountStatus::Active),
            "inactive" => Ok(AccountStatus::Inactive),
            other => Err(ParseStatusError(other.to_string())),
        }
    }
}

/// Display name value type
///
/// Between 2 and 100 characters after trimming.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayName(String);

impl DisplayName {
    const MIN_LENGTH: usize = 2;
    const MAX_LENGTH: usize = 100;

    /// Create a validated display name.
    ///
    /// # Errors
    /// * `TooShort` - Fewer than 2 characters
    /// * `TooLong` - More than 100 characters
    pub fn new(name: String) -> Result<Self, NameError> {
        let name = name.trim().to_string();
        let length = name.chars().count();

        if length < Self::MIN_LENGTH {
            Err(NameError::TooShort {
                min: Self::MIN_LENGTH,
                actual: length,
            })
        } else if length > Self::MAX_LENGTH {
            Err(NameError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            })
        } else {
            Ok(Self(name))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Username value type
///
/// Ensures username is 3-50 characters and contains only alphanumeric,
/// underscore, hyphen and dot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Username(String);

impl Username {
    const MIN_LENGTH: usize = 3;
    const MAX_LENGTH: usize = 50;

    /// Create a new valid username.
    ///
    /// # Errors
    /// * `TooShort` - Username shorter than 3 characters
    /// * `TooLong` - Username longer than 50 characters
    /// * `InvalidCharacters` - Contains characters outside the allowed set
    pub fn new(username: String) -> Result<Self, UsernameError> {
        let username = Self::with_valid_length(username)?;
        let username = Self::with_valid_chars(username)?;
        Ok(Self(username))
    }

    fn with_valid_length(username: String) -> Result<String, UsernameError> {
        let length = username.chars().count();
        if length < Self::MIN_LENGTH {
            Err(UsernameError::TooShort {
                min: Self::MIN_LENGTH,
                actual: length,
            })
        } else if length > Self::MAX_LENGTH {
            Err(UsernameError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            })
        } else {
            Ok(username)
        }
    }

    fn with_valid_chars(username: String) -> Result<String, UsernameError> {
        if username
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c == '-' || c == '.')
        {
            Ok(username)
        } else {
            Err(UsernameError::InvalidCharacters)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Email address type
///
/// Validates email format using RFC 5322 compliant parser. Stored exactly as
/// given; comparisons are case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create a new validated email address.
    ///
    /// # Errors
    /// * `InvalidFormat` - Email does not conform to RFC 5322
    pub fn new(email: String) -> Result<Self, EmailError> {
        email_address::EmailAddress::from_str(&email)
            .map(|_| EmailAddress(email))
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Plaintext password accepted for hashing.
///
/// Only enforces the minimum length; never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    const MIN_LENGTH: usize = 6;

    pub fn new(password: String) -> Result<Self, PasswordRuleError> {
        if password.chars().count() < Self::MIN_LENGTH {
            return Err(PasswordRuleError::TooShort {
                min: Self::MIN_LENGTH,
            });
        }
        Ok(Self(password))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(***)")
    }
}

/// Authenticated identity performing an operation.
///
/// The role is the one carried by the token; the directory re-reads the
/// stored role before making policy decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub id: AccountId,
    pub role: Role,
}

/// Command to create a new account with domain types
#[derive(Debug, Clone)]
pub struct CreateAccountCommand {
    pub name: DisplayName,
    pub email: EmailAddress,
    pub username: Username,
    pub password: Password,
    pub role: Role,
    pub phone: Option<String>,
    pub department: Option<String>,
    pub bio: Option<String>,
}

/// Self-service registration uses the same shape as an admin-created account.
pub type RegisterCommand = CreateAccountCommand;

/// Login credentials as received.
///
/// The email is deliberately not validated: any mismatch is reported as
/// invalid credentials.
#[derive(Clone)]
pub struct LoginCommand {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for LoginCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCommand")
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

/// Successful login: a fresh token and the account it was issued for.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub token: String,
    pub account: Account,
}

/// Partial update of an account.
///
/// `None` leaves a field untouched. For nullable fields `Some(None)` clears
/// the value and `Some(Some(v))` sets it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AccountPatch {
    pub name: Option<DisplayName>,
    pub email: Option<EmailAddress>,
    pub username: Option<Username>,
    pub phone: Option<Option<String>>,
    pub department: Option<Option<String>>,
    pub bio: Option<Option<String>>,
    pub profile_image: Option<Option<String>>,
    pub social_links: Option<Option<SocialLinks>>,
    pub role: Option<Role>,
    pub status: Option<AccountStatus>,
}

/// Field-level changes handed to the persistence layer.
///
/// Only `updated_at` is always written.
#[derive(Debug, Clone, PartialEq)]
pub struct AccountChanges {
    pub name: Option<DisplayName>,
    pub email: Option<EmailAddress>,
    pub username: Option<Username>,
    pub phone: Option<Option<String>>,
    pub department: Option<Option<String>>,
    pub bio: Option<Option<String>>,
    pub profile_image: Option<Option<String>>,
    pub social_links: Option<Option<SocialLinks>>,
    pub role: Option<Role>,
    pub status: Option<AccountStatus>,
    pub last_login: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

impl AccountChanges {
    /// Changes that only bump `updated_at`.
    pub fn touch(updated_at: DateTime<Utc>) -> Self {
        Self {
            name: None,
            email: None,
            username: None,
            phone: None,
            department: None,
            bio: None,
            profile_image: None,
            social_links: None,
            role: None,
            status: None,
            last_login: None,
            updated_at,
        }
    }

    /// Record a successful login at `at`.
    pub fn login(at: DateTime<Utc>) -> Self {
        Self {
            last_login: Some(at),
            ..Self::touch(at)
        }
    }

    pub fn from_patch(patch: AccountPatch, updated_at: DateTime<Utc>) -> Self {
        Self {
            name: patch.name,
            email: patch.email,
            username: patch.username,
            phone: patch.phone,
            department: patch.department,
            bio: patch.bio,
            profile_image: patch.profile_image,
            social_links: patch.social_links,
            role: patch.role,
            status: patch.status,
            last_login: None,
            updated_at,
        }
    }

    /// Apply the present fields to an in-memory account.
    pub fn apply_to(&self, account: &mut Account) {
        if let Some(name) = &self.name {
            account.name = name.clone();
        }
        if let Some(email) = &self.email {
            account.email = email.clone();
        }
        if let Some(username) = &self.username {
            account.username = username.clone();
        }
        if let Some(phone) = &self.phone {
            account.phone = phone.clone();
        }
        if let Some(department) = &self.department {
            account.department = department.clone();
        }
        if let Some(bio) = &self.bio {
            account.bio = bio.clone();
        }
        if let Some(profile_image) = &self.profile_image {
            account.profile_image = profile_image.clone();
        }
        if let Some(social_links) = &self.social_links {
            account.social_links = social_links.clone();
        }
        if let Some(role) = self.role {
            account.role = role;
        }
        if let Some(status) = self.status {
            account.status = status;
        }
        if let Some(last_login) = self.last_login {
            account.last_login = Some(last_login);
        }
        account.updated_at = self.updated_at;
    }
}

/// Single-record lookup predicate.
#[derive(Debug, Clone, PartialEq)]
pub enum AccountFilter {
    Id(AccountId),
    Email(String),
    /// Matches when either the email or the username is taken
    EmailOrUsername { email: String, username: String },
    /// Email held by an account other than `excluded`
    EmailExcluding { email: String, excluded: AccountId },
    /// Username held by an account other than `excluded`
    UsernameExcluding { username: String, excluded: AccountId },
}

impl AccountFilter {
    pub fn matches(&self, account: &Account) -> bool {
        match self {
            AccountFilter::Id(id) => account.id == *id,
            AccountFilter::Email(email) => account.email.as_str() == email,
            AccountFilter::EmailOrUsername { email, username } => {
                account.email.as_str() == email || account.username.as_str() == username
            }
            AccountFilter::EmailExcluding { email, excluded } => {
                account.email.as_str() == email && account.id != *excluded
            }
            AccountFilter::UsernameExcluding { username, excluded } => {
                account.username.as_str() == username && account.id != *excluded
            }
        }
    }
}

/// Listing filter. All present criteria must hold.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AccountQuery {
    /// Case-insensitive substring of name, email or username
    pub search: Option<String>,
    pub role: Option<Role>,
    pub status: Option<AccountStatus>,
}

impl AccountQuery {
    pub fn matches(&self, account: &Account) -> bool {
        if let Some(role) = self.role {
            if account.role != role {
                return false;
            }
        }
        if let Some(status) = self.status {
            if account.status != status {
                return false;
            }
        }
        match &self.search {
            Some(search) => {
                let needle = search.to_lowercase();
                [
                    account.name.as_str(),
                    account.email.as_str(),
                    account.username.as_str(),
                ]
                .iter()
                .any(|field| field.to_lowercase().contains(&needle))
            }
            None => true,
        }
    }
}
