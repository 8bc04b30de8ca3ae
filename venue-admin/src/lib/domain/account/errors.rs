use thiserror::Error;

/// Error for AccountId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AccountIdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

/// Error for display name validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NameError {
    #[error("Name too short: minimum {min} characters, got {actual}")]
    TooShort { min: usize, actual: usize },

    #[error("Name too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },
}

/// Error for Username validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UsernameError {
    #[error("Username too short: minimum {min} characters, got {actual}")]
    TooShort { min: usize, actual: usize },

    #[error("Username too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },

    #[error(
        "Username contains invalid characters (only alphanumeric, underscore, hyphen and dot allowed)"
    )]
    InvalidCharacters,
}

/// Error for EmailAddress validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("Invalid email format: {0}")]
    InvalidFormat(String),
}

/// Error for plaintext password rules
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PasswordRuleError {
    #[error("Password too short: minimum {min} characters")]
    TooShort { min: usize },
}

/// Error for account status parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Unknown status: {0} (expected active or inactive)")]
pub struct ParseStatusError(pub String);

/// Top-level error for all account operations
#[derive(Debug, Clone, Error)]
pub enum AccountError {
    // Value validation errors (automatically converted via #[from])
    #[error("Invalid account ID: {0}")]
    InvalidAccountId(#[from] AccountIdError),

    #[error("Invalid name: {0}")]
    InvalidName(#[from] NameError),

    #[error("Invalid username: {0}")]
    InvalidUsername(#[from] UsernameError),

    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    #[error("Invalid password: {0}")]
    InvalidPassword(#[from] PasswordRuleError),

    #[error("Invalid role: {0}")]
    InvalidRole(#[from] auth::ParseRoleError),

    #[error("Invalid status: {0}")]
    InvalidStatus(#[from] ParseStatusError),

    // Domain-level errors
    #[error("Account not found: {0}")]
    NotFound(String),

    #[error("An account with this email or username already exists")]
    AccountAlreadyExists,

    #[error("Email already in use: {0}")]
    EmailAlreadyExists(String),

    #[error("Username already in use: {0}")]
    UsernameAlreadyExists(String),

    #[error("You do not have permission to perform this action")]
    Forbidden,

    #[error("The email or password you entered is incorrect")]
    InvalidCredentials,

    #[error("Your account is currently inactive")]
    InactiveAccount,

    #[error("Authenticated account no longer exists")]
    UnknownActor,

    // Infrastructure errors
    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AccountError {
    /// Whether the error stems from malformed client input.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            AccountError::InvalidAccountId(_)
                | AccountError::InvalidName(_)
                | AccountError::InvalidUsername(_)
                | AccountError::InvalidEmail(_)
                | AccountError::InvalidPassword(_)
                | AccountError::InvalidRole(_)
                | AccountError::InvalidStatus(_)
        )
    }

    /// Whether the error is a uniqueness violation.
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            AccountError::AccountAlreadyExists
                | AccountError::EmailAlreadyExists(_)
                | AccountError::UsernameAlreadyExists(_)
        )
    }
}

