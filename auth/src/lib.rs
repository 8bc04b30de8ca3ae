//! Authentication and authorization primitives for the venue admin backend.
//!
//! - Password hashing (Argon2id)
//! - Signed, time-limited access tokens carrying subject and role
//! - The role hierarchy and the actor-versus-target permission policy
//! - An `Authenticator` that ties hashing and token issuance together
//!
//! Nothing here performs I/O; persistence and HTTP live in the service crate.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash));
//! assert!(!hasher.verify("other", &hash));
//! ```
//!
//! ## Tokens
//! ```
//! use auth::{Role, TokenService};
//!
//! let tokens = TokenService::new(b"secret_key_at_least_32_bytes_long!", 24);
//! let token = tokens.issue("user123", Role::Staff).unwrap();
//! let identity = tokens.verify(&token).unwrap();
//! assert_eq!(identity.role, Role::Staff);
//! ```
//!
//! ## Role Policy
//! ```
//! use auth::policy;
//! use auth::Role;
//!
//! assert!(policy::can_create(Role::Manager, Role::Staff));
//! assert!(!policy::can_create(Role::Manager, Role::Manager));
//! assert!(!policy::can_delete(Role::Admin, Role::Admin));
//! ```

pub mod authenticator;
pub mod jwt;
pub mod password;
pub mod policy;
pub mod role;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::AuthenticationResult;
pub use authenticator::Authenticator;
pub use jwt::AuthError;
pub use jwt::Claims;
pub use jwt::JwtError;
pub use jwt::TokenService;
pub use jwt::VerifiedIdentity;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use role::ParseRoleError;
pub use role::Role;
