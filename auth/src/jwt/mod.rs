pub mod claims;
pub mod errors;
pub mod token;

pub use claims::Claims;
pub use errors::AuthError;
pub use errors::JwtError;
pub use token::TokenService;
pub use token::VerifiedIdentity;
