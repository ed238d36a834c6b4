//! Authentication models

pub mod role;
pub mod session;
pub mod token;

// Re-export for convenience
pub use role::UserRole;
pub use session::SessionInfo;
pub use token::{RefreshTokenRequest, TokenResponse};
