//! Authentication layer for the course platform client
//!
//! Provides the session store that owns the credential pair, the
//! authenticated request pipeline with single-flight token refresh, and the
//! OAuth login/logout flow.

pub mod error;
pub mod models;
pub mod oauth;
pub mod pipeline;
pub mod refresh;
pub mod session;

pub use error::{LoginError, PipelineError, PipelineResult, RefreshError};
pub use models::{SessionInfo, UserRole};
pub use oauth::{LoginFlow, OAuthProvider};
pub use pipeline::AuthPipeline;
pub use session::{SessionEvent, SessionStore};
