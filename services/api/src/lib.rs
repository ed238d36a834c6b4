//! Typed client for the course platform REST API
//!
//! All calls go through the authenticated request pipeline from the `auth`
//! crate, so expired access tokens are refreshed transparently.

pub mod client;
pub mod draft;
pub mod error;
pub mod models;
pub mod repositories;
pub mod state;
pub mod validation;

pub use client::ApiClient;
pub use draft::ProfileDraftStore;
pub use error::{ApiError, ApiResult, ErrorResponse};
pub use state::ApiState;
