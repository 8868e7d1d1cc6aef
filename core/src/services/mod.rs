//! Resource services: domain operations translated into access-layer calls.
//!
//! # Design
//! Services hold a clone of one shared [`ApiClient`](crate::ApiClient) and
//! nothing else, so every service built from the same client observes the
//! same base URL and bearer token. Create and update requests are validated
//! locally first; a rejected request never reaches the network.
//!
//! [`ResourceService`] is the seam the generic controllers are written
//! against. Resource-specific operations stay inherent methods.

pub mod auth;
pub mod product;
pub mod user;

pub use auth::{AuthService, AuthToken, LoginCredentials};
pub use product::ProductService;
pub use user::UserService;

use tracing::warn;

use crate::error::ApiError;
use crate::models::{Identified, ListQuery};
use crate::types::ListResponse;

/// CRUD-and-search surface shared by every resource.
pub trait ResourceService {
    type Record: Identified + Clone;
    type ListParams: ListQuery;
    type Create;
    type Update;

    /// Plural resource name, used in log lines.
    const RESOURCE: &'static str;

    /// Result cap used by controllers when searching.
    const DEFAULT_SEARCH_LIMIT: u32;

    fn list(&self, params: &Self::ListParams) -> Result<ListResponse<Self::Record>, ApiError>;

    fn get_by_id(&self, id: &str) -> Result<Self::Record, ApiError>;

    fn create(&self, request: &Self::Create) -> Result<Self::Record, ApiError>;

    fn update(&self, id: &str, updates: &Self::Update) -> Result<Self::Record, ApiError>;

    fn delete(&self, id: &str) -> Result<(), ApiError>;

    fn search(&self, query: &str, limit: u32) -> Result<Vec<Self::Record>, ApiError>;
}

/// Log a failed service operation and pass the result through unchanged.
pub(crate) fn logged<T>(result: Result<T, ApiError>, operation: &str) -> Result<T, ApiError> {
    result.inspect_err(|err| warn!(operation, code = %err.code(), error = %err, "service call failed"))
}

/// Fail locally when `violations` is non-empty.
pub(crate) fn ensure_valid(violations: Vec<String>) -> Result<(), ApiError> {
    if violations.is_empty() {
        Ok(())
    } else {
        Err(ApiError::Validation(violations))
    }
}
