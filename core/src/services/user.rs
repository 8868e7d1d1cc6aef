//! User endpoints under `/users` and `/auth/profile`.

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::models::user::{validate_email, validate_username};
use crate::models::{encode_component, with_query, CreateUserRequest, ListQuery, UpdateUserRequest, User, UserListParams};
use crate::types::ListResponse;

use super::{ensure_valid, logged, ResourceService};

const USERS: &str = "/users";
const PROFILE: &str = "/auth/profile";

#[derive(Debug, Clone)]
pub struct UserService {
    client: ApiClient,
}

impl UserService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn activate(&self, id: &str) -> Result<User, ApiError> {
        let result = self.client.patch_empty(&format!("{USERS}/{id}/activate"));
        logged(result.map(|r| r.data), "activate user")
    }

    /// Soft delete: the record stays but is flagged inactive.
    pub fn deactivate(&self, id: &str) -> Result<User, ApiError> {
        let result = self.client.patch_empty(&format!("{USERS}/{id}/deactivate"));
        logged(result.map(|r| r.data), "deactivate user")
    }

    /// Profile of the user owning the current bearer token.
    pub fn current_user(&self) -> Result<User, ApiError> {
        logged(self.client.get(PROFILE).map(|r| r.data), "fetch current user")
    }

    pub fn update_current_user(&self, updates: &UpdateUserRequest) -> Result<User, ApiError> {
        let result = validate_update(updates).and_then(|()| self.client.put(PROFILE, updates));
        logged(result.map(|r| r.data), "update current user")
    }
}

fn validate_update(updates: &UpdateUserRequest) -> Result<(), ApiError> {
    if updates.email.as_deref().is_some_and(|email| !validate_email(email)) {
        return Err(ApiError::invalid("Invalid email address"));
    }
    if updates
        .username
        .as_deref()
        .is_some_and(|username| !validate_username(username))
    {
        return Err(ApiError::invalid("Invalid username format"));
    }
    Ok(())
}

impl ResourceService for UserService {
    type Record = User;
    type ListParams = UserListParams;
    type Create = CreateUserRequest;
    type Update = UpdateUserRequest;

    const RESOURCE: &'static str = "users";
    const DEFAULT_SEARCH_LIMIT: u32 = 10;

    fn list(&self, params: &UserListParams) -> Result<ListResponse<User>, ApiError> {
        let endpoint = with_query(USERS, &params.to_query());
        logged(self.client.get(&endpoint).map(|r| r.data), "fetch users")
    }

    fn get_by_id(&self, id: &str) -> Result<User, ApiError> {
        logged(self.client.get(&format!("{USERS}/{id}")).map(|r| r.data), "fetch user")
    }

    fn create(&self, request: &CreateUserRequest) -> Result<User, ApiError> {
        let result = ensure_valid(request.validate()).and_then(|()| self.client.post(USERS, request));
        logged(result.map(|r| r.data), "create user")
    }

    fn update(&self, id: &str, updates: &UpdateUserRequest) -> Result<User, ApiError> {
        let result = validate_update(updates)
            .and_then(|()| self.client.put(&format!("{USERS}/{id}"), updates));
        logged(result.map(|r| r.data), "update user")
    }

    fn delete(&self, id: &str) -> Result<(), ApiError> {
        logged(self.client.delete(&format!("{USERS}/{id}")), "delete user")
    }

    fn search(&self, query: &str, limit: u32) -> Result<Vec<User>, ApiError> {
        let endpoint = format!("{USERS}/search?q={}&limit={limit}", encode_component(query));
        let result = self.client.get::<ListResponse<User>>(&endpoint);
        logged(result.map(|r| r.data.data), "search users")
    }
}
