//! Session endpoints under `/auth`.
//!
//! A successful login installs the bearer token on the shared client, so
//! every service built from that client is authenticated from then on.
//! Logout removes the token whether or not the server call succeeds.

use serde::{Deserialize, Serialize};

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::http::HttpMethod;

use super::logged;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthToken {
    pub token: String,
}

#[derive(Debug, Clone)]
pub struct AuthService {
    client: ApiClient,
}

impl AuthService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub fn login(&self, credentials: &LoginCredentials) -> Result<AuthToken, ApiError> {
        let result = self
            .client
            .post::<AuthToken, _>("/auth/login", credentials)
            .map(|r| r.data);
        if let Ok(token) = &result {
            self.client.set_auth_token(&token.token);
        }
        logged(result, "login")
    }

    /// Invalidate the session remotely and drop the local token regardless.
    pub fn logout(&self) -> Result<(), ApiError> {
        let result = self.client.send_empty(HttpMethod::Post, "/auth/logout");
        self.client.remove_auth_token();
        logged(result, "logout")
    }

    pub fn is_authenticated(&self) -> bool {
        self.client.auth_token().is_some()
    }

    /// Drop the local token without contacting the server.
    pub fn clear_token(&self) {
        self.client.remove_auth_token();
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::client::ClientConfig;
    use crate::testing::ScriptedTransport;

    fn service() -> (AuthService, ApiClient, ScriptedTransport) {
        let transport = ScriptedTransport::new();
        let client = ApiClient::new(ClientConfig::with_base_url("http://api.test"), transport.clone());
        (AuthService::new(client.clone()), client, transport)
    }

    fn credentials() -> LoginCredentials {
        LoginCredentials {
            email: "ada@example.com".to_string(),
            password: "engine".to_string(),
        }
    }

    #[test]
    fn login_installs_bearer_token_on_shared_client() {
        let (auth, client, transport) = service();
        transport.push_json(200, json!({"data": {"token": "t-123"}}));
        auth.login(&credentials()).unwrap();
        assert_eq!(client.auth_token().as_deref(), Some("t-123"));
        assert!(auth.is_authenticated());
    }

    #[test]
    fn failed_login_leaves_client_anonymous() {
        let (auth, client, transport) = service();
        transport.push_json(401, json!({"message": "Invalid credentials"}));
        let err = auth.login(&credentials()).unwrap_err();
        assert_eq!(err.to_string(), "Invalid credentials");
        assert!(client.auth_token().is_none());
    }

    #[test]
    fn logout_drops_token_even_when_server_fails() {
        let (auth, client, transport) = service();
        client.set_auth_token("t-123");
        transport.push_err("connection reset");
        assert!(auth.logout().is_err());
        assert!(client.auth_token().is_none());
        assert_eq!(transport.requests()[0].header("authorization"), Some("Bearer t-123"));
    }
}
