//! The signed-in user.

use crate::error::ApiError;
use crate::models::User;
use crate::services::{AuthService, LoginCredentials, UserService};

pub struct SessionController {
    auth: AuthService,
    users: UserService,
    user: Option<User>,
    loading: bool,
}

impl SessionController {
    pub fn new(auth: AuthService, users: UserService) -> Self {
        Self {
            auth,
            users,
            user: None,
            loading: false,
        }
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    /// A profile is loaded and a token is installed.
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some() && self.auth.is_authenticated()
    }

    /// Log in, then load the profile of the new session.
    pub fn login(&mut self, credentials: &LoginCredentials) -> Result<&User, ApiError> {
        self.loading = true;
        let result = self
            .auth
            .login(credentials)
            .and_then(|_| self.users.current_user());
        self.loading = false;
        let user = result?;
        Ok(&*self.user.insert(user))
    }

    /// Always ends signed out. A failed server call is logged, not returned.
    pub fn logout(&mut self) {
        self.loading = true;
        let _ = self.auth.logout();
        self.user = None;
        self.loading = false;
    }

    /// Reload the profile for an existing token. A rejected token signs the
    /// session out.
    pub fn refresh(&mut self) {
        if !self.auth.is_authenticated() {
            return;
        }
        match self.users.current_user() {
            Ok(user) => self.user = Some(user),
            Err(_) => {
                self.user = None;
                self.auth.clear_token();
            }
        }
    }
}
