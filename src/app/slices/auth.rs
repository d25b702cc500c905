//! Authentication slice: session flags, the signed-in user and auth forms.

use crate::app::forms::{LoginForm, RegisterForm};
use crate::domain::User;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthSlice {
    pub user: Option<User>,
    pub token: Option<String>,
    pub is_authenticated: bool,
    pub is_loading: bool,
    pub error: Option<String>,
    pub login_form: LoginForm,
    pub register_form: RegisterForm,
    /// Set once a registration succeeds, until the next login attempt.
    pub registered: bool,
}

impl AuthSlice {
    /// Initial state from the token found at start-up.
    ///
    /// A stored token is only a guess at being signed in; the profile fetch
    /// triggered by `load_user` confirms it.
    #[must_use]
    pub fn new(token: Option<String>) -> Self {
        Self {
            is_authenticated: token.as_deref().is_some_and(|t| !t.trim().is_empty()),
            token,
            ..Self::default()
        }
    }

    /// Whether a profile fetch is needed to learn who is signed in.
    #[must_use]
    pub const fn needs_user(&self) -> bool {
        self.is_authenticated && self.user.is_none()
    }

    pub fn request_started(&mut self) {
        self.is_loading = true;
        self.error = None;
    }

    pub fn request_failed(&mut self, message: impl Into<String>) {
        self.is_loading = false;
        self.error = Some(message.into());
    }

    pub fn logged_in(&mut self, token: String) {
        self.is_loading = false;
        self.token = Some(token);
        self.is_authenticated = true;
        self.registered = false;
        self.login_form = LoginForm::default();
    }

    pub fn registered(&mut self) {
        self.is_loading = false;
        self.registered = true;
        self.register_form = RegisterForm::default();
    }

    pub fn user_loaded(&mut self, user: User) {
        self.is_loading = false;
        self.user = Some(user);
    }

    /// Drops every trace of the session. No request is involved.
    pub fn logout(&mut self) {
        self.user = None;
        self.token = None;
        self.is_authenticated = false;
        self.is_loading = false;
        self.error = None;
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }
}
