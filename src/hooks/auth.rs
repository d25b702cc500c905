use super::{loaded, settle_request};
use crate::api::BlogApi;
use crate::app::forms::{LoginForm, RegisterForm};
use crate::app::slices::AuthSlice;
use crate::app::{Event, LoginField, RegisterField, Store};
use crate::domain::error::Result;
use crate::domain::User;

/// Sign-in, registration and the current user.
pub struct AuthHook<'a, A> {
    store: &'a mut Store<A>,
}

impl<'a, A: BlogApi> AuthHook<'a, A> {
    pub(super) fn new(store: &'a mut Store<A>) -> Self {
        Self { store }
    }

    fn slice(&self) -> &AuthSlice {
        &self.store.state().auth
    }

    #[must_use]
    pub fn user(&self) -> Option<&User> {
        self.slice().user.as_ref()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.slice().is_authenticated
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.slice().is_loading
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.slice().error.as_deref()
    }

    #[must_use]
    pub fn login_form(&self) -> &LoginForm {
        &self.slice().login_form
    }

    #[must_use]
    pub fn register_form(&self) -> &RegisterForm {
        &self.slice().register_form
    }

    /// # Errors
    ///
    /// Never fails; field edits are validated on submit.
    pub fn set_login_field(&mut self, field: LoginField, value: impl Into<String>) -> Result<()> {
        self.store
            .dispatch(Event::SetLoginField { field, value: value.into() })
            .map(|_| ())
    }

    /// # Errors
    ///
    /// Never fails; field edits are validated on submit.
    pub fn set_register_field(&mut self, field: RegisterField, value: impl Into<String>) -> Result<()> {
        self.store
            .dispatch(Event::SetRegisterField { field, value: value.into() })
            .map(|_| ())
    }

    /// Submits the login form. On success the token is persisted, the profile
    /// is loaded and the store has moved to the page the user came from.
    ///
    /// # Errors
    ///
    /// Returns the form's validation error or the server's rejection.
    pub async fn login(&mut self) -> Result<()> {
        settle_request(self.store, Event::SubmitLogin).await.map(|_| ())
    }

    /// Fills the login form and submits it.
    ///
    /// # Errors
    ///
    /// Same as [`login`](Self::login).
    pub async fn login_with(&mut self, email: &str, password: &str) -> Result<()> {
        self.set_login_field(LoginField::Email, email)?;
        self.set_login_field(LoginField::Password, password)?;
        self.login().await
    }

    /// Submits the register form; on success the store is on the login page.
    ///
    /// # Errors
    ///
    /// Returns the form's validation error or the server's rejection.
    pub async fn register(&mut self) -> Result<()> {
        settle_request(self.store, Event::SubmitRegister).await.map(|_| ())
    }

    /// Ends the session locally.
    ///
    /// # Errors
    ///
    /// Never fails; a token file that cannot be removed is only logged.
    pub fn logout(&mut self) -> Result<()> {
        self.store.dispatch(Event::Logout).map(|_| ())
    }

    /// Fetches the user behind a stored token, once.
    ///
    /// Returns `None` when signed out.
    ///
    /// # Errors
    ///
    /// Returns the server's rejection; a 401 also ends the session.
    pub async fn load_user(&mut self) -> Result<Option<User>> {
        if !self.is_authenticated() {
            return Ok(None);
        }
        settle_request(self.store, Event::LoadUser).await?;
        loaded(self.user().cloned(), "current user").map(Some)
    }

    pub fn clear_error(&mut self) {
        self.store.state_mut().auth.clear_error();
    }
}
