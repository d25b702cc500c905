use super::{loaded, settle_request};
use crate::api::BlogApi;
use crate::app::forms::PasswordForm;
use crate::app::slices::ProfileSlice;
use crate::app::{Event, Store};
use crate::domain::error::Result;
use crate::domain::{Id, PageParams, PublicProfile, UpdateProfileDto, User};

/// The signed-in user's profile, other users' profiles, and the password form.
pub struct ProfileHook<'a, A> {
    store: &'a mut Store<A>,
}

impl<'a, A: BlogApi> ProfileHook<'a, A> {
    pub(super) fn new(store: &'a mut Store<A>) -> Self {
        Self { store }
    }

    fn slice(&self) -> &ProfileSlice {
        &self.store.state().profile
    }

    #[must_use]
    pub fn my_profile(&self) -> Option<&User> {
        self.slice().my_profile.as_ref()
    }

    #[must_use]
    pub fn viewed_profile(&self) -> Option<&PublicProfile> {
        self.slice().viewed_profile.as_ref()
    }

    #[must_use]
    pub fn fetched_user(&self) -> Option<&User> {
        self.slice().fetched_user.as_ref()
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
    pub fn password_notice(&self) -> Option<&str> {
        self.slice().password_notice.as_deref()
    }

    /// # Errors
    ///
    /// Returns the server's rejection; a 401 also ends the session.
    pub async fn fetch_my_profile(&mut self) -> Result<User> {
        settle_request(self.store, Event::FetchMyProfile).await?;
        loaded(self.my_profile().cloned(), "profile")
    }

    /// # Errors
    ///
    /// Returns the server's rejection.
    pub async fn fetch_public_profile(
        &mut self,
        username: &str,
        page: PageParams,
    ) -> Result<PublicProfile> {
        let event = Event::FetchPublicProfile {
            username: username.to_string(),
            page,
        };
        settle_request(self.store, event).await?;
        loaded(self.viewed_profile().cloned(), "public profile")
    }

    /// # Errors
    ///
    /// Returns the server's rejection.
    pub async fn fetch_user_by_id(&mut self, id: Id) -> Result<User> {
        settle_request(self.store, Event::FetchUserById(id)).await?;
        loaded(self.fetched_user().cloned(), "user")
    }

    /// Sends the fields present in `data`.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a blank name or an invalid avatar, or
    /// the server's rejection.
    pub async fn update_profile(&mut self, data: UpdateProfileDto) -> Result<User> {
        settle_request(self.store, Event::UpdateProfile(data)).await?;
        loaded(self.my_profile().cloned(), "updated profile")
    }

    pub fn password_form_mut(&mut self) -> &mut PasswordForm {
        &mut self.store.state_mut().profile.password_form
    }

    /// Submits the password form and returns the server's notice.
    ///
    /// # Errors
    ///
    /// Returns the form's validation error or the server's rejection.
    pub async fn change_password(&mut self) -> Result<String> {
        settle_request(self.store, Event::SubmitPasswordChange).await?;
        loaded(self.password_notice().map(str::to_string), "password notice")
    }

    /// # Errors
    ///
    /// Never fails.
    pub fn clear_viewed(&mut self) -> Result<()> {
        self.store.dispatch(Event::ClearViewedProfile).map(|_| ())
    }

    /// # Errors
    ///
    /// Never fails.
    pub fn clear_error(&mut self) -> Result<()> {
        self.store.dispatch(Event::ClearProfileError).map(|_| ())
    }
}
