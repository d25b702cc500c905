//! Profile slice: the caller's own profile and the profile being viewed.

use super::Generations;
use crate::app::forms::PasswordForm;
use crate::domain::{PublicProfile, User};
use crate::worker::Generation;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileSlice {
    pub my_profile: Option<User>,
    pub viewed_profile: Option<PublicProfile>,
    /// Last user looked up by id.
    pub fetched_user: Option<User>,
    pub is_loading: bool,
    pub error: Option<String>,
    pub password_form: PasswordForm,
    /// Server acknowledgement of the last password change.
    pub password_notice: Option<String>,
    generations: Generations,
}

impl ProfileSlice {
    pub fn request_started(&mut self) {
        self.is_loading = true;
        self.error = None;
    }

    pub fn request_failed(&mut self, message: impl Into<String>) {
        self.is_loading = false;
        self.error = Some(message.into());
    }

    pub fn my_profile_loaded(&mut self, user: User) {
        self.is_loading = false;
        self.my_profile = Some(user);
    }

    pub fn public_profile_requested(&mut self) -> Generation {
        self.request_started();
        self.generations.issue()
    }

    /// Returns `false` if the reply was stale and dropped.
    pub fn public_profile_loaded(&mut self, generation: Generation, profile: PublicProfile) -> bool {
        if !self.generations.is_current(generation) {
            return false;
        }
        self.is_loading = false;
        self.viewed_profile = Some(profile);
        true
    }

    pub fn public_profile_failed(&mut self, generation: Generation, message: impl Into<String>) -> bool {
        if !self.generations.is_current(generation) {
            return false;
        }
        self.request_failed(message);
        true
    }

    pub fn user_fetched(&mut self, user: User) {
        self.is_loading = false;
        self.fetched_user = Some(user);
    }

    pub fn password_changed(&mut self, notice: String) {
        self.is_loading = false;
        self.password_form = PasswordForm::default();
        self.password_notice = Some(notice);
    }

    pub fn clear_viewed(&mut self) {
        self.viewed_profile = None;
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Forgets everything tied to the signed-in user.
    pub fn signed_out(&mut self) {
        self.my_profile = None;
        self.password_form = PasswordForm::default();
        self.password_notice = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(username: &str) -> PublicProfile {
        PublicProfile {
            id: 1,
            name: username.to_uppercase(),
            username: username.into(),
            headline: None,
            avatar_url: None,
            bio: None,
            posts: None,
        }
    }

    #[test]
    fn slow_profile_reply_does_not_replace_newer_one() {
        let mut slice = ProfileSlice::default();
        let ada = slice.public_profile_requested();
        let grace = slice.public_profile_requested();
        assert!(slice.public_profile_loaded(grace, profile("grace")));
        assert!(!slice.public_profile_loaded(ada, profile("ada")));
        assert_eq!(slice.viewed_profile.map(|p| p.username).as_deref(), Some("grace"));
    }

    #[test]
    fn password_change_resets_form() {
        let mut slice = ProfileSlice::default();
        slice.password_form.current.set("old");
        slice.password_changed("Password updated".into());
        assert!(slice.password_form.current.value.is_empty());
        assert_eq!(slice.password_notice.as_deref(), Some("Password updated"));
    }
}
