//! Form drafts.
//!
//! Drafts are UI-only: they are never persisted, and they are reset when a
//! submission succeeds. Setting a field clears that field's error so a message
//! never outlives the input it complained about.

use crate::domain::validation::{
    self, comment_error, confirm_password_error, email_error, image_file_error, name_error,
    password_error, password_strength, post_content_error, post_title_error, tags_error,
    username_error, PasswordStrength,
};
use crate::domain::{
    ChangePasswordDto, CreatePostDto, Id, ImageUpload, LoginDto, Post, RegisterDto, Result,
    UpdatePostDto, UpdateProfileDto, ValidationError,
};

/// One text input with its error and touched flag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Field {
    pub value: String,
    pub error: Option<String>,
    pub touched: bool,
}

impl Field {
    pub fn set(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.error = None;
    }

    pub fn touch(&mut self) {
        self.touched = true;
    }

    /// Records `error` as the field message and hands it back.
    fn check(&mut self, error: Option<ValidationError>) -> Option<ValidationError> {
        self.error = error.as_ref().map(ToString::to_string);
        error
    }
}

/// Returns the first failure among per-field checks, running all of them.
fn first_failure<const N: usize>(checks: [Option<ValidationError>; N]) -> Result<()> {
    match checks.into_iter().flatten().next() {
        Some(err) => Err(err.into()),
        None => Ok(()),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginField {
    Email,
    Password,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub email: Field,
    pub password: Field,
    pub show_password: bool,
}

impl LoginForm {
    pub fn field_mut(&mut self, field: LoginField) -> &mut Field {
        match field {
            LoginField::Email => &mut self.email,
            LoginField::Password => &mut self.password,
        }
    }

    pub fn toggle_password_visibility(&mut self) {
        self.show_password = !self.show_password;
    }

    /// Checks every field, recording messages, and builds the request body.
    ///
    /// # Errors
    ///
    /// Returns the first field's validation error.
    pub fn validate(&mut self) -> Result<LoginDto> {
        let email = self.email.check(email_error(self.email.value.trim()));
        let password = self.password.check(password_error(&self.password.value));
        first_failure([email, password])?;
        Ok(LoginDto {
            email: self.email.value.trim().to_string(),
            password: self.password.value.clone(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterField {
    Name,
    Username,
    Email,
    Password,
    ConfirmPassword,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterForm {
    pub name: Field,
    pub username: Field,
    pub email: Field,
    pub password: Field,
    pub confirm_password: Field,
    pub show_password: bool,
    pub show_confirm_password: bool,
}

impl RegisterForm {
    pub fn field_mut(&mut self, field: RegisterField) -> &mut Field {
        match field {
            RegisterField::Name => &mut self.name,
            RegisterField::Username => &mut self.username,
            RegisterField::Email => &mut self.email,
            RegisterField::Password => &mut self.password,
            RegisterField::ConfirmPassword => &mut self.confirm_password,
        }
    }

    pub fn toggle_password_visibility(&mut self) {
        self.show_password = !self.show_password;
    }

    pub fn toggle_confirm_visibility(&mut self) {
        self.show_confirm_password = !self.show_confirm_password;
    }

    #[must_use]
    pub fn strength(&self) -> PasswordStrength {
        password_strength(&self.password.value)
    }

    /// Checks every field, recording messages, and builds the request body.
    ///
    /// An empty username is sent as absent.
    ///
    /// # Errors
    ///
    /// Returns the first field's validation error.
    pub fn validate(&mut self) -> Result<RegisterDto> {
        let name = self.name.check(name_error(&self.name.value));
        let username = self.username.check(username_error(self.username.value.trim()));
        let email = self.email.check(email_error(self.email.value.trim()));
        let password = self.password.check(password_error(&self.password.value));
        let confirm = self.confirm_password.check(confirm_password_error(
            &self.password.value,
            &self.confirm_password.value,
        ));
        first_failure([name, username, email, password, confirm])?;

        let username = self.username.value.trim();
        Ok(RegisterDto {
            name: self.name.value.trim().to_string(),
            username: (!username.is_empty()).then(|| username.to_string()),
            email: self.email.value.trim().to_string(),
            password: self.password.value.clone(),
        })
    }
}

/// Draft for writing or editing a post.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostComposer {
    pub title: Field,
    pub content: Field,
    /// Comma-separated tags as typed.
    pub tags: Field,
    pub image: Option<ImageUpload>,
    pub image_error: Option<String>,
    /// Set when editing an existing post.
    pub editing: Option<Id>,
    /// The post being edited had a cover that should be dropped.
    pub remove_image: bool,
}

impl PostComposer {
    /// A composer prefilled from an existing post.
    #[must_use]
    pub fn editing(post: &Post) -> Self {
        let mut composer = Self {
            editing: Some(post.id),
            ..Self::default()
        };
        composer.title.set(post.title.as_str());
        composer.content.set(post.content.as_str());
        composer.tags.set(post.tags.join(", "));
        composer
    }

    /// Picks a cover image, rejecting it immediately if unsupported.
    ///
    /// # Errors
    ///
    /// Returns the image validation error; the previous image is kept.
    pub fn set_image(&mut self, image: ImageUpload) -> Result<()> {
        if let Some(err) = image_file_error(&image) {
            self.image_error = Some(err.to_string());
            return Err(err.into());
        }
        self.image = Some(image);
        self.image_error = None;
        self.remove_image = false;
        Ok(())
    }

    pub fn clear_image(&mut self) {
        self.image = None;
        self.image_error = None;
        self.remove_image = self.editing.is_some();
    }

    #[must_use]
    pub fn parsed_tags(&self) -> Vec<String> {
        validation::parse_tags(&self.tags.value)
    }

    fn validate(&mut self) -> Result<Vec<String>> {
        let tags = self.parsed_tags();
        let title = self.title.check(post_title_error(&self.title.value));
        let content = self.content.check(post_content_error(&self.content.value));
        let tag_check = self.tags.check(tags_error(&tags));
        let image = self.image.as_ref().and_then(image_file_error);
        self.image_error = image.as_ref().map(ToString::to_string);
        first_failure([title, content, tag_check, image])?;
        Ok(tags)
    }

    /// # Errors
    ///
    /// Returns the first field's validation error.
    pub fn to_create_dto(&mut self) -> Result<CreatePostDto> {
        let tags = self.validate()?;
        Ok(CreatePostDto {
            title: self.title.value.trim().to_string(),
            content: self.content.value.trim().to_string(),
            tags,
            image: self.image.clone(),
        })
    }

    /// Full replacement of the edited post's fields.
    ///
    /// # Errors
    ///
    /// Returns the first field's validation error.
    pub fn to_update_dto(&mut self) -> Result<UpdatePostDto> {
        let tags = self.validate()?;
        Ok(UpdatePostDto {
            title: Some(self.title.value.trim().to_string()),
            content: Some(self.content.value.trim().to_string()),
            tags: Some(tags),
            image: self.image.clone(),
            remove_image: self.remove_image && self.image.is_none(),
        })
    }
}

/// Draft for changing the account password.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PasswordForm {
    pub current: Field,
    pub new: Field,
    pub confirm: Field,
}

impl PasswordForm {
    #[must_use]
    pub fn strength(&self) -> PasswordStrength {
        password_strength(&self.new.value)
    }

    /// # Errors
    ///
    /// Returns the first field's validation error.
    pub fn validate(&mut self) -> Result<ChangePasswordDto> {
        let current = self.current.check(
            self.current
                .value
                .is_empty()
                .then_some(ValidationError::Required { field: "Current password" }),
        );
        let new = self.new.check(password_error(&self.new.value));
        let confirm = self
            .confirm
            .check(confirm_password_error(&self.new.value, &self.confirm.value));
        first_failure([current, new, confirm])?;
        Ok(ChangePasswordDto {
            current_password: self.current.value.clone(),
            new_password: self.new.value.clone(),
            confirm_password: self.confirm.value.clone(),
        })
    }
}

/// Checks the present fields of a profile update.
///
/// # Errors
///
/// Returns the name or avatar validation error.
pub fn validate_profile_update(data: &UpdateProfileDto) -> Result<()> {
    first_failure([
        data.name.as_deref().and_then(name_error),
        data.avatar.as_ref().and_then(image_file_error),
    ])
}

/// Checks a comment body before it is sent.
///
/// # Errors
///
/// Returns [`ValidationError::EmptyComment`] or a length error.
pub fn validate_comment(content: &str) -> Result<String> {
    match comment_error(content) {
        Some(err) => Err(err.into()),
        None => Ok(content.trim().to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::BloglineError;

    #[test]
    fn setting_a_field_clears_its_error() {
        let mut form = LoginForm::default();
        assert!(form.validate().is_err());
        assert_eq!(form.email.error.as_deref(), Some("Email is required"));
        assert_eq!(form.password.error.as_deref(), Some("Password is required"));

        form.field_mut(LoginField::Email).set("ada@example.com");
        assert!(form.email.error.is_none());
        assert!(form.password.error.is_some());
    }

    #[test]
    fn login_form_builds_trimmed_dto() {
        let mut form = LoginForm::default();
        form.email.set("  ada@example.com ");
        form.password.set("correct horse");
        let dto = form.validate().unwrap();
        assert_eq!(dto.email, "ada@example.com");
    }

    #[test]
    fn register_form_reports_mismatch_and_omits_blank_username() {
        let mut form = RegisterForm::default();
        form.name.set("Ada");
        form.email.set("ada@example.com");
        form.password.set("password1");
        form.confirm_password.set("password2");
        assert!(matches!(
            form.validate(),
            Err(BloglineError::Validation(ValidationError::PasswordMismatch))
        ));

        form.field_mut(RegisterField::ConfirmPassword).set("password1");
        let dto = form.validate().unwrap();
        assert_eq!(dto.username, None);
    }

    #[test]
    fn composer_rejects_two_char_title() {
        let mut composer = PostComposer::default();
        composer.title.set("ab");
        composer.content.set("A body that is long enough");
        composer.tags.set("rust");
        let err = composer.to_create_dto().unwrap_err();
        assert_eq!(err.to_string(), "Title must be at least 3 characters");
        assert_eq!(composer.title.error.as_deref(), Some("Title must be at least 3 characters"));

        composer.title.set("abc");
        let dto = composer.to_create_dto().unwrap();
        assert_eq!(dto.tags, vec!["rust"]);
    }

    #[test]
    fn composer_rejects_six_tags() {
        let mut composer = PostComposer::default();
        composer.title.set("Tagged");
        composer.content.set("A body that is long enough");
        composer.tags.set("a, b, c, d, e, f");
        assert!(matches!(
            composer.to_create_dto(),
            Err(BloglineError::Validation(ValidationError::TooManyTags))
        ));
        composer.tags.set("a, b, c, d, e");
        assert_eq!(composer.to_create_dto().unwrap().tags.len(), 5);
    }

    #[test]
    fn gif_cover_is_refused_and_previous_image_kept() {
        let mut composer = PostComposer::default();
        let jpeg = ImageUpload::new("a.jpg", "image/jpeg", vec![0; 1024]);
        composer.set_image(jpeg.clone()).unwrap();
        let gif = ImageUpload::new("a.gif", "image/gif", vec![0; 10]);
        assert!(composer.set_image(gif).is_err());
        assert_eq!(composer.image, Some(jpeg));
        assert_eq!(composer.image_error.as_deref(), Some("Image must be JPEG or PNG format"));
    }

    #[test]
    fn clearing_cover_while_editing_requests_removal() {
        let mut composer = PostComposer {
            editing: Some(4),
            ..Default::default()
        };
        composer.title.set("Edited");
        composer.content.set("A body that is long enough");
        composer.tags.set("rust");
        composer.clear_image();
        assert!(composer.to_update_dto().unwrap().remove_image);
    }

    #[test]
    fn password_form_checks_confirmation() {
        let mut form = PasswordForm::default();
        form.current.set("old-password");
        form.new.set("New&pass1");
        form.confirm.set("New&pass2");
        assert!(form.validate().is_err());
        assert_eq!(form.confirm.error.as_deref(), Some("Passwords do not match"));
        assert_eq!(form.strength(), PasswordStrength::Strong);
    }

    #[test]
    fn profile_update_checks_only_present_fields() {
        assert!(validate_profile_update(&UpdateProfileDto::default()).is_ok());
        let data = UpdateProfileDto {
            name: Some("A".into()),
            ..Default::default()
        };
        assert!(validate_profile_update(&data).is_err());
    }
}
