//! Client-side form validation.
//!
//! These checks fast-fail obviously bad input before any request is sent. The
//! server stays authoritative: when it rejects a submission, its message
//! replaces whatever local message was shown.
//!
//! Each `*_error` function returns `None` when the value is acceptable.

use super::dto::ImageUpload;
use super::error::ValidationError;
use regex::Regex;
use std::sync::OnceLock;

pub const PASSWORD_MIN: usize = 8;
pub const NAME_MIN: usize = 2;
pub const NAME_MAX: usize = 255;
pub const USERNAME_MIN: usize = 3;
pub const USERNAME_MAX: usize = 30;
pub const TITLE_MIN: usize = 3;
pub const TITLE_MAX: usize = 200;
pub const CONTENT_MIN: usize = 10;
pub const COMMENT_MAX: usize = 2000;
pub const TAGS_MAX: usize = 5;

/// Largest accepted image upload (5 MB).
pub const IMAGE_MAX_BYTES: usize = 5 * 1024 * 1024;

/// MIME types accepted for post covers and avatars.
pub const IMAGE_TYPES: [&str; 3] = ["image/jpeg", "image/png", "image/jpg"];

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap_or_else(|_| unreachable!()))
}

fn username_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[a-zA-Z0-9_]+$").unwrap_or_else(|_| unreachable!()))
}

fn char_len(value: &str) -> usize {
    value.trim().chars().count()
}

#[must_use]
pub fn email_error(email: &str) -> Option<ValidationError> {
    if email.is_empty() {
        return Some(ValidationError::Required { field: "Email" });
    }
    if !email_regex().is_match(email) {
        return Some(ValidationError::InvalidEmail);
    }
    None
}

#[must_use]
pub fn password_error(password: &str) -> Option<ValidationError> {
    if password.is_empty() {
        return Some(ValidationError::Required { field: "Password" });
    }
    if password.chars().count() < PASSWORD_MIN {
        return Some(ValidationError::PasswordTooShort);
    }
    None
}

#[must_use]
pub fn confirm_password_error(password: &str, confirm: &str) -> Option<ValidationError> {
    if confirm.is_empty() {
        return Some(ValidationError::ConfirmationRequired);
    }
    if password != confirm {
        return Some(ValidationError::PasswordMismatch);
    }
    None
}

/// Rough password strength shown next to the password field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PasswordStrength {
    Weak,
    Medium,
    Strong,
}

/// Scores a password by how many character classes it uses.
///
/// Anything under the minimum length is weak regardless of its classes.
#[must_use]
pub fn password_strength(password: &str) -> PasswordStrength {
    if password.chars().count() < PASSWORD_MIN {
        return PasswordStrength::Weak;
    }
    const SPECIALS: &str = "!@#$%^&*(),.?\":{}|<>";
    let classes = [
        password.chars().any(|c| c.is_ascii_uppercase()),
        password.chars().any(|c| c.is_ascii_lowercase()),
        password.chars().any(|c| c.is_ascii_digit()),
        password.chars().any(|c| SPECIALS.contains(c)),
    ]
    .into_iter()
    .filter(|present| *present)
    .count();

    match classes {
        0..=2 => PasswordStrength::Weak,
        3 => PasswordStrength::Medium,
        _ => PasswordStrength::Strong,
    }
}

#[must_use]
pub fn name_error(name: &str) -> Option<ValidationError> {
    match char_len(name) {
        0 => Some(ValidationError::Required { field: "Name" }),
        n if n < NAME_MIN => Some(ValidationError::TooShort { field: "Name", min: NAME_MIN }),
        n if n > NAME_MAX => Some(ValidationError::TooLong { field: "Name", max: NAME_MAX }),
        _ => None,
    }
}

/// Usernames are optional, so an empty value passes.
#[must_use]
pub fn username_error(username: &str) -> Option<ValidationError> {
    if username.is_empty() {
        return None;
    }
    let len = username.chars().count();
    if len < USERNAME_MIN {
        return Some(ValidationError::TooShort { field: "Username", min: USERNAME_MIN });
    }
    if len > USERNAME_MAX {
        return Some(ValidationError::TooLong { field: "Username", max: USERNAME_MAX });
    }
    if !username_regex().is_match(username) {
        return Some(ValidationError::InvalidUsername);
    }
    None
}

#[must_use]
pub fn post_title_error(title: &str) -> Option<ValidationError> {
    match char_len(title) {
        0 => Some(ValidationError::Required { field: "Title" }),
        n if n < TITLE_MIN => Some(ValidationError::TooShort { field: "Title", min: TITLE_MIN }),
        n if n > TITLE_MAX => Some(ValidationError::TooLong { field: "Title", max: TITLE_MAX }),
        _ => None,
    }
}

#[must_use]
pub fn post_content_error(content: &str) -> Option<ValidationError> {
    match char_len(content) {
        0 => Some(ValidationError::Required { field: "Content" }),
        n if n < CONTENT_MIN => Some(ValidationError::TooShort { field: "Content", min: CONTENT_MIN }),
        _ => None,
    }
}

#[must_use]
pub fn comment_error(comment: &str) -> Option<ValidationError> {
    match char_len(comment) {
        0 => Some(ValidationError::EmptyComment),
        n if n > COMMENT_MAX => Some(ValidationError::TooLong { field: "Comment", max: COMMENT_MAX }),
        _ => None,
    }
}

#[must_use]
pub fn image_file_error(image: &ImageUpload) -> Option<ValidationError> {
    if !IMAGE_TYPES.contains(&image.mime_type.as_str()) {
        return Some(ValidationError::ImageFormat);
    }
    if image.size() > IMAGE_MAX_BYTES {
        return Some(ValidationError::ImageTooLarge);
    }
    None
}

#[must_use]
pub fn tags_error(tags: &[String]) -> Option<ValidationError> {
    if tags.is_empty() {
        return Some(ValidationError::NoTags);
    }
    if tags.len() > TAGS_MAX {
        return Some(ValidationError::TooManyTags);
    }
    None
}

/// Splits a comma-separated tag field into trimmed, non-empty, de-duplicated tags.
#[must_use]
pub fn parse_tags(raw: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for tag in raw.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        if !tags.iter().any(|t| t.eq_ignore_ascii_case(tag)) {
            tags.push(tag.to_string());
        }
    }
    tags
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn tags(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("tag{i}")).collect()
    }

    #[test]
    fn two_char_title_is_too_short() {
        assert_eq!(
            post_title_error("ab"),
            Some(ValidationError::TooShort { field: "Title", min: 3 })
        );
    }

    #[test]
    fn three_char_title_with_valid_content_passes() {
        assert_eq!(post_title_error("abc"), None);
        assert_eq!(post_content_error("long enough body text"), None);
    }

    #[test]
    fn gif_is_rejected_and_small_jpeg_accepted() {
        let gif = ImageUpload::new("a.gif", "image/gif", vec![0; 1024]);
        assert_eq!(image_file_error(&gif), Some(ValidationError::ImageFormat));

        let jpeg = ImageUpload::new("a.jpg", "image/jpeg", vec![0; 1024 * 1024]);
        assert_eq!(image_file_error(&jpeg), None);
    }

    #[test]
    fn oversized_png_is_rejected() {
        let png = ImageUpload::new("a.png", "image/png", vec![0; IMAGE_MAX_BYTES + 1]);
        assert_eq!(image_file_error(&png), Some(ValidationError::ImageTooLarge));
    }

    #[rstest]
    #[case(0, Some(ValidationError::NoTags))]
    #[case(1, None)]
    #[case(5, None)]
    #[case(6, Some(ValidationError::TooManyTags))]
    fn tag_count_limits(#[case] count: usize, #[case] expected: Option<ValidationError>) {
        assert_eq!(tags_error(&tags(count)), expected);
    }

    #[rstest]
    #[case("", Some(ValidationError::Required { field: "Email" }))]
    #[case("not-an-email", Some(ValidationError::InvalidEmail))]
    #[case("a b@c.d", Some(ValidationError::InvalidEmail))]
    #[case("ada@example.com", None)]
    fn email_rules(#[case] email: &str, #[case] expected: Option<ValidationError>) {
        assert_eq!(email_error(email), expected);
    }

    #[rstest]
    #[case("", None)]
    #[case("ab", Some(ValidationError::TooShort { field: "Username", min: 3 }))]
    #[case("ada-l", Some(ValidationError::InvalidUsername))]
    #[case("ada_lovelace", None)]
    fn username_rules(#[case] username: &str, #[case] expected: Option<ValidationError>) {
        assert_eq!(username_error(username), expected);
    }

    #[rstest]
    #[case("short", PasswordStrength::Weak)]
    #[case("alllowercase", PasswordStrength::Weak)]
    #[case("Lowerand1", PasswordStrength::Medium)]
    #[case("Lower&1upper", PasswordStrength::Strong)]
    fn strength_counts_classes(#[case] password: &str, #[case] expected: PasswordStrength) {
        assert_eq!(password_strength(password), expected);
    }

    #[test]
    fn password_rules() {
        assert_eq!(password_error("1234567"), Some(ValidationError::PasswordTooShort));
        assert_eq!(password_error("12345678"), None);
        assert_eq!(confirm_password_error("abcdefgh", "abcdefgi"), Some(ValidationError::PasswordMismatch));
    }

    #[test]
    fn name_is_trimmed_before_counting() {
        assert_eq!(name_error("   "), Some(ValidationError::Required { field: "Name" }));
        assert_eq!(name_error(" a "), Some(ValidationError::TooShort { field: "Name", min: 2 }));
        assert_eq!(name_error("Ada"), None);
    }

    #[test]
    fn comment_rules() {
        assert_eq!(comment_error("  "), Some(ValidationError::EmptyComment));
        assert_eq!(comment_error(&"x".repeat(COMMENT_MAX + 1)), Some(ValidationError::TooLong { field: "Comment", max: COMMENT_MAX }));
        assert_eq!(comment_error("nice"), None);
    }

    #[test]
    fn tags_are_split_and_deduplicated() {
        assert_eq!(parse_tags(" rust, web ,,Rust, async "), vec!["rust", "web", "async"]);
    }
}
