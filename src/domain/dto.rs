//! Request and response payloads exchanged with the REST API.
//!
//! Partial updates are expressed as structs of `Option` fields: a field that is
//! `None` is not sent at all. Images travel as [`ImageUpload`] and are encoded
//! as multipart file parts, never as JSON.

use super::user::Id;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Login credentials.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginDto {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for LoginDto {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginDto")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// Registration payload. `username` is optional server-side.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterDto {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for RegisterDto {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterDto")
            .field("name", &self.name)
            .field("username", &self.username)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// Successful login: the bearer token.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
}

impl std::fmt::Debug for AuthResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthResponse").finish_non_exhaustive()
    }
}

/// Successful registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub id: Id,
    pub email: String,
    #[serde(default)]
    pub username: Option<String>,
}

/// An image selected for upload.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    /// MIME type as reported by the picker, e.g. `image/png`.
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    #[must_use]
    pub fn new(file_name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// Reads an image from disk, guessing its MIME type from the extension.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be read.
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("image")
            .to_string();
        let mime_type = match path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("jpg" | "jpeg") => "image/jpeg",
            Some("png") => "image/png",
            Some("gif") => "image/gif",
            Some("webp") => "image/webp",
            _ => "application/octet-stream",
        };
        Ok(Self::new(file_name, mime_type, bytes))
    }

    /// Size in bytes.
    #[must_use]
    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

impl std::fmt::Debug for ImageUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageUpload")
            .field("file_name", &self.file_name)
            .field("mime_type", &self.mime_type)
            .field("size", &self.bytes.len())
            .finish()
    }
}

/// New post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePostDto {
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
    pub image: Option<ImageUpload>,
}

/// Partial post update. Only `Some` fields are sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdatePostDto {
    pub title: Option<String>,
    pub content: Option<String>,
    pub tags: Option<Vec<String>>,
    pub image: Option<ImageUpload>,
    /// Asks the server to drop the current cover image.
    pub remove_image: bool,
}

impl UpdatePostDto {
    /// Whether the update would send no fields at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.content.is_none()
            && self.tags.is_none()
            && self.image.is_none()
            && !self.remove_image
    }
}

/// Partial profile update. Only `Some` fields are sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateProfileDto {
    pub name: Option<String>,
    pub headline: Option<String>,
    pub bio: Option<String>,
    pub avatar: Option<ImageUpload>,
}

impl UpdateProfileDto {
    /// Whether the update would send no fields at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none() && self.headline.is_none() && self.bio.is_none() && self.avatar.is_none()
    }
}

/// Password change request.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordDto {
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

impl std::fmt::Debug for ChangePasswordDto {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangePasswordDto").finish_non_exhaustive()
    }
}

/// Server acknowledgement of a password change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordChangeResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: String,
}

/// New comment body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateCommentDto {
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secrets_do_not_leak_through_debug() {
        let dto = LoginDto {
            email: "ada@example.com".into(),
            password: "hunter22-secret".into(),
        };
        let debug = format!("{dto:?}");
        assert!(debug.contains("ada@example.com"));
        assert!(!debug.contains("hunter22-secret"));
    }

    #[test]
    fn empty_partials_are_detected() {
        assert!(UpdatePostDto::default().is_empty());
        assert!(!UpdatePostDto {
            remove_image: true,
            ..Default::default()
        }
        .is_empty());
        assert!(UpdateProfileDto::default().is_empty());
    }

    #[test]
    fn image_mime_is_guessed_from_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cover.JPG");
        std::fs::write(&path, [0xFF, 0xD8, 0xFF]).unwrap();
        let image = ImageUpload::from_path(&path).unwrap();
        assert_eq!(image.mime_type, "image/jpeg");
        assert_eq!(image.file_name, "cover.JPG");
        assert_eq!(image.size(), 3);
    }

    #[test]
    fn password_dto_serializes_camel_case() {
        let dto = ChangePasswordDto {
            current_password: "a".into(),
            new_password: "b".into(),
            confirm_password: "b".into(),
        };
        let json = serde_json::to_value(&dto).unwrap();
        assert!(json.get("currentPassword").is_some());
        assert!(json.get("confirmPassword").is_some());
    }
}
