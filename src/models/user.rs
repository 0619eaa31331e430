//! User model for storage and API.

use crate::models::media::TextureType;
use serde::{Deserialize, Serialize};

/// User profile stored in Firestore.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Generated UUID (also used as document ID)
    pub id: String,
    /// Email from the identity provider (unique)
    pub email: String,
    /// Public handle (unique; lowercase, 3-20 chars, [a-z0-9_])
    pub username: String,
    /// Display name
    pub name: Option<String>,
    /// Profile picture URL
    pub image: Option<String>,
    /// Accent color as a hex string, e.g. "#6366f1"
    pub accent_color: String,
    /// Background texture for the profile page
    pub bg_texture: TextureType,
    /// Free-text bio
    pub bio: Option<String>,
    /// Whether the user has finished onboarding (claimed a username)
    pub onboarding_completed: bool,
    /// When the user first signed in (RFC3339)
    pub created_at: String,
}

/// Default accent color applied to new users.
pub const DEFAULT_ACCENT_COLOR: &str = "#6366f1";

impl User {
    /// Create a new user record from identity-provider profile data.
    ///
    /// The username must already be allocated (see `services::google_auth`).
    pub fn new(
        id: String,
        email: String,
        username: String,
        name: Option<String>,
        image: Option<String>,
        created_at: String,
    ) -> Self {
        Self {
            id,
            email,
            username,
            name,
            image,
            accent_color: DEFAULT_ACCENT_COLOR.to_string(),
            bg_texture: TextureType::default(),
            bio: None,
            onboarding_completed: false,
            created_at,
        }
    }
}

/// Validate a username: 3-20 chars, lowercase letters, digits, underscore.
pub fn is_valid_username(username: &str) -> bool {
    let len = username.len();
    (3..=20).contains(&len)
        && username
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}
