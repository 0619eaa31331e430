// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User profile routes: the signed-in user, public profiles, onboarding.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::user::is_valid_username;
use crate::models::{TextureType, User};
use crate::services::library::CollectionWithItems;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

const MAX_NAME_LEN: usize = 50;
const MAX_BIO_LEN: usize = 500;

/// Routes readable without a session (public profile pages).
pub fn public_routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/users/{username}", get(get_user_profile))
}

/// Routes requiring authentication.
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/me", get(get_me).patch(update_profile))
        .route("/api/me/onboarding", post(complete_onboarding))
        .route("/api/users/check-username", get(check_username))
}

// ─── Responses ───────────────────────────────────────────────

/// Current user response (includes private fields).
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct MeResponse {
    pub id: String,
    pub email: String,
    pub username: String,
    pub name: Option<String>,
    pub image: Option<String>,
    pub accent_color: String,
    pub bg_texture: TextureType,
    pub bio: Option<String>,
    pub onboarding_completed: bool,
    pub collections: Vec<CollectionWithItems>,
}

/// Public profile response (no email, no onboarding state).
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ProfileResponse {
    pub username: String,
    pub name: Option<String>,
    pub image: Option<String>,
    pub accent_color: String,
    pub bg_texture: TextureType,
    pub bio: Option<String>,
    pub collections: Vec<CollectionWithItems>,
}

impl ProfileResponse {
    fn from_user(user: User, collections: Vec<CollectionWithItems>) -> Self {
        Self {
            username: user.username,
            name: user.name,
            image: user.image,
            accent_color: user.accent_color,
            bg_texture: user.bg_texture,
            bio: user.bio,
            collections,
        }
    }
}

// ─── Current User ────────────────────────────────────────────

/// Get the signed-in user's profile with collections and items.
async fn get_me(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<MeResponse>> {
    let profile = state
        .db
        .get_user(&user.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", user.user_id)))?;

    let collections = state.library.collections_with_items(&user.user_id).await?;

    Ok(Json(MeResponse {
        id: profile.id,
        email: profile.email,
        username: profile.username,
        name: profile.name,
        image: profile.image,
        accent_color: profile.accent_color,
        bg_texture: profile.bg_texture,
        bio: profile.bio,
        onboarding_completed: profile.onboarding_completed,
        collections,
    }))
}

// ─── Onboarding ──────────────────────────────────────────────

#[derive(Deserialize)]
pub struct OnboardingRequest {
    pub username: String,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub accent_color: Option<String>,
}

/// Complete onboarding: claim a username, set initial profile fields,
/// and create the starter collections when the user has none.
async fn complete_onboarding(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<OnboardingRequest>,
) -> Result<Json<MeResponse>> {
    if !is_valid_username(&body.username) {
        return Err(AppError::Validation(
            "Invalid username. Use 3-20 lowercase letters, numbers, or underscores.".to_string(),
        ));
    }

    // Taken by someone else? Claiming your own (auto-generated) username
    // again is fine.
    if let Some(existing) = state.db.find_user_by_username(&body.username).await? {
        if existing.id != user.user_id {
            return Err(AppError::Validation(
                "Username is already taken".to_string(),
            ));
        }
    }

    let mut profile = state
        .db
        .get_user(&user.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", user.user_id)))?;

    if let Some(color) = &body.accent_color {
        validate_accent_color(color)?;
        profile.accent_color = color.clone();
    }
    profile.username = body.username;
    profile.bio = body
        .bio
        .as_deref()
        .map(str::trim)
        .filter(|b| !b.is_empty())
        .map(str::to_string);
    profile.onboarding_completed = true;

    state.db.upsert_user(&profile).await?;
    state
        .library
        .ensure_default_collections(&user.user_id)
        .await?;

    tracing::info!(
        user_id = %user.user_id,
        username = %profile.username,
        "Onboarding completed"
    );

    let collections = state.library.collections_with_items(&user.user_id).await?;
    Ok(Json(MeResponse {
        id: profile.id,
        email: profile.email,
        username: profile.username,
        name: profile.name,
        image: profile.image,
        accent_color: profile.accent_color,
        bg_texture: profile.bg_texture,
        bio: profile.bio,
        onboarding_completed: profile.onboarding_completed,
        collections,
    }))
}

// ─── Public Profiles ─────────────────────────────────────────

/// Get a user's public profile by username.
async fn get_user_profile(
    State(state): State<Arc<AppState>>,
    Path(username): Path<String>,
) -> Result<Json<ProfileResponse>> {
    let profile = state
        .db
        .find_user_by_username(&username)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let collections = state.library.collections_with_items(&profile.id).await?;
    Ok(Json(ProfileResponse::from_user(profile, collections)))
}

#[derive(Deserialize)]
pub struct UpdateProfileRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub accent_color: Option<String>,
    #[serde(default)]
    pub bg_texture: Option<TextureType>,
}

/// Update the signed-in user's profile.
///
/// Self-addressed on purpose: there is no username-addressed update
/// endpoint, so a failed ownership check can never confirm that a handle
/// exists.
async fn update_profile(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<UpdateProfileRequest>,
) -> Result<Json<ProfileResponse>> {
    let mut profile = state
        .db
        .get_user(&user.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", user.user_id)))?;

    if let Some(name) = body.name {
        if name.len() > MAX_NAME_LEN {
            return Err(AppError::Validation(format!(
                "Name must be at most {} characters",
                MAX_NAME_LEN
            )));
        }
        profile.name = Some(name).filter(|n| !n.trim().is_empty());
    }
    if let Some(bio) = body.bio {
        if bio.len() > MAX_BIO_LEN {
            return Err(AppError::Validation(format!(
                "Bio must be at most {} characters",
                MAX_BIO_LEN
            )));
        }
        profile.bio = Some(bio.trim().to_string()).filter(|b| !b.is_empty());
    }
    if let Some(color) = body.accent_color {
        validate_accent_color(&color)?;
        profile.accent_color = color;
    }
    if let Some(texture) = body.bg_texture {
        profile.bg_texture = texture;
    }

    state.db.upsert_user(&profile).await?;

    let collections = state.library.collections_with_items(&profile.id).await?;
    Ok(Json(ProfileResponse::from_user(profile, collections)))
}

// ─── Username Availability ───────────────────────────────────

#[derive(Deserialize)]
struct CheckUsernameQuery {
    username: Option<String>,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct CheckUsernameResponse {
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_current_user: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Check whether a username is free to claim.
async fn check_username(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<CheckUsernameQuery>,
) -> Result<Json<CheckUsernameResponse>> {
    let username = params
        .username
        .ok_or_else(|| AppError::Validation("Username is required".to_string()))?;

    // Format failures are reported in-band, not as an error status - the
    // onboarding form polls this as the user types.
    if !is_valid_username(&username) {
        return Ok(Json(CheckUsernameResponse {
            available: false,
            is_current_user: None,
            error: Some("Invalid username format".to_string()),
        }));
    }

    match state.db.find_user_by_username(&username).await? {
        Some(existing) if existing.id == user.user_id => Ok(Json(CheckUsernameResponse {
            available: true,
            is_current_user: Some(true),
            error: None,
        })),
        Some(_) => Ok(Json(CheckUsernameResponse {
            available: false,
            is_current_user: None,
            error: None,
        })),
        None => Ok(Json(CheckUsernameResponse {
            available: true,
            is_current_user: None,
            error: None,
        })),
    }
}

/// Accent colors are hex strings like "#6366f1".
fn validate_accent_color(color: &str) -> Result<()> {
    let valid = color.len() == 7
        && color.starts_with('#')
        && color[1..].chars().all(|c| c.is_ascii_hexdigit());

    if valid {
        Ok(())
    } else {
        Err(AppError::Validation(
            "Accent color must be a hex string like #6366f1".to_string(),
        ))
    }
}
