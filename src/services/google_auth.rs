// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Google OAuth client and sign-in service.
//!
//! Handles:
//! - Authorization-code exchange
//! - Userinfo fetch
//! - First-login user creation with username derivation

use crate::db::FirestoreDb;
use crate::error::AppError;
use crate::models::User;
use crate::time_utils::now_rfc3339;
use serde::Deserialize;

/// Google OAuth/OpenID endpoints client.
#[derive(Clone)]
pub struct GoogleAuthClient {
    http: reqwest::Client,
    token_url: String,
    userinfo_url: String,
    client_id: String,
    client_secret: String,
}

/// Token exchange response from Google.
#[derive(Debug, Clone, Deserialize)]
pub struct GoogleTokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub expires_in: Option<i64>,
}

/// OpenID userinfo payload. Only the fields the profile needs.
#[derive(Debug, Clone, Deserialize)]
pub struct GoogleUserInfo {
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub picture: Option<String>,
}

impl GoogleAuthClient {
    /// Create a new Google client with OAuth credentials.
    pub fn new(client_id: String, client_secret: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            token_url: "https://oauth2.googleapis.com/token".to_string(),
            userinfo_url: "https://openidconnect.googleapis.com/v1/userinfo".to_string(),
            client_id,
            client_secret,
        }
    }

    /// Exchange an authorization code for tokens.
    pub async fn exchange_code(
        &self,
        code: &str,
        redirect_uri: &str,
    ) -> Result<GoogleTokenResponse, AppError> {
        let response = self
            .http
            .post(&self.token_url)
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("code", code),
                ("redirect_uri", redirect_uri),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await
            .map_err(|e| AppError::GoogleAuth(format!("Token exchange request failed: {}", e)))?;

        self.check_response_json(response).await
    }

    /// Fetch the signed-in user's profile.
    pub async fn fetch_userinfo(&self, access_token: &str) -> Result<GoogleUserInfo, AppError> {
        let response = self
            .http
            .get(&self.userinfo_url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AppError::GoogleAuth(format!("Userinfo request failed: {}", e)))?;

        self.check_response_json(response).await
    }

    /// Check response and parse JSON body.
    async fn check_response_json<T: for<'de> Deserialize<'de>>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, AppError> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::GoogleAuth(format!("HTTP {}: {}", status, body)));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::GoogleAuth(format!("JSON parse error: {}", e)))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// GoogleAuthService - sign-in orchestration
// ─────────────────────────────────────────────────────────────────────────────

/// High-level sign-in service: code exchange, profile fetch, and
/// find-or-create of the local user record.
#[derive(Clone)]
pub struct GoogleAuthService {
    client: GoogleAuthClient,
    db: FirestoreDb,
}

impl GoogleAuthService {
    pub fn new(client_id: String, client_secret: String, db: FirestoreDb) -> Self {
        Self {
            client: GoogleAuthClient::new(client_id, client_secret),
            db,
        }
    }

    /// Handle the OAuth callback: exchange the code, fetch the profile,
    /// and return the local user (created on first sign-in).
    pub async fn handle_oauth_callback(
        &self,
        code: &str,
        redirect_uri: &str,
    ) -> Result<User, AppError> {
        let tokens = self.client.exchange_code(code, redirect_uri).await?;
        let profile = self.client.fetch_userinfo(&tokens.access_token).await?;
        self.find_or_create_user(profile).await
    }

    /// Look the user up by email, creating the record on first sign-in.
    ///
    /// New users get a username derived from the email local-part,
    /// disambiguated with a numeric suffix when taken. The claimed
    /// username is provisional until onboarding completes.
    pub async fn find_or_create_user(&self, profile: GoogleUserInfo) -> Result<User, AppError> {
        if let Some(existing) = self.db.find_user_by_email(&profile.email).await? {
            return Ok(existing);
        }

        let base = derive_username_base(&profile.email);
        let username = self.allocate_username(&base).await?;

        let user = User::new(
            uuid::Uuid::new_v4().to_string(),
            profile.email,
            username,
            profile.name,
            profile.picture,
            now_rfc3339(),
        );
        self.db.upsert_user(&user).await?;

        tracing::info!(
            user_id = %user.id,
            username = %user.username,
            "Created user on first sign-in"
        );
        Ok(user)
    }

    /// First free username in the sequence base, base1, base2, ...
    async fn allocate_username(&self, base: &str) -> Result<String, AppError> {
        if self.db.find_user_by_username(base).await?.is_none() {
            return Ok(base.to_string());
        }

        let mut counter = 1u32;
        loop {
            let candidate = format!("{}{}", base, counter);
            if self.db.find_user_by_username(&candidate).await?.is_none() {
                return Ok(candidate);
            }
            counter += 1;
        }
    }
}

/// Derive a username base from an email: the local-part lowercased with
/// everything outside [a-z0-9] stripped. Falls back to "user" when
/// nothing survives.
pub fn derive_username_base(email: &str) -> String {
    let local = email.split('@').next().unwrap_or(email);
    let base: String = local
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        .collect();

    if base.is_empty() {
        "user".to_string()
    } else {
        base
    }
}
