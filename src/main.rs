// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! TasteID API Server
//!
//! Social taste profiles: users curate up to nine collections of media
//! items on a profile grid and swipe through them Tinder-style.

use std::sync::Arc;
use tasteid::{
    config::Config,
    db::FirestoreDb,
    services::{GoogleAuthService, LibraryService, SearchServices, SwiperRegistry},
    AppState,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging for GCP
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting TasteID API");

    // Initialize Firestore database
    let db = FirestoreDb::new(&config.gcp_project_id)
        .await
        .expect("Failed to connect to Firestore");

    // Ordering engine - the only write path for collections and items
    let library = LibraryService::new(db.clone());

    // Google sign-in
    let auth_service = GoogleAuthService::new(
        config.google_client_id.clone(),
        config.google_client_secret.clone(),
        db.clone(),
    );

    // Media search providers (each degrades independently when
    // unconfigured or unreachable)
    let search = SearchServices::from_config(&config);

    // In-memory swipe sessions, one per user
    let swiper = SwiperRegistry::new();

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        db,
        library,
        auth_service,
        search,
        swiper,
    });

    // Build router
    let app = tasteid::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging (GCP-compliant).
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("tasteid=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
