// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! TasteID API Server
//!
//! This crate provides the backend API for TasteID: social taste
//! profiles built from 3x3 grids of media collections, with Tinder-style
//! swiping through a collection's items.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::FirestoreDb;
use services::{GoogleAuthService, LibraryService, SearchServices, SwiperRegistry};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: FirestoreDb,
    pub library: LibraryService,
    pub auth_service: GoogleAuthService,
    pub search: SearchServices,
    pub swiper: SwiperRegistry,
}
