// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod google_auth;
pub mod library;
pub mod search;
pub mod swipe;

pub use google_auth::{GoogleAuthClient, GoogleAuthService};
pub use library::LibraryService;
pub use search::SearchServices;
pub use swipe::{SwipeAction, SwipeDirection, SwiperRegistry, SwiperState};
