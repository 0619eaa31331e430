// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod collection;
pub mod item;
pub mod media;
pub mod saved_item;
pub mod user;

pub use collection::Collection;
pub use item::{Item, ItemDraft};
pub use media::{MediaType, TextureType};
pub use saved_item::SavedItem;
pub use user::User;
