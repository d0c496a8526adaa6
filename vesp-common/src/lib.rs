//! # VESP Common Library
//!
//! Shared code for the Video Emotion Study Platform:
//! - Database initialization, models, and seed data
//! - SAM scale domain logic (validation, consensus approval gate)
//! - Password hashing
//! - Configuration and root folder resolution
//! - Common error types

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod sam;

pub use error::{Error, Result};
