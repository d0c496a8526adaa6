//! HTTP API handlers for vesp-ui

pub mod auth;
pub mod error;
pub mod experiments;
pub mod health;
pub mod ratings;
pub mod videos;
pub mod views;

pub use error::ApiError;
