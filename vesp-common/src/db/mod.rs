//! Database access layer: initialization, models, seed data

pub mod init;
pub mod models;
pub mod seed;

pub use init::init_database;
pub use models::*;
