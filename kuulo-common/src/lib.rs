//! # Kuulo Common Library
//!
//! Shared code for the Kuulo services including:
//! - Error types
//! - Configuration loading and root folder resolution
//! - Database initialization and seeding

pub mod config;
pub mod db;
pub mod error;

pub use error::{Error, Result};
