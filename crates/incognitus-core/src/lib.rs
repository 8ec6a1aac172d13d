//! # incognitus-core
//!
//! Core types, traits, configuration, and error handling for the Incognitus
//! mini-app client.

pub mod config;
pub mod error;
pub mod lang;
pub mod traits;
