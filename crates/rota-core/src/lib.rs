//! Shared types, configuration and errors for the on-call compensation service.

pub mod config;
pub mod error;
pub mod types;

pub use error::{Result, RotaError};
