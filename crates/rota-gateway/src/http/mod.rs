pub mod compensation;
pub mod error;
pub mod health;
