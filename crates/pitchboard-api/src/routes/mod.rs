//! Route modules.

pub mod health;
pub mod scores;
pub mod ws;
