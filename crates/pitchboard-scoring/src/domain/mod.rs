//! Domain types for the scoring context.

pub mod commands;
pub mod criteria;
pub mod events;
pub mod weights;
