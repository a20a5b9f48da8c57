//! Application-level handlers for the scoring context.

pub mod command_handlers;
pub mod query_handlers;
