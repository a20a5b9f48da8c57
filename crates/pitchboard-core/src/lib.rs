//! Pitchboard Core — shared domain abstractions.
//!
//! This crate defines the fundamental types and traits that the scoring,
//! storage, and realtime crates depend on. It contains no infrastructure
//! code.

pub mod clock;
pub mod command;
pub mod error;
pub mod record;
pub mod repository;
