//! Shared test mocks and utilities for the Pitchboard scoring engine.

mod clock;
mod repository;

pub use clock::FixedClock;
pub use repository::{FailingScoreRepository, InMemoryScoreRepository};
