//! Pitchboard API — HTTP and WebSocket surface of the scoring engine.

pub mod error;
pub mod live;
pub mod routes;
pub mod state;
