//! Pitchboard — realtime fan-out.
//!
//! Tracks live dashboard connections in a lifecycle-scoped registry and
//! pushes score and aggregate events to them, best-effort, without ever
//! propagating delivery failures back to the submission path.

pub mod dispatcher;
pub mod event;
pub mod registry;

pub use dispatcher::Dispatcher;
pub use event::{ClientMessage, LiveEvent};
pub use registry::{ConnectionRegistry, ConnectionState};
