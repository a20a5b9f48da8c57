//! Pitchboard — scoring bounded context.
//!
//! Responsible for judge score submissions, privileged corrections, and
//! on-demand aggregation of per-criterion means, nominations, and weighted
//! composites.

pub mod application;
pub mod domain;
