//! Domain events for the scoring context.
//!
//! A [`ScoreChange`] describes a committed mutation of the score store. The
//! live update pipeline consumes it to recompute and broadcast the affected
//! (startup, round) group.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The kind of mutation that occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ScoreChangeKind {
    /// A new score was submitted.
    Submitted,
    /// An existing score was corrected.
    Corrected,
    /// A score was removed.
    Deleted,
}

/// A committed score mutation, keyed by the aggregation group it affects.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreChange {
    /// What happened.
    pub kind: ScoreChangeKind,
    /// The affected startup.
    pub startup_id: Uuid,
    /// The affected round.
    pub round_id: Uuid,
    /// The judge whose record changed.
    pub judge_id: Uuid,
}
