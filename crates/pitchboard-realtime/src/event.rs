//! Live event envelope and inbound client messages.
//!
//! Outbound events serialize to the JSON envelope `{ "type": ..., ...payload }`
//! that dashboards consume. Inbound client messages are parsed leniently:
//! unrecognized or malformed payloads are logged and dropped, never fatal.

use pitchboard_scoring::application::query_handlers::AggregateSummary;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// An event pushed to connected dashboards.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum LiveEvent {
    /// Sent exactly once when a connection completes its handshake.
    #[serde(rename_all = "camelCase")]
    Welcome {
        /// The connection's opaque identifier.
        connection_id: Uuid,
        /// Greeting text.
        message: String,
    },
    /// A judge's score was accepted for a (startup, round) group.
    #[serde(rename_all = "camelCase")]
    ScoreSubmitted {
        /// The scored startup.
        startup_id: Uuid,
        /// The round of the submission.
        round_id: Uuid,
        /// The submitting judge.
        judge_id: Uuid,
    },
    /// A group's aggregate changed; carries the recomputed snapshot.
    /// `None` flags a group with no remaining data, e.g. after its last
    /// record was deleted.
    #[serde(rename_all = "camelCase")]
    AggregateUpdated {
        /// The affected startup.
        startup_id: Uuid,
        /// The affected round.
        round_id: Uuid,
        /// The recomputed summary, or `None` for an emptied group.
        summary: Option<AggregateSummary>,
    },
    /// Opaque payload reserved for forward-compatible extension.
    Custom {
        /// Free-form event data.
        payload: Value,
    },
}

impl LiveEvent {
    /// The round this event concerns, if any. Events without a round key
    /// match every subscription filter.
    #[must_use]
    pub fn round_id(&self) -> Option<Uuid> {
        match self {
            LiveEvent::ScoreSubmitted { round_id, .. }
            | LiveEvent::AggregateUpdated { round_id, .. } => Some(*round_id),
            LiveEvent::Welcome { .. } | LiveEvent::Custom { .. } => None,
        }
    }
}

/// A message received from a connected client.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientMessage {
    /// The client's dashboard is ready to render scores.
    ReadyForScoring,
    /// Free-form client event.
    CustomEvent {
        /// Opaque event data.
        #[serde(default)]
        data: Value,
    },
}

impl ClientMessage {
    /// Parses an inbound payload. Returns `None` for unparseable or
    /// unrecognized messages, which callers log and drop.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        serde_json::from_str(raw).ok()
    }
}
