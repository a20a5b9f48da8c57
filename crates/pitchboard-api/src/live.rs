//! Live update pipeline.
//!
//! Couples the scoring context to the realtime fan-out: after a score
//! mutation commits, the affected group's aggregate is recomputed and both
//! events are pushed to matching connections. The pipeline runs on a spawned
//! task — submission returns to its caller as soon as persistence succeeds,
//! and no failure here ever propagates back to that caller.

use pitchboard_realtime::LiveEvent;
use pitchboard_scoring::application::query_handlers;
use pitchboard_scoring::domain::events::{ScoreChange, ScoreChangeKind};
use tracing::warn;

use crate::state::AppState;

/// Recomputes and broadcasts the state of the group `change` touched.
pub async fn publish_change(state: &AppState, change: &ScoreChange) {
    if change.kind == ScoreChangeKind::Submitted {
        state
            .dispatcher
            .broadcast_all(&LiveEvent::ScoreSubmitted {
                startup_id: change.startup_id,
                round_id: change.round_id,
                judge_id: change.judge_id,
            })
            .await;
    }

    match query_handlers::get_group_aggregate(
        change.startup_id,
        change.round_id,
        None,
        state.repository.as_ref(),
    )
    .await
    {
        Ok(summary) => {
            // Rounded here: the event is presentation, the store of truth
            // keeps full precision.
            state
                .dispatcher
                .broadcast_all(&LiveEvent::AggregateUpdated {
                    startup_id: change.startup_id,
                    round_id: change.round_id,
                    summary: summary.map(|s| s.rounded()),
                })
                .await;
        }
        Err(err) => {
            // Contained: dashboards miss one update and converge on the
            // next; the submission already succeeded.
            warn!(
                startup_id = %change.startup_id,
                round_id = %change.round_id,
                error = %err,
                "live aggregate recompute failed"
            );
        }
    }
}

/// Fire-and-forget entry point used by the mutation handlers.
pub fn spawn_publish(state: AppState, change: ScoreChange) {
    tokio::spawn(async move {
        publish_change(&state, &change).await;
    });
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Utc;
    use pitchboard_core::clock::SystemClock;
    use pitchboard_core::record::{ScoreRecord, ScoreValues};
    use pitchboard_core::repository::ScoreRepository as _;
    use pitchboard_test_support::{FailingScoreRepository, InMemoryScoreRepository};
    use uuid::Uuid;

    use super::*;

    fn values(fill: u8) -> ScoreValues {
        ScoreValues {
            problem: fill,
            solution: fill,
            innovation: fill,
            team: fill,
            business_model: fill,
            market_opportunity: fill,
            technical_feasibility: fill,
            execution_strategy: fill,
            pitch_quality: fill,
        }
    }

    fn record(startup_id: Uuid, round_id: Uuid, nominated: bool) -> ScoreRecord {
        ScoreRecord {
            id: Uuid::now_v7(),
            startup_id,
            judge_id: Uuid::new_v4(),
            round_id,
            scores: values(4),
            feedback: None,
            nominated,
            nomination_reason: None,
            created_at: Utc::now(),
        }
    }

    fn change(kind: ScoreChangeKind, startup_id: Uuid, round_id: Uuid) -> ScoreChange {
        ScoreChange {
            kind,
            startup_id,
            round_id,
            judge_id: Uuid::new_v4(),
        }
    }

    #[tokio::test]
    async fn test_submission_pushes_score_then_aggregate() {
        // Arrange
        let repo = Arc::new(InMemoryScoreRepository::new());
        let state = AppState::new(repo.clone(), Arc::new(SystemClock));
        let startup_id = Uuid::new_v4();
        let round_id = Uuid::new_v4();
        repo.insert_if_absent(record(startup_id, round_id, true))
            .await
            .unwrap();

        let (id, mut rx) = state.registry.register(None).await;
        state.registry.mark_open(id).await;

        // Act
        publish_change(
            &state,
            &change(ScoreChangeKind::Submitted, startup_id, round_id),
        )
        .await;

        // Assert — per-connection order is submission first, aggregate next.
        assert!(matches!(
            rx.recv().await,
            Some(LiveEvent::ScoreSubmitted { .. })
        ));
        match rx.recv().await {
            Some(LiveEvent::AggregateUpdated { summary, .. }) => {
                let summary = summary.unwrap();
                assert_eq!(summary.judge_count, 1);
                assert_eq!(summary.total_nominations, 1);
            }
            other => panic!("expected aggregateUpdated, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_deletion_of_last_record_flags_no_data() {
        // Arrange — group is already empty when the pipeline runs.
        let state = AppState::new(
            Arc::new(InMemoryScoreRepository::new()),
            Arc::new(SystemClock),
        );
        let (id, mut rx) = state.registry.register(None).await;
        state.registry.mark_open(id).await;

        // Act
        publish_change(
            &state,
            &change(ScoreChangeKind::Deleted, Uuid::new_v4(), Uuid::new_v4()),
        )
        .await;

        // Assert — no scoreSubmitted; the aggregate is explicitly "no data."
        match rx.recv().await {
            Some(LiveEvent::AggregateUpdated { summary, .. }) => assert!(summary.is_none()),
            other => panic!("expected aggregateUpdated, got {other:?}"),
        }
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_recompute_failure_is_contained() {
        // Arrange — the store fails during recompute.
        let state = AppState::new(Arc::new(FailingScoreRepository), Arc::new(SystemClock));
        let (id, mut rx) = state.registry.register(None).await;
        state.registry.mark_open(id).await;

        // Act — must not panic or error out.
        publish_change(
            &state,
            &change(ScoreChangeKind::Submitted, Uuid::new_v4(), Uuid::new_v4()),
        )
        .await;

        // Assert — the scoreSubmitted event still went out.
        assert!(matches!(
            rx.recv().await,
            Some(LiveEvent::ScoreSubmitted { .. })
        ));
        assert!(rx.try_recv().is_err());
    }
}
