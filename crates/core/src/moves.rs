//! Executing a [`MoveIntent`] against an [`EntryStore`].
//!
//! A move is a remove followed by an add, not one transaction. The target is
//! validated before anything is removed. A remove the database did not apply
//! is reconciled first, and the move stops there if the original survived.
//! If the add fails after the remove succeeded, the original entry is re-added
//! to its source event; only when that compensation also fails is the entry
//! lost.

use serde::Serialize;

use crate::activation::ActivationOverlay;
use crate::assignment::{can_assign, AssignRequest, AssignmentOptions};
use crate::drag::MoveIntent;
use crate::entry::{MeetEntry, RelayTeam};
use crate::entry_store::{EntryStore, MutationOutcome};
use crate::error::CoreError;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum MoveOutcome {
    /// Dropped back on the source event.
    NoOp,
    Moved {
        removed: MeetEntry,
        added: MeetEntry,
        remove: MutationOutcome,
    },
    /// The add failed and the original entry was restored.
    RolledBack { restored: MeetEntry, reason: String },
}

pub async fn execute_move(
    store: &mut EntryStore,
    intent: &MoveIntent,
    overlay: &ActivationOverlay,
    options: &AssignmentOptions,
) -> Result<MoveOutcome, CoreError> {
    if intent.source_event_id == intent.target_event_id {
        return Ok(MoveOutcome::NoOp);
    }

    let original = store
        .get(intent.entry.id)
        .cloned()
        .ok_or(CoreError::NotFound {
            entity: "MeetEntry",
            id: intent.entry.id,
        })?;
    if original.event_id != intent.source_event_id {
        return Err(CoreError::Conflict(format!(
            "Entry {} is no longer in event {}",
            original.id, intent.source_event_id
        )));
    }

    let planned = {
        let catalog = store.catalog();
        let target = catalog.require(intent.target_event_id)?;
        let both_relays = target.is_relay && catalog.is_relay(original.event_id);
        // An Alt event only takes Alt squads.
        let relay_team = match target.default_relay_team() {
            Some(RelayTeam::Alt) => Some(RelayTeam::Alt),
            _ => original.relay_team,
        };
        let request = AssignRequest {
            athlete_id: original.athlete_id,
            relay_team: if both_relays { relay_team } else { None },
            relay_leg: if both_relays { original.relay_leg } else { None },
            replacing: Some(original.id),
        };
        can_assign(target, &request, store.entries(), catalog, overlay, options)?
    };

    let meet_id = store.meet_id();
    let remove = store.remove(original.id).await?;
    if remove == MutationOutcome::Tentative {
        store.reconcile().await?;
        if store.get(original.id).is_some() {
            tracing::warn!(
                meet_id,
                entry_id = original.id,
                "Move aborted; source entry could not be removed"
            );
            return Err(CoreError::Forbidden(format!(
                "Entry {} could not be removed from event {}",
                original.id, intent.source_event_id
            )));
        }
    }

    match store.add(&planned).await {
        Ok(added) => {
            tracing::info!(
                meet_id,
                entry_id = original.id,
                from = intent.source_event_id,
                to = intent.target_event_id,
                "Entry moved"
            );
            Ok(MoveOutcome::Moved {
                removed: original,
                added,
                remove,
            })
        }
        Err(add_err) => {
            tracing::warn!(
                meet_id,
                entry_id = original.id,
                error = %add_err,
                "Move failed after remove; restoring original entry"
            );
            match store.add(&original.to_new_entry(meet_id)).await {
                Ok(restored) => Ok(MoveOutcome::RolledBack {
                    restored,
                    reason: add_err.to_string(),
                }),
                Err(restore_err) => {
                    tracing::error!(
                        meet_id,
                        entry_id = original.id,
                        error = %restore_err,
                        "Restoring moved entry failed; entry lost"
                    );
                    Err(CoreError::Persistence(format!(
                        "Entry {} was removed but could not be re-added ({add_err}) or restored ({restore_err})",
                        original.id
                    )))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::entry::NewEntry;
    use crate::error::RuleViolation;
    use crate::event::fixtures::{individual, relay};
    use crate::event::EventCatalog;
    use crate::testing::MemoryStore;
    use crate::types::DbId;
    use assert_matches::assert_matches;

    const MEET: DbId = 3;

    async fn setup() -> (Arc<MemoryStore>, EntryStore) {
        let db = Arc::new(MemoryStore::default());
        let catalog = Arc::new(EventCatalog::new([
            individual(1, "100m"),
            individual(2, "200m"),
            individual(3, "400m"),
            individual(4, "800m"),
            individual(5, "1600m"),
            relay(6, "4x100"),
            relay(7, "4x400"),
            relay(8, "4x100 Alt"),
        ]));
        let store = EntryStore::load(db.clone(), catalog, MEET).await.unwrap();
        (db, store)
    }

    fn intent(entry: &MeetEntry, target: DbId) -> MoveIntent {
        MoveIntent {
            entry: entry.clone(),
            source_event_id: entry.event_id,
            target_event_id: target,
        }
    }

    fn overlay() -> ActivationOverlay {
        ActivationOverlay::new(MEET, [])
    }

    async fn add(store: &mut EntryStore, athlete_id: DbId, event_id: DbId) -> MeetEntry {
        store
            .add(&NewEntry {
                meet_id: MEET,
                athlete_id,
                event_id,
                relay_leg: None,
                relay_team: None,
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_move_removes_one_and_adds_one() {
        let (db, mut store) = setup().await;
        let entry = add(&mut store, 10, 1).await;
        add(&mut store, 11, 1).await;

        let outcome = execute_move(&mut store, &intent(&entry, 2), &overlay(), &AssignmentOptions::default())
            .await
            .unwrap();

        let MoveOutcome::Moved { added, .. } = outcome else {
            panic!("expected a move");
        };
        assert_eq!(added.athlete_id, 10);
        assert_eq!(added.event_id, 2);
        assert_eq!(store.by_event(1).len(), 1);
        assert_eq!(store.by_event(2).len(), 1);
        assert_eq!(db.entries_for(MEET).len(), 2);
    }

    #[tokio::test]
    async fn test_drop_on_source_is_noop() {
        let (db, mut store) = setup().await;
        let entry = add(&mut store, 10, 1).await;
        let before = db.mutation_count();
        let outcome = execute_move(&mut store, &intent(&entry, 1), &overlay(), &AssignmentOptions::default())
            .await
            .unwrap();
        assert_eq!(outcome, MoveOutcome::NoOp);
        assert_eq!(db.mutation_count(), before);
    }

    #[tokio::test]
    async fn test_athlete_at_cap_can_move_between_individual_events() {
        let (_db, mut store) = setup().await;
        let first = add(&mut store, 10, 1).await;
        for event_id in 2..=4 {
            add(&mut store, 10, event_id).await;
        }
        let outcome = execute_move(&mut store, &intent(&first, 5), &overlay(), &AssignmentOptions::default())
            .await
            .unwrap();
        assert_matches!(outcome, MoveOutcome::Moved { .. });
        assert_eq!(store.count_for_athlete(10, true), 4);
    }

    #[tokio::test]
    async fn test_rejected_target_mutates_nothing() {
        let (db, mut store) = setup().await;
        let entry = add(&mut store, 10, 1).await;
        add(&mut store, 10, 2).await;
        let before = db.mutation_count();

        let result = execute_move(&mut store, &intent(&entry, 2), &overlay(), &AssignmentOptions::default()).await;
        assert_matches!(result, Err(CoreError::Rule(RuleViolation::DuplicateEntry { .. })));

        let inactive = ActivationOverlay::new(MEET, [3]);
        let result = execute_move(&mut store, &intent(&entry, 3), &inactive, &AssignmentOptions::default()).await;
        assert_matches!(result, Err(CoreError::Rule(RuleViolation::EventInactive { event_id: 3 })));

        assert_eq!(db.mutation_count(), before);
        assert_eq!(store.entries().len(), 2);
    }

    #[tokio::test]
    async fn test_failed_add_restores_original() {
        let (db, mut store) = setup().await;
        let entry = add(&mut store, 10, 1).await;

        db.fail_next_creates(1);
        let outcome = execute_move(&mut store, &intent(&entry, 2), &overlay(), &AssignmentOptions::default())
            .await
            .unwrap();

        let MoveOutcome::RolledBack { restored, reason } = outcome else {
            panic!("expected a rollback");
        };
        assert_eq!(restored.event_id, 1);
        assert_eq!(restored.athlete_id, 10);
        assert!(reason.contains("insert failed"));
        assert_eq!(store.by_event(1).len(), 1);
        assert!(store.by_event(2).is_empty());
        assert_eq!(db.entries_for(MEET).len(), 1);
    }

    #[tokio::test]
    async fn test_failed_restore_reports_lost_entry() {
        let (db, mut store) = setup().await;
        let entry = add(&mut store, 10, 1).await;

        db.fail_next_creates(2);
        let result = execute_move(&mut store, &intent(&entry, 2), &overlay(), &AssignmentOptions::default()).await;

        assert_matches!(result, Err(CoreError::Persistence(msg)) if msg.contains("could not be re-added"));
        assert!(store.entries().is_empty());
        assert!(db.entries_for(MEET).is_empty());
    }

    #[tokio::test]
    async fn test_relay_to_relay_keeps_squad_and_leg() {
        let (_db, mut store) = setup().await;
        let entry = store
            .add(&NewEntry {
                meet_id: MEET,
                athlete_id: 10,
                event_id: 6,
                relay_leg: Some(2),
                relay_team: Some(RelayTeam::Alt),
            })
            .await
            .unwrap();
        let outcome = execute_move(&mut store, &intent(&entry, 7), &overlay(), &AssignmentOptions::default())
            .await
            .unwrap();
        let MoveOutcome::Moved { added, .. } = outcome else {
            panic!("expected a move");
        };
        assert_eq!(added.relay_leg, Some(2));
        assert_eq!(added.relay_team, Some(RelayTeam::Alt));
    }

    #[tokio::test]
    async fn test_relay_to_individual_clears_relay_fields() {
        let (_db, mut store) = setup().await;
        let entry = store
            .add(&NewEntry {
                meet_id: MEET,
                athlete_id: 10,
                event_id: 6,
                relay_leg: Some(1),
                relay_team: Some(RelayTeam::A),
            })
            .await
            .unwrap();
        let outcome = execute_move(&mut store, &intent(&entry, 1), &overlay(), &AssignmentOptions::default())
            .await
            .unwrap();
        let MoveOutcome::Moved { added, .. } = outcome else {
            panic!("expected a move");
        };
        assert_eq!(added.relay_leg, None);
        assert_eq!(added.relay_team, None);
    }

    #[tokio::test]
    async fn test_stale_intent_is_conflict() {
        let (_db, mut store) = setup().await;
        let entry = add(&mut store, 10, 1).await;
        let mut stale = intent(&entry, 3);
        stale.source_event_id = 2;
        assert_matches!(
            execute_move(&mut store, &stale, &overlay(), &AssignmentOptions::default()).await,
            Err(CoreError::Conflict(_))
        );
    }

    #[tokio::test]
    async fn test_denied_remove_adds_nothing() {
        let (db, mut store) = setup().await;
        let first = add(&mut store, 10, 1).await;
        for event_id in 2..=4 {
            add(&mut store, 10, event_id).await;
        }

        db.deny_writes(true);
        let result = execute_move(&mut store, &intent(&first, 5), &overlay(), &AssignmentOptions::default()).await;
        assert_matches!(result, Err(CoreError::Forbidden(_)));

        let persisted: Vec<DbId> = db
            .entries_for(MEET)
            .iter()
            .filter(|e| e.athlete_id == 10)
            .map(|e| e.event_id)
            .collect();
        assert_eq!(persisted, vec![1, 2, 3, 4]);
        assert!(store.by_event(5).is_empty());
        assert!(!store.needs_reconcile());
        assert_eq!(store.count_for_athlete(10, true), 4);
    }

    #[tokio::test]
    async fn test_remove_of_vanished_entry_still_moves() {
        let (db, mut store) = setup().await;
        let entry = add(&mut store, 10, 1).await;
        db.delete_externally(entry.id);
        db.deny_writes(true);

        let outcome = execute_move(&mut store, &intent(&entry, 2), &overlay(), &AssignmentOptions::default())
            .await
            .unwrap();
        assert_matches!(outcome, MoveOutcome::Moved { remove: MutationOutcome::Tentative, .. });
        let events: Vec<DbId> = db.entries_for(MEET).iter().map(|e| e.event_id).collect();
        assert_eq!(events, vec![2]);
    }

    #[tokio::test]
    async fn test_relay_into_alt_event_takes_alt_squad() {
        let (_db, mut store) = setup().await;
        let entry = store
            .add(&NewEntry {
                meet_id: MEET,
                athlete_id: 10,
                event_id: 6,
                relay_leg: Some(3),
                relay_team: Some(RelayTeam::A),
            })
            .await
            .unwrap();
        let outcome = execute_move(&mut store, &intent(&entry, 8), &overlay(), &AssignmentOptions::default())
            .await
            .unwrap();
        let MoveOutcome::Moved { added, .. } = outcome else {
            panic!("expected a move");
        };
        assert_eq!(added.event_id, 8);
        assert_eq!(added.relay_team, Some(RelayTeam::Alt));
        assert_eq!(added.relay_leg, Some(3));
    }
}
