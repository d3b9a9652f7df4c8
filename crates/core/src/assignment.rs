//! Meet-entry assignment rules.
//!
//! [`can_assign`] is a pure decision over the meet's current entries, the
//! event catalog and the activation overlay. It returns the entry payload to
//! persist or the violated rule; it never mutates anything. Rules, in order:
//!
//! 1. The event must be active for the meet ([`RuleViolation::EventInactive`]).
//! 2. An athlete appears at most once per individual event
//!    ([`RuleViolation::DuplicateEntry`]). Relay events allow the same athlete
//!    in several squads.
//! 3. An athlete already entered in `max_individual_events` events may not be
//!    added to another individual event ([`RuleViolation::AthleteOverLimit`]).
//!    Relay events are never capped; whether relay entries count toward the
//!    cap is configurable.
//! 4. Relay entries carry a squad label and an optional leg in `1..=4`;
//!    individual entries carry neither.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::activation::ActivationOverlay;
use crate::entry::{validate_relay_leg, MeetEntry, NewEntry, RelayTeam, MAX_RELAY_LEG, MIN_RELAY_LEG};
use crate::error::{CoreError, RuleViolation};
use crate::event::{EventCatalog, TrackEvent};
use crate::types::DbId;

/// Individual-event cap per athlete per meet.
pub const DEFAULT_MAX_INDIVIDUAL_EVENTS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentOptions {
    /// When false, relay entries are left out of the cap count.
    pub relays_count_toward_limit: bool,
    pub max_individual_events: usize,
}

impl Default for AssignmentOptions {
    fn default() -> Self {
        Self {
            relays_count_toward_limit: false,
            max_individual_events: DEFAULT_MAX_INDIVIDUAL_EVENTS,
        }
    }
}

/// One athlete to place into one event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssignRequest {
    pub athlete_id: DbId,
    /// Squad for relay events; defaults from the event's short name.
    pub relay_team: Option<RelayTeam>,
    pub relay_leg: Option<i16>,
    /// Entry being replaced (a move); ignored when counting and checking
    /// duplicates.
    pub replacing: Option<DbId>,
}

impl AssignRequest {
    pub fn new(athlete_id: DbId) -> Self {
        Self {
            athlete_id,
            ..Self::default()
        }
    }
}

/// Number of distinct events the athlete is entered in.
///
/// With `exclude_relays`, relay events are not counted.
pub fn count_individual_entries(
    athlete_id: DbId,
    entries: &[MeetEntry],
    catalog: &EventCatalog,
    exclude_relays: bool,
) -> usize {
    entries
        .iter()
        .filter(|e| e.athlete_id == athlete_id)
        .filter(|e| !exclude_relays || !catalog.is_relay(e.event_id))
        .map(|e| e.event_id)
        .collect::<HashSet<_>>()
        .len()
}

/// Decide whether `request` may be placed into `event` for the overlay's meet.
pub fn can_assign(
    event: &TrackEvent,
    request: &AssignRequest,
    existing: &[MeetEntry],
    catalog: &EventCatalog,
    overlay: &ActivationOverlay,
    options: &AssignmentOptions,
) -> Result<NewEntry, CoreError> {
    let meet_id = overlay.meet_id();

    if !overlay.is_active(event.id) {
        return Err(RuleViolation::EventInactive { event_id: event.id }.into());
    }

    let entries: Vec<MeetEntry> = existing
        .iter()
        .filter(|e| e.meet_id == meet_id && Some(e.id) != request.replacing)
        .cloned()
        .collect();

    if !event.is_relay {
        let already_entered = entries
            .iter()
            .any(|e| e.athlete_id == request.athlete_id && e.event_id == event.id);
        if already_entered {
            return Err(RuleViolation::DuplicateEntry {
                athlete_id: request.athlete_id,
                event_id: event.id,
            }
            .into());
        }

        let current = count_individual_entries(
            request.athlete_id,
            &entries,
            catalog,
            !options.relays_count_toward_limit,
        );
        if current >= options.max_individual_events {
            return Err(RuleViolation::AthleteOverLimit {
                athlete_id: request.athlete_id,
                current,
                limit: options.max_individual_events,
            }
            .into());
        }

        return Ok(NewEntry {
            meet_id,
            athlete_id: request.athlete_id,
            event_id: event.id,
            relay_leg: None,
            relay_team: None,
        });
    }

    if let Some(leg) = request.relay_leg {
        validate_relay_leg(leg)?;
    }

    Ok(NewEntry {
        meet_id,
        athlete_id: request.athlete_id,
        event_id: event.id,
        relay_leg: request.relay_leg,
        relay_team: request.relay_team.or_else(|| event.default_relay_team()),
    })
}

/// Plan a select-all assignment of several athletes into one event.
///
/// Legs are never assigned in batch. Repeated athlete ids are planned once.
/// Each athlete gets its own decision; one rejection does not block others.
pub fn plan_batch(
    event: &TrackEvent,
    athlete_ids: &[DbId],
    relay_team: Option<RelayTeam>,
    existing: &[MeetEntry],
    catalog: &EventCatalog,
    overlay: &ActivationOverlay,
    options: &AssignmentOptions,
) -> Vec<(DbId, Result<NewEntry, CoreError>)> {
    let mut seen = HashSet::new();
    athlete_ids
        .iter()
        .copied()
        .filter(|id| seen.insert(*id))
        .map(|athlete_id| {
            let request = AssignRequest {
                athlete_id,
                relay_team,
                relay_leg: None,
                replacing: None,
            };
            let decision = can_assign(event, &request, existing, catalog, overlay, options);
            (athlete_id, decision)
        })
        .collect()
}

/// "Next leg" counter of the single-assign flow.
///
/// Starts at leg 1, advances after each successful single relay assignment
/// and never passes leg 4.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelayLegCounter {
    next: i16,
}

impl Default for RelayLegCounter {
    fn default() -> Self {
        Self {
            next: MIN_RELAY_LEG,
        }
    }
}

impl RelayLegCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Continue after `assigned` legs of a squad are already filled.
    pub fn resume_from(assigned: usize) -> Self {
        let next = (assigned as i64 + 1).clamp(MIN_RELAY_LEG as i64, MAX_RELAY_LEG as i64);
        Self { next: next as i16 }
    }

    pub fn peek(&self) -> i16 {
        self.next
    }

    pub fn advance(&mut self) {
        self.next = (self.next + 1).min(MAX_RELAY_LEG);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::fixtures::{individual, relay};
    use assert_matches::assert_matches;

    const MEET: DbId = 10;

    fn entry(id: DbId, athlete_id: DbId, event_id: DbId) -> MeetEntry {
        MeetEntry {
            id,
            meet_id: MEET,
            athlete_id,
            event_id,
            relay_leg: None,
            relay_team: None,
            created_at: chrono::Utc::now(),
        }
    }

    fn catalog() -> EventCatalog {
        EventCatalog::new([
            individual(1, "100m"),
            individual(2, "200m"),
            individual(3, "400m"),
            individual(4, "Long Jump"),
            individual(5, "High Jump"),
            relay(6, "4x100"),
            relay(7, "4x100 Alt"),
        ])
    }

    fn overlay() -> ActivationOverlay {
        ActivationOverlay::new(MEET, [])
    }

    fn four_events(athlete_id: DbId) -> Vec<MeetEntry> {
        (1..=4).map(|ev| entry(ev, athlete_id, ev)).collect()
    }

    #[test]
    fn test_fifth_individual_event_is_over_limit() {
        let catalog = catalog();
        let existing = four_events(42);
        let result = can_assign(
            catalog.get(5).unwrap(),
            &AssignRequest::new(42),
            &existing,
            &catalog,
            &overlay(),
            &AssignmentOptions::default(),
        );
        assert_matches!(
            result,
            Err(CoreError::Rule(RuleViolation::AthleteOverLimit {
                athlete_id: 42,
                current: 4,
                limit: 4
            }))
        );
    }

    #[test]
    fn test_relays_are_never_capped() {
        let catalog = catalog();
        let existing = four_events(42);
        let result = can_assign(
            catalog.get(6).unwrap(),
            &AssignRequest::new(42),
            &existing,
            &catalog,
            &overlay(),
            &AssignmentOptions::default(),
        );
        let new_entry = result.unwrap();
        assert_eq!(new_entry.relay_team, Some(RelayTeam::A));
        assert_eq!(new_entry.relay_leg, None);
    }

    #[test]
    fn test_relay_entries_count_only_when_configured() {
        let catalog = catalog();
        let mut existing: Vec<MeetEntry> = (1..=3).map(|ev| entry(ev, 42, ev)).collect();
        existing.push(entry(9, 42, 6));

        let lenient = AssignmentOptions::default();
        assert!(can_assign(
            catalog.get(5).unwrap(),
            &AssignRequest::new(42),
            &existing,
            &catalog,
            &overlay(),
            &lenient
        )
        .is_ok());

        let strict = AssignmentOptions {
            relays_count_toward_limit: true,
            ..lenient
        };
        assert_matches!(
            can_assign(
                catalog.get(5).unwrap(),
                &AssignRequest::new(42),
                &existing,
                &catalog,
                &overlay(),
                &strict
            ),
            Err(CoreError::Rule(RuleViolation::AthleteOverLimit { current: 4, .. }))
        );
    }

    #[test]
    fn test_inactive_event_rejected_regardless_of_cap() {
        let catalog = catalog();
        let overlay = ActivationOverlay::new(MEET, [1, 6]);
        for event_id in [1, 6] {
            let result = can_assign(
                catalog.get(event_id).unwrap(),
                &AssignRequest::new(42),
                &[],
                &catalog,
                &overlay,
                &AssignmentOptions::default(),
            );
            assert_matches!(
                result,
                Err(CoreError::Rule(RuleViolation::EventInactive { event_id: id })) if id == event_id
            );
        }
    }

    #[test]
    fn test_duplicate_individual_entry_rejected() {
        let catalog = catalog();
        let existing = vec![entry(1, 42, 2)];
        assert_matches!(
            can_assign(
                catalog.get(2).unwrap(),
                &AssignRequest::new(42),
                &existing,
                &catalog,
                &overlay(),
                &AssignmentOptions::default()
            ),
            Err(CoreError::Rule(RuleViolation::DuplicateEntry {
                athlete_id: 42,
                event_id: 2
            }))
        );
    }

    #[test]
    fn test_duplicates_collapse_in_cap_count() {
        let catalog = catalog();
        let existing = vec![entry(1, 42, 1), entry(2, 42, 1), entry(3, 42, 2)];
        assert_eq!(count_individual_entries(42, &existing, &catalog, true), 2);
    }

    #[test]
    fn test_replaced_entry_not_counted() {
        let catalog = catalog();
        let existing = four_events(42);
        let request = AssignRequest {
            replacing: Some(4),
            ..AssignRequest::new(42)
        };
        let planned = can_assign(
            catalog.get(5).unwrap(),
            &request,
            &existing,
            &catalog,
            &overlay(),
            &AssignmentOptions::default(),
        )
        .unwrap();
        assert_eq!(planned.event_id, 5);
    }

    #[test]
    fn test_entries_of_other_meets_ignored() {
        let catalog = catalog();
        let mut existing = four_events(42);
        for e in &mut existing {
            e.meet_id = MEET + 1;
        }
        assert!(can_assign(
            catalog.get(5).unwrap(),
            &AssignRequest::new(42),
            &existing,
            &catalog,
            &overlay(),
            &AssignmentOptions::default()
        )
        .is_ok());
    }

    #[test]
    fn test_alt_relay_defaults_to_alt_team() {
        let catalog = catalog();
        let planned = can_assign(
            catalog.get(7).unwrap(),
            &AssignRequest::new(1),
            &[],
            &catalog,
            &overlay(),
            &AssignmentOptions::default(),
        )
        .unwrap();
        assert_eq!(planned.relay_team, Some(RelayTeam::Alt));
    }

    #[test]
    fn test_relay_leg_out_of_range_is_validation_error() {
        let catalog = catalog();
        let request = AssignRequest {
            relay_leg: Some(5),
            ..AssignRequest::new(1)
        };
        assert_matches!(
            can_assign(
                catalog.get(6).unwrap(),
                &request,
                &[],
                &catalog,
                &overlay(),
                &AssignmentOptions::default()
            ),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn test_individual_entries_drop_relay_fields() {
        let catalog = catalog();
        let request = AssignRequest {
            relay_team: Some(RelayTeam::Alt),
            relay_leg: Some(2),
            ..AssignRequest::new(1)
        };
        let planned = can_assign(
            catalog.get(1).unwrap(),
            &request,
            &[],
            &catalog,
            &overlay(),
            &AssignmentOptions::default(),
        )
        .unwrap();
        assert_eq!(planned.relay_leg, None);
        assert_eq!(planned.relay_team, None);
    }

    #[test]
    fn test_plan_batch_leaves_legs_unset_and_dedups() {
        let catalog = catalog();
        let existing = four_events(2);
        let plan = plan_batch(
            catalog.get(6).unwrap(),
            &[1, 2, 1, 3],
            None,
            &existing,
            &catalog,
            &overlay(),
            &AssignmentOptions::default(),
        );
        assert_eq!(plan.len(), 3);
        for (_, decision) in &plan {
            let new_entry = decision.as_ref().unwrap();
            assert_eq!(new_entry.relay_leg, None);
            assert_eq!(new_entry.relay_team, Some(RelayTeam::A));
        }
    }

    #[test]
    fn test_plan_batch_reports_each_rejection() {
        let catalog = catalog();
        let existing = four_events(2);
        let plan = plan_batch(
            catalog.get(5).unwrap(),
            &[1, 2],
            None,
            &existing,
            &catalog,
            &overlay(),
            &AssignmentOptions::default(),
        );
        assert!(plan[0].1.is_ok());
        assert_matches!(
            plan[1].1,
            Err(CoreError::Rule(RuleViolation::AthleteOverLimit { .. }))
        );
    }

    #[test]
    fn test_leg_counter_caps_at_four() {
        let mut counter = RelayLegCounter::new();
        let mut legs = Vec::new();
        for _ in 0..5 {
            legs.push(counter.peek());
            counter.advance();
        }
        assert_eq!(legs, vec![1, 2, 3, 4, 4]);
    }

    #[test]
    fn test_leg_counter_resume() {
        assert_eq!(RelayLegCounter::resume_from(0).peek(), 1);
        assert_eq!(RelayLegCounter::resume_from(2).peek(), 3);
        assert_eq!(RelayLegCounter::resume_from(9).peek(), 4);
    }
}
