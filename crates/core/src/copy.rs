//! Copy every entry of one meet into another.

use std::collections::HashSet;

use serde::Serialize;

use crate::entry_store::EntryStore;
use crate::error::CoreError;
use crate::persistence::EntryPersistence;
use crate::types::DbId;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CopyReport {
    pub added: usize,
    /// Source entries whose `(athlete, event)` was already present.
    pub skipped: usize,
    pub failed: usize,
}

impl CopyReport {
    /// Nothing was added; shown as a notice rather than an error.
    pub fn is_noop(&self) -> bool {
        self.added == 0
    }
}

/// Copy all entries of `source_meet_id` into the target store's meet.
///
/// Adds are issued one at a time. Each `(athlete, event)` pair is added at
/// most once, counting both the target's existing entries and pairs copied
/// earlier in the same run. A failed add is counted and the copy continues;
/// earlier adds are kept.
pub async fn copy_all_from(
    target: &mut EntryStore,
    source: &dyn EntryPersistence,
    source_meet_id: DbId,
) -> Result<CopyReport, CoreError> {
    let target_meet_id = target.meet_id();
    if source_meet_id == target_meet_id {
        return Err(CoreError::Validation(
            "Cannot copy a meet's entries into itself".into(),
        ));
    }

    let source_entries = source.list_entries(source_meet_id).await?;
    let mut seen: HashSet<(DbId, DbId)> = target.entries().iter().map(|e| e.dedup_key()).collect();
    let mut report = CopyReport::default();

    for entry in &source_entries {
        if seen.contains(&entry.dedup_key()) {
            report.skipped += 1;
            continue;
        }
        match target.add(&entry.to_new_entry(target_meet_id)).await {
            Ok(_) => {
                seen.insert(entry.dedup_key());
                report.added += 1;
            }
            Err(e) => {
                tracing::warn!(
                    source_meet_id,
                    target_meet_id,
                    athlete_id = entry.athlete_id,
                    event_id = entry.event_id,
                    error = %e,
                    "Copy of entry failed"
                );
                report.failed += 1;
            }
        }
    }

    tracing::info!(
        source_meet_id,
        target_meet_id,
        added = report.added,
        skipped = report.skipped,
        failed = report.failed,
        "Entries copied"
    );
    Ok(report)
}
