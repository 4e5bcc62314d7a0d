//! Sync orchestrator: from a batch of grouped tasks to submitted time entries.
//!
//! A [`SyncSession`] moves through three phases:
//!
//! ```text
//! Loading ──(all lookups done)──▶ Ready ──(begin_sync)──▶ Syncing
//!                                   ▲                        │
//!                                   └──(all submissions done)┘
//! ```
//!
//! Network work runs on one tokio task per batch entry. Workers never touch
//! the session: they publish [`SyncEvent`]s tagged with their row index and
//! the event loop applies them. A coordinator awaits every worker handle
//! before publishing [`SyncEvent::LoadingFinished`] or
//! [`SyncEvent::SyncFinished`], so each phase change is observed exactly once
//! and only after every row has reported.

use crate::api::{Activity, ActivityLookup, Integration, TimeEntry};
use crate::libs::error::{IntegrationError, SyncError};
use crate::libs::messages::Message;
use crate::libs::task::SyncBatchEntry;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

/// Callback through which workers hand results to the event loop.
pub type Publish = Arc<dyn Fn(SyncEvent) + Send + Sync>;

#[derive(Debug, Clone, PartialEq)]
pub enum SyncEvent {
    ActivityResolved {
        index: usize,
        result: Result<ActivityLookup, IntegrationError>,
    },
    LoadingFinished,
    EntrySubmitted {
        index: usize,
        result: Result<(), IntegrationError>,
    },
    SyncFinished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPhase {
    Loading,
    Ready,
    Syncing,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ActivityState {
    Pending,
    Loaded(ActivityLookup),
    Failed(IntegrationError),
}

#[derive(Debug, Clone, PartialEq)]
pub enum RowStatus {
    Pending,
    Syncing,
    Synced,
    Failed(IntegrationError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SyncRow {
    pub entry: SyncBatchEntry,
    pub activity: ActivityState,
    pub selected_activity: Option<Activity>,
    pub status: RowStatus,
}

impl SyncRow {
    fn new(entry: SyncBatchEntry) -> Self {
        SyncRow {
            entry,
            activity: ActivityState::Pending,
            selected_activity: None,
            status: RowStatus::Pending,
        }
    }

    pub fn has_activity(&self) -> bool {
        self.selected_activity.as_ref().is_some_and(|activity| !activity.name.is_empty())
    }

    pub fn activities(&self) -> &[Activity] {
        match &self.activity {
            ActivityState::Loaded(lookup) => &lookup.activities,
            _ => &[],
        }
    }

    pub fn activity_label(&self) -> String {
        match (&self.activity, &self.selected_activity) {
            (_, Some(activity)) if !activity.name.is_empty() => activity.name.clone(),
            (ActivityState::Pending, _) => Message::SyncActivityLoading.to_string(),
            (ActivityState::Failed(_), _) => Message::SyncActivityConnectionError.to_string(),
            (ActivityState::Loaded(_), _) => Message::SyncActivityMissing.to_string(),
        }
    }

    pub fn status_label(&self) -> String {
        match &self.status {
            RowStatus::Pending => Message::SyncStatusPending.to_string(),
            RowStatus::Syncing => Message::SyncStatusSyncing.to_string(),
            RowStatus::Synced => Message::SyncStatusSynced.to_string(),
            RowStatus::Failed(_) => Message::SyncStatusFailed.to_string(),
        }
    }

    fn time_entry(&self, activity_id: i64) -> TimeEntry {
        TimeEntry {
            external_id: self.entry.external_id.clone(),
            description: self.entry.description.clone(),
            date: self.entry.date,
            hours: self.entry.hours(),
            activity_id,
        }
    }
}

/// Submission prepared by [`SyncSession::begin_sync`].
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitRequest {
    pub index: usize,
    pub entry: TimeEntry,
}

#[derive(Debug, Clone)]
pub struct SyncSession {
    rows: Vec<SyncRow>,
    phase: SyncPhase,
    selected: Option<usize>,
}

impl SyncSession {
    pub fn new(entries: Vec<SyncBatchEntry>) -> Self {
        SyncSession {
            rows: entries.into_iter().map(SyncRow::new).collect(),
            phase: SyncPhase::Loading,
            selected: None,
        }
    }

    pub fn rows(&self) -> &[SyncRow] {
        &self.rows
    }

    pub fn entries(&self) -> Vec<SyncBatchEntry> {
        self.rows.iter().map(|row| row.entry.clone()).collect()
    }

    pub fn phase(&self) -> SyncPhase {
        self.phase
    }

    /// Loading and syncing lock every user transition.
    pub fn is_locked(&self) -> bool {
        self.phase != SyncPhase::Ready
    }

    /// Every row still to submit has a non-empty activity. False for a
    /// session with nothing left to submit.
    pub fn all_resolved(&self) -> bool {
        let mut pending = self.rows.iter().filter(|row| row.status != RowStatus::Synced).peekable();
        pending.peek().is_some() && pending.all(SyncRow::has_activity)
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_row(&self) -> Option<&SyncRow> {
        self.selected.and_then(|index| self.rows.get(index))
    }

    pub fn select_next(&mut self) {
        if self.rows.is_empty() {
            return;
        }
        self.selected = Some(match self.selected {
            None => 0,
            Some(index) => (index + 1).min(self.rows.len() - 1),
        });
    }

    pub fn select_previous(&mut self) {
        if self.rows.is_empty() {
            return;
        }
        self.selected = Some(match self.selected {
            None => 0,
            Some(index) => index.saturating_sub(1),
        });
    }

    /// Routes a worker event to the matching transition. Returns the task
    /// ids to mark reported when the event is a successful submission.
    pub fn apply_event(&mut self, event: SyncEvent) -> Vec<i64> {
        match event {
            SyncEvent::ActivityResolved { index, result } => {
                self.apply_activity(index, result);
                Vec::new()
            }
            SyncEvent::LoadingFinished => {
                self.finish_loading();
                Vec::new()
            }
            SyncEvent::EntrySubmitted { index, result } => self.apply_submission(index, result),
            SyncEvent::SyncFinished => {
                self.finish_sync();
                Vec::new()
            }
        }
    }

    pub fn apply_activity(&mut self, index: usize, result: Result<ActivityLookup, IntegrationError>) {
        if self.phase != SyncPhase::Loading {
            return;
        }
        let Some(row) = self.rows.get_mut(index) else {
            return;
        };

        match result {
            Ok(lookup) => {
                row.selected_activity = lookup.default.clone();
                row.activity = ActivityState::Loaded(lookup);
            }
            Err(error) => {
                debug!(index, %error, "activity lookup failed");
                row.activity = ActivityState::Failed(error);
            }
        }
    }

    pub fn finish_loading(&mut self) {
        if self.phase == SyncPhase::Loading {
            self.phase = SyncPhase::Ready;
        }
    }

    /// Picks an activity for one row, replacing the resolved default.
    pub fn override_activity(&mut self, index: usize, activity: Activity) -> Result<(), SyncError> {
        if self.is_locked() {
            return Err(SyncError::Locked);
        }
        let row = self.rows.get_mut(index).ok_or(SyncError::NoActivities(index))?;
        if !row.activities().contains(&activity) {
            return Err(SyncError::NoActivities(index));
        }

        row.selected_activity = Some(activity);
        Ok(())
    }

    /// Enters Syncing and returns one request per row not yet synced.
    pub fn begin_sync(&mut self) -> Result<Vec<SubmitRequest>, SyncError> {
        if self.is_locked() {
            return Err(SyncError::Locked);
        }
        if !self.all_resolved() {
            return Err(SyncError::ActivitiesMissing);
        }

        let mut requests = Vec::new();
        for (index, row) in self.rows.iter_mut().enumerate() {
            if row.status == RowStatus::Synced {
                continue;
            }
            if let Some(activity) = &row.selected_activity {
                requests.push(SubmitRequest {
                    index,
                    entry: row.time_entry(activity.id),
                });
                row.status = RowStatus::Syncing;
            }
        }

        self.phase = SyncPhase::Syncing;
        Ok(requests)
    }

    /// Records one submission result, returning the row's task ids on success.
    pub fn apply_submission(&mut self, index: usize, result: Result<(), IntegrationError>) -> Vec<i64> {
        if self.phase != SyncPhase::Syncing {
            return Vec::new();
        }
        let Some(row) = self.rows.get_mut(index) else {
            return Vec::new();
        };

        match result {
            Ok(()) => {
                row.status = RowStatus::Synced;
                row.entry.ids.clone()
            }
            Err(error) => {
                row.status = RowStatus::Failed(error);
                Vec::new()
            }
        }
    }

    pub fn finish_sync(&mut self) {
        if self.phase == SyncPhase::Syncing {
            self.phase = SyncPhase::Ready;
        }
    }

    pub fn synced_count(&self) -> usize {
        self.rows.iter().filter(|row| row.status == RowStatus::Synced).count()
    }

    pub fn failed_count(&self) -> usize {
        self.rows.iter().filter(|row| matches!(row.status, RowStatus::Failed(_))).count()
    }
}

/// Resolves activities for every entry concurrently.
///
/// Publishes one [`SyncEvent::ActivityResolved`] per entry, then
/// [`SyncEvent::LoadingFinished`] once all workers are done.
pub fn spawn_activity_loading<I: Integration>(integration: Arc<I>, entries: Vec<SyncBatchEntry>, publish: Publish) -> JoinHandle<()> {
    let workers: Vec<(usize, JoinHandle<()>)> = entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| {
            let integration = integration.clone();
            let publish = publish.clone();
            let handle = tokio::spawn(async move {
                let result = integration.resolve_activities(&entry.external_id).await;
                debug!(index, external_id = %entry.external_id, ok = result.is_ok(), "activity lookup done");
                publish(SyncEvent::ActivityResolved { index, result });
            });
            (index, handle)
        })
        .collect();

    tokio::spawn(async move {
        for (index, handle) in workers {
            if let Err(join_error) = handle.await {
                error!(index, %join_error, "activity worker failed");
                publish(SyncEvent::ActivityResolved {
                    index,
                    result: Err(IntegrationError::Transport(join_error.to_string())),
                });
            }
        }
        publish(SyncEvent::LoadingFinished);
    })
}

/// Submits every request concurrently.
///
/// Publishes one [`SyncEvent::EntrySubmitted`] per request, then
/// [`SyncEvent::SyncFinished`] once all workers are done. Failures are
/// independent and never retried.
pub fn spawn_submissions<I: Integration>(integration: Arc<I>, requests: Vec<SubmitRequest>, publish: Publish) -> JoinHandle<()> {
    let workers: Vec<(usize, JoinHandle<()>)> = requests
        .into_iter()
        .map(|request| {
            let integration = integration.clone();
            let publish = publish.clone();
            let index = request.index;
            let handle = tokio::spawn(async move {
                let result = integration.submit_time_entry(&request.entry).await;
                match &result {
                    Ok(()) => info!(index, external_id = %request.entry.external_id, hours = %request.entry.hours, "time entry submitted"),
                    Err(error) => error!(index, external_id = %request.entry.external_id, %error, "time entry failed"),
                }
                publish(SyncEvent::EntrySubmitted { index, result });
            });
            (index, handle)
        })
        .collect();

    tokio::spawn(async move {
        for (index, handle) in workers {
            if let Err(join_error) = handle.await {
                error!(index, %join_error, "submission worker failed");
                publish(SyncEvent::EntrySubmitted {
                    index,
                    result: Err(IntegrationError::Transport(join_error.to_string())),
                });
            }
        }
        publish(SyncEvent::SyncFinished);
    })
}
