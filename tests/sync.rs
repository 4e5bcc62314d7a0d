#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use mytime::api::{Activity, ActivityLookup, Integration, TimeEntry};
    use mytime::libs::error::{IntegrationError, SyncError};
    use mytime::libs::sync::{
        spawn_activity_loading, spawn_submissions, ActivityState, Publish, RowStatus, SyncEvent, SyncPhase, SyncSession,
    };
    use mytime::libs::task::SyncBatchEntry;
    use parking_lot::Mutex;
    use std::sync::Arc;
    use std::time::Duration;
    use test_context::{test_context, AsyncTestContext};

    fn development() -> Activity {
        Activity {
            id: 9,
            name: "Development".to_string(),
        }
    }

    fn design() -> Activity {
        Activity {
            id: 8,
            name: "Design".to_string(),
        }
    }

    /// Ticket `"1"` resolves with a default, `"2"` without one, anything
    /// else fails. Submissions for tickets in `rejected` fail.
    struct MockIntegration {
        rejected: Vec<String>,
        submitted: Mutex<Vec<TimeEntry>>,
    }

    impl Integration for MockIntegration {
        async fn resolve_activities(&self, external_id: &str) -> Result<ActivityLookup, IntegrationError> {
            // Later tickets answer first
            let delay = 40u64.saturating_sub(external_id.parse::<u64>().unwrap_or(0) * 10);
            tokio::time::sleep(Duration::from_millis(delay)).await;

            match external_id {
                "1" => Ok(ActivityLookup {
                    activities: vec![development(), design()],
                    default: Some(development()),
                }),
                "2" => Ok(ActivityLookup {
                    activities: vec![development(), design()],
                    default: None,
                }),
                _ => Err(IntegrationError::Transport("connection refused".to_string())),
            }
        }

        async fn submit_time_entry(&self, entry: &TimeEntry) -> Result<(), IntegrationError> {
            tokio::time::sleep(Duration::from_millis(5)).await;
            self.submitted.lock().push(entry.clone());

            if self.rejected.contains(&entry.external_id) {
                return Err(IntegrationError::Rejected(vec!["Issue is invalid".to_string()]));
            }
            Ok(())
        }
    }

    struct SyncTestContext {
        integration: Arc<MockIntegration>,
        events: Arc<Mutex<Vec<SyncEvent>>>,
    }

    impl AsyncTestContext for SyncTestContext {
        async fn setup() -> Self {
            SyncTestContext {
                integration: Arc::new(MockIntegration {
                    rejected: vec!["2".to_string()],
                    submitted: Mutex::new(Vec::new()),
                }),
                events: Arc::new(Mutex::new(Vec::new())),
            }
        }
    }

    impl SyncTestContext {
        fn publish(&self) -> Publish {
            let events = self.events.clone();
            Arc::new(move |event| events.lock().push(event))
        }

        fn drain(&self) -> Vec<SyncEvent> {
            std::mem::take(&mut *self.events.lock())
        }

        /// Loads every row's activities and applies the results.
        async fn loaded(&self, entries: Vec<SyncBatchEntry>) -> SyncSession {
            let mut session = SyncSession::new(entries.clone());
            spawn_activity_loading(self.integration.clone(), entries, self.publish()).await.unwrap();
            for event in self.drain() {
                session.apply_event(event);
            }
            session
        }
    }

    fn entry(ids: &[i64], external_id: &str, duration: i64) -> SyncBatchEntry {
        SyncBatchEntry {
            ids: ids.to_vec(),
            external_id: external_id.to_string(),
            description: format!("Work on {}", external_id),
            date: NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
            project: None,
            duration,
        }
    }

    #[test_context(SyncTestContext)]
    #[tokio::test]
    async fn test_loading_finishes_after_every_row(ctx: &mut SyncTestContext) {
        let entries = vec![entry(&[1], "1", 3600), entry(&[2], "2", 1800), entry(&[3], "3", 900)];
        spawn_activity_loading(ctx.integration.clone(), entries, ctx.publish()).await.unwrap();

        let events = ctx.drain();
        assert_eq!(events.len(), 4);
        assert_eq!(events.last(), Some(&SyncEvent::LoadingFinished));

        let mut indexes: Vec<usize> = events
            .iter()
            .filter_map(|event| match event {
                SyncEvent::ActivityResolved { index, .. } => Some(*index),
                _ => None,
            })
            .collect();
        indexes.sort_unstable();
        assert_eq!(indexes, vec![0, 1, 2]);
    }

    #[test_context(SyncTestContext)]
    #[tokio::test]
    async fn test_session_is_locked_while_loading(ctx: &mut SyncTestContext) {
        let mut session = SyncSession::new(vec![entry(&[1], "1", 3600)]);

        assert_eq!(session.phase(), SyncPhase::Loading);
        assert!(session.is_locked());
        assert_eq!(session.begin_sync(), Err(SyncError::Locked));
        assert_eq!(session.override_activity(0, development()), Err(SyncError::Locked));
        assert_eq!(session.rows()[0].activity_label(), "Loading...");

        spawn_activity_loading(ctx.integration.clone(), session.entries(), ctx.publish()).await.unwrap();
        for event in ctx.drain() {
            session.apply_event(event);
        }

        assert_eq!(session.phase(), SyncPhase::Ready);
        assert!(!session.is_locked());
        assert!(session.all_resolved());
        assert_eq!(session.rows()[0].activity_label(), "Development");
    }

    #[test_context(SyncTestContext)]
    #[tokio::test]
    async fn test_missing_default_blocks_sync_until_selected(ctx: &mut SyncTestContext) {
        let mut session = ctx.loaded(vec![entry(&[1], "1", 3600), entry(&[2], "2", 1800)]).await;

        assert!(!session.all_resolved());
        assert_eq!(session.rows()[1].activity_label(), "Select activity!");
        assert_eq!(session.begin_sync(), Err(SyncError::ActivitiesMissing));
        assert_eq!(session.phase(), SyncPhase::Ready);

        session.override_activity(1, design()).unwrap();
        assert!(session.all_resolved());
        assert_eq!(session.rows()[1].activity_label(), "Design");
    }

    #[test_context(SyncTestContext)]
    #[tokio::test]
    async fn test_override_requires_loaded_activity(ctx: &mut SyncTestContext) {
        let mut session = ctx.loaded(vec![entry(&[1], "1", 3600), entry(&[3], "3", 900)]).await;
        let unknown = Activity {
            id: 99,
            name: "Unknown".to_string(),
        };

        assert_eq!(session.override_activity(0, unknown), Err(SyncError::NoActivities(0)));
        assert_eq!(session.override_activity(1, development()), Err(SyncError::NoActivities(1)));
        assert_eq!(session.override_activity(7, development()), Err(SyncError::NoActivities(7)));
    }

    #[test_context(SyncTestContext)]
    #[tokio::test]
    async fn test_failed_lookup_leaves_row_unresolved(ctx: &mut SyncTestContext) {
        let session = ctx.loaded(vec![entry(&[3], "3", 900)]).await;

        let row = &session.rows()[0];
        assert!(matches!(row.activity, ActivityState::Failed(IntegrationError::Transport(_))));
        assert_eq!(row.activity_label(), "Connection Error!");
        assert!(row.activities().is_empty());
        assert!(!session.all_resolved());
    }

    #[test_context(SyncTestContext)]
    #[tokio::test]
    async fn test_partial_failure(ctx: &mut SyncTestContext) {
        let mut session = ctx.loaded(vec![entry(&[1, 4], "1", 5400), entry(&[2], "2", 1800)]).await;
        session.override_activity(1, design()).unwrap();

        let requests = session.begin_sync().unwrap();
        assert_eq!(requests.len(), 2);
        assert_eq!(session.phase(), SyncPhase::Syncing);
        assert!(session.rows().iter().all(|row| row.status == RowStatus::Syncing));
        assert_eq!(requests[0].entry.hours, "1.50");
        assert_eq!(requests[0].entry.activity_id, 9);
        assert_eq!(requests[1].entry.activity_id, 8);

        spawn_submissions(ctx.integration.clone(), requests, ctx.publish()).await.unwrap();
        let events = ctx.drain();
        assert_eq!(events.last(), Some(&SyncEvent::SyncFinished));

        let mut reported = Vec::new();
        for event in events {
            reported.extend(session.apply_event(event));
        }

        // Only the accepted entry's tasks are reported
        reported.sort_unstable();
        assert_eq!(reported, vec![1, 4]);
        assert_eq!(session.rows()[0].status, RowStatus::Synced);
        assert!(matches!(session.rows()[1].status, RowStatus::Failed(IntegrationError::Rejected(_))));
        assert_eq!(session.rows()[1].status_label(), "error");
        assert_eq!(session.synced_count(), 1);
        assert_eq!(session.failed_count(), 1);
        assert_eq!(session.phase(), SyncPhase::Ready);
        assert_eq!(ctx.integration.submitted.lock().len(), 2);
    }

    #[test_context(SyncTestContext)]
    #[tokio::test]
    async fn test_retry_submits_only_unsynced_rows(ctx: &mut SyncTestContext) {
        let mut session = ctx.loaded(vec![entry(&[1], "1", 3600), entry(&[2], "2", 1800)]).await;
        session.override_activity(1, design()).unwrap();

        let requests = session.begin_sync().unwrap();
        spawn_submissions(ctx.integration.clone(), requests, ctx.publish()).await.unwrap();
        for event in ctx.drain() {
            session.apply_event(event);
        }

        let retry = session.begin_sync().unwrap();
        assert_eq!(retry.len(), 1);
        assert_eq!(retry[0].index, 1);
        assert_eq!(session.rows()[0].status, RowStatus::Synced);
    }

    #[test]
    fn test_all_resolved_is_false_without_rows() {
        let session = SyncSession::new(Vec::new());
        assert!(!session.all_resolved());
    }

    #[test]
    fn test_late_events_are_ignored() {
        let mut session = SyncSession::new(vec![entry(&[1], "1", 3600)]);
        session.finish_loading();

        session.apply_activity(
            0,
            Ok(ActivityLookup {
                activities: vec![development()],
                default: Some(development()),
            }),
        );
        assert_eq!(session.rows()[0].activity, ActivityState::Pending);

        // Submissions outside Syncing do not report anything
        assert!(session.apply_submission(0, Ok(())).is_empty());
        assert_eq!(session.rows()[0].status, RowStatus::Pending);
    }

    #[test]
    fn test_row_selection_is_clamped() {
        let mut session = SyncSession::new(vec![entry(&[1], "1", 60), entry(&[2], "2", 60)]);
        assert_eq!(session.selected(), None);

        session.select_previous();
        assert_eq!(session.selected(), Some(0));
        session.select_next();
        session.select_next();
        assert_eq!(session.selected(), Some(1));
        assert_eq!(session.selected_row().map(|row| row.entry.ids.clone()), Some(vec![2]));
    }
}
