#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveDateTime};
    use mytime::db::db::Db;
    use mytime::db::repository::SqliteRepository;
    use mytime::libs::error::TaskError;
    use mytime::libs::repository::Repository;
    use mytime::libs::settings::Settings;
    use mytime::libs::task::{NewTask, ReportFilter};
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    struct RepositoryTestContext {
        _temp_dir: TempDir,
        repository: SqliteRepository,
    }

    impl TestContext for RepositoryTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let db = Db::open(temp_dir.path().join("test.sqlite")).unwrap();
            RepositoryTestContext {
                _temp_dir: temp_dir,
                repository: SqliteRepository::new(db),
            }
        }
    }

    fn at(date: NaiveDate, time: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(&format!("{} {}", date.format("%Y-%m-%d"), time), "%Y-%m-%d %H:%M").unwrap()
    }

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 4).unwrap()
    }

    impl RepositoryTestContext {
        /// Inserts a closed task on `date` between two `HH:MM` clocks.
        fn task_at(&self, description: &str, date: NaiveDate, start: &str, end: &str) -> i64 {
            let id = self.repository.create_task(&NewTask::new(description, None, None)).unwrap();
            let mut task = self.repository.task_by_id(id).unwrap().unwrap();
            task.start = at(date, start);
            task.end = Some(at(date, end));
            assert_eq!(self.repository.update_task(&task).unwrap(), 1);
            id
        }
    }

    #[test_context(RepositoryTestContext)]
    #[test]
    fn test_create_and_get_task(ctx: &mut RepositoryTestContext) {
        let id = ctx
            .repository
            .create_task(&NewTask::new("Write report", Some("Internal"), Some("123")))
            .unwrap();

        let task = ctx.repository.task_by_id(id).unwrap().unwrap();
        assert_eq!(task.description, "Write report");
        assert_eq!(task.project.as_deref(), Some("Internal"));
        assert_eq!(task.external_id.as_deref(), Some("123"));
        assert!(task.is_open());
        assert!(!task.reported);
        assert!(task.duration >= 0);
    }

    #[test_context(RepositoryTestContext)]
    #[test]
    fn test_missing_task_is_none(ctx: &mut RepositoryTestContext) {
        assert!(ctx.repository.task_by_id(404).unwrap().is_none());
    }

    #[test_context(RepositoryTestContext)]
    #[test]
    fn test_close_open_tasks(ctx: &mut RepositoryTestContext) {
        ctx.repository.create_task(&NewTask::new("One", None, None)).unwrap();
        ctx.repository.create_task(&NewTask::new("Two", None, None)).unwrap();

        assert_eq!(ctx.repository.close_open_tasks().unwrap(), 2);
        assert_eq!(ctx.repository.close_open_tasks().unwrap(), 0);
    }

    #[test_context(RepositoryTestContext)]
    #[test]
    fn test_close_task(ctx: &mut RepositoryTestContext) {
        let id = ctx.repository.create_task(&NewTask::new("One", None, None)).unwrap();

        ctx.repository.close_task(id).unwrap();
        assert!(!ctx.repository.task_by_id(id).unwrap().unwrap().is_open());

        // Closing twice and closing a missing task both fail
        let twice = ctx.repository.close_task(id).unwrap_err();
        assert!(matches!(twice.downcast_ref::<TaskError>(), Some(TaskError::AlreadyClosed(closed)) if *closed == id));
        let missing = ctx.repository.close_task(404).unwrap_err();
        assert!(matches!(missing.downcast_ref::<TaskError>(), Some(TaskError::NotFound(404))));
    }

    #[test_context(RepositoryTestContext)]
    #[test]
    fn test_tasks_by_date_order(ctx: &mut RepositoryTestContext) {
        let early = ctx.task_at("Early", monday(), "08:00", "09:00");
        let late = ctx.task_at("Late", monday(), "13:00", "14:00");
        let same_start = ctx.task_at("Same start", monday(), "13:00", "13:30");
        ctx.task_at("Tuesday", monday().succ_opt().unwrap(), "08:00", "09:00");

        let ids: Vec<i64> = ctx.repository.tasks_by_date(monday()).unwrap().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![late, same_start, early]);
    }

    #[test_context(RepositoryTestContext)]
    #[test]
    fn test_duration_of_closed_task(ctx: &mut RepositoryTestContext) {
        let id = ctx.task_at("Ninety minutes", monday(), "08:00", "09:30");
        assert_eq!(ctx.repository.task_by_id(id).unwrap().unwrap().duration, 5400);
    }

    #[test_context(RepositoryTestContext)]
    #[test]
    fn test_worked_duration_filters(ctx: &mut RepositoryTestContext) {
        let reported = ctx.task_at("Reported", monday(), "08:00", "09:00");
        ctx.task_at("Open work", monday(), "09:00", "09:30");
        ctx.repository.mark_reported(reported).unwrap();

        assert_eq!(ctx.repository.worked_duration_for_date(monday(), ReportFilter::All).unwrap(), 5400);
        assert_eq!(ctx.repository.worked_duration_for_date(monday(), ReportFilter::Reported).unwrap(), 3600);
        assert_eq!(ctx.repository.worked_duration_for_date(monday(), ReportFilter::NotReported).unwrap(), 1800);

        let empty_day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(ctx.repository.worked_duration_for_date(empty_day, ReportFilter::All).unwrap(), 0);
    }

    #[test_context(RepositoryTestContext)]
    #[test]
    fn test_weekly_duration_uses_monday_to_sunday(ctx: &mut RepositoryTestContext) {
        let sunday_before = monday().pred_opt().unwrap();
        let sunday = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        let next_monday = NaiveDate::from_ymd_opt(2024, 3, 11).unwrap();

        ctx.task_at("Previous week", sunday_before, "10:00", "11:00");
        ctx.task_at("Monday", monday(), "10:00", "11:00");
        ctx.task_at("Sunday", sunday, "10:00", "10:30");
        ctx.task_at("Next week", next_monday, "10:00", "11:00");

        let wednesday = NaiveDate::from_ymd_opt(2024, 3, 6).unwrap();
        assert_eq!(ctx.repository.weekly_worked_duration_for_date(wednesday).unwrap(), 5400);
        assert_eq!(ctx.repository.weekly_worked_duration_for_date(sunday).unwrap(), 5400);
    }

    #[test_context(RepositoryTestContext)]
    #[test]
    fn test_delete_task(ctx: &mut RepositoryTestContext) {
        let id = ctx.task_at("Delete me", monday(), "08:00", "09:00");

        assert_eq!(ctx.repository.delete_task(id).unwrap(), 1);
        assert_eq!(ctx.repository.delete_task(id).unwrap(), 0);
        assert!(ctx.repository.task_by_id(id).unwrap().is_none());
    }

    #[test_context(RepositoryTestContext)]
    #[test]
    fn test_mark_reported(ctx: &mut RepositoryTestContext) {
        let id = ctx.task_at("Report me", monday(), "08:00", "09:00");

        assert_eq!(ctx.repository.mark_reported(id).unwrap(), 1);
        assert!(ctx.repository.task_by_id(id).unwrap().unwrap().reported);
        assert_eq!(ctx.repository.mark_reported(404).unwrap(), 0);
    }

    #[test_context(RepositoryTestContext)]
    #[test]
    fn test_settings_round_trip(ctx: &mut RepositoryTestContext) {
        let defaults = ctx.repository.settings().unwrap();
        assert_eq!(defaults.work_hours, "8,8,8,8,8,0,0");

        let mut settings = Settings::new("6,6,6,6,6,0,0", r#"{"url":"https://redmine.example.com"}"#);
        settings.dark_mode = true;
        ctx.repository.save_settings(&settings).unwrap();

        let saved = ctx.repository.settings().unwrap();
        assert_eq!(saved.work_hours, "6,6,6,6,6,0,0");
        assert_eq!(saved.integration_config, r#"{"url":"https://redmine.example.com"}"#);
        assert!(saved.dark_mode);
        assert_eq!(saved.goal_week_in_seconds(), 30 * 3600);
    }
}
