#[cfg(test)]
mod tests {
    use mytime::db::db::Db;
    use mytime::db::migrations::{get_db_version, needs_migration, MigrationManager};
    use rusqlite::Connection;
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    struct MigrationTestContext {
        temp_dir: TempDir,
    }

    impl TestContext for MigrationTestContext {
        fn setup() -> Self {
            MigrationTestContext {
                temp_dir: tempfile::tempdir().unwrap(),
            }
        }
    }

    impl MigrationTestContext {
        fn db_path(&self) -> std::path::PathBuf {
            self.temp_dir.path().join("test.sqlite")
        }
    }

    #[test_context(MigrationTestContext)]
    #[test]
    fn test_migrations_run_on_open(ctx: &mut MigrationTestContext) {
        let db = Db::open(ctx.db_path()).unwrap();

        assert_eq!(get_db_version(&db.conn).unwrap(), MigrationManager::new().latest_version());
        assert!(!needs_migration(&db.conn).unwrap());
    }

    #[test_context(MigrationTestContext)]
    #[test]
    fn test_migration_history_in_order(ctx: &mut MigrationTestContext) {
        let db = Db::open(ctx.db_path()).unwrap();
        let history = MigrationManager::new().get_migration_history(&db.conn).unwrap();

        assert_eq!(
            history,
            vec![(1, "create_tasks".to_string()), (2, "create_settings".to_string())]
        );
    }

    #[test_context(MigrationTestContext)]
    #[test]
    fn test_migration_idempotency(ctx: &mut MigrationTestContext) {
        drop(Db::open(ctx.db_path()).unwrap());
        let db = Db::open(ctx.db_path()).unwrap();

        let history = MigrationManager::new().get_migration_history(&db.conn).unwrap();
        assert_eq!(history.len(), 2);

        let rows: i64 = db.conn.query_row("SELECT COUNT(*) FROM settings", [], |row| row.get(0)).unwrap();
        assert_eq!(rows, 1);
    }

    #[test_context(MigrationTestContext)]
    #[test]
    fn test_default_settings_row(ctx: &mut MigrationTestContext) {
        let db = Db::open(ctx.db_path()).unwrap();
        let (work_hours, integration_config): (String, String) = db
            .conn
            .query_row("SELECT work_hours, integration_config FROM settings WHERE id = 1", [], |row| {
                Ok((row.get(0)?, row.get(1)?))
            })
            .unwrap();

        assert_eq!(work_hours, "8,8,8,8,8,0,0");
        assert_eq!(integration_config, "{}");
    }

    #[test_context(MigrationTestContext)]
    #[test]
    fn test_partial_schema_is_upgraded(ctx: &mut MigrationTestContext) {
        let mut conn = Connection::open(ctx.db_path()).unwrap();
        MigrationManager::new().run_migrations(&mut conn).unwrap();
        conn.execute("DELETE FROM migrations WHERE version = 2", []).unwrap();
        assert!(needs_migration(&conn).unwrap());
        drop(conn);

        let db = Db::open(ctx.db_path()).unwrap();
        assert!(!needs_migration(&db.conn).unwrap());
    }

    #[test]
    fn test_in_memory_database_has_schema() {
        let db = Db::in_memory().unwrap();
        let tables: i64 = db
            .conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN ('tasks', 'settings')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(tables, 2);
    }
}
