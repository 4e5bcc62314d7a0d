#[cfg(test)]
mod tests {
    use mytime::libs::config::{Config, UiConfig, CONFIG_FILE_NAME};
    use mytime::libs::data_storage::DataStorage;
    use std::fs;
    use std::path::PathBuf;
    use std::time::Duration;
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    struct ConfigTestContext {
        _temp_dir: TempDir,
        storage: DataStorage,
    }

    impl TestContext for ConfigTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let storage = DataStorage::with_base(temp_dir.path().join("mytime"));
            ConfigTestContext {
                _temp_dir: temp_dir,
                storage,
            }
        }
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_missing_file_yields_defaults(ctx: &mut ConfigTestContext) {
        let config = Config::read_from(&ctx.storage).unwrap();

        assert_eq!(config, Config::default());
        assert_eq!(config.ui(), UiConfig::default());
        assert_eq!(
            config.db_path(&ctx.storage).unwrap(),
            ctx.storage.base_path().join("mytime.sqlite")
        );
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_save_and_read(ctx: &mut ConfigTestContext) {
        let config = Config {
            db_path: Some(PathBuf::from("/tmp/elsewhere.sqlite")),
            ui: Some(UiConfig {
                refresh_interval: 30,
                deselect_timeout: 500,
            }),
        };
        config.save_to(&ctx.storage).unwrap();

        let read = Config::read_from(&ctx.storage).unwrap();
        assert_eq!(read, config);
        assert_eq!(read.db_path(&ctx.storage).unwrap(), PathBuf::from("/tmp/elsewhere.sqlite"));
        assert_eq!(read.ui().refresh_interval(), Duration::from_secs(30));
        assert_eq!(read.ui().deselect_timeout(), Duration::from_millis(500));
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_partial_ui_section_uses_defaults(ctx: &mut ConfigTestContext) {
        let path = ctx.storage.get_path(CONFIG_FILE_NAME).unwrap();
        fs::write(path, r#"{ "ui": { "refresh_interval": 0 } }"#).unwrap();

        let ui = Config::read_from(&ctx.storage).unwrap().ui();
        assert_eq!(ui.deselect_timeout, 2000);
        // A zero interval would spin the refresh timer
        assert_eq!(ui.refresh_interval(), Duration::from_secs(1));
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_invalid_json_is_an_error(ctx: &mut ConfigTestContext) {
        let path = ctx.storage.get_path(CONFIG_FILE_NAME).unwrap();
        fs::write(path, "{ not json").unwrap();

        assert!(Config::read_from(&ctx.storage).is_err());
    }
}
