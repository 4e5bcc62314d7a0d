use crate::libs::messages::Message;
use crate::libs::settings::Settings;
use crate::msg_error_anyhow;
use anyhow::Result;
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::Arc;

const SELECT_SETTINGS: &str = "SELECT work_hours, integration_config, theme, view_type, dark_mode FROM settings WHERE id = 1";

const UPDATE_SETTINGS: &str = "UPDATE settings SET work_hours = ?1, integration_config = ?2, theme = ?3, view_type = ?4, dark_mode = ?5 WHERE id = 1";

pub struct SettingsTable {
    pub conn: Arc<Mutex<Connection>>,
}

impl SettingsTable {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        SettingsTable { conn }
    }

    pub fn get(&self) -> Result<Settings> {
        let conn = self.conn.lock();
        let settings = conn
            .query_row(SELECT_SETTINGS, [], |row| {
                let mut settings = Settings::new(&row.get::<_, String>(0)?, &row.get::<_, String>(1)?);
                settings.theme = row.get(2)?;
                settings.view_type = row.get(3)?;
                settings.dark_mode = row.get(4)?;
                Ok(settings)
            })
            .optional()?;

        settings.ok_or_else(|| msg_error_anyhow!(Message::SettingsNotFound))
    }

    pub fn save(&self, settings: &Settings) -> Result<()> {
        let conn = self.conn.lock();
        let updated = conn.execute(
            UPDATE_SETTINGS,
            params![
                settings.work_hours,
                settings.integration_config,
                settings.theme,
                settings.view_type,
                settings.dark_mode
            ],
        )?;

        if updated == 0 {
            return Err(msg_error_anyhow!(Message::SettingsNotFound));
        }

        Ok(())
    }
}
