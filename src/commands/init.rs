//! Settings wizard for work hours and the Redmine connection.

use crate::{
    api::RedmineConfig,
    db::repository::SqliteRepository,
    libs::{
        messages::{prompts::PROMPT_WORK_HOURS, Message},
        repository::Repository,
        settings::{parse_work_hours, Settings},
    },
    msg_error, msg_success,
};
use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Input};

pub fn cmd() -> Result<()> {
    let repository = SqliteRepository::open_default()?;
    let current = repository.settings()?;

    let updated = init_settings(&current)?;
    repository.save_settings(&updated)?;

    msg_success!(Message::SettingsSaved);
    Ok(())
}

/// Prompts for every editable field with the current values pre-filled.
pub fn init_settings(current: &Settings) -> Result<Settings> {
    println!("{}", Message::WorkHoursHeader);
    let work_hours = loop {
        let value: String = Input::with_theme(&ColorfulTheme::default())
            .with_prompt(PROMPT_WORK_HOURS)
            .default(current.work_hours.clone())
            .interact_text()?;
        match parse_work_hours(&value) {
            Ok(_) => break value,
            Err(error) => msg_error!(Message::InvalidWorkHours(error.to_string())),
        }
    };

    let redmine = RedmineConfig::from_settings_blob(&current.integration_config).ok();
    let redmine = RedmineConfig::init(&redmine)?;

    let mut settings = current.clone();
    settings.set_work_hours(&work_hours);
    settings.integration_config = redmine.to_settings_blob()?;
    Ok(settings)
}
