//! Blocking dialogs opened from the interactive views.
//!
//! The controller only talks to [`Modals`], so tests can script answers.
//! [`DialoguerModals`] is the terminal implementation.

use crate::api::Activity;
use crate::libs::messages::prompts::*;
use crate::libs::messages::Message;
use crate::libs::task::{NewTask, Task, TaskUpdate};
use anyhow::Result;
use console::Term;
use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};

pub trait Modals {
    fn new_task(&mut self) -> Result<NewTask>;

    /// New description for a copy of `task`.
    fn duplicate_task(&mut self, task: &Task) -> Result<String>;

    fn modify_task(&mut self, task: &Task) -> Result<TaskUpdate>;

    fn confirm(&mut self, prompt: &str) -> Result<bool>;

    fn alert(&mut self, message: &str) -> Result<()>;

    /// `None` when the picker was dismissed.
    fn select_activity(&mut self, prompt: &str, activities: &[Activity], current: Option<&Activity>) -> Result<Option<Activity>>;

    /// `true` to retry, `false` to quit.
    fn retry_or_quit(&mut self, message: &str) -> Result<bool>;
}

pub struct DialoguerModals {
    theme: ColorfulTheme,
}

impl Default for DialoguerModals {
    fn default() -> Self {
        DialoguerModals {
            theme: ColorfulTheme::default(),
        }
    }
}

impl DialoguerModals {
    fn text(&self, prompt: &str, initial: &str) -> Result<String> {
        Ok(Input::<String>::with_theme(&self.theme)
            .with_prompt(prompt)
            .with_initial_text(initial)
            .allow_empty(true)
            .interact_text()?)
    }
}

impl Modals for DialoguerModals {
    fn new_task(&mut self) -> Result<NewTask> {
        let description = self.text(PROMPT_TASK_DESCRIPTION, "")?;
        let project = self.text(PROMPT_TASK_PROJECT, "")?;
        let external_id = self.text(PROMPT_TASK_EXTERNAL_ID, "")?;

        Ok(NewTask::new(&description, Some(&project), Some(&external_id)))
    }

    fn duplicate_task(&mut self, task: &Task) -> Result<String> {
        self.text(PROMPT_TASK_DESCRIPTION, &task.description)
    }

    fn modify_task(&mut self, task: &Task) -> Result<TaskUpdate> {
        let current = TaskUpdate::from(task);

        Ok(TaskUpdate {
            description: self.text(PROMPT_TASK_DESCRIPTION, &current.description)?,
            project: self.text(PROMPT_TASK_PROJECT, &current.project)?,
            external_id: self.text(PROMPT_TASK_EXTERNAL_ID, &current.external_id)?,
            start: self.text(PROMPT_TASK_START, &current.start)?,
            end: self.text(PROMPT_TASK_END, &current.end)?,
        })
    }

    fn confirm(&mut self, prompt: &str) -> Result<bool> {
        Ok(Confirm::with_theme(&self.theme)
            .with_prompt(prompt)
            .default(false)
            .interact_opt()?
            .unwrap_or(false))
    }

    fn alert(&mut self, message: &str) -> Result<()> {
        let term = Term::stdout();
        term.write_line(message)?;
        term.write_line(PROMPT_CONTINUE)?;
        term.read_key()?;
        Ok(())
    }

    fn select_activity(&mut self, prompt: &str, activities: &[Activity], current: Option<&Activity>) -> Result<Option<Activity>> {
        let names: Vec<&str> = activities.iter().map(|activity| activity.name.as_str()).collect();
        let default = current
            .and_then(|current| activities.iter().position(|activity| activity == current))
            .unwrap_or(0);

        let selection = Select::with_theme(&self.theme)
            .with_prompt(prompt)
            .items(&names)
            .default(default)
            .interact_opt()?;

        Ok(selection.and_then(|index| activities.get(index).cloned()))
    }

    fn retry_or_quit(&mut self, message: &str) -> Result<bool> {
        let term = Term::stdout();
        term.write_line(message)?;

        let selection = Select::with_theme(&self.theme)
            .with_prompt(Message::RetryOrQuit.to_string())
            .items(&[PROMPT_RETRY, PROMPT_QUIT])
            .default(0)
            .interact_opt()?;

        Ok(selection == Some(0))
    }
}
