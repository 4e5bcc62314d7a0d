use super::actions::{Action, ActionContext};
use super::messages::Message;
use super::service::{FormattedWorkedDuration, HeaderSection};
use super::sync::SyncSession;
use super::task::Task;
use chrono::NaiveDate;
use console::{style, Term};
use prettytable::{format, row, Table};
use std::io;

const SELECTED_MARKER: &str = "▶";

pub struct View {}

impl View {
    pub fn tasks(tasks: &[Task], selected: Option<usize>) -> Table {
        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_NO_BORDER_LINE_SEPARATOR);

        table.set_titles(row!["", "ID", "Project", "Description", "Ext.ID", "Started", "Ended", "Duration", "Reported"]);
        for (index, task) in tasks.iter().enumerate() {
            let marker = if selected == Some(index) { SELECTED_MARKER } else { "" };
            table.add_row(row![
                marker,
                task.id,
                task.project_label(),
                task.description,
                task.external_id_label(),
                task.start_label(),
                task.end_label(),
                task.duration_label(),
                task.reported_icon()
            ]);
        }

        table
    }

    pub fn header(section: &HeaderSection) -> String {
        if section.behind {
            style(&section.text).red().to_string()
        } else {
            style(&section.text).green().to_string()
        }
    }

    /// Footer line of `[key] label` pairs, disabled ones dimmed.
    pub fn footer(actions: &[Action], ctx: &ActionContext) -> String {
        actions
            .iter()
            .map(|action| {
                let text = format!("[{}] {}", action.key.label(), action.label(ctx));
                if action.is_enabled(ctx) {
                    text
                } else {
                    style(text).dim().to_string()
                }
            })
            .collect::<Vec<_>>()
            .join("  ")
    }

    pub fn home(date: NaiveDate, tasks: &[Task], worked: &FormattedWorkedDuration, selected: Option<usize>, actions: &[Action], ctx: &ActionContext) -> String {
        let mut screen = format!(
            "{}\n{}\n{}\n\n",
            style(date.format("%A, %d %B %Y")).bold(),
            Self::header(&worked.daily),
            Self::header(&worked.weekly)
        );

        if tasks.is_empty() {
            screen.push_str(&Message::NoTasksForDate(date.format("%Y-%m-%d").to_string()).to_string());
            screen.push('\n');
        } else {
            screen.push_str(&Self::tasks(tasks, selected).to_string());
        }

        screen.push('\n');
        screen.push_str(&Self::footer(actions, ctx));
        screen
    }

    pub fn sync_table(session: &SyncSession) -> Table {
        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_NO_BORDER_LINE_SEPARATOR);

        table.set_titles(row!["", "Date", "Ext.ID", "Project", "Description", "Duration", "Activity", "Status"]);
        for (index, row) in session.rows().iter().enumerate() {
            let marker = if session.selected() == Some(index) { SELECTED_MARKER } else { "" };
            table.add_row(row![
                marker,
                row.entry.date.format("%Y-%m-%d"),
                row.entry.external_id,
                row.entry.project.as_deref().unwrap_or(""),
                row.entry.description,
                row.entry.duration_label(),
                row.activity_label(),
                row.status_label()
            ]);
        }

        table
    }

    pub fn sync(session: &SyncSession, actions: &[Action], ctx: &ActionContext) -> String {
        format!(
            "{}\n\n{}\n{}",
            style(Message::SyncTitle).bold(),
            Self::sync_table(session),
            Self::footer(actions, ctx)
        )
    }

    /// Replaces the terminal contents with `screen`.
    pub fn print(screen: &str) -> io::Result<()> {
        let term = Term::stdout();
        term.clear_screen()?;
        term.write_line(screen)
    }
}
