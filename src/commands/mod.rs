//! Command-line surface.
//!
//! `mytime --ui` opens the interactive day view, `--logs` adds file logging
//! to it, and `--init` edits the stored settings. Without a flag the usage
//! text is printed.

pub mod init;
pub mod ui;

use crate::libs::messages::Message;
use crate::msg_print;
use anyhow::Result;
use clap::Parser;

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Open the interactive day view
    #[arg(long)]
    ui: bool,

    /// Write a log file to the data directory
    #[arg(long)]
    logs: bool,

    /// Edit work hours and Redmine settings
    #[arg(long)]
    init: bool,
}

impl Cli {
    pub async fn menu() -> Result<()> {
        Self::parse().run().await
    }

    pub async fn run(self) -> Result<()> {
        if self.init {
            return init::cmd();
        }
        if self.ui {
            return ui::cmd(self.logs).await;
        }

        msg_print!(Message::Usage);
        Ok(())
    }
}
