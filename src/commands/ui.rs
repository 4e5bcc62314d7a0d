//! Interactive day view.

use crate::{
    db::{db::Db, repository::SqliteRepository},
    libs::{
        app::App, config::Config, data_storage::DataStorage, logger::init_file_logging, messages::Message,
        modals::DialoguerModals, service::TaskService,
    },
    msg_bail_anyhow, msg_info,
};
use anyhow::Result;

pub async fn cmd(logs: bool) -> Result<()> {
    let storage = DataStorage::new();
    if logs {
        init_file_logging(&storage)?;
    }

    let config = Config::read_from(&storage)?;
    let db = match config.db_path(&storage).and_then(Db::open) {
        Ok(db) => db,
        Err(error) => msg_bail_anyhow!(Message::DbOpenFailed(error.to_string())),
    };

    let service = TaskService::new(SqliteRepository::new(db));
    App::new(service, DialoguerModals::default(), config.ui()).run().await?;

    msg_info!(Message::Bye);
    Ok(())
}
