//! CLI entry-point that empties the file store.

use anyhow::Result;
use tracing::{info, instrument};

use crate::{
    config::Settings,
    data::{self, schema},
};

#[instrument(skip(settings))]
pub async fn run(settings: Settings) -> Result<()> {
    let conn = data::initialize(&settings.database_path)?;
    schema::drop_table(&conn)?;
    schema::create_table(&conn)?;
    info!(path = %settings.database_path.display(), "reset files table");
    Ok(())
}
