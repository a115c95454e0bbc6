//! Process-level startup policy.

use tomato_db::{Db, DbError};
use tomato_kernel::settings::DatabaseSettings;

/// Connect to the database or terminate the process.
///
/// There is no retry: a missing connection string or a failed attempt is
/// logged and the process exits with [`DbError::exit_code`].
pub async fn connect_or_exit(settings: &DatabaseSettings) -> Db {
    match tomato_db::connect(settings).await {
        Ok(db) => db,
        Err(err) => exit_with(&err),
    }
}

fn exit_with(err: &DbError) -> ! {
    tracing::error!(kind = kind(err), "Error connecting to MongoDB: {}", err);
    // The subscriber may not be installed yet; stderr always is.
    eprintln!("Error connecting to MongoDB: {}", err);
    std::process::exit(err.exit_code());
}

fn kind(err: &DbError) -> &'static str {
    match err {
        DbError::MissingUri { .. } => "configuration",
        DbError::Connection { .. } => "connection",
    }
}
