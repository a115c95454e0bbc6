//! MongoDB connection bootstrap for the Tomato backend.
//!
//! [`connect`] turns [`DatabaseSettings`] into a live [`Db`] handle or a
//! [`DbError`]. Nothing in this crate exits the process; binaries decide
//! what to do with the error (see [`DbError::exit_code`]).

mod connector;
mod error;
mod module;

use mongodb::bson::doc;
use mongodb::{Client, Database};

use tomato_kernel::settings::DatabaseSettings;

pub use connector::{Connector, MongoConnector};
pub use error::DbError;
pub use module::DatabaseModule;

/// An established connection: the driver client plus the database the
/// application works in.
#[derive(Debug, Clone)]
pub struct Db {
    client: Client,
    database: Database,
}

impl Db {
    /// Wrap an existing client, selecting the connection string's default
    /// database or falling back to `fallback_name`.
    pub fn new(client: Client, fallback_name: &str) -> Self {
        let database = client
            .default_database()
            .unwrap_or_else(|| client.database(fallback_name));
        Self { client, database }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    /// Round-trip a `ping` command to the server.
    pub async fn ping(&self) -> Result<(), DbError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await?;
        Ok(())
    }

    /// Names of the collections in the application database.
    pub async fn collection_names(&self) -> Result<Vec<String>, DbError> {
        Ok(self.database.list_collection_names(None).await?)
    }

    /// Close pooled connections and stop background monitoring.
    pub async fn shutdown(self) {
        self.client.shutdown().await;
        tracing::info!(target: "tomato-db", "database connection closed");
    }
}

/// Connect using the MongoDB driver.
pub async fn connect(settings: &DatabaseSettings) -> Result<Db, DbError> {
    connect_with(&MongoConnector, settings).await
}

/// Connect through `connector`.
///
/// Fails with [`DbError::MissingUri`] before touching the connector when no
/// connection string is configured, and with [`DbError::Connection`] when the
/// connector fails.
pub async fn connect_with<C>(connector: &C, settings: &DatabaseSettings) -> Result<Db, DbError>
where
    C: Connector + ?Sized,
{
    let uri = match settings.uri.as_deref() {
        Some(uri) if !uri.is_empty() => uri,
        _ => return Err(DbError::missing_uri()),
    };

    let client = connector.connect(uri, settings).await?;
    let db = Db::new(client, &settings.name);

    tracing::info!(
        target: "tomato-db",
        database = db.database().name(),
        "DB Connected"
    );

    Ok(db)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Hands out lazily connecting clients and counts calls.
    #[derive(Default)]
    struct CountingConnector {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Connector for CountingConnector {
        async fn connect(
            &self,
            uri: &str,
            _settings: &DatabaseSettings,
        ) -> Result<Client, mongodb::error::Error> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Client::with_uri_str(uri).await
        }
    }

    fn settings(uri: Option<&str>) -> DatabaseSettings {
        DatabaseSettings {
            uri: uri.map(str::to_string),
            ..DatabaseSettings::default()
        }
    }

    #[tokio::test]
    async fn missing_uri_never_reaches_the_connector() {
        let connector = CountingConnector::default();

        let err = connect_with(&connector, &settings(None)).await.unwrap_err();

        assert!(matches!(err, DbError::MissingUri { var: "MONGODB_URI" }));
        assert_eq!(connector.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn empty_uri_is_treated_as_missing() {
        let connector = CountingConnector::default();

        let err = connect_with(&connector, &settings(Some(""))).await.unwrap_err();

        assert!(matches!(err, DbError::MissingUri { .. }));
        assert_eq!(connector.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn uri_default_database_is_selected() {
        let connector = CountingConnector::default();

        let db = connect_with(&connector, &settings(Some("mongodb://127.0.0.1:27017/food")))
            .await
            .unwrap();

        assert_eq!(db.database().name(), "food");
        assert_eq!(connector.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn configured_name_is_the_fallback() {
        let connector = CountingConnector::default();

        let db = connect_with(&connector, &settings(Some("mongodb://127.0.0.1:27017")))
            .await
            .unwrap();

        assert_eq!(db.database().name(), "tomato");
    }

    #[tokio::test]
    async fn malformed_uri_is_a_connection_error() {
        let err = connect(&settings(Some("not-a-mongodb-uri")))
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::Connection { .. }));
        assert_eq!(err.exit_code(), 1);
    }
}
