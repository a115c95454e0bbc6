use std::time::Duration;

use async_trait::async_trait;
use mongodb::bson::doc;
use mongodb::options::ClientOptions;
use mongodb::Client;

use tomato_kernel::settings::DatabaseSettings;

/// Opens a client for a connection string.
///
/// A returned client must already have proven the server reachable.
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(
        &self,
        uri: &str,
        settings: &DatabaseSettings,
    ) -> Result<Client, mongodb::error::Error>;
}

/// Production connector backed by the MongoDB driver.
#[derive(Debug, Default, Clone, Copy)]
pub struct MongoConnector;

#[async_trait]
impl Connector for MongoConnector {
    async fn connect(
        &self,
        uri: &str,
        settings: &DatabaseSettings,
    ) -> Result<Client, mongodb::error::Error> {
        let mut options = ClientOptions::parse(uri).await?;
        apply_settings(&mut options, settings);

        let hosts: Vec<String> = options.hosts.iter().map(ToString::to_string).collect();
        tracing::debug!(
            target: "tomato-db",
            hosts = ?hosts,
            app_name = ?options.app_name,
            "connecting to MongoDB"
        );

        let client = Client::with_options(options)?;

        // The driver connects lazily; ping so an unreachable server fails here.
        client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await?;

        Ok(client)
    }
}

/// Fill in options the connection string left unset.
fn apply_settings(options: &mut ClientOptions, settings: &DatabaseSettings) {
    if options.app_name.is_none() {
        options.app_name = Some(settings.app_name.clone());
    }
    if let Some(ms) = settings.connect_timeout_ms {
        options.connect_timeout = Some(Duration::from_millis(ms));
    }
    if let Some(ms) = settings.server_selection_timeout_ms {
        options.server_selection_timeout = Some(Duration::from_millis(ms));
    }
}
