use async_trait::async_trait;
use mongodb::bson::doc;

use tomato_kernel::{InitCtx, Module};

/// Core module that checks the shared connection during the lifecycle.
pub struct DatabaseModule;

impl DatabaseModule {
    pub const fn new() -> Self {
        Self
    }
}

impl Default for DatabaseModule {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Module for DatabaseModule {
    fn name(&self) -> &'static str {
        "db"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            database = ctx.db.name(),
            environment = ?ctx.settings.environment,
            "db module initialized"
        );
        Ok(())
    }

    async fn start(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        ctx.db.run_command(doc! { "ping": 1 }, None).await?;
        tracing::info!(module = self.name(), "db module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "db module stopped");
        Ok(())
    }
}
