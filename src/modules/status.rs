use async_trait::async_trait;
use tomato_kernel::{InitCtx, Module};

/// Reports what the shared database holds once the application is up.
pub struct StatusModule;

impl StatusModule {
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Module for StatusModule {
    fn name(&self) -> &'static str {
        "status"
    }

    async fn start(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        let collections = ctx.db.list_collection_names(None).await?;
        tracing::info!(
            module = self.name(),
            database = ctx.db.name(),
            collections = collections.len(),
            "status module started"
        );
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "status module stopped");
        Ok(())
    }
}

/// Create a new instance of the status module
pub fn create_module() -> std::sync::Arc<dyn Module> {
    std::sync::Arc::new(StatusModule::new())
}
