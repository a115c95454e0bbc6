use anyhow::Context;
use tomato_kernel::settings::Settings;
use tomato_kernel::{InitCtx, ModuleRegistry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().with_context(|| "failed to load Tomato settings")?;

    tomato_telemetry::init(&settings.telemetry).ok();

    tracing::info!(env = ?settings.environment, "tomato-app bootstrap starting");

    let db = tomato_app::bootstrap::connect_or_exit(&settings.database).await;

    let mut registry = ModuleRegistry::new();
    tomato_app::modules::register_all(&mut registry);

    let ctx = InitCtx {
        settings: &settings,
        db: db.database(),
    };
    registry.init_all(&ctx).await?;
    registry.start_all(&ctx).await?;

    tracing::info!("tomato-app bootstrap complete");

    tokio::signal::ctrl_c()
        .await
        .with_context(|| "failed to listen for shutdown signal")?;

    tracing::info!("shutdown requested");
    registry.stop_all().await?;
    db.shutdown().await;

    Ok(())
}
