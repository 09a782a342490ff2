use anyhow::Context;
use biblio_app::modules;
use biblio_kernel::{settings::Settings, InitCtx, ModuleRegistry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().with_context(|| "failed to load BIBLIO settings")?;

    biblio_telemetry::init(&settings.telemetry)?;

    tracing::info!(
        env = ?settings.environment,
        page_size = settings.catalog.page_size,
        "biblio-app bootstrap starting"
    );

    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, &settings);

    let ctx = InitCtx {
        settings: &settings,
    };
    registry.init_all(&ctx).await?;
    registry.start_all(&ctx).await?;

    biblio_http::start_server(&registry, &settings).await?;

    registry.stop_all().await?;
    tracing::info!("biblio-app shutdown complete");
    Ok(())
}
