//! In-N-Out-Books application library
//!
//! Wires the book and account modules onto the SHELF kernel and HTTP facade.

pub mod modules;
pub mod seed;
pub mod validation;

use anyhow::Context;
use axum::Router;
use shelf_kernel::{settings::Settings, InitCtx, ModuleRegistry};

/// Seed the stores and register every module.
pub fn build_registry(settings: &Settings) -> anyhow::Result<ModuleRegistry> {
    let stores = seed::load_stores(settings).with_context(|| "failed to seed stores")?;

    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, settings, stores)?;
    Ok(registry)
}

/// The complete application router, without lifecycle hooks.
pub fn build_app(settings: &Settings) -> anyhow::Result<Router> {
    let registry = build_registry(settings)?;
    Ok(shelf_http::build_router(&registry, settings))
}

/// Run the server until Ctrl-C, driving module lifecycles around it.
pub async fn run(settings: Settings) -> anyhow::Result<()> {
    let registry = build_registry(&settings)?;
    let ctx = InitCtx {
        settings: &settings,
    };

    registry.init_all(&ctx).await?;
    registry.start_all(&ctx).await?;

    let served = shelf_http::start_server(&registry, &settings, shutdown_signal()).await;

    registry.stop_all().await?;
    served
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
