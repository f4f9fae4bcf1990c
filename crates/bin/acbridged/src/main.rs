//! # acbridged — air-conditioner bridge daemon
//!
//! Composition root that wires all adapters together and starts the server.
//!
//! ## Responsibilities
//! - Load configuration (config file, env vars)
//! - Install the `tracing` subscriber
//! - Pick the device cloud: SmartThings or the virtual demo devices
//! - Build the accessory host (with its optional cache file)
//! - Run platform discovery and start one polling controller per accessory
//! - Build the axum router and serve until Ctrl-C
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod config;

use std::error::Error;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use acbridge_adapter_http_axum::host::InMemoryAccessoryHost;
use acbridge_adapter_http_axum::state::AppState;
use acbridge_adapter_smartthings::SmartThingsClient;
use acbridge_adapter_virtual::VirtualCloud;
use acbridge_app::event_bus::InProcessEventBus;
use acbridge_app::platform::Platform;
use acbridge_app::ports::DeviceCloud;
use acbridge_app::registry::ControllerRegistry;

use crate::config::Config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.logging.filter))
        .init();

    if config.integrations.virtual_enabled {
        tracing::info!("using virtual devices");
        run(&config, VirtualCloud::default()).await
    } else {
        tracing::info!(base_url = %config.smartthings.base_url, "using SmartThings cloud");
        let client = SmartThingsClient::new(&config.smartthings)?;
        run(&config, client).await
    }
}

async fn run<C>(config: &Config, cloud: C) -> Result<(), Box<dyn Error>>
where
    C: DeviceCloud + Send + Sync + 'static,
{
    // Accessory host
    let host = match &config.host.cache_path {
        Some(path) => InMemoryAccessoryHost::with_cache_file(path)?,
        None => InMemoryAccessoryHost::new(),
    };

    // Event bus
    let event_bus = InProcessEventBus::default();

    // Discovery
    let platform = Platform::new(cloud, host, event_bus.clone(), config.platform_config());
    let registry = match platform.start().await {
        Ok(registry) => registry,
        Err(err) => {
            tracing::error!(error = %err, "device discovery failed, serving no accessories");
            ControllerRegistry::new()
        }
    };
    tracing::info!(accessories = registry.len(), "bridge ready");
    let registry = Arc::new(registry);

    // HTTP
    let state = AppState::from_arc(Arc::clone(&registry), event_bus);
    let app = acbridge_adapter_http_axum::router::build(state);

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "acbridged listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    registry.shutdown();
    tracing::info!("acbridged stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
