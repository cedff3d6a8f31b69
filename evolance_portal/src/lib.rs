pub mod api;
pub mod app;
pub mod config;
pub mod content;
pub mod models;
pub mod router;
pub mod session;
pub mod storage;

#[cfg(test)]
mod testing;

use anyhow::{anyhow, Context, Result};
use eframe::{self, egui};
use log::info;

pub use app::EvolanceApp;
pub use config::PortalConfig;

use api::ApiClient;
use session::SessionManager;
use storage::FileTokenStore;

/// Launches the portal with configuration read from the environment.
pub fn run_portal() -> Result<()> {
    let _ = env_logger::builder().is_test(false).try_init();
    let config = PortalConfig::from_env()?;
    run_portal_with(config, default_native_options())
}

/// Launches the portal with caller-provided configuration and window options.
pub fn run_portal_with(config: PortalConfig, options: eframe::NativeOptions) -> Result<()> {
    info!("using backend at {}", config.backend_url);
    let api = ApiClient::new(config.backend_url.clone(), config.request_timeout)
        .context("failed to initialise API client")?;
    let store = FileTokenStore::new(config.token_path.clone());
    info!("session token file: {}", store.path().display());
    let session = SessionManager::new(Box::new(store));

    eframe::run_native(
        "Evolance Research Portal",
        options,
        Box::new(move |_cc| Ok(Box::new(EvolanceApp::new(api, session)))),
    )
    .map_err(|err| anyhow!("UI error: {err}"))
}

fn default_native_options() -> eframe::NativeOptions {
    eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 760.0])
            .with_min_inner_size([800.0, 600.0]),
        ..Default::default()
    }
}
