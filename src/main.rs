mod app;
mod color;
mod state;
mod ui;

use anyhow::Context;
use app::DashboardApp;
use clap::Parser;
use eframe::egui;
use olist_dashboard::config::Config;
use state::AppState;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = Config::parse();

    if config.headless {
        return olist_dashboard::headless::run(&config).inspect_err(|e| {
            log::error!("Headless run failed: {e:#}");
        });
    }

    // No partial dashboard: a dataset that fails to load ends the process.
    let table = olist_dashboard::open_dataset(&config.data_dir)
        .inspect_err(|e| log::error!("Failed to load dataset: {e:#}"))
        .with_context(|| format!("loading dataset from {}", config.data_dir.display()))?;

    let state = AppState::new(
        table,
        config.data_dir.clone(),
        config.export_dir.clone(),
        config.filter_state(),
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Olist – E-commerce Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(DashboardApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("running the UI: {e}"))
}
