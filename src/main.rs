mod app;
mod color;
mod config;
mod dashboard;
mod data;
mod state;
mod ui;

use app::PickupExplorerApp;
use config::Settings;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let settings = Settings::from_env();
    log::info!(
        "Remote dataset {}, basemap {}",
        settings.data_url,
        if settings.mapbox_token.is_some() { "styled" } else { "unstyled" }
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 900.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Uber Pickups in NYC",
        options,
        Box::new(|cc| {
            // Image loaders decode the basemap bytes.
            egui_extras::install_image_loaders(&cc.egui_ctx);
            Ok(Box::new(PickupExplorerApp::new(settings)))
        }),
    )
}
