use eframe::egui;

use crate::config::Settings;
use crate::state::AppState;
use crate::ui::map::Basemap;
use crate::ui::{map, panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct PickupExplorerApp {
    pub state: AppState,
    pub basemap: Basemap,
}

impl PickupExplorerApp {
    pub fn new(settings: Settings) -> Self {
        let basemap = Basemap::new(settings.mapbox_token.clone());
        Self {
            state: AppState::new(settings),
            basemap,
        }
    }
}

impl eframe::App for PickupExplorerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Controls edited last frame take effect before anything is drawn.
        self.state.refresh();

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: controls ----
        egui::SidePanel::left("control_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: KPIs, histogram, map, raw data ----
        egui::CentralPanel::default().show(ctx, |ui| {
            let Some(view) = &self.state.view else {
                ui.centered_and_justified(|ui| match &self.state.status_message {
                    Some(msg) => ui.heading(msg),
                    None => ui.heading("Loading pickups…"),
                });
                return;
            };

            egui::ScrollArea::vertical().auto_shrink([false, false]).show(ui, |ui| {
                panels::kpis(ui, view);
                ui.separator();
                plot::hourly_histogram(ui, view);
                ui.separator();
                map::heatmap(ui, view, &mut self.basemap);
                ui.separator();
                table::raw_data(ui, view);
            });
        });
    }
}
