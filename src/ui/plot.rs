use eframe::egui::Ui;
use egui_plot::{Bar, BarChart, Plot};

use crate::color::BAR_COLOR;
use crate::dashboard::DashboardView;

// ---------------------------------------------------------------------------
// Pickups by hour (full dataset)
// ---------------------------------------------------------------------------

/// Render the 24-bucket histogram as a bar chart.
pub fn hourly_histogram(ui: &mut Ui, view: &DashboardView) {
    ui.heading("Pickups Distribution by Hour");

    let bars: Vec<Bar> = view
        .summary
        .hourly_histogram
        .iter()
        .enumerate()
        .map(|(hour, &count)| {
            let bar = Bar::new(hour as f64, count as f64)
                .width(0.8)
                .name(format!("{hour}:00"));
            if hour as u32 == view.criteria.hour {
                bar.fill(BAR_COLOR)
            } else {
                bar.fill(BAR_COLOR.gamma_multiply(0.55))
            }
        })
        .collect();

    Plot::new("hourly_histogram")
        .height(220.0)
        .x_axis_label("Hour of day")
        .y_axis_label("Pickups")
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .allow_boxed_zoom(false)
        .include_y(0.0)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name("Pickups"));
        });
}
