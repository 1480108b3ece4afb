use eframe::egui::{self, Ui};
use egui_extras::{Column, TableBuilder};

use crate::dashboard::{DashboardView, PREVIEW_ROWS};
use crate::data::loader::{BASE_COLUMN, DATE_COLUMN, LAT_COLUMN, LON_COLUMN};

const ROW_HEIGHT: f32 = 18.0;

/// Collapsible preview of the first filtered rows.
pub fn raw_data(ui: &mut Ui, view: &DashboardView) {
    egui::CollapsingHeader::new("Show raw data")
        .id_salt("raw_data")
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            let rows: Vec<_> = view.preview().collect();
            if view.filtered.len() > PREVIEW_ROWS {
                ui.weak(format!(
                    "Showing the first {PREVIEW_ROWS} of {} rows",
                    view.filtered.len()
                ));
            }

            TableBuilder::new(ui)
                .striped(true)
                .max_scroll_height(360.0)
                .column(Column::auto().at_least(150.0))
                .column(Column::auto().at_least(80.0))
                .column(Column::auto().at_least(80.0))
                .column(Column::remainder())
                .header(20.0, |mut header| {
                    for name in [DATE_COLUMN, LAT_COLUMN, LON_COLUMN, BASE_COLUMN] {
                        header.col(|ui| {
                            ui.strong(name);
                        });
                    }
                })
                .body(|body| {
                    body.rows(ROW_HEIGHT, rows.len(), |mut row| {
                        let r = rows[row.index()];
                        row.col(|ui| {
                            ui.label(r.timestamp.format("%Y-%m-%d %H:%M:%S").to_string());
                        });
                        row.col(|ui| {
                            ui.label(format!("{:.4}", r.latitude));
                        });
                        row.col(|ui| {
                            ui.label(format!("{:.4}", r.longitude));
                        });
                        row.col(|ui| {
                            ui.label(&r.base);
                        });
                    });
                });
        });
}
