use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::dashboard::{DashboardView, ROW_LIMIT_MAX, ROW_LIMIT_MIN, ROW_LIMIT_STEP};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – control widgets
// ---------------------------------------------------------------------------

/// Render the left control panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Controls");
    ui.separator();

    ui.strong("Number of rows to load");
    ui.add(
        egui::Slider::new(&mut state.inputs.row_limit, ROW_LIMIT_MIN..=ROW_LIMIT_MAX)
            .step_by(ROW_LIMIT_STEP as f64),
    );
    if let Some(loader) = &state.loader {
        let note = if loader.cache().contains(state.inputs.row_limit) {
            "cached"
        } else {
            "not loaded yet"
        };
        ui.weak(format!("{note}; {} bound(s) in memory", loader.cache().len()));
    }
    ui.add_space(6.0);

    ui.strong("Hour of day");
    ui.add(egui::Slider::new(&mut state.inputs.hour, 0..=23).suffix(":00"));
    ui.separator();

    let Some(view) = &state.view else {
        ui.label("No dataset loaded.");
        return;
    };

    // Clone what we need so we can mutate state inside the loop.
    let all_bases = view.dataset.bases.clone();
    let selected = state.selected_bases();
    let n_selected = all_bases.iter().filter(|b| selected.contains(*b)).count();
    let header_text = format!("Uber base  ({n_selected}/{})", all_bases.len());

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            egui::CollapsingHeader::new(RichText::new(header_text).strong())
                .id_salt("base_filter")
                .default_open(true)
                .show(ui, |ui: &mut Ui| {
                    ui.horizontal(|ui: &mut Ui| {
                        if ui.small_button("All").clicked() {
                            state.select_all();
                        }
                        if ui.small_button("None").clicked() {
                            state.select_none();
                        }
                    });

                    for base in &all_bases {
                        let mut checked = selected.contains(base);
                        if ui.checkbox(&mut checked, base).changed() {
                            state.toggle_base(base);
                        }
                    }
                });
        });
}

// ---------------------------------------------------------------------------
// KPI row
// ---------------------------------------------------------------------------

/// Records loaded, unique bases and date range, side by side.
pub fn kpis(ui: &mut Ui, view: &DashboardView) {
    let summary = &view.summary;
    let date_range = date_range_label(view);

    ui.columns(3, |cols| {
        metric(&mut cols[0], "Total Records Loaded", &thousands(summary.count));
        metric(&mut cols[1], "Unique Uber Bases", &summary.distinct_bases.to_string());
        metric(&mut cols[2], "Date Range", &date_range);
    });
}

/// First and last pickup date of the loaded rows, or a dash when nothing loaded.
pub fn date_range_label(view: &DashboardView) -> String {
    match view.summary.time_range {
        Some((lo, hi)) if !view.dataset.is_empty() => format!("{} → {}", lo.date(), hi.date()),
        _ => "–".to_string(),
    }
}

fn metric(ui: &mut Ui, label: &str, value: &str) {
    ui.vertical(|ui| {
        ui.label(RichText::new(label).weak());
        ui.label(RichText::new(value).size(26.0).strong());
    });
}

/// `1234567` → `"1,234,567"`.
pub fn thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open local dataset…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui.button("Reload remote dataset").clicked() {
                state.use_remote_source();
                ui.close_menu();
            }
            let can_export = state.view.as_ref().is_some_and(|v| !v.filtered.is_empty());
            if ui.add_enabled(can_export, egui::Button::new("Export filtered rows…")).clicked() {
                export_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(view) = &state.view {
            ui.label(format!(
                "{} pickups loaded, {} at {}:00",
                thousands(view.dataset.len()),
                thousands(view.filtered.len()),
                view.criteria.hour
            ));
        }

        if let Some(msg) = state.status_message.clone() {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
            if ui.small_button("Retry").clicked() {
                state.retry();
            }
        }

        if let Some(msg) = state.export_message.clone() {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
            if ui.small_button("Dismiss").clicked() {
                state.export_message = None;
            }
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open pickup data")
        .add_filter("CSV", &["csv", "gz"])
        .pick_file();

    if let Some(path) = file {
        state.use_file_source(&path);
    }
}

pub fn export_dialog(state: &mut AppState) {
    let Some(view) = &state.view else {
        return;
    };
    let file = rfd::FileDialog::new()
        .set_title("Export filtered rows")
        .set_file_name(format!("pickups-{}h.csv", view.criteria.hour))
        .add_filter("CSV", &["csv"])
        .save_file();

    if let Some(path) = file {
        state.export_to(&path);
    }
}
